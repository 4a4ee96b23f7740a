use std::fmt;

pub type ReportResult<T> = Result<T, ReportError>;

/// Which uploaded file a parse failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    TemperatureLog,
    ReportTemplate,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::TemperatureLog => write!(f, "temperature log"),
            InputKind::ReportTemplate => write!(f, "report template"),
        }
    }
}

/// Every way a report run can fail. All of them end the run.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Failed to read the {file}: {reason}")]
    Parse { file: InputKind, reason: String },

    #[error(
        "No numeric temperature found in column {} of the log; cannot locate the 60 s reference point",
        .column + 1
    )]
    AnchorNotFound { column: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write the report workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

impl ReportError {
    pub fn parse(file: InputKind, reason: impl fmt::Display) -> Self {
        ReportError::Parse {
            file,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_listed_one_per_line() {
        let err = ReportError::Validation(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "first\nsecond");
    }

    #[test]
    fn parse_failure_names_the_file() {
        let err = ReportError::parse(InputKind::ReportTemplate, "bad zip");
        assert_eq!(err.to_string(), "Failed to read the report template: bad zip");
    }

    #[test]
    fn anchor_message_uses_one_based_column() {
        let err = ReportError::AnchorNotFound { column: 3 };
        assert!(err.to_string().contains("column 4"));
    }
}
