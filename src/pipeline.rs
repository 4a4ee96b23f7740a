use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::data::loader::{column_from_grid, first_sheet_rows, read_workbook};
use crate::data::model::{InputFile, NumericColumn};
use crate::data::properties::{CalculatedProperties, PhysicalInputs};
use crate::data::thermal::ThermalMetrics;
use crate::data::writer::{merge_into_template, report_column};
use crate::error::{InputKind, ReportError, ReportResult};

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Form fields exactly as typed by the operator.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub sample_name: String,
    pub reference_temperature: String,
    /// `YYYY-MM-DD`.
    pub evaluation_date: String,
    pub remarks: String,
    pub thickness_mm: String,
    pub weight_g: String,
    pub width_mm: String,
    pub length_mm: String,
    pub heat_setting: String,
    pub pressure: String,
}

/// Everything one run needs.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub log: Option<InputFile>,
    pub template: Option<InputFile>,
    pub fields: FormFields,
}

/// A checked request: both files present, every number finite.
#[derive(Debug, Clone)]
pub struct ValidatedRun<'a> {
    pub log: &'a InputFile,
    pub template: &'a InputFile,
    pub reference_temperature: f64,
    pub inputs: PhysicalInputs,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub column: NumericColumn,
    pub metrics: ThermalMetrics,
    pub properties: CalculatedProperties,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Check files and fields before any parsing. Every failing group adds
/// one message; remarks is the only optional field.
pub fn validate(request: &RunRequest) -> ReportResult<ValidatedRun<'_>> {
    let f = &request.fields;
    let mut errors = Vec::new();

    if request.log.is_none() || request.template.is_none() {
        errors.push("Please select both the temperature log and the report template.".to_string());
    }

    if blank(&f.sample_name) {
        errors.push("Please enter the sample name.".to_string());
    }

    let reference_temperature = parse_number(&f.reference_temperature);
    if blank(&f.reference_temperature) {
        errors.push("Please enter the reference temperature at 60 s.".to_string());
    } else if reference_temperature.is_none() {
        errors.push("The reference temperature at 60 s must be a number.".to_string());
    }

    if blank(&f.evaluation_date) {
        errors.push("Please enter the evaluation date.".to_string());
    } else if NaiveDate::parse_from_str(f.evaluation_date.trim(), "%Y-%m-%d").is_err() {
        errors.push("The evaluation date must be a valid date (YYYY-MM-DD).".to_string());
    }

    let dimensions = [
        ("thickness", &f.thickness_mm),
        ("weight", &f.weight_g),
        ("width", &f.width_mm),
        ("length", &f.length_mm),
    ];
    let parsed = dimensions.map(|(_, raw)| parse_number(raw));
    if dimensions.iter().any(|(_, raw)| blank(raw)) {
        errors.push("Please enter thickness, weight, width and length.".to_string());
    } else {
        let invalid: Vec<&str> = dimensions
            .iter()
            .zip(&parsed)
            .filter(|(_, value)| value.is_none())
            .map(|((name, _), _)| *name)
            .collect();
        if !invalid.is_empty() {
            errors.push(format!("Measurements must be numbers: {}.", invalid.join(", ")));
        }
    }

    if blank(&f.heat_setting) || blank(&f.pressure) {
        errors.push("Please enter the heat-source setting and the pressure.".to_string());
    }

    let (
        Some(log),
        Some(template),
        Some(reference_temperature),
        [Some(thickness_mm), Some(weight_g), Some(width_mm), Some(length_mm)],
    ) = (
        request.log.as_ref(),
        request.template.as_ref(),
        reference_temperature,
        parsed,
    )
    else {
        return Err(ReportError::Validation(errors));
    };
    if !errors.is_empty() {
        return Err(ReportError::Validation(errors));
    }

    Ok(ValidatedRun {
        log,
        template,
        reference_temperature,
        inputs: PhysicalInputs {
            sample_name: f.sample_name.trim().to_string(),
            thickness_mm,
            weight_g,
            width_mm,
            length_mm,
            heat_setting: f.heat_setting.trim().to_string(),
            pressure: f.pressure.trim().to_string(),
            evaluation_date: f.evaluation_date.trim().to_string(),
            remarks: f.remarks.trim().to_string(),
        },
    })
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// `<prefix>_<YYMMDD>.xlsx`
pub fn output_file_name(prefix: &str, today: NaiveDate) -> String {
    format!("{prefix}_{}.xlsx", today.format("%y%m%d"))
}

/// Run the whole pipeline. The first failing stage ends the run and no
/// partial output is returned.
pub fn run(request: &RunRequest, config: &AppConfig, today: NaiveDate) -> ReportResult<ReportOutput> {
    let checked = validate(request)?;

    let log_book = read_workbook(checked.log, InputKind::TemperatureLog)?;
    let properties = CalculatedProperties::from_inputs(&checked.inputs);

    let rows = first_sheet_rows(&log_book, InputKind::TemperatureLog)?;
    let column = column_from_grid(rows, config.temperature_column);
    let metrics = ThermalMetrics::compute(
        &column,
        checked.reference_temperature,
        config.temperature_column,
    )?;

    let values = report_column(
        &checked.inputs,
        &properties,
        &metrics,
        &config.not_available_label,
    );
    let bytes = merge_into_template(checked.template, &values)?;

    let file_name = output_file_name(&config.report_prefix, today);
    log::info!("Report '{file_name}' ready ({} bytes)", bytes.len());

    Ok(ReportOutput {
        file_name,
        bytes,
        column,
        metrics,
        properties,
    })
}
