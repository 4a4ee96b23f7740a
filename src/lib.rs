//! Thermal log evaluation: locate the 60 s reference point in a 1 Hz
//! temperature log, derive timing metrics, compute areal weight and
//! density, and append the results as a new column of a report template.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use config::AppConfig;
pub use error::{InputKind, ReportError, ReportResult};
pub use pipeline::{run, FormFields, ReportOutput, RunRequest};
