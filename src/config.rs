use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::DEFAULT_TEMPERATURE_COLUMN;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "RUSTY_THERMO_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "rusty-thermo.json";

/// Settings that stay the same across runs.
///
/// ```json
/// {
///   "report_prefix": "ThermalReport",
///   "temperature_column": 3,
///   "not_available_label": "N/A"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output files are named `<report_prefix>_<YYMMDD>.xlsx`.
    pub report_prefix: String,
    /// Zero-based column of the log holding the temperature.
    pub temperature_column: usize,
    /// Text written for a metric with no qualifying reading.
    pub not_available_label: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            report_prefix: "ThermalReport".to_string(),
            temperature_column: DEFAULT_TEMPERATURE_COLUMN,
            not_available_label: "N/A".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `$RUSTY_THERMO_CONFIG`, else `./rusty-thermo.json`, else
    /// defaults. A file that exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
