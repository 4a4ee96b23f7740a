use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use rusty_thermo::data::model::InputFile;
use rusty_thermo::pipeline::{self, FormFields, ReportOutput, RunRequest};
use rusty_thermo::AppConfig;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which of the two uploads a file dialog is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upload {
    Log,
    Template,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Text fields as typed.
    pub fields: FormFields,

    /// Backing value of the date picker.
    pub evaluation_date: NaiveDate,

    pub log_file: Option<InputFile>,
    pub template_file: Option<InputFile>,

    /// Output of the last successful run (None until the first run).
    pub last_run: Option<ReportOutput>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the status message is an error.
    pub status_is_error: bool,
}

impl AppState {
    pub fn new(config: AppConfig, today: NaiveDate) -> Self {
        Self {
            config,
            fields: FormFields::default(),
            evaluation_date: today,
            log_file: None,
            template_file: None,
            last_run: None,
            status_message: None,
            status_is_error: false,
        }
    }

    /// Read a picked file into memory and keep it for the next run.
    pub fn load_upload(&mut self, upload: Upload, path: &Path) {
        match InputFile::read(path).with_context(|| format!("reading {}", path.display())) {
            Ok(file) => {
                log::info!("Selected {upload:?} '{}' ({} bytes)", file.name, file.bytes.len());
                match upload {
                    Upload::Log => self.log_file = Some(file),
                    Upload::Template => self.template_file = Some(file),
                }
                self.last_run = None;
                self.status_message = None;
            }
            Err(e) => self.set_error(&e),
        }
    }

    /// Validate the form and run the pipeline with today's date.
    pub fn run_report(&mut self, today: NaiveDate) {
        self.fields.evaluation_date = self.evaluation_date.format("%Y-%m-%d").to_string();
        let request = RunRequest {
            log: self.log_file.clone(),
            template: self.template_file.clone(),
            fields: self.fields.clone(),
        };

        match pipeline::run(&request, &self.config, today) {
            Ok(output) => {
                self.status_message = Some(format!("Report ready: {}", output.file_name));
                self.status_is_error = false;
                self.last_run = Some(output);
            }
            Err(e) => {
                log::error!("Report run failed: {e}");
                self.last_run = None;
                self.status_message = Some(e.to_string());
                self.status_is_error = true;
            }
        }
    }

    /// Write the last report to `path`.
    pub fn save_report(&mut self, path: &Path) -> Result<()> {
        let output = self
            .last_run
            .as_ref()
            .context("no report has been generated yet")?;
        std::fs::write(path, &output.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved report to {}", path.display());
        self.status_message = Some(format!("Saved {}", path.display()));
        self.status_is_error = false;
        Ok(())
    }

    pub fn set_error(&mut self, e: &anyhow::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
        self.status_is_error = true;
    }
}
