use crate::exit::ExitStatus;
use engine_config::{error::ReportGenerationError, settings::error::SettingsError};
use engine_runtime::error::RunnerError;
use thiserror::Error;
use transforms::error::FileError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to read the input selection: {0}")]
    Input(#[from] FileError),

    #[error("Failed to prepare output folder {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run the batch: {0}")]
    Runner(#[from] RunnerError),

    #[error("Failed to write the report: {0}")]
    Report(#[from] ReportGenerationError),
}

impl CliError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CliError::Runner(_) | CliError::Report(_) => ExitStatus::Failure,
            _ => ExitStatus::Usage,
        }
    }
}
