use thiserror::Error;

/// Errors raised while resolving runtime settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key} must be a whole number, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: String,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{key} must be a boolean (true/false, yes/no, 1/0), got '{value}'")]
    InvalidBool { key: String, value: String },
}
