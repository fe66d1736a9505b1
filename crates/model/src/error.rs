use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown quality preset '{0}' (expected one of: fast, balanced, quality)")]
    UnknownPreset(String),

    #[error("Invalid metadata key '{0}'")]
    InvalidMetadataKey(String),
}
