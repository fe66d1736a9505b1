pub mod cleaner;
pub mod error;
pub mod metadata;
