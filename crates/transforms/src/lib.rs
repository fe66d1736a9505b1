pub mod csv;
pub mod error;
pub mod file;
pub mod pdf;
pub mod transcode;
