pub mod context;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod progress;
pub mod transform;
