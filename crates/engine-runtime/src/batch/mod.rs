pub mod executor;
pub mod reporter;
pub mod runner;
