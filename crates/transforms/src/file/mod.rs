pub mod names;
pub mod scan;
