pub mod item;
pub mod outcome;
pub mod params;
pub mod summary;
