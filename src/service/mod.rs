pub mod coverage;
pub mod registry;
pub mod segment;
