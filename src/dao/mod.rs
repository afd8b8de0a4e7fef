pub mod coverage;
pub mod registry;
