pub mod curve;
pub mod ease;
