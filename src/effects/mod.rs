pub mod base;
pub mod properties;
pub mod tracker;
pub mod tracker_config;
