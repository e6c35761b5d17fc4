//! Configuration module for the MedScheduler API.
//!
//! Handles loading and validating service configuration from TOML files.

mod settings;

pub use settings::*;
