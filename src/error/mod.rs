//! Error types for the MedScheduler API.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
