//! Audit logging module.
//!
//! Records the outcome of every request that passes through the signature
//! guard. Logs are written in JSON lines format for easy parsing by log
//! analysis tools.

mod entry;
mod logger;

pub use entry::{AuditEntry, AuditResult};
pub use logger::AuditLogger;
