//! Audit entry types.
//!
//! Defines the structure of audit log entries.

use serde::Serialize;
use uuid::Uuid;

/// A single audit log entry.
///
/// Records the outcome of one guarded request: who called, what they
/// asked for, whether the signature check let them through, and timing.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// RFC 3339 timestamp when the request was handled.
    pub timestamp: String,
    /// Unique identifier for the request.
    pub request_id: Uuid,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Client id header as sent, if any.
    pub client_id: Option<String>,
    /// Outcome of the request.
    pub result: AuditResult,
    /// Handling duration in milliseconds.
    pub duration_ms: u64,
}

impl AuditEntry {
    /// Create an entry for a request that passed the guard.
    pub fn success(
        timestamp: String,
        request_id: Uuid,
        method: String,
        path: String,
        client_id: Option<String>,
        http_status: u16,
        duration_ms: u64,
    ) -> Self {
        Self {
            timestamp,
            request_id,
            method,
            path,
            client_id,
            result: AuditResult::Success { http_status },
            duration_ms,
        }
    }

    /// Create an entry for a rejected request.
    pub fn failure(
        timestamp: String,
        request_id: Uuid,
        method: String,
        path: String,
        client_id: Option<String>,
        error_code: String,
        error_message: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            timestamp,
            request_id,
            method,
            path,
            client_id,
            result: AuditResult::Failure {
                error_code,
                error_message,
            },
            duration_ms,
        }
    }
}

/// Result of a guarded request for audit purposes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum AuditResult {
    /// Signature accepted; the handler answered with this HTTP status.
    #[serde(rename = "success")]
    Success { http_status: u16 },
    /// Request rejected before reaching the handler.
    #[serde(rename = "failure")]
    Failure {
        error_code: String,
        error_message: String,
    },
}
