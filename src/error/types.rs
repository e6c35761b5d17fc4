//! Error types for the MedScheduler API.

use serde::Serialize;
use thiserror::Error;

/// Main error type for the service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Authentication errors.
    #[error("Authentication error: {kind}")]
    Auth { kind: AuthErrorKind },

    /// Request payload validation errors.
    #[error("Validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// A record addressed by id does not exist.
    #[error("{resource} not found")]
    NotFound { resource: &'static str, id: String },

    /// Request body exceeded the configured limit.
    #[error("Request body exceeds {max} bytes")]
    PayloadTooLarge { max: usize },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Authentication error kinds.
///
/// Every kind is terminal: the caller has to produce a freshly signed
/// request, the server never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    #[error("Missing authentication headers")]
    MissingHeaders { required: Vec<&'static str> },

    #[error("Invalid client identity")]
    InvalidClientId,

    #[error("Invalid timestamp format")]
    InvalidTimestampFormat,

    #[error("Timestamp too old or too far in the future")]
    TimestampOutOfWindow {
        skew_seconds: u64,
        max_age_seconds: u64,
    },

    #[error("Invalid signature")]
    InvalidSignature { debug_info: Option<SignatureDebugInfo> },

    #[error("Failed to load signing secret: {message}")]
    SecretError { message: String },
}

/// Request details echoed back on a signature mismatch so callers can
/// compare them against what they signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureDebugInfo {
    pub method: String,
    pub path: String,
    pub timestamp: String,
    pub body_length: usize,
}

/// Validation error kinds.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Patient not found")]
    UnknownPatient { patient_id: String },
}

impl ApiError {
    /// Shorthand for an authentication failure.
    pub fn auth(kind: AuthErrorKind) -> Self {
        Self::Auth { kind }
    }

    /// Shorthand for a validation failure.
    pub fn validation(kind: ValidationErrorKind) -> Self {
        Self::Validation { kind }
    }

    /// Stable machine-readable code, used in logs and the audit trail.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Auth { kind } => kind.code(),
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl AuthErrorKind {
    /// Stable machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeaders { .. } => "MISSING_HEADERS",
            Self::InvalidClientId => "INVALID_CLIENT_ID",
            Self::InvalidTimestampFormat => "INVALID_TIMESTAMP_FORMAT",
            Self::TimestampOutOfWindow { .. } => "TIMESTAMP_OUT_OF_WINDOW",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::SecretError { .. } => "SECRET_ERROR",
        }
    }
}

/// Result type alias for service operations.
pub type ApiResult<T> = Result<T, ApiError>;
