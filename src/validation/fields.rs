//! Typed access to a JSON request body.

use crate::error::{ApiError, ValidationErrorKind};

/// Wrapper around a JSON object body with helper methods.
#[derive(Debug, Clone)]
pub struct Fields {
    inner: serde_json::Map<String, serde_json::Value>,
}

impl Fields {
    /// Parse a raw body. Anything but a JSON object is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            ApiError::validation(ValidationErrorKind::InvalidBody {
                message: e.to_string(),
            })
        })?;
        Self::new(value)
    }

    pub fn new(value: serde_json::Value) -> Result<Self, ApiError> {
        match value {
            serde_json::Value::Object(inner) => Ok(Self { inner }),
            _ => Err(ApiError::validation(ValidationErrorKind::InvalidBody {
                message: "expected a JSON object".to_string(),
            })),
        }
    }

    /// Check that every listed key is present, reporting the first missing
    /// one in list order.
    pub fn require_present(&self, keys: &[&str]) -> Result<(), ApiError> {
        match keys.iter().find(|k| !self.inner.contains_key(**k)) {
            Some(missing) => Err(ApiError::validation(ValidationErrorKind::MissingField {
                field: missing.to_string(),
            })),
            None => Ok(()),
        }
    }

    /// Get a required string field.
    pub fn get_string(&self, key: &str) -> Result<String, ApiError> {
        match self.inner.get(key) {
            None => Err(ApiError::validation(ValidationErrorKind::MissingField {
                field: key.to_string(),
            })),
            Some(value) => as_string(key, value),
        }
    }

    /// Get an optional string field.
    pub fn get_optional_string(&self, key: &str) -> Result<Option<String>, ApiError> {
        self.inner
            .get(key)
            .map(|value| as_string(key, value))
            .transpose()
    }

    /// Get an optional non-negative integer field.
    pub fn get_optional_u32(&self, key: &str) -> Result<Option<u32>, ApiError> {
        self.inner
            .get(key)
            .map(|value| {
                value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| invalid(key, "expected a non-negative integer"))
            })
            .transpose()
    }
}

fn as_string(key: &str, value: &serde_json::Value) -> Result<String, ApiError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(key, "expected a string"))
}

fn invalid(key: &str, message: &str) -> ApiError {
    ApiError::validation(ValidationErrorKind::InvalidField {
        field: key.to_string(),
        message: message.to_string(),
    })
}
