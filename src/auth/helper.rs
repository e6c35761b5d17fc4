//! Signature helper for client-side testing.
//!
//! Produces exactly what a caller has to send for a given request, using
//! the same canonical form and signer as the validator. Not meant to be
//! reachable in a production deployment.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AuthErrorKind};

use super::canonical::{method_carries_body, CanonicalRequest};
use super::hmac::{sign, unix_now, HmacValidator};

/// Input to the signature helper.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: String,
    /// Unix seconds; defaults to now.
    pub timestamp: Option<i64>,
    /// Client to sign for; defaults to the primary client.
    pub client_id: Option<String>,
}

/// Headers a caller attaches to the signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeaders {
    #[serde(rename = "X-Client-ID")]
    pub client_id: String,
    #[serde(rename = "X-Timestamp")]
    pub timestamp: String,
    #[serde(rename = "X-Signature")]
    pub signature: String,
}

/// Everything needed to reproduce and send a signed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureGuide {
    pub signature: String,
    pub headers: SignatureHeaders,
    pub string_to_sign: String,
    pub timestamp: i64,
    pub max_age_seconds: u64,
}

/// Compute the signature and headers for a request.
///
/// The method is used as given, so a lowercase method produces a signature
/// the validator will not accept for the uppercase request line.
pub fn describe_signature(
    validator: &HmacValidator,
    request: &SignatureRequest,
) -> Result<SignatureGuide, ApiError> {
    let timestamp = request.timestamp.unwrap_or_else(unix_now);
    let clients = validator.clients();
    let client_id = request
        .client_id
        .as_deref()
        .unwrap_or_else(|| clients.primary());
    let key = clients
        .key(client_id)
        .ok_or_else(|| ApiError::auth(AuthErrorKind::InvalidClientId))?;

    let ts = timestamp.to_string();
    let body: &[u8] = if method_carries_body(&request.method) {
        request.body.as_bytes()
    } else {
        b""
    };
    let canonical = CanonicalRequest::new(&request.method, &request.path, &ts, body);
    let signature = sign(key, &canonical);
    let string_to_sign = canonical.to_display_string();

    Ok(SignatureGuide {
        headers: SignatureHeaders {
            client_id: client_id.to_string(),
            timestamp: ts,
            signature: signature.clone(),
        },
        signature,
        string_to_sign,
        timestamp,
        max_age_seconds: validator.max_age_seconds(),
    })
}
