//! HMAC-SHA256 request signing and verification.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::hmac;
use subtle::ConstantTimeEq;

use crate::config::SecurityConfig;
use crate::error::{ApiError, AuthErrorKind, SignatureDebugInfo};

use super::canonical::{method_carries_body, CanonicalRequest};
use super::credentials::ClientRegistry;
use super::{CLIENT_ID_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// Sign a canonical request, returning the base64-encoded digest.
pub fn sign(key: &hmac::Key, request: &CanonicalRequest<'_>) -> String {
    let tag = hmac::sign(key, &request.signing_message());
    BASE64.encode(tag.as_ref())
}

/// Sign with a raw secret instead of a prepared key.
pub fn sign_with_secret(secret: &[u8], request: &CanonicalRequest<'_>) -> String {
    sign(&hmac::Key::new(hmac::HMAC_SHA256, secret), request)
}

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// The parts of an incoming request the validator looks at.
///
/// Headers are `None` when absent. Nothing here is tied to a particular
/// HTTP framework.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub client_id: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub body: &'a [u8],
}

impl<'a> SignedRequest<'a> {
    /// Build a view from a lookup function over header names.
    pub fn from_headers<F>(method: &'a str, path: &'a str, body: &'a [u8], header: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self {
            method,
            path,
            client_id: header(CLIENT_ID_HEADER),
            timestamp: header(TIMESTAMP_HEADER),
            signature: header(SIGNATURE_HEADER),
            body,
        }
    }

    /// Body bytes covered by the signature.
    pub fn signed_body(&self) -> &'a [u8] {
        if method_carries_body(self.method) {
            self.body
        } else {
            b""
        }
    }
}

/// HMAC validator for request authentication.
///
/// Stateless apart from the wall clock: the same request verifies the same
/// way any number of times inside the window.
#[derive(Debug, Clone)]
pub struct HmacValidator {
    clients: ClientRegistry,
    max_age_seconds: u64,
    debug_info: bool,
}

impl HmacValidator {
    /// Create a new HMAC validator.
    pub fn new(clients: ClientRegistry, max_age_seconds: u64) -> Self {
        Self {
            clients,
            max_age_seconds,
            debug_info: true,
        }
    }

    /// Build a validator from the `[security]` section.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, ApiError> {
        let clients = ClientRegistry::from_config(config)?;
        Ok(Self::new(clients, config.max_request_age_seconds).with_debug_info(config.debug_info))
    }

    /// Toggle request echo on signature mismatches.
    pub fn with_debug_info(mut self, enabled: bool) -> Self {
        self.debug_info = enabled;
        self
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    /// Validate a signed request against the current time.
    pub fn validate(&self, request: &SignedRequest<'_>) -> Result<(), ApiError> {
        self.validate_at(request, unix_now())
    }

    /// Validate a signed request as if the current time were `now`.
    ///
    /// Checks, stopping at the first failure:
    /// 1. All three auth headers are present and non-empty
    /// 2. The client id is registered
    /// 3. The timestamp is an integer
    /// 4. The timestamp is within `max_age_seconds` of `now`, either side
    /// 5. The signature matches, compared in constant time
    pub fn validate_at(&self, request: &SignedRequest<'_>, now: i64) -> Result<(), ApiError> {
        // 1. Presence
        let (client_id, timestamp, signature) = match (
            non_empty(request.client_id),
            non_empty(request.timestamp),
            non_empty(request.signature),
        ) {
            (Some(c), Some(t), Some(s)) => (c, t, s),
            _ => {
                return Err(ApiError::auth(AuthErrorKind::MissingHeaders {
                    required: vec![CLIENT_ID_HEADER, TIMESTAMP_HEADER, SIGNATURE_HEADER],
                }))
            }
        };

        // 2. Identity
        let key = self
            .clients
            .key(client_id)
            .ok_or_else(|| ApiError::auth(AuthErrorKind::InvalidClientId))?;

        // 3. Timestamp format
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| ApiError::auth(AuthErrorKind::InvalidTimestampFormat))?;

        // 4. Replay window, boundary inclusive
        let skew = now.abs_diff(ts);
        if skew > self.max_age_seconds {
            return Err(ApiError::auth(AuthErrorKind::TimestampOutOfWindow {
                skew_seconds: skew,
                max_age_seconds: self.max_age_seconds,
            }));
        }

        // 5. Signature
        let body = request.signed_body();
        let canonical = CanonicalRequest::new(request.method, request.path, timestamp, body);
        let expected = sign(key, &canonical);

        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            let debug_info = self.debug_info.then(|| SignatureDebugInfo {
                method: request.method.to_string(),
                path: request.path.to_string(),
                timestamp: timestamp.to_string(),
                body_length: body.len(),
            });
            return Err(ApiError::auth(AuthErrorKind::InvalidSignature { debug_info }));
        }

        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: &str = "medscheduler_client";
    const SECRET: &[u8] = b"s3cret";
    const NOW: i64 = 1_700_000_100;

    fn create_test_validator() -> HmacValidator {
        HmacValidator::new(ClientRegistry::new(CLIENT, SECRET), 300)
    }

    /// Owned request that can be tampered with before validation.
    struct TestRequest {
        method: String,
        path: String,
        client_id: Option<String>,
        timestamp: Option<String>,
        signature: Option<String>,
        body: Vec<u8>,
    }

    impl TestRequest {
        fn signed(method: &str, path: &str, timestamp: i64, body: &[u8], secret: &[u8]) -> Self {
            let ts = timestamp.to_string();
            let signed_body = if method_carries_body(method) { body } else { b"" };
            let signature =
                sign_with_secret(secret, &CanonicalRequest::new(method, path, &ts, signed_body));
            Self {
                method: method.to_string(),
                path: path.to_string(),
                client_id: Some(CLIENT.to_string()),
                timestamp: Some(ts),
                signature: Some(signature),
                body: body.to_vec(),
            }
        }

        fn view(&self) -> SignedRequest<'_> {
            SignedRequest {
                method: &self.method,
                path: &self.path,
                client_id: self.client_id.as_deref(),
                timestamp: self.timestamp.as_deref(),
                signature: self.signature.as_deref(),
                body: &self.body,
            }
        }
    }

    fn auth_kind(result: Result<(), ApiError>) -> AuthErrorKind {
        match result {
            Err(ApiError::Auth { kind }) => kind,
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_example_accepted() {
        let validator = create_test_validator();
        let request = TestRequest::signed("POST", "/appointments", 1_700_000_000, br#"{"a":1}"#, SECRET);

        assert!(validator.validate_at(&request.view(), NOW).is_ok());
    }

    #[test]
    fn test_signature_is_deterministic_base64() {
        let canonical = CanonicalRequest::new("POST", "/appointments", "1700000000", br#"{"a":1}"#);
        let a = sign_with_secret(SECRET, &canonical);
        let b = sign_with_secret(SECRET, &canonical);
        assert_eq!(a, b);
        // 32-byte digest, padded standard base64
        assert_eq!(a.len(), 44);
        assert_eq!(BASE64.decode(&a).unwrap().len(), 32);
    }

    #[test]
    fn test_get_ignores_body() {
        let validator = create_test_validator();
        let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
        request.body = b"ignored".to_vec();

        assert!(validator.validate_at(&request.view(), NOW).is_ok());
    }

    #[test]
    fn test_missing_each_header() {
        let validator = create_test_validator();
        let base = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);

        for field in 0..3 {
            let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
            match field {
                0 => request.client_id = None,
                1 => request.timestamp = None,
                _ => request.signature = None,
            }
            let kind = auth_kind(validator.validate_at(&request.view(), NOW));
            assert_eq!(
                kind,
                AuthErrorKind::MissingHeaders {
                    required: vec![CLIENT_ID_HEADER, TIMESTAMP_HEADER, SIGNATURE_HEADER]
                }
            );
        }

        assert!(validator.validate_at(&base.view(), NOW).is_ok());
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        let validator = create_test_validator();
        let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
        request.signature = Some(String::new());

        assert!(matches!(
            auth_kind(validator.validate_at(&request.view(), NOW)),
            AuthErrorKind::MissingHeaders { .. }
        ));
    }

    #[test]
    fn test_unknown_client() {
        let validator = create_test_validator();
        let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
        request.client_id = Some("intruder".to_string());

        assert_eq!(
            auth_kind(validator.validate_at(&request.view(), NOW)),
            AuthErrorKind::InvalidClientId
        );
    }

    #[test]
    fn test_unparseable_timestamp() {
        let validator = create_test_validator();
        for bad in ["yesterday", "1700000000.5", "0x10", " 1700000000"] {
            let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
            request.timestamp = Some(bad.to_string());
            assert_eq!(
                auth_kind(validator.validate_at(&request.view(), NOW)),
                AuthErrorKind::InvalidTimestampFormat,
                "timestamp {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let validator = create_test_validator();

        for ts in [NOW - 300, NOW + 300] {
            let request = TestRequest::signed("GET", "/patients", ts, b"", SECRET);
            assert!(validator.validate_at(&request.view(), NOW).is_ok());
        }

        for ts in [NOW - 301, NOW + 301] {
            let request = TestRequest::signed("GET", "/patients", ts, b"", SECRET);
            assert_eq!(
                auth_kind(validator.validate_at(&request.view(), NOW)),
                AuthErrorKind::TimestampOutOfWindow {
                    skew_seconds: 301,
                    max_age_seconds: 300
                }
            );
        }
    }

    #[test]
    fn test_extreme_timestamp_does_not_overflow() {
        let validator = create_test_validator();
        let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
        request.timestamp = Some(i64::MIN.to_string());

        assert!(matches!(
            auth_kind(validator.validate_at(&request.view(), NOW)),
            AuthErrorKind::TimestampOutOfWindow { .. }
        ));
    }

    #[test]
    fn test_window_checked_before_signature() {
        let validator = create_test_validator();
        let mut request = TestRequest::signed("GET", "/patients", NOW - 1000, b"", SECRET);
        request.signature = Some("garbage".to_string());

        assert!(matches!(
            auth_kind(validator.validate_at(&request.view(), NOW)),
            AuthErrorKind::TimestampOutOfWindow { .. }
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let validator = create_test_validator();
        let request = TestRequest::signed("POST", "/appointments", NOW, b"{}", b"other");

        assert!(matches!(
            auth_kind(validator.validate_at(&request.view(), NOW)),
            AuthErrorKind::InvalidSignature { .. }
        ));
    }

    #[test]
    fn test_any_substituted_component_invalidates() {
        let validator = create_test_validator();
        let body = br#"{"patient_id":"pat_001"}"#;

        let tampered: Vec<Box<dyn Fn(&mut TestRequest)>> = vec![
            Box::new(|r: &mut TestRequest| r.method = "PUT".to_string()),
            Box::new(|r: &mut TestRequest| r.path = "/appointments/".to_string()),
            Box::new(|r: &mut TestRequest| r.timestamp = Some((NOW + 1).to_string())),
            Box::new(|r: &mut TestRequest| r.body = br#"{"patient_id":"pat_002"}"#.to_vec()),
        ];

        for tamper in tampered {
            let mut request = TestRequest::signed("POST", "/appointments", NOW, body, SECRET);
            tamper(&mut request);
            assert!(matches!(
                auth_kind(validator.validate_at(&request.view(), NOW)),
                AuthErrorKind::InvalidSignature { .. }
            ));
        }
    }

    #[test]
    fn test_debug_info_reported() {
        let validator = create_test_validator();
        let mut request = TestRequest::signed("POST", "/patients", NOW, b"{}", SECRET);
        request.body = b"{ }".to_vec();

        let kind = auth_kind(validator.validate_at(&request.view(), NOW));
        assert_eq!(
            kind,
            AuthErrorKind::InvalidSignature {
                debug_info: Some(SignatureDebugInfo {
                    method: "POST".to_string(),
                    path: "/patients".to_string(),
                    timestamp: NOW.to_string(),
                    body_length: 3,
                })
            }
        );

        let quiet = create_test_validator().with_debug_info(false);
        assert_eq!(
            auth_kind(quiet.validate_at(&request.view(), NOW)),
            AuthErrorKind::InvalidSignature { debug_info: None }
        );
    }

    #[test]
    fn test_replay_within_window_is_accepted() {
        // No nonce tracking: the same signed request passes every time
        // while its timestamp is in the window.
        let validator = create_test_validator();
        let request = TestRequest::signed("POST", "/appointments", NOW, b"{}", SECRET);

        assert!(validator.validate_at(&request.view(), NOW).is_ok());
        assert!(validator.validate_at(&request.view(), NOW).is_ok());
    }

    #[test]
    fn test_per_client_secrets() {
        let registry = ClientRegistry::new(CLIENT, SECRET).with_client("partner", b"partner-secret");
        let validator = HmacValidator::new(registry, 300);

        let mut request = TestRequest::signed("GET", "/patients", NOW, b"", b"partner-secret");
        request.client_id = Some("partner".to_string());
        assert!(validator.validate_at(&request.view(), NOW).is_ok());

        // The primary client's secret does not work for the partner id
        let mut request = TestRequest::signed("GET", "/patients", NOW, b"", SECRET);
        request.client_id = Some("partner".to_string());
        assert!(validator.validate_at(&request.view(), NOW).is_err());
    }

    #[test]
    fn test_validate_uses_wall_clock() {
        let validator = create_test_validator();
        let request = TestRequest::signed("GET", "/patients", unix_now(), b"", SECRET);
        assert!(validator.validate(&request.view()).is_ok());
    }
}
