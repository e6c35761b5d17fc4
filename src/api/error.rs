//! HTTP rendering of [`ApiError`].

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::error;

use crate::error::{ApiError, AuthErrorKind};

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth { kind } => auth_response(kind),
            ApiError::Validation { kind } => {
                error_body(StatusCode::BAD_REQUEST, kind.to_string())
            }
            ApiError::NotFound { .. } => error_body(StatusCode::NOT_FOUND, self.to_string()),
            ApiError::PayloadTooLarge { .. } => {
                error_body(StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            other => {
                // Internal detail stays in the server log.
                error!(error = %other, code = other.code(), "Request failed");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn auth_response(kind: AuthErrorKind) -> Response {
    if let AuthErrorKind::SecretError { message } = &kind {
        error!(error = %message, "Signing secret unavailable");
        return error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        );
    }

    let mut body = Map::new();
    body.insert("error".to_string(), Value::String(kind.to_string()));

    match &kind {
        AuthErrorKind::MissingHeaders { required } => {
            body.insert("required".to_string(), json!(required));
        }
        AuthErrorKind::TimestampOutOfWindow {
            max_age_seconds, ..
        } => {
            body.insert("max_age_seconds".to_string(), json!(max_age_seconds));
        }
        AuthErrorKind::InvalidSignature {
            debug_info: Some(info),
        } => {
            body.insert("debug_info".to_string(), json!(info));
        }
        _ => {}
    }

    let mut response = (StatusCode::UNAUTHORIZED, Json(Value::Object(body))).into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("HMAC-SHA256"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SignatureDebugInfo, ValidationErrorKind};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_headers_lists_required() {
        let err = ApiError::auth(AuthErrorKind::MissingHeaders {
            required: vec!["X-Client-ID", "X-Timestamp", "X-Signature"],
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "HMAC-SHA256"
        );

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing authentication headers");
        assert_eq!(body["required"][2], "X-Signature");
    }

    #[tokio::test]
    async fn test_out_of_window_reports_max_age() {
        let err = ApiError::auth(AuthErrorKind::TimestampOutOfWindow {
            skew_seconds: 400,
            max_age_seconds: 300,
        });
        let body = body_json(err.into_response()).await;
        assert_eq!(body["max_age_seconds"], 300);
        assert!(body.get("skew_seconds").is_none());
    }

    #[tokio::test]
    async fn test_invalid_signature_debug_info() {
        let err = ApiError::auth(AuthErrorKind::InvalidSignature {
            debug_info: Some(SignatureDebugInfo {
                method: "POST".to_string(),
                path: "/patients".to_string(),
                timestamp: "1700000000".to_string(),
                body_length: 7,
            }),
        });
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"], "Invalid signature");
        assert_eq!(body["debug_info"]["body_length"], 7);

        let err = ApiError::auth(AuthErrorKind::InvalidSignature { debug_info: None });
        let body = body_json(err.into_response()).await;
        assert!(body.get("debug_info").is_none());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let validation = ApiError::validation(ValidationErrorKind::MissingField {
            field: "phone".to_string(),
        });
        let response = validation.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Missing required field: phone"
        );

        let not_found = ApiError::NotFound {
            resource: "Patient",
            id: "pat_999".to_string(),
        };
        let response = not_found.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Patient not found");

        let io = ApiError::Io(std::io::Error::other("disk on fire"));
        let response = io.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal server error");
    }
}
