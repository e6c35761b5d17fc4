//! Unauthenticated endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{describe_signature, SignatureGuide, SignatureRequest};
use crate::error::{ApiError, ApiResult, ValidationErrorKind};
use crate::validation::now_iso;

use super::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "api": "MedScheduler",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": now_iso(),
    }))
}

/// Compute the headers a caller needs for a given request.
pub async fn signature_helper(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SignatureGuide>> {
    let request: SignatureRequest = serde_json::from_slice(&body).map_err(|e| {
        ApiError::validation(ValidationErrorKind::InvalidBody {
            message: e.to_string(),
        })
    })?;
    let guide = describe_signature(state.guard.validator(), &request)?;
    Ok(Json(guide))
}
