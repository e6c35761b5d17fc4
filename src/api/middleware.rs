//! Signature middleware for the record routes.
//!
//! Adapts [`AuthGuard`](crate::auth::AuthGuard) to axum: buffers the body,
//! verifies the request, and only then forwards it to the handler with the
//! buffered body put back in place.

use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::audit::AuditEntry;
use crate::auth::{SignedRequest, CLIENT_ID_HEADER};
use crate::error::ApiError;
use crate::validation::now_iso;

use super::AppState;

/// Reject any request that does not carry a valid signature.
pub async fn require_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    let (parts, body) = request.into_parts();

    let method = parts.method.as_str().to_string();
    let path = parts.uri.path().to_string();
    let client_id = parts
        .headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(%request_id, error = %e, "Failed to buffer request body");
            let err = ApiError::PayloadTooLarge {
                max: state.max_body_size,
            };
            record_failure(&state, request_id, &method, &path, &client_id, &err, started).await;
            return err.into_response();
        }
    };

    let verdict = {
        let signed = SignedRequest::from_headers(&method, &path, &body, |name| {
            parts.headers.get(name).and_then(|v| v.to_str().ok())
        });
        state.guard.check(&signed)
    };

    if let Err(err) = verdict {
        warn!(
            %request_id,
            method = %method,
            path = %path,
            client_id = client_id.as_deref().unwrap_or("-"),
            code = err.code(),
            "Rejected unsigned or mis-signed request"
        );
        record_failure(&state, request_id, &method, &path, &client_id, &err, started).await;
        return err.into_response();
    }

    debug!(%request_id, method = %method, path = %path, "Signature verified");

    let response = next
        .run(Request::from_parts(parts, Body::from(body)))
        .await;

    if let Some(audit) = &state.audit {
        let entry = AuditEntry::success(
            now_iso(),
            request_id,
            method,
            path,
            client_id,
            response.status().as_u16(),
            started.elapsed().as_millis() as u64,
        );
        Arc::clone(audit).record_async(entry).await;
    }

    response
}

async fn record_failure(
    state: &AppState,
    request_id: Uuid,
    method: &str,
    path: &str,
    client_id: &Option<String>,
    err: &ApiError,
    started: Instant,
) {
    let Some(audit) = &state.audit else {
        return;
    };

    let message = match err {
        ApiError::Auth { kind } => kind.to_string(),
        other => other.to_string(),
    };
    let entry = AuditEntry::failure(
        now_iso(),
        request_id,
        method.to_string(),
        path.to_string(),
        client_id.clone(),
        err.code().to_string(),
        message,
        started.elapsed().as_millis() as u64,
    );
    Arc::clone(audit).record_async(entry).await;
}
