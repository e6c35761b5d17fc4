//! HTTP surface of the service.
//!
//! Every record route sits behind [`middleware::require_signature`]. The
//! health check and the optional signature helper are mounted outside the
//! guard.

mod appointments;
mod error;
mod middleware;
mod patients;
mod system;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::audit::AuditLogger;
use crate::auth::{AuthGuard, HmacValidator};
use crate::config::Settings;
use crate::error::ApiResult;
use crate::store::MemoryStore;

pub use middleware::require_signature;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub guard: AuthGuard,
    pub store: Arc<MemoryStore>,
    pub audit: Option<Arc<AuditLogger>>,
    pub max_body_size: usize,
    pub signature_helper: bool,
}

impl AppState {
    /// Build the state from loaded settings, seeding the record store.
    pub fn from_settings(settings: &Settings) -> ApiResult<Self> {
        let validator = HmacValidator::from_config(&settings.security)?;
        info!(
            clients = validator.clients().len(),
            max_age_seconds = validator.max_age_seconds(),
            "Signature validator ready"
        );

        let audit = if settings.audit.enabled {
            let logger = AuditLogger::new(&settings.audit.log_path)?;
            info!(path = %logger.path().display(), "Audit logging enabled");
            Some(Arc::new(logger))
        } else {
            None
        };

        Ok(Self {
            guard: AuthGuard::new(Arc::new(validator)),
            store: Arc::new(MemoryStore::seeded()),
            audit,
            max_body_size: settings.limits.max_body_size,
            signature_helper: settings.security.signature_helper,
        })
    }
}

/// Assemble the router.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route("/patients/{id}", get(patients::get_patient))
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get_appointment).put(appointments::update_appointment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_signature,
        ));

    let mut router = Router::new()
        .route("/health", get(system::health))
        .merge(protected);

    if state.signature_helper {
        router = router.route("/auth/signature", post(system::signature_helper));
    }

    router
        .layer(DefaultBodyLimit::max(state.max_body_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
