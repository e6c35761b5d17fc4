//! Handler gating.
//!
//! [`AuthGuard::wrap`] takes a handler and returns a new handler that only
//! runs it when the request verifies. The HTTP middleware in
//! `api::middleware` is an adapter over the same guard.

use std::sync::Arc;

use crate::error::ApiError;

use super::hmac::{unix_now, HmacValidator, SignedRequest};

/// Gate in front of protected handlers.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    validator: Arc<HmacValidator>,
}

impl AuthGuard {
    pub fn new(validator: Arc<HmacValidator>) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &HmacValidator {
        &self.validator
    }

    /// Verify a request against the current time.
    pub fn check(&self, request: &SignedRequest<'_>) -> Result<(), ApiError> {
        self.validator.validate(request)
    }

    /// Wrap a handler so it only runs for verified requests.
    pub fn wrap<H, T>(&self, handler: H) -> Guarded<H>
    where
        H: Fn(&SignedRequest<'_>) -> T,
    {
        Guarded {
            guard: self.clone(),
            handler,
        }
    }
}

/// A handler behind an [`AuthGuard`].
#[derive(Debug, Clone)]
pub struct Guarded<H> {
    guard: AuthGuard,
    handler: H,
}

impl<H> Guarded<H> {
    /// Verify the request, then run the handler.
    ///
    /// On rejection the handler is never invoked.
    pub fn call<T>(&self, request: &SignedRequest<'_>) -> Result<T, ApiError>
    where
        H: Fn(&SignedRequest<'_>) -> T,
    {
        self.call_at(request, unix_now())
    }

    /// Same as [`Guarded::call`] with an explicit current time.
    pub fn call_at<T>(&self, request: &SignedRequest<'_>, now: i64) -> Result<T, ApiError>
    where
        H: Fn(&SignedRequest<'_>) -> T,
    {
        self.guard.validator.validate_at(request, now)?;
        Ok((self.handler)(request))
    }
}
