//! Authentication module.
//!
//! Handles HMAC request signing, signature verification with a symmetric
//! replay window, and gating of protected handlers.
//!
//! A signed request carries three headers:
//!
//! ```text
//! X-Client-ID: medscheduler_client
//! X-Timestamp: 1700000000
//! X-Signature: base64(HMAC-SHA256(secret, "METHOD\nPATH\nTIMESTAMP\nBODY"))
//! ```
//!
//! There is no nonce tracking: a captured request can be replayed until its
//! timestamp leaves the window.

mod canonical;
mod credentials;
mod guard;
mod helper;
mod hmac;

pub use canonical::{method_carries_body, CanonicalRequest};
pub use credentials::ClientRegistry;
pub use guard::{AuthGuard, Guarded};
pub use helper::{describe_signature, SignatureGuide, SignatureHeaders, SignatureRequest};
pub use hmac::{sign, sign_with_secret, unix_now, HmacValidator, SignedRequest};

/// Header carrying the caller's client id.
pub const CLIENT_ID_HEADER: &str = "X-Client-ID";
/// Header carrying the unix timestamp the request was signed at.
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";
/// Header carrying the base64 signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";
