//! MedScheduler library.
//!
//! An appointment scheduling API whose record routes only answer requests
//! signed with HMAC-SHA256 over method, path, timestamp and body.

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod store;
pub mod validation;
