//! Registered clients and their shared signing secrets.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use ring::hmac;
use tracing::debug;

use crate::config::SecurityConfig;
use crate::error::{ApiError, AuthErrorKind};

/// Immutable mapping from client id to HMAC key.
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone)]
pub struct ClientRegistry {
    keys: HashMap<String, hmac::Key>,
    primary: String,
}

impl ClientRegistry {
    /// Create a registry holding a single client, which becomes the primary.
    pub fn new(client_id: impl Into<String>, secret: &[u8]) -> Self {
        let client_id = client_id.into();
        let mut keys = HashMap::new();
        keys.insert(client_id.clone(), hmac::Key::new(hmac::HMAC_SHA256, secret));
        Self {
            keys,
            primary: client_id,
        }
    }

    /// Register an additional client (builder pattern).
    pub fn with_client(mut self, client_id: impl Into<String>, secret: &[u8]) -> Self {
        self.keys
            .insert(client_id.into(), hmac::Key::new(hmac::HMAC_SHA256, secret));
        self
    }

    /// Build the registry from the `[security]` section, reading secret
    /// files where configured.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, ApiError> {
        let mut registry: Option<Self> = None;

        for client in &config.clients {
            let secret = match (&client.secret, &client.secret_path) {
                (Some(secret), _) => secret.as_bytes().to_vec(),
                (None, Some(path)) => Self::load_secret(path)?,
                (None, None) => {
                    return Err(ApiError::Config {
                        message: format!("Client '{}' has no secret configured", client.client_id),
                    })
                }
            };

            debug!(client_id = %client.client_id, "Registering client");
            registry = Some(match registry {
                None => Self::new(client.client_id.clone(), &secret),
                Some(r) => r.with_client(client.client_id.clone(), &secret),
            });
        }

        registry.ok_or_else(|| ApiError::Config {
            message: "No clients configured".to_string(),
        })
    }

    /// Load a signing secret from a file.
    ///
    /// The file must not be readable by group or others. A single trailing
    /// newline is stripped so secrets written with `echo` work.
    pub fn load_secret(path: &Path) -> Result<Vec<u8>, ApiError> {
        let metadata = std::fs::metadata(path).map_err(|e| ApiError::Auth {
            kind: AuthErrorKind::SecretError {
                message: format!(
                    "Failed to read secret metadata from {}: {}",
                    path.display(),
                    e
                ),
            },
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o077 != 0 {
                return Err(ApiError::Auth {
                    kind: AuthErrorKind::SecretError {
                        message: format!(
                            "Secret file {} has insecure permissions {:04o}, expected 0600 or 0400",
                            path.display(),
                            mode & 0o777
                        ),
                    },
                });
            }
        }
        #[cfg(not(unix))]
        let _ = metadata;

        let mut secret = std::fs::read(path).map_err(|e| ApiError::Auth {
            kind: AuthErrorKind::SecretError {
                message: format!("Failed to read secret from {}: {}", path.display(), e),
            },
        })?;

        if secret.last() == Some(&b'\n') {
            secret.pop();
            if secret.last() == Some(&b'\r') {
                secret.pop();
            }
        }

        if secret.is_empty() {
            return Err(ApiError::Auth {
                kind: AuthErrorKind::SecretError {
                    message: format!("Secret file {} is empty", path.display()),
                },
            });
        }

        Ok(secret)
    }

    /// Key for a registered client.
    pub fn key(&self, client_id: &str) -> Option<&hmac::Key> {
        self.keys.get(client_id)
    }

    /// Whether the client id is registered.
    pub fn contains(&self, client_id: &str) -> bool {
        self.keys.contains_key(client_id)
    }

    /// The first configured client.
    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ClientRegistry")
            .field("clients", &ids)
            .field("primary", &self.primary)
            .finish()
    }
}
