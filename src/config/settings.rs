//! Configuration settings for the MedScheduler API.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ApiError;

/// Main configuration structure for the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Registered callers. The first entry is the primary client, used by
    /// the signature helper when no client id is given.
    pub clients: Vec<ClientConfig>,
    /// Maximum distance in seconds between a request timestamp and now.
    #[serde(default = "default_max_request_age")]
    pub max_request_age_seconds: u64,
    /// Mount the unauthenticated `/auth/signature` helper.
    #[serde(default = "default_signature_helper")]
    pub signature_helper: bool,
    /// Echo method/path/timestamp/body length on signature mismatches.
    #[serde(default = "default_debug_info")]
    pub debug_info: bool,
}

/// A single registered client and where its secret comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Value expected in the `X-Client-ID` header.
    pub client_id: String,
    /// Inline shared secret.
    pub secret: Option<String>,
    /// Path to a file holding the shared secret.
    pub secret_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Whether audit logging is enabled.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Path to the audit log file.
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,
}

// Default value functions
fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5001))
}

fn default_max_request_age() -> u64 {
    300
}

fn default_signature_helper() -> bool {
    true
}

fn default_debug_info() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_body_size() -> usize {
    1_048_576 // 1MB
}

fn default_audit_enabled() -> bool {
    false
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("/var/log/medscheduler/audit.log")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_log_path(),
        }
    }
}

impl SecurityConfig {
    /// Security settings for a single client with an inline secret and
    /// every other option at its default.
    pub fn single_client(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            clients: vec![ClientConfig {
                client_id: client_id.into(),
                secret: Some(secret.into()),
                secret_path: None,
            }],
            max_request_age_seconds: default_max_request_age(),
            signature_helper: default_signature_helper(),
            debug_info: default_debug_info(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ApiError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings = Self::from_toml(&content).map_err(|e| ApiError::Config {
            message: format!("Failed to load config file '{}': {}", path.display(), e),
        })?;

        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ApiError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ApiError::Config {
            message: e.to_string(),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), ApiError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ApiError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ApiError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.security.clients.is_empty() {
            return Err(ApiError::Config {
                message: "At least one client must be configured under [[security.clients]]"
                    .to_string(),
            });
        }

        for client in &self.security.clients {
            if client.client_id.trim().is_empty() {
                return Err(ApiError::Config {
                    message: "Client id must not be empty".to_string(),
                });
            }
            match (&client.secret, &client.secret_path) {
                (Some(secret), None) if secret.is_empty() => {
                    return Err(ApiError::Config {
                        message: format!("Client '{}' has an empty secret", client.client_id),
                    });
                }
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(ApiError::Config {
                        message: format!(
                            "Client '{}' must set exactly one of 'secret' or 'secret_path'",
                            client.client_id
                        ),
                    });
                }
            }
        }

        if self.security.max_request_age_seconds == 0 {
            return Err(ApiError::Config {
                message: "max_request_age_seconds must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
