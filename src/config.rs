//! Server configuration, built from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

/// HTTP server and storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Path the tool routes are mounted under. Always starts with `/`.
    pub base_path: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5555,
            db_path: PathBuf::from("./data/tools.db"),
            base_path: "/tools".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Build config from `TOOLS_API_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unset keys fall back to
    /// [`ServerConfig::default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("TOOLS_API_HOST").unwrap_or(defaults.host);

        let port = match lookup("TOOLS_API_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "TOOLS_API_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let db_path = lookup("TOOLS_API_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let base_path = match lookup("TOOLS_API_BASE_PATH") {
            Some(raw) => normalize_base_path(&raw),
            None => defaults.base_path,
        };

        let cors_origins: Vec<String> = lookup("TOOLS_API_CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "*")
            .collect();

        Ok(Self {
            host,
            port,
            db_path,
            base_path,
            cors_origins,
        })
    }

    /// Socket address string for the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Force a leading slash and drop trailing ones. Blank input mounts at root.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
