//! Application settings.
//!
//! Settings for the `lbx` process itself (where documents are stored, where
//! the API listens, how logs are written). Distinct from the load balancer
//! documents the tool manages.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root settings for the lbx process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Key-value backend holding the documents.
    pub store: StoreSettings,

    /// HTTP API server.
    pub api: ApiSettings,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Which key-value backend to use.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    /// Process-local map. Contents are lost on exit.
    Memory,
}

/// Store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,

    /// Redis connection URL (e.g., "redis://127.0.0.1:6379").
    pub redis_url: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted document size in bytes.
    pub max_body_size: usize,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
            tls: None,
        }
    }
}

/// TLS configuration for the API listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint while the API runs.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment overrides.
    ///
    /// `LBX_REDIS_URL` wins over `REDIS_ADDR`; the latter is a bare
    /// `host:port` pair.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LBX_REDIS_URL").filter(|v| !v.is_empty()) {
            self.store.redis_url = url;
        } else if let Some(addr) = lookup("REDIS_ADDR").filter(|v| !v.is_empty()) {
            self.store.redis_url = format!("redis://{}", addr);
        }

        if let Some(addr) = lookup("LBX_BIND_ADDRESS").filter(|v| !v.is_empty()) {
            self.api.bind_address = addr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.store.backend, StoreBackend::Redis);
        assert_eq!(settings.store.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(settings.api.bind_address, "0.0.0.0:8080");
        assert!(settings.api.tls.is_none());
        assert_eq!(settings.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
[store]
backend = "memory"

[api]
bind_address = "127.0.0.1:9000"

[api.tls]
cert_path = "/etc/lbx/cert.pem"
key_path = "/etc/lbx/key.pem"

[observability]
log_format = "json"
"#,
        )
        .unwrap();

        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.store.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(settings.api.bind_address, "127.0.0.1:9000");
        assert_eq!(settings.api.request_timeout_secs, 30);
        assert_eq!(settings.api.tls.unwrap().key_path, "/etc/lbx/key.pem");
        assert_eq!(settings.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([("REDIS_ADDR", "cache:6380"), ("LBX_BIND_ADDRESS", "127.0.0.1:1")]);
        let mut settings = Settings::default();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.store.redis_url, "redis://cache:6380");
        assert_eq!(settings.api.bind_address, "127.0.0.1:1");

        let env: HashMap<&str, &str> = HashMap::from([("REDIS_ADDR", "cache:6380"), ("LBX_REDIS_URL", "redis://primary:6379/2")]);
        let mut settings = Settings::default();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.store.redis_url, "redis://primary:6379/2");
    }

    #[test]
    fn test_missing_settings_file() {
        let err = Settings::from_file(Path::new("/nonexistent/lbx.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
