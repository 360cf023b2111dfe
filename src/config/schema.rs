//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! Values are sourced from the process environment by `loader.rs`.

use serde::Serialize;
use std::time::Duration;

/// Default timeout for storage requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(3);

/// Default listener port.
pub const DEFAULT_PORT: u16 = 8080;

/// Root configuration for the service.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlumberConfig {
    /// Object storage connection parameters.
    pub storage: StorageConfig,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl PlumberConfig {
    /// Build a configuration with the required storage values and defaults
    /// for everything else.
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            storage: StorageConfig::new(endpoint, bucket),
            listener: ListenerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// S3-compatible storage connection parameters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base URL of the storage endpoint (e.g., "http://minio:9000").
    pub endpoint: String,

    /// Bucket holding the backups.
    pub bucket: String,

    /// Timeout applied to every storage request.
    #[serde(with = "duration_string")]
    pub http_timeout: Duration,
}

impl StorageConfig {
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListenerConfig {
    /// TCP port to listen on. The service binds all interfaces.
    pub port: u16,
}

impl ListenerConfig {
    /// Bind address derived from the port (e.g., "0.0.0.0:8080").
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

/// Log output encoding.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output encoding.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

mod duration_string {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }
}
