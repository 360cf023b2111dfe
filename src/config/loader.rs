//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{LogFormat, PlumberConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENV_S3_BUCKET: &str = "S3_BUCKET";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {var} '{value}': {source}")]
    InvalidDuration {
        var: &'static str,
        value: String,
        source: humantime::DurationError,
    },

    #[error("invalid {var} '{value}': {source}")]
    InvalidPort {
        var: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid {var} '{value}', expected json or text")]
    InvalidLogFormat { var: &'static str, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<PlumberConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load and validate configuration from an arbitrary variable lookup.
///
/// Empty values are treated the same as unset ones.
pub fn load_from<F>(lookup: F) -> Result<PlumberConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    let endpoint = get(ENV_S3_ENDPOINT).ok_or(ConfigError::Missing(ENV_S3_ENDPOINT))?;
    let bucket = get(ENV_S3_BUCKET).ok_or(ConfigError::Missing(ENV_S3_BUCKET))?;

    let mut config = PlumberConfig::new(endpoint, bucket);

    if let Some(value) = get(ENV_HTTP_TIMEOUT) {
        config.storage.http_timeout =
            humantime::parse_duration(&value).map_err(|source| ConfigError::InvalidDuration {
                var: ENV_HTTP_TIMEOUT,
                value: value.clone(),
                source,
            })?;
    }

    if let Some(value) = get(ENV_PORT) {
        config.listener.port = value.parse().map_err(|source| ConfigError::InvalidPort {
            var: ENV_PORT,
            value: value.clone(),
            source,
        })?;
    }

    if let Some(value) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = value.to_lowercase();
    }

    if let Some(value) = get(ENV_LOG_FORMAT) {
        config.observability.log_format = match value.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" => LogFormat::Text,
            _ => {
                return Err(ConfigError::InvalidLogFormat {
                    var: ENV_LOG_FORMAT,
                    value,
                })
            }
        };
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
