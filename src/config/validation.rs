//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the loader handles syntactic parsing)
//! - Check the storage endpoint is a usable HTTP(S) base URL
//! - Validate value ranges (timeout > 0, port non-zero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlumberConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::schema::PlumberConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &PlumberConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.storage.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            if url.query().is_some() {
                errors.push(ValidationError::new(
                    "S3_ENDPOINT",
                    "must not contain a query string",
                ));
            }
        }
        Ok(url) => errors.push(ValidationError::new(
            "S3_ENDPOINT",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "S3_ENDPOINT",
            format!("invalid URL '{}': {}", config.storage.endpoint, e),
        )),
    }

    if config.storage.bucket.contains('/') {
        errors.push(ValidationError::new("S3_BUCKET", "must not contain '/'"));
    }

    if config.storage.http_timeout == Duration::ZERO {
        errors.push(ValidationError::new("HTTP_TIMEOUT", "must be greater than zero"));
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::new("PORT", "must be between 1 and 65535"));
    }

    if tracing::Level::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "LOG_LEVEL",
            format!(
                "unknown level '{}', expected trace, debug, info, warn or error",
                config.observability.log_level
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
