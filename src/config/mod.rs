//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (S3_ENDPOINT, S3_BUCKET, HTTP_TIMEOUT, PORT, LOG_LEVEL, LOG_FORMAT)
//!     → loader.rs (read & parse)
//!     → validation.rs (semantic checks)
//!     → PlumberConfig (validated, immutable)
//!     → handed to subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once; changes require a restart
//! - Only the storage endpoint and bucket are required
//! - Any load or validation error is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from, load_from_env, ConfigError};
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, PlumberConfig, StorageConfig};
