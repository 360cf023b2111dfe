//! PVC Plumber Library
//!
//! Answers "does a backup exist for this namespace/PVC?" by listing the
//! `{namespace}/{pvc}/` prefix in an S3-compatible bucket.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod storage;

pub use config::schema::PlumberConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use storage::{CheckResult, StorageClient};
