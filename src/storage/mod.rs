//! Object storage query subsystem.
//!
//! # Data Flow
//! ```text
//! (namespace, pvc)
//!     → client.rs (build prefix listing URL, GET with timeout/cancellation)
//!     → status check, body read
//!     → client.rs (parse ListBucketResult XML)
//!     → types.rs CheckResult { exists, keyCount, error }
//! ```

pub mod client;
pub mod types;

pub use client::StorageClient;
pub use types::{CheckResult, ListBucketResult, StorageError, StorageResult};
