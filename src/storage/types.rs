//! Existence-check result and storage error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single backup existence check.
///
/// Serialized directly as the HTTP response body. When `error` is set the
/// check could not be completed and `exists` is always false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub exists: bool,
    pub key_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// A completed check that found `key_count` objects under the prefix.
    pub fn found(key_count: u64) -> Self {
        Self {
            exists: key_count > 0,
            key_count,
            error: None,
        }
    }

    /// A check that could not be completed.
    pub fn failed(error: impl ToString) -> Self {
        Self {
            exists: false,
            key_count: 0,
            error: Some(error.to_string()),
        }
    }

    /// Returns true if the check could not be completed.
    pub fn is_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// ListObjectsV2 response body. Only the key count is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename = "ListBucketResult")]
pub struct ListBucketResult {
    #[serde(rename = "KeyCount", default)]
    pub key_count: u64,
}

/// Errors that can occur while querying the storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The listing request could not be built.
    #[error("failed to create request: {0}")]
    Request(#[source] reqwest::Error),

    /// The client timeout elapsed before the exchange finished.
    #[error("storage request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The caller cancelled the check before a response arrived.
    #[error("storage request cancelled before a response was received")]
    Cancelled,

    /// Connection or protocol failure talking to storage.
    #[error("failed to query storage: {0}")]
    Transport(#[source] reqwest::Error),

    /// Storage answered with a non-2xx status.
    #[error("storage returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be read.
    #[error("failed to read response: {0}")]
    Read(#[source] reqwest::Error),

    /// The response body was not a listing document.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl StorageError {
    /// Classify an error returned while sending the request.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_builder() {
            StorageError::Request(err)
        } else if err.is_timeout() {
            StorageError::Timeout(err)
        } else {
            StorageError::Transport(err)
        }
    }

    /// Classify an error returned while reading the response body.
    pub(crate) fn from_read(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorageError::Timeout(err)
        } else {
            StorageError::Read(err)
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
