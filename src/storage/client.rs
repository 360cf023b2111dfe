//! S3-compatible listing client.
//!
//! # Responsibilities
//! - Build a ListObjectsV2 request for the `{namespace}/{pvc}/` prefix
//! - Issue it under the client timeout and a caller cancellation signal
//! - Interpret status and XML body into a `CheckResult`
//!
//! # Design Decisions
//! - One page of at most one key: existence only needs a single object
//! - Never returns an error to the caller; failures are reported in-band
//! - No retries

use std::future::Future;

use quick_xml::events::Event;
use quick_xml::Reader;
use url::form_urlencoded;

use crate::config::StorageConfig;
use crate::storage::types::{CheckResult, ListBucketResult, StorageError, StorageResult};

/// Longest error body echoed back in a status failure.
const MAX_ERROR_BODY_BYTES: usize = 1024;

/// Client for prefix listings against a single bucket.
#[derive(Debug, Clone)]
pub struct StorageClient {
    endpoint: String,
    bucket: String,
    http: reqwest::Client,
}

impl StorageClient {
    /// Create a client from configuration, applying the configured timeout
    /// to every request.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(StorageError::Client)?;

        Ok(Self::with_http_client(&config.endpoint, &config.bucket, http))
    }

    /// Create a client around an already configured HTTP client.
    pub fn with_http_client(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Listing URL for the backups of `namespace`/`pvc`.
    pub fn listing_url(&self, namespace: &str, pvc: &str) -> String {
        let prefix = format!("{}/{}/", namespace, pvc);
        let escaped: String = form_urlencoded::byte_serialize(prefix.as_bytes()).collect();
        format!(
            "{}/{}?list-type=2&prefix={}&max-keys=1",
            self.endpoint, self.bucket, escaped
        )
    }

    /// Check whether any object exists under `{namespace}/{pvc}/`.
    pub async fn check_backup_exists(&self, namespace: &str, pvc: &str) -> CheckResult {
        self.check_backup_exists_until(namespace, pvc, std::future::pending())
            .await
    }

    /// Like [`check_backup_exists`](Self::check_backup_exists), but gives up
    /// as soon as `cancelled` resolves.
    pub async fn check_backup_exists_until<C>(
        &self,
        namespace: &str,
        pvc: &str,
        cancelled: C,
    ) -> CheckResult
    where
        C: Future<Output = ()>,
    {
        match self.key_count(namespace, pvc, cancelled).await {
            Ok(key_count) => CheckResult::found(key_count),
            Err(e) => {
                tracing::warn!(
                    namespace = %namespace,
                    pvc = %pvc,
                    error = %e,
                    "Backup check failed"
                );
                CheckResult::failed(e)
            }
        }
    }

    async fn key_count<C>(&self, namespace: &str, pvc: &str, cancelled: C) -> StorageResult<u64>
    where
        C: Future<Output = ()>,
    {
        let url = self.listing_url(namespace, pvc);
        tracing::debug!(url = %url, "Listing backup prefix");

        let exchange = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(StorageError::from_send)?;

            let status = response.status();
            if !status.is_success() {
                let body = match response.text().await {
                    Ok(body) => truncate_body(&body),
                    Err(e) => {
                        tracing::debug!(status = %status, error = %e, "Failed to read error body");
                        format!("<unreadable body: {}>", e)
                    }
                };
                return Err(StorageError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            response.text().await.map_err(StorageError::from_read)
        };

        let body = tokio::select! {
            biased;
            _ = cancelled => return Err(StorageError::Cancelled),
            body = exchange => body?,
        };

        parse_key_count(&body)
    }
}

/// Extract the key count from a ListObjectsV2 XML document.
pub fn parse_key_count(body: &str) -> StorageResult<u64> {
    let root = root_element(body)?;
    if root != "ListBucketResult" {
        return Err(StorageError::Parse(format!(
            "expected element <ListBucketResult> but found <{}>",
            root
        )));
    }

    let listing: ListBucketResult =
        quick_xml::de::from_str(body).map_err(|e| StorageError::Parse(e.to_string()))?;
    Ok(listing.key_count)
}

fn root_element(body: &str) -> StorageResult<String> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(StorageError::Parse("no root element".to_string()));
            }
            Ok(_) => continue,
            Err(e) => return Err(StorageError::Parse(e.to_string())),
        }
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::with_http_client("http://localhost:9000/", "volsync-backup", reqwest::Client::new())
    }

    #[test]
    fn test_listing_url_escapes_prefix() {
        assert_eq!(
            client().listing_url("karakeep", "data-pvc"),
            "http://localhost:9000/volsync-backup?list-type=2&prefix=karakeep%2Fdata-pvc%2F&max-keys=1"
        );
        assert_eq!(
            client().listing_url("my ns", "a&b"),
            "http://localhost:9000/volsync-backup?list-type=2&prefix=my+ns%2Fa%26b%2F&max-keys=1"
        );
    }

    #[test]
    fn test_listing_url_allows_empty_segments() {
        assert_eq!(
            client().listing_url("", ""),
            "http://localhost:9000/volsync-backup?list-type=2&prefix=%2F%2F&max-keys=1"
        );
    }

    #[test]
    fn test_parse_full_listing() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>volsync-backup</Name>
  <Prefix>karakeep/data-pvc/</Prefix>
  <KeyCount>1</KeyCount>
  <MaxKeys>1</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>karakeep/data-pvc/config</Key>
    <LastModified>2026-01-10T01:46:03.000Z</LastModified>
    <Size>155</Size>
  </Contents>
</ListBucketResult>"#;
        assert_eq!(parse_key_count(body).unwrap(), 1);
    }

    #[test]
    fn test_parse_zero_and_missing_count() {
        let body = "<ListBucketResult><KeyCount>0</KeyCount></ListBucketResult>";
        assert_eq!(parse_key_count(body).unwrap(), 0);

        let body = "<ListBucketResult><Name>b</Name></ListBucketResult>";
        assert_eq!(parse_key_count(body).unwrap(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_key_count("not valid xml").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse response: "));

        assert!(parse_key_count("<Error><Code>AccessDenied</Code></Error>").is_err());
        assert!(parse_key_count("<ListBucketResult><KeyCount>many</KeyCount></ListBucketResult>").is_err());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");

        let long = "é".repeat(MAX_ERROR_BODY_BYTES);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_BODY_BYTES + 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        // Nothing listens on this port; cancellation wins the biased select.
        let client = StorageClient::with_http_client(
            "http://127.0.0.1:9",
            "bucket",
            reqwest::Client::new(),
        );
        let result = client
            .check_backup_exists_until("test", "pvc", std::future::ready(()))
            .await;

        assert!(!result.exists);
        assert_eq!(
            result.error.as_deref(),
            Some("storage request cancelled before a response was received")
        );
    }
}
