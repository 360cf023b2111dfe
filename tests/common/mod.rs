//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pvc_plumber::{HttpServer, Shutdown, StorageClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const BUCKET: &str = "test-bucket";

/// Handle to a running stub storage backend.
pub struct StubStorage {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    targets: Arc<Mutex<Vec<String>>>,
}

impl StubStorage {
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request targets (path + query) in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    /// Storage client pointed at this stub.
    pub fn client(&self, timeout: Duration) -> StorageClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        StorageClient::with_http_client(self.endpoint(), BUCKET, http)
    }

    /// Service wired to this stub.
    pub fn server(&self, shutdown: Shutdown) -> HttpServer {
        HttpServer::with_storage(self.client(Duration::from_secs(5)), shutdown)
    }
}

/// Start a stub storage backend. The handler receives the request target
/// and returns the status and body to send.
pub async fn start_stub_storage<F, Fut>(handler: F) -> StubStorage
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let targets = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let stub = StubStorage {
        addr,
        hits: hits.clone(),
        targets: targets.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    let hits = hits.clone();
                    let targets = targets.clone();
                    tokio::spawn(async move {
                        let target = read_request_target(&mut socket).await;
                        hits.fetch_add(1, Ordering::SeqCst);
                        targets.lock().unwrap().push(target.clone());

                        let (status, body) = handler(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    stub
}

/// Stub that always answers with the same status and body.
pub async fn start_fixed_storage(status: u16, body: impl Into<String>) -> StubStorage {
    let body = body.into();
    start_stub_storage(move |_| {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

/// Stub that waits `delay` before answering with an empty listing.
pub async fn start_slow_storage(delay: Duration) -> StubStorage {
    start_stub_storage(move |_| async move {
        tokio::time::sleep(delay).await;
        (200, listing(0))
    })
    .await
}

/// Stub that writes `raw` verbatim as the whole HTTP response.
pub async fn start_raw_storage(raw: &'static str) -> StubStorage {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let stub = StubStorage {
        addr: listener.local_addr().unwrap(),
        hits: Arc::new(AtomicUsize::new(0)),
        targets: Arc::new(Mutex::new(Vec::new())),
    };
    let hits = stub.hits.clone();
    let targets = stub.targets.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let target = read_request_target(&mut socket).await;
            hits.fetch_add(1, Ordering::SeqCst);
            targets.lock().unwrap().push(target);
            let _ = socket.write_all(raw.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    stub
}

/// Stub that reads a request and never answers. The receiver fires once
/// the peer closes that connection.
pub async fn start_silent_storage() -> (StubStorage, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let stub = StubStorage {
        addr: listener.local_addr().unwrap(),
        hits: Arc::new(AtomicUsize::new(0)),
        targets: Arc::new(Mutex::new(Vec::new())),
    };
    let hits = stub.hits.clone();
    let targets = stub.targets.clone();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let target = read_request_target(&mut socket).await;
        hits.fetch_add(1, Ordering::SeqCst);
        targets.lock().unwrap().push(target);

        let mut chunk = [0u8; 256];
        loop {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = closed_tx.send(());
    });

    (stub, closed_rx)
}

/// Minimal ListObjectsV2 document.
pub fn listing(key_count: u64) -> String {
    format!(
        "<ListBucketResult><KeyCount>{}</KeyCount></ListBucketResult>",
        key_count
    )
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}
