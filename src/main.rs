//! PVC Plumber
//!
//! A small HTTP service reporting whether a volume backup exists in
//! S3-compatible object storage.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /exists/{ns}/{pvc}
//!  ─────────────────────────▶ ┌──────────┐   ┌──────────┐   ┌──────────┐
//!                             │   http   │──▶│   path   │──▶│ storage  │──▶ S3-compatible store
//!  ◀───────────────────────── │  server  │   │ splitter │   │  client  │    GET ?list-type=2
//!   200 CheckResult JSON      └──────────┘   └──────────┘   └──────────┘        &prefix=ns/pvc/
//!   400 invalid path                                                            &max-keys=1
//!
//!   Cross-cutting: config (env) · observability (tracing, counters) · lifecycle (signals)
//! ```

use tokio::net::TcpListener;

use pvc_plumber::config;
use pvc_plumber::http::HttpServer;
use pvc_plumber::lifecycle::{signals, Shutdown};
use pvc_plumber::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init_logging(&config.observability)?;

    tracing::info!("pvc-plumber v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        endpoint = %config.storage.endpoint,
        bucket = %config.storage.bucket,
        http_timeout = %humantime::format_duration(config.storage.http_timeout),
        port = config.listener.port,
        log_level = %config.observability.log_level,
        "Configuration loaded"
    );
    if let Ok(effective) = serde_json::to_string(&config) {
        tracing::debug!(config = %effective, "Effective configuration");
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, shutdown.clone())?;

    // Bind TCP listener
    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    signals::spawn_signal_listener(shutdown);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
