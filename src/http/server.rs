//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::PlumberConfig;
use crate::http::handlers;
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::observability::RequestCounters;
use crate::storage::{StorageClient, StorageResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageClient>,
    pub counters: Arc<RequestCounters>,
    pub shutdown: Shutdown,
}

/// HTTP server for the existence service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &PlumberConfig, shutdown: Shutdown) -> StorageResult<Self> {
        let storage = StorageClient::new(&config.storage)?;
        Ok(Self::with_storage(storage, shutdown))
    }

    /// Create a server around an existing storage client.
    pub fn with_storage(storage: StorageClient, shutdown: Shutdown) -> Self {
        let state = AppState {
            storage: Arc::new(storage),
            counters: Arc::new(RequestCounters::new()),
            shutdown,
        };

        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_id_header = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/exists", get(handlers::exists))
            .route("/exists/", get(handlers::exists))
            .route("/exists/{*rest}", get(handlers::exists))
            .route("/healthz", get(handlers::healthz))
            .route("/readyz", get(handlers::readyz))
            .route("/metrics", get(handlers::metrics))
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
    }

    /// A clone of the router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn counters(&self) -> Arc<RequestCounters> {
        self.state.counters.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.state.storage.endpoint(),
            bucket = %self.state.storage.bucket(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(self.state.shutdown.cancelled())
            .await?;

        tracing::info!(
            shutdown_triggered = self.state.shutdown.is_triggered(),
            "HTTP server stopped"
        );
        Ok(())
    }
}
