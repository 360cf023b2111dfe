//! Endpoint handlers.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::path::{parse_exists_path, InvalidPath};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics::CONTENT_TYPE as METRICS_CONTENT_TYPE;

/// Body returned for malformed existence requests.
#[derive(Debug, Serialize)]
pub struct InvalidPathBody {
    pub exists: bool,
    pub error: String,
}

impl From<InvalidPath> for InvalidPathBody {
    fn from(err: InvalidPath) -> Self {
        Self {
            exists: false,
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

/// `GET /exists/{namespace}/{pvc}`.
///
/// Storage failures are reported in the body with a 200; only a malformed
/// path yields a non-200 status.
pub async fn exists(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    state.counters.record_request();
    let request_id = request_id(&headers);

    let target = match parse_exists_path(uri.path()) {
        Ok(target) => target,
        Err(e) => {
            state.counters.record_error();
            tracing::warn!(request_id = %request_id, path = %uri.path(), "Invalid request path");
            return (StatusCode::BAD_REQUEST, Json(InvalidPathBody::from(e))).into_response();
        }
    };

    tracing::info!(
        request_id = %request_id,
        namespace = %target.namespace,
        pvc = %target.pvc,
        "Checking backup"
    );

    let result = state
        .storage
        .check_backup_exists_until(&target.namespace, &target.pvc, state.shutdown.cancelled())
        .await;

    if result.is_error() {
        state.counters.record_error();
    }

    tracing::info!(
        request_id = %request_id,
        namespace = %target.namespace,
        pvc = %target.pvc,
        exists = result.exists,
        key_count = result.key_count,
        error = result.error.as_deref().unwrap_or(""),
        "Backup check complete"
    );

    (StatusCode::OK, Json(result)).into_response()
}

/// `GET /healthz`.
pub async fn healthz() -> Json<StatusBody> {
    Json(StatusBody { status: "ok" })
}

/// `GET /readyz`. No dependency checks, same as liveness.
pub async fn readyz() -> Json<StatusBody> {
    healthz().await
}

/// `GET /metrics`.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.counters.render(),
    )
}
