// =============================================================================
// Scrape Endpoint — Axum 0.7
// =============================================================================
//
// A single route: GET /metrics returns the Prometheus text exposition built
// from the current snapshot. Everything else falls through to axum's 404.
// Scrapes never trigger a fetch and never block on the sampler — they only
// read the snapshot.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::{Encoder, TextEncoder};
use tracing::error;

use crate::state::AppState;

/// Build the exporter's router with shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.render_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                TextEncoder::new().format_type().to_string(),
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "metrics render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
