//! Service endpoints: banner and health check.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /.
#[derive(Serialize)]
pub(crate) struct RootResponse {
    message: &'static str,
    version: String,
}

/// Response for GET /health.
#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Handle GET /.
pub(crate) async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Folio API",
        version: state.version.clone(),
    })
}

/// Handle GET /health.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
