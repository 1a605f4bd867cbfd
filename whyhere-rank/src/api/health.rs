//! Liveness endpoint
//!
//! `status` is always "ok" while the process serves requests. A failed
//! backend fetch shows up in `fetchStatus`, not as an unhealthy service.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use whyhere_common::config::DataSource;

use crate::services::FetchStatus;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub source: DataSource,
    /// Outcome of the latest refresh
    pub fetch_status: FetchStatus,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.session.snapshot().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "whyhere-rank".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: snapshot.source,
        fetch_status: snapshot.status,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
