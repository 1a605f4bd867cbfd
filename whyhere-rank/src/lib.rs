//! whyhere-rank library - ranking service for the WhyHere UI
//!
//! Holds one user's priorities and profile, fetches and normalizes
//! `/data/pois` records (or uses the built-in Atlanta streets), and serves
//! ranked, explained results plus a CSV export.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod logging;
pub mod services;

use services::RankingSession;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RankingSession>,
}

impl AppState {
    pub fn new(session: RankingSession) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let api = Router::new()
        .route("/api/session", get(api::get_session))
        .route("/api/priorities", put(api::put_priorities))
        .route("/api/profile", put(api::put_profile))
        .route("/api/streets", get(api::get_streets))
        .route("/api/bookmarks/:id", post(api::toggle_bookmark))
        .route("/api/compare/:id", post(api::toggle_compare))
        .route("/api/export.csv", get(api::export_csv_download));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
