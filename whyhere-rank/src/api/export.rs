//! CSV download

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use whyhere_common::export::{default_filename, export_csv};

use crate::AppState;

/// GET /api/export.csv
pub async fn export_csv_download(State(state): State<AppState>) -> Response {
    let (entities, priorities) = state.session.ranked().await;
    let bookmarks = state.session.bookmarks().await;

    let csv = export_csv(&entities, &priorities, &bookmarks);
    let filename = default_filename(chrono::Utc::now().timestamp_millis());
    tracing::info!(entities = entities.len(), filename = %filename, "Exporting CSV");

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response()
}
