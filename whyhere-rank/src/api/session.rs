//! Session endpoints: priorities, profile, bookmarks and compare set
//!
//! Changing priorities or the profile triggers a refresh and answers once
//! it completes. A refresh superseded by a newer one still answers 200 with
//! the session as it stands.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use whyhere_common::feature::FeatureKey;
use whyhere_common::priority::PriorityList;
use whyhere_common::profile::UserProfile;

use crate::error::{ApiError, ApiResult};
use crate::services::SessionSnapshot;
use crate::AppState;

/// Body of PUT /api/priorities
#[derive(Debug, Deserialize)]
pub struct PrioritiesBody {
    /// Wire names, highest priority first
    pub priorities: Vec<String>,
}

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}

/// PUT /api/priorities
pub async fn put_priorities(
    State(state): State<AppState>,
    Json(body): Json<PrioritiesBody>,
) -> ApiResult<Json<SessionSnapshot>> {
    let order = body
        .priorities
        .iter()
        .map(|name| name.parse::<FeatureKey>())
        .collect::<whyhere_common::Result<Vec<_>>>()?;
    let priorities = PriorityList::new(order)?;

    tracing::info!(priorities = %priorities, "Priorities updated");
    state.session.set_priorities(priorities).await?;
    Ok(Json(state.session.snapshot().await))
}

/// PUT /api/profile
pub async fn put_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> ApiResult<Json<SessionSnapshot>> {
    if !profile.budget.is_finite() || profile.budget < 0.0 {
        return Err(ApiError::BadRequest("budget must be a non-negative number".to_string()));
    }
    if let Some(radius) = profile.radius {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ApiError::BadRequest("radius must be positive".to_string()));
        }
    }

    tracing::info!(budget = profile.budget, has_car = profile.has_car, "Profile updated");
    state.session.set_profile(profile).await?;
    Ok(Json(state.session.snapshot().await))
}

/// Result of a bookmark or compare toggle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub id: String,
    /// Whether the id is in the set after the toggle
    pub selected: bool,
    pub ids: Vec<String>,
}

/// POST /api/bookmarks/:id
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    ensure_known(&state, &id).await?;
    let selected = state.session.toggle_bookmark(&id).await;
    let ids = state.session.snapshot().await.bookmarks.iter().cloned().collect();
    Ok(Json(ToggleResponse { id, selected, ids }))
}

/// POST /api/compare/:id
///
/// Adding to a full compare set leaves it unchanged (`selected: false`).
pub async fn toggle_compare(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ToggleResponse>> {
    ensure_known(&state, &id).await?;
    let selected = state.session.toggle_compare(&id).await;
    let ids = state.session.snapshot().await.compare.ids().to_vec();
    Ok(Json(ToggleResponse { id, selected, ids }))
}

async fn ensure_known(state: &AppState, id: &str) -> ApiResult<()> {
    if state.session.contains_entity(id).await {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("street {}", id)))
    }
}
