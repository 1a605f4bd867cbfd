//! Ranked street listing
//!
//! GET /api/streets?top=N&sort=fit|<feature>&q=text
//!
//! `rank` is always the position in the fit-score ranking; `sort` and `q`
//! only change which entries are shown and in what order.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use whyhere_common::entity::Entity;
use whyhere_common::explain::{
    explain_rank, performance_insight, ranking_reasons, top_contributing_features, ExplanationCode,
    PerformanceInsight, PriorityContribution,
};
use whyhere_common::feature::FeatureKey;
use whyhere_common::priority::PriorityList;

use crate::error::{ApiError, ApiResult};
use crate::services::FetchStatus;
use crate::AppState;

/// Entries shown when `top` is absent
pub const DEFAULT_TOP: usize = 10;

/// Largest accepted `top`
pub const MAX_TOP: usize = 20;

#[derive(Debug, Deserialize)]
pub struct StreetsQuery {
    pub top: Option<usize>,
    /// `fit` (default) or a feature wire name
    pub sort: Option<String>,
    /// Case-insensitive substring of name or neighborhood
    pub q: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Fit,
    Feature(FeatureKey),
}

impl StreetsQuery {
    fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP).clamp(1, MAX_TOP)
    }

    fn sort_key(&self) -> ApiResult<SortKey> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") | Some("fit") => Ok(SortKey::Fit),
            Some(name) => name
                .parse::<FeatureKey>()
                .map(SortKey::Feature)
                .map_err(|_| ApiError::BadRequest(format!("unknown sort key '{}'", name))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub code: ExplanationCode,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub code: PerformanceInsight,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reason {
    #[serde(flatten)]
    pub reason: whyhere_common::explain::RankingReason,
    pub message: String,
}

/// One ranked entity with its explanation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetView {
    pub rank: usize,
    #[serde(flatten)]
    pub entity: Entity,
    pub display_name: String,
    pub explanation: Explanation,
    pub insight: Insight,
    pub reasons: Vec<Reason>,
    pub top_features: Vec<PriorityContribution>,
    pub bookmarked: bool,
    pub in_compare: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetsResponse {
    pub status: FetchStatus,
    pub priorities: PriorityList,
    /// Entities matching `q`, before `top` is applied
    pub total: usize,
    pub streets: Vec<StreetView>,
}

/// GET /api/streets
pub async fn get_streets(
    State(state): State<AppState>,
    Query(query): Query<StreetsQuery>,
) -> ApiResult<Json<StreetsResponse>> {
    let sort_key = query.sort_key()?;
    let snapshot = state.session.snapshot().await;
    let (entities, priorities) = state.session.ranked().await;

    let needle = query.q.as_deref().map(str::trim).unwrap_or("").to_lowercase();
    let mut matching: Vec<(usize, &Entity)> = entities
        .iter()
        .enumerate()
        .map(|(index, entity)| (index + 1, entity))
        .filter(|(_, entity)| {
            needle.is_empty()
                || entity.name.to_lowercase().contains(&needle)
                || entity.neighborhood.to_lowercase().contains(&needle)
        })
        .collect();

    if let SortKey::Feature(feature) = sort_key {
        matching.sort_by(|(_, a), (_, b)| b.scores.get(feature).cmp(&a.scores.get(feature)));
    }

    let total = matching.len();
    let streets = matching
        .into_iter()
        .take(query.top())
        .map(|(rank, entity)| -> ApiResult<StreetView> {
            let explanation = explain_rank(rank, entity, &priorities)?;
            let insight = performance_insight(entity, &priorities);
            Ok(StreetView {
                rank,
                display_name: entity.display_name(),
                explanation: Explanation {
                    code: explanation.code,
                    text: explanation.render(),
                },
                insight: Insight {
                    code: insight,
                    message: insight.message().to_string(),
                },
                reasons: ranking_reasons(entity, &priorities)
                    .into_iter()
                    .map(|reason| Reason {
                        message: reason.message(),
                        reason,
                    })
                    .collect(),
                top_features: top_contributing_features(entity, &priorities, 3),
                bookmarked: snapshot.bookmarks.contains(&entity.id),
                in_compare: snapshot.compare.contains(&entity.id),
                entity: entity.clone(),
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(StreetsResponse {
        status: snapshot.status,
        priorities,
        total,
        streets,
    }))
}
