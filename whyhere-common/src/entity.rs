//! Scoreable geographic entities ("streets" / hexagon cells)

use crate::cluster::Cluster;
use crate::feature::FeatureKey;
use crate::scores::FeatureScores;
use crate::scoring::{compute_fit_score, MAX_FIT_SCORE};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fit score of an entity: absent until computed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum FitScore {
    #[default]
    Unscored,
    Scored(f64),
}

impl FitScore {
    /// Scored value clamped into 0..=10
    pub fn scored(value: f64) -> Self {
        if value.is_nan() {
            FitScore::Scored(0.0)
        } else {
            FitScore::Scored(value.clamp(0.0, MAX_FIT_SCORE))
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            FitScore::Scored(v) => Some(v),
            FitScore::Unscored => None,
        }
    }

    pub fn is_scored(self) -> bool {
        matches!(self, FitScore::Scored(_))
    }

    /// Display ordering: higher scores first, unscored entities last
    pub fn rank_cmp(self, other: FitScore) -> Ordering {
        match (self, other) {
            (FitScore::Scored(a), FitScore::Scored(b)) => b.total_cmp(&a),
            (FitScore::Scored(_), FitScore::Unscored) => Ordering::Less,
            (FitScore::Unscored, FitScore::Scored(_)) => Ordering::Greater,
            (FitScore::Unscored, FitScore::Unscored) => Ordering::Equal,
        }
    }
}

impl From<Option<f64>> for FitScore {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FitScore::Unscored, FitScore::scored)
    }
}

impl From<FitScore> for Option<f64> {
    fn from(score: FitScore) -> Self {
        score.value()
    }
}

/// One scoreable geographic unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub neighborhood: String,
    pub lat: f64,
    pub lng: f64,
    pub scores: FeatureScores,
    pub cluster: Cluster,
    #[serde(default)]
    pub fit_score: FitScore,
    /// Backend model match score (0-1), kept for display and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_match_score: Option<f64>,
}

impl Entity {
    /// Copy of this entity scored under `priorities`, cluster recomputed
    pub fn scored(&self, priorities: &[FeatureKey]) -> Entity {
        let fit = compute_fit_score(&self.scores, priorities);
        self.with_fit_score(fit)
    }

    /// Copy carrying `fit` (clamped to 0..=10) and the matching cluster
    pub fn with_fit_score(&self, fit: f64) -> Entity {
        let fit_score = FitScore::scored(fit);
        let cluster = Cluster::classify(fit_score.value().unwrap_or(0.0));
        Entity {
            fit_score,
            cluster,
            ..self.clone()
        }
    }

    /// Name shown in lists and exports
    pub fn display_name(&self) -> String {
        display_name(Some(self.neighborhood.as_str()), Some(self.name.as_str()), &self.id)
    }
}

/// First non-blank of `primary` then `secondary`, cut at the first comma;
/// falls back to `id` when both are blank
pub fn display_name(primary: Option<&str>, secondary: Option<&str>, id: &str) -> String {
    [primary, secondary]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(|s| s.split(',').next().unwrap_or(s).to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| id.to_string())
}

/// Score every unscored entity and sort for display
///
/// Entities that already carry a score (e.g. a backend match score) keep it.
/// Sorting is stable: equal scores keep their input order.
pub fn rank_entities(entities: &[Entity], priorities: &[FeatureKey]) -> Vec<Entity> {
    let mut ranked: Vec<Entity> = entities
        .iter()
        .map(|e| match e.fit_score {
            FitScore::Scored(_) => e.clone(),
            FitScore::Unscored => e.scored(priorities),
        })
        .collect();
    sort_by_fit(&mut ranked);
    ranked
}

/// Stable sort: descending fit score, unscored last
pub fn sort_by_fit(entities: &mut [Entity]) {
    entities.sort_by(|a, b| a.fit_score.rank_cmp(b.fit_score));
}
