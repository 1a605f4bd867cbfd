//! Weighted fit score
//!
//! # Algorithm: positional weighted mean
//! 1. Feature at position `i` of an `n`-long ordering gets weight `n - i`
//! 2. `weighted_sum = Σ score × weight`
//! 3. `total_weight = Σ weight × 100` (100 = best possible score)
//! 4. `fit = weighted_sum / total_weight × 10`
//!
//! The result is the weighted mean of the 0-100 scores rescaled to 0-10.
//! No rounding is applied here; one-decimal display is a presentation concern.

use crate::feature::FeatureKey;
use crate::scores::{FeatureScores, MAX_SCORE};

/// Upper bound of the fit scale
pub const MAX_FIT_SCORE: f64 = 10.0;

/// Compute the 0-10 fit score of `scores` under `priorities`
///
/// Accepts partial orderings. An empty ordering scores 0.
pub fn compute_fit_score(scores: &FeatureScores, priorities: &[FeatureKey]) -> f64 {
    let n = priorities.len();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (index, &feature) in priorities.iter().enumerate() {
        let weight = (n - index) as f64;
        weighted_sum += f64::from(scores.get(feature)) * weight;
        total_weight += weight * f64::from(MAX_SCORE);
    }

    if total_weight > 0.0 {
        (weighted_sum / total_weight) * MAX_FIT_SCORE
    } else {
        0.0
    }
}
