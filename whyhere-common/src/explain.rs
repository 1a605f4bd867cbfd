//! Rank explanations and performance insights
//!
//! Everything here is a pure function of (rank, scores, priorities). The
//! bucket codes are the stable contract; `render()` / `message()` produce
//! English text for display.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::feature::{FeatureKey, LabelContext};
use crate::priority::PriorityList;
use serde::Serialize;

/// Variance below which the top three priority scores count as consistent
pub const CONSISTENCY_VARIANCE: f64 = 50.0;

/// Score and weight of one feature for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityContribution {
    pub feature: FeatureKey,
    /// 1-based position in the priority list
    pub priority: usize,
    pub weight: u32,
    pub score: u8,
}

impl PriorityContribution {
    fn of(entity: &Entity, priorities: &PriorityList, feature: FeatureKey) -> Self {
        Self {
            feature,
            priority: priorities.position(feature) + 1,
            weight: priorities.weight_of(feature),
            score: entity.scores.get(feature),
        }
    }

    /// Weighted points this feature adds before normalization
    pub fn contribution(&self) -> u32 {
        u32::from(self.score) * self.weight
    }
}

/// Explanation bucket for a ranked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationCode {
    /// Rank 1, top priority ≥ 90 and top-3 average ≥ 85
    TopExceptional,
    /// Rank 1, top priority ≥ 80
    TopBalanced,
    /// Rank 1 otherwise
    TopDistributed,
    /// Rank 2, top priority within 5 of 85
    SecondCompetitive,
    /// Rank 2 otherwise
    SecondAsymmetric,
    /// Rank 3
    Third,
    /// Ranks 4-5
    UpperTier,
    /// Ranks 6-10
    MiddleTier,
    /// Below rank 10
    LowerTier,
}

/// Why an entity sits at its rank
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankExplanation {
    pub rank: usize,
    pub code: ExplanationCode,
    /// The three highest priorities, in priority order
    pub top: [PriorityContribution; 3],
}

fn top_three(entity: &Entity, priorities: &PriorityList) -> [PriorityContribution; 3] {
    [0usize, 1, 2].map(|i| PriorityContribution::of(entity, priorities, priorities[i]))
}

fn mean_score(top: &[PriorityContribution; 3]) -> f64 {
    top.iter().map(|c| f64::from(c.score)).sum::<f64>() / 3.0
}

/// Classify the explanation for `entity` shown at 1-based `rank`
pub fn explain_rank(rank: usize, entity: &Entity, priorities: &PriorityList) -> Result<RankExplanation> {
    if rank == 0 {
        return Err(Error::InvalidRank(rank));
    }

    let top = top_three(entity, priorities);
    let lead = f64::from(top[0].score);
    let avg_top3 = mean_score(&top);

    let code = match rank {
        1 if lead >= 90.0 && avg_top3 >= 85.0 => ExplanationCode::TopExceptional,
        1 if lead >= 80.0 => ExplanationCode::TopBalanced,
        1 => ExplanationCode::TopDistributed,
        2 if (lead - 85.0).abs() < 5.0 => ExplanationCode::SecondCompetitive,
        2 => ExplanationCode::SecondAsymmetric,
        3 => ExplanationCode::Third,
        4..=5 => ExplanationCode::UpperTier,
        6..=10 => ExplanationCode::MiddleTier,
        _ => ExplanationCode::LowerTier,
    };

    Ok(RankExplanation { rank, code, top })
}

impl RankExplanation {
    /// Display text citing the top three features, scores and weights
    pub fn render(&self) -> String {
        let [p1, p2, p3] = self.top.map(|c| (c.feature.label(), c.score, c.weight));
        match self.code {
            ExplanationCode::TopExceptional => format!(
                "#1 on the strength of your highest priorities: {} scores {}/100 at {}x weight, backed by {} ({}/100, {}x) and {} ({}/100, {}x).",
                p1.0, p1.1, p1.2, p2.0, p2.1, p2.2, p3.0, p3.1, p3.2
            ),
            ExplanationCode::TopBalanced => format!(
                "#1 through balance rather than a single standout: {} scores {}/100 at {}x weight, with steady marks in {} ({}/100) and {} ({}/100).",
                p1.0, p1.1, p1.2, p2.0, p2.1, p3.0, p3.1
            ),
            ExplanationCode::TopDistributed => format!(
                "#1 on the combined weighted total: {} ({}/100, {}x), {} ({}/100, {}x) and {} ({}/100, {}x) add up to the best aggregate score.",
                p1.0, p1.1, p1.2, p2.0, p2.1, p2.2, p3.0, p3.1, p3.2
            ),
            ExplanationCode::SecondCompetitive => format!(
                "#2 and close behind the leader: {} {}/100 ({}x weight), {} {}/100, {} {}/100.",
                p1.0, p1.1, p1.2, p2.0, p2.1, p3.0, p3.1
            ),
            ExplanationCode::SecondAsymmetric => format!(
                "#2 with an uneven profile: your top priority {} scores {}/100 at {}x weight, supported by {} ({}/100) and {} ({}/100).",
                p1.0, p1.1, p1.2, p2.0, p2.1, p3.0, p3.1
            ),
            ExplanationCode::Third => format!(
                "#3 as a solid alternative: {} {}/100 ({}x weight), {} {}/100, {} {}/100.",
                p1.0, p1.1, p1.2, p2.0, p2.1, p3.0, p3.1
            ),
            ExplanationCode::UpperTier => format!(
                "#{} with moderate alignment: {} {}/100 ({}x weight), {} {}/100, {} {}/100. Lower-weighted features carry more of the score here.",
                self.rank, p1.0, p1.1, p1.2, p2.0, p2.1, p3.0, p3.1
            ),
            ExplanationCode::MiddleTier => format!(
                "#{} in the middle tier: {} {}/100, {} {}/100, {} {}/100. Strong in some lower priorities, weaker in the ones you weighted most.",
                self.rank, p1.0, p1.1, p2.0, p2.1, p3.0, p3.1
            ),
            ExplanationCode::LowerTier => format!(
                "#{} with limited alignment: {} {}/100, {} {}/100, {} {}/100. Adjusting priorities may surface it.",
                self.rank, p1.0, p1.1, p2.0, p2.1, p3.0, p3.1
            ),
        }
    }
}

/// Qualitative read of the top three priority scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceInsight {
    OutstandingConsistency,
    ExceptionalPeak,
    UniformlyStrong,
    StrongWithTradeoffs,
    BalancedModerate,
    MixedResults,
    AverageWithGaps,
    SignificantShortfalls,
}

/// Bucket `entity` by its top-3 average and their consistency
pub fn performance_insight(entity: &Entity, priorities: &PriorityList) -> PerformanceInsight {
    let top = top_three(entity, priorities);
    let avg_top3 = mean_score(&top);
    let variance = top
        .iter()
        .map(|c| (f64::from(c.score) - avg_top3).powi(2))
        .sum::<f64>()
        / 3.0;
    let consistent = variance < CONSISTENCY_VARIANCE;

    use PerformanceInsight::*;
    match (avg_top3, consistent) {
        (a, true) if a >= 90.0 => OutstandingConsistency,
        (a, false) if a >= 90.0 => ExceptionalPeak,
        (a, true) if a >= 80.0 => UniformlyStrong,
        (a, false) if a >= 80.0 => StrongWithTradeoffs,
        (a, true) if a >= 70.0 => BalancedModerate,
        (a, false) if a >= 70.0 => MixedResults,
        (a, _) if a >= 60.0 => AverageWithGaps,
        _ => SignificantShortfalls,
    }
}

impl PerformanceInsight {
    pub const fn message(self) -> &'static str {
        match self {
            PerformanceInsight::OutstandingConsistency => "Outstanding consistency across all top priorities",
            PerformanceInsight::ExceptionalPeak => "Exceptional peak performance with some variance",
            PerformanceInsight::UniformlyStrong => "Uniformly strong in your most important areas",
            PerformanceInsight::StrongWithTradeoffs => "Strong overall with strategic trade-offs",
            PerformanceInsight::BalancedModerate => "Balanced moderate performance across priorities",
            PerformanceInsight::MixedResults => "Mixed results in priority features",
            PerformanceInsight::AverageWithGaps => "Average fit with notable gaps in key areas",
            PerformanceInsight::SignificantShortfalls => "Significant shortfalls in your top-ranked priorities",
        }
    }
}

/// Short reason tied to one of the top three priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RankingReason {
    /// Score ≥ 85
    StrongAlignment { feature: FeatureKey, score: u8, priority: usize },
    /// Score ≥ 70
    GoodPerformance { feature: FeatureKey, score: u8, priority: usize },
    /// Score ≥ 60
    SolidAccess { feature: FeatureKey, score: u8, priority: usize },
    /// None of the top three priorities reached 60
    Balanced,
}

/// Reasons for the top three priorities; `[Balanced]` when none qualifies
pub fn ranking_reasons(entity: &Entity, priorities: &PriorityList) -> Vec<RankingReason> {
    let reasons: Vec<RankingReason> = top_three(entity, priorities)
        .into_iter()
        .filter_map(|c| {
            let (feature, score, priority) = (c.feature, c.score, c.priority);
            match score {
                85..=u8::MAX => Some(RankingReason::StrongAlignment { feature, score, priority }),
                70..=84 => Some(RankingReason::GoodPerformance { feature, score, priority }),
                60..=69 => Some(RankingReason::SolidAccess { feature, score, priority }),
                _ => None,
            }
        })
        .collect();

    if reasons.is_empty() {
        vec![RankingReason::Balanced]
    } else {
        reasons
    }
}

impl RankingReason {
    pub fn message(&self) -> String {
        let ordinal = |priority: usize| {
            if priority == 1 {
                "top".to_string()
            } else {
                format!("#{}", priority)
            }
        };
        let name = |feature: FeatureKey| feature.display_name(LabelContext::Narrative).to_lowercase();

        match *self {
            RankingReason::StrongAlignment { feature, score, priority } => format!(
                "Strong {} score ({}/100) aligns with your {} priority",
                name(feature),
                score,
                ordinal(priority)
            ),
            RankingReason::GoodPerformance { feature, score, priority } => format!(
                "Good {} performance ({}/100) matches your {} preference",
                name(feature),
                score,
                if priority == 1 { "highest" } else { "key" }
            ),
            RankingReason::SolidAccess { feature, score, .. } => format!(
                "Solid {} access ({}/100) supports your lifestyle goals",
                name(feature),
                score
            ),
            RankingReason::Balanced => "Balanced performance across your priority areas".to_string(),
        }
    }
}

/// The `n` features contributing the most weighted points
///
/// Ties keep priority order.
pub fn top_contributing_features(entity: &Entity, priorities: &PriorityList, n: usize) -> Vec<PriorityContribution> {
    let mut contributions: Vec<PriorityContribution> = priorities
        .iter()
        .map(|&f| PriorityContribution::of(entity, priorities, f))
        .collect();
    contributions.sort_by(|a, b| b.contribution().cmp(&a.contribution()));
    contributions.truncate(n);
    contributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::atlanta_streets;
    use crate::scores::FeatureScores;
    use FeatureKey::*;

    fn canonical() -> PriorityList {
        PriorityList::new(FeatureKey::ALL.to_vec()).unwrap()
    }

    /// Entity whose top three canonical priorities (crime, schools, martaStops) score as given
    fn with_top3(a: i64, b: i64, c: i64) -> Entity {
        let mut entity = atlanta_streets().remove(0);
        entity.scores = FeatureScores::from_pairs([(Crime, a), (Schools, b), (MartaStops, c)]).unwrap();
        entity
    }

    #[test]
    fn test_rank_zero_rejected() {
        assert!(matches!(
            explain_rank(0, &with_top3(90, 90, 90), &canonical()),
            Err(Error::InvalidRank(0))
        ));
    }

    #[test]
    fn test_rank_one_buckets() {
        let p = canonical();
        let code = |e: &Entity| explain_rank(1, e, &p).unwrap().code;
        assert_eq!(code(&with_top3(95, 85, 80)), ExplanationCode::TopExceptional);
        // lead 95 but average 80 < 85
        assert_eq!(code(&with_top3(95, 75, 70)), ExplanationCode::TopBalanced);
        assert_eq!(code(&with_top3(80, 10, 10)), ExplanationCode::TopBalanced);
        assert_eq!(code(&with_top3(79, 100, 100)), ExplanationCode::TopDistributed);
    }

    #[test]
    fn test_rank_two_buckets() {
        let p = canonical();
        let code = |e: &Entity| explain_rank(2, e, &p).unwrap().code;
        assert_eq!(code(&with_top3(81, 0, 0)), ExplanationCode::SecondCompetitive);
        assert_eq!(code(&with_top3(89, 0, 0)), ExplanationCode::SecondCompetitive);
        assert_eq!(code(&with_top3(80, 0, 0)), ExplanationCode::SecondAsymmetric);
        assert_eq!(code(&with_top3(90, 0, 0)), ExplanationCode::SecondAsymmetric);
    }

    #[test]
    fn test_rank_tiers() {
        let p = canonical();
        let e = with_top3(50, 50, 50);
        let code = |rank| explain_rank(rank, &e, &p).unwrap().code;
        assert_eq!(code(3), ExplanationCode::Third);
        assert_eq!(code(4), ExplanationCode::UpperTier);
        assert_eq!(code(5), ExplanationCode::UpperTier);
        assert_eq!(code(6), ExplanationCode::MiddleTier);
        assert_eq!(code(10), ExplanationCode::MiddleTier);
        assert_eq!(code(11), ExplanationCode::LowerTier);
        assert_eq!(code(200), ExplanationCode::LowerTier);
    }

    #[test]
    fn test_explanation_cites_weights() {
        let explanation = explain_rank(1, &with_top3(95, 85, 80), &canonical()).unwrap();
        assert_eq!(explanation.top.map(|c| c.weight), [8, 7, 6]);
        assert_eq!(explanation.top.map(|c| c.priority), [1, 2, 3]);
        let text = explanation.render();
        assert!(text.contains("Safety scores 95/100 at 8x weight"));
        assert!(text.contains("Schools (85/100, 7x)"));
    }

    #[test]
    fn test_insight_buckets() {
        let p = canonical();
        let insight = |a, b, c| performance_insight(&with_top3(a, b, c), &p);
        assert_eq!(insight(92, 90, 91), PerformanceInsight::OutstandingConsistency);
        assert_eq!(insight(100, 100, 75), PerformanceInsight::ExceptionalPeak);
        assert_eq!(insight(82, 80, 84), PerformanceInsight::UniformlyStrong);
        assert_eq!(insight(100, 80, 65), PerformanceInsight::StrongWithTradeoffs);
        assert_eq!(insight(70, 72, 74), PerformanceInsight::BalancedModerate);
        assert_eq!(insight(90, 70, 55), PerformanceInsight::MixedResults);
        assert_eq!(insight(60, 60, 60), PerformanceInsight::AverageWithGaps);
        assert_eq!(insight(100, 40, 40), PerformanceInsight::AverageWithGaps);
        assert_eq!(insight(59, 59, 59), PerformanceInsight::SignificantShortfalls);
    }

    #[test]
    fn test_consistency_threshold_is_strict() {
        // scores 80, 90, 90: mean 86.67, variance 22.2 -> consistent
        assert_eq!(
            performance_insight(&with_top3(80, 90, 90), &canonical()),
            PerformanceInsight::UniformlyStrong
        );
        // scores 80, 80, 95: mean 85, variance 50 -> not consistent
        assert_eq!(
            performance_insight(&with_top3(80, 80, 95), &canonical()),
            PerformanceInsight::StrongWithTradeoffs
        );
    }

    #[test]
    fn test_ranking_reasons() {
        let p = canonical();
        let reasons = ranking_reasons(&with_top3(90, 72, 61), &p);
        assert_eq!(
            reasons,
            vec![
                RankingReason::StrongAlignment { feature: Crime, score: 90, priority: 1 },
                RankingReason::GoodPerformance { feature: Schools, score: 72, priority: 2 },
                RankingReason::SolidAccess { feature: MartaStops, score: 61, priority: 3 },
            ]
        );
        assert_eq!(
            reasons[0].message(),
            "Strong community security score (90/100) aligns with your top priority"
        );

        assert_eq!(ranking_reasons(&with_top3(10, 20, 59), &p), vec![RankingReason::Balanced]);
    }

    #[test]
    fn test_top_contributing_features() {
        let p = canonical();
        let peachtree = atlanta_streets().remove(0);
        let top = top_contributing_features(&peachtree, &p, 3);
        // crime 75*8=600, martaStops 100*6=600, schools 72*7=504
        let features: Vec<FeatureKey> = top.iter().map(|c| c.feature).collect();
        assert_eq!(features, vec![Crime, MartaStops, Schools]);
        assert_eq!(top[0].contribution(), 600);
    }
}
