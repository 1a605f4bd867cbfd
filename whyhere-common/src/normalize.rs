//! Backend record normalization
//!
//! Records from `/data/pois` carry one accessibility column per feature in
//! arbitrary numeric ranges. Each column is min-max normalized across the
//! whole response into the 0-100 score scale, then every record becomes an
//! [`Entity`] with a fit score and cluster.
//!
//! # Algorithm
//! 1. Per column: min and max over the records holding a number there
//!    (no numbers at all → min 0, max 1)
//! 2. Per record and column: `round((raw - min) / (max - min || 1) × 100)`,
//!    missing values counting as 0, result clamped into 0..=100
//! 3. Fit score from `user_match_score × 10` when present, otherwise the
//!    weighted fit score of the normalized scores
//! 4. Cluster always recomputed from the fit score
//!
//! A column whose values are all equal (max == min) is degenerate: the
//! denominator falls back to 1 and clamping flattens it to 0 for every
//! record holding that value. This is logged as a warning, never an error.

use crate::cluster::Cluster;
use crate::entity::{display_name, Entity, FitScore};
use crate::feature::FeatureKey;
use crate::priority::PriorityList;
use crate::scores::{FeatureScores, MAX_SCORE};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// One record of the `/data/pois` response
///
/// Every field is optional and lenient: values of the wrong JSON type are
/// treated as absent rather than failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hex_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub neighborhood: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub suitability_label: Option<String>,
    /// Precomputed model match score in 0..=1
    #[serde(default, deserialize_with = "lenient_number")]
    pub user_match_score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub crime_incident_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub school_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub marta_stop_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub restaurant_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub park_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub grocery_store_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hospital_accessibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub police_station_accessibility: Option<f64>,
}

impl RawRecord {
    /// Raw accessibility value backing `feature`, if numeric
    pub fn accessibility(&self, feature: FeatureKey) -> Option<f64> {
        match feature {
            FeatureKey::Crime => self.crime_incident_accessibility,
            FeatureKey::Schools => self.school_accessibility,
            FeatureKey::MartaStops => self.marta_stop_accessibility,
            FeatureKey::Restaurants => self.restaurant_accessibility,
            FeatureKey::Parks => self.park_accessibility,
            FeatureKey::Grocery => self.grocery_store_accessibility,
            FeatureKey::Hospitals => self.hospital_accessibility,
            FeatureKey::PoliceStations => self.police_station_accessibility,
        }
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Observed numeric range of one accessibility column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    /// Range of `feature`'s column over `records`; `0..1` when no record has a number
    pub fn of(records: &[RawRecord], feature: FeatureKey) -> Self {
        records
            .iter()
            .filter_map(|r| r.accessibility(feature))
            .fold(None, |range: Option<ColumnRange>, v| {
                Some(match range {
                    Some(r) => ColumnRange { min: r.min.min(v), max: r.max.max(v) },
                    None => ColumnRange { min: v, max: v },
                })
            })
            .unwrap_or(ColumnRange { min: 0.0, max: 1.0 })
    }

    /// Zero-variance column
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Map a raw value onto 0..=100; a missing value counts as 0
    pub fn normalize(&self, raw: Option<f64>) -> u8 {
        let span = self.max - self.min;
        let denominator = if span == 0.0 { 1.0 } else { span };
        let scaled = ((raw.unwrap_or(0.0) - self.min) / denominator * 100.0).round();
        if scaled.is_finite() {
            scaled.clamp(0.0, f64::from(MAX_SCORE)) as u8
        } else {
            0
        }
    }
}

/// Result of normalizing one backend response
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// One entity per input record, in input order
    pub entities: Vec<Entity>,
    /// Columns that had zero variance
    pub degenerate_columns: Vec<FeatureKey>,
}

/// Normalize backend records into scored entities
pub fn normalize(records: &[RawRecord], priorities: &PriorityList) -> Normalized {
    let ranges = FeatureKey::ALL.map(|f| ColumnRange::of(records, f));

    let degenerate_columns: Vec<FeatureKey> = FeatureKey::ALL
        .into_iter()
        .filter(|f| ranges[f.index()].is_degenerate())
        .collect();
    for feature in &degenerate_columns {
        warn!(
            column = feature.backend_column(),
            value = ranges[feature.index()].min,
            "Degenerate accessibility column (max == min); scores flattened"
        );
    }

    let entities = records
        .iter()
        .enumerate()
        .map(|(idx, record)| to_entity(idx, record, &ranges, priorities))
        .collect();

    debug!(
        records = records.len(),
        degenerate = degenerate_columns.len(),
        "Normalized backend records"
    );

    Normalized { entities, degenerate_columns }
}

fn to_entity(
    idx: usize,
    record: &RawRecord,
    ranges: &[ColumnRange; FeatureKey::COUNT],
    priorities: &PriorityList,
) -> Entity {
    let mut scores = FeatureScores::default();
    for feature in FeatureKey::ALL {
        scores.set_clamped(feature, ranges[feature.index()].normalize(record.accessibility(feature)));
    }

    let id = record
        .hex_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("hex-{}", idx));
    let name = display_name(
        record.neighborhood.as_deref(),
        record.location_name.as_deref(),
        &id,
    );
    let neighborhood = record
        .suitability_label
        .clone()
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| name.clone());

    let entity = Entity {
        id,
        name,
        neighborhood,
        lat: record.lat.unwrap_or(0.0),
        lng: record.lon.unwrap_or(0.0),
        scores,
        cluster: Cluster::Poor,
        fit_score: FitScore::Unscored,
        raw_match_score: record.user_match_score,
    };

    match record.user_match_score {
        Some(match_score) => entity.with_fit_score(match_score * 10.0),
        None => entity.scored(priorities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_fit_score;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_min_max_scaling() {
        let input = records(json!([
            {"hex_id": "a", "park_accessibility": 2.0},
            {"hex_id": "b", "park_accessibility": 4.0},
            {"hex_id": "c", "park_accessibility": 6.0},
        ]));
        let out = normalize(&input, &PriorityList::default());
        let parks: Vec<u8> = out.entities.iter().map(|e| e.scores.get(FeatureKey::Parks)).collect();
        assert_eq!(parks, vec![0, 50, 100]);
    }

    #[test]
    fn test_rounding() {
        let range = ColumnRange { min: 0.0, max: 3.0 };
        assert_eq!(range.normalize(Some(1.0)), 33);
        assert_eq!(range.normalize(Some(2.0)), 67);
    }

    #[test]
    fn test_missing_and_non_numeric_values() {
        let input = records(json!([
            {"hex_id": "a", "school_accessibility": 10.0},
            {"hex_id": "b", "school_accessibility": "n/a"},
            {"hex_id": "c", "school_accessibility": 20.0},
        ]));
        assert_eq!(input[1].school_accessibility, None);

        let range = ColumnRange::of(&input, FeatureKey::Schools);
        assert_eq!(range, ColumnRange { min: 10.0, max: 20.0 });

        // missing counts as 0, below the minimum, clamped to 0
        let out = normalize(&input, &PriorityList::default());
        assert_eq!(out.entities[1].scores.get(FeatureKey::Schools), 0);
        assert_eq!(out.entities[2].scores.get(FeatureKey::Schools), 100);
    }

    #[test]
    fn test_empty_column_defaults_to_unit_range() {
        let input = records(json!([{"hex_id": "a"}]));
        assert_eq!(
            ColumnRange::of(&input, FeatureKey::Hospitals),
            ColumnRange { min: 0.0, max: 1.0 }
        );
    }

    #[test]
    fn test_degenerate_column_stays_in_range() {
        let input = records(json!([
            {"hex_id": "a", "grocery_store_accessibility": 0.37, "crime_incident_accessibility": -5.0},
            {"hex_id": "b", "grocery_store_accessibility": 0.37, "crime_incident_accessibility": -5.0},
            {"hex_id": "c"},
        ]));
        let out = normalize(&input, &PriorityList::default());
        assert!(out.degenerate_columns.contains(&FeatureKey::Grocery));
        assert!(out.degenerate_columns.contains(&FeatureKey::Crime));

        for entity in &out.entities {
            for (_, score) in entity.scores.iter() {
                assert!(score <= 100);
            }
            assert_eq!(entity.scores.get(FeatureKey::Grocery), 0);
        }
        // missing crime value (0) sits 5 above the flat -5: (0 - -5) * 100 clamped
        assert_eq!(out.entities[2].scores.get(FeatureKey::Crime), 100);
        assert_eq!(out.entities[0].scores.get(FeatureKey::Crime), 0);
    }

    #[test]
    fn test_match_score_overrides_fit() {
        let input = records(json!([
            {"hex_id": "a", "user_match_score": 0.91, "park_accessibility": 1.0},
            {"hex_id": "b", "user_match_score": 1.7, "park_accessibility": 2.0},
        ]));
        let out = normalize(&input, &PriorityList::default());

        let a = &out.entities[0];
        assert!((a.fit_score.value().unwrap() - 9.1).abs() < 1e-9);
        assert_eq!(a.raw_match_score, Some(0.91));
        assert_eq!(a.cluster, Cluster::Excellent);

        let b = &out.entities[1];
        assert_eq!(b.fit_score, FitScore::Scored(10.0));
        assert_eq!(b.raw_match_score, Some(1.7));
    }

    #[test]
    fn test_without_match_score_equals_direct_scoring() {
        let input = records(json!([
            {"hex_id": "a", "park_accessibility": 1.0, "school_accessibility": 9.0, "restaurant_accessibility": 3.0},
            {"hex_id": "b", "park_accessibility": 5.0, "school_accessibility": 2.0, "restaurant_accessibility": 8.0},
            {"hex_id": "c", "park_accessibility": 3.0, "school_accessibility": 4.0, "restaurant_accessibility": 1.0},
        ]));
        let priorities: PriorityList =
            "schools,parks,restaurants,crime,martaStops,grocery,hospitals,policeStations".parse().unwrap();
        let out = normalize(&input, &priorities);

        for entity in &out.entities {
            let direct = compute_fit_score(&entity.scores, &priorities);
            assert_eq!(entity.fit_score, FitScore::Scored(direct));
            assert_eq!(entity.cluster, Cluster::classify(direct));
            assert_eq!(entity.raw_match_score, None);
        }
    }

    #[test]
    fn test_naming_and_coordinates() {
        let input = records(json!([
            {"hex_id": "89abc", "neighborhood": "Midtown, Atlanta, GA", "lat": 33.78, "lon": -84.38},
            {"location_name": "Grant Park, Atlanta", "suitability_label": "Great for families"},
            {"hex_id": "", "neighborhood": "   ", "lat": "north"},
        ]));
        let out = normalize(&input, &PriorityList::default());

        assert_eq!(out.entities[0].id, "89abc");
        assert_eq!(out.entities[0].name, "Midtown");
        assert_eq!(out.entities[0].neighborhood, "Midtown");
        assert_eq!(out.entities[0].lat, 33.78);
        assert_eq!(out.entities[0].lng, -84.38);

        assert_eq!(out.entities[1].id, "hex-1");
        assert_eq!(out.entities[1].name, "Grant Park");
        assert_eq!(out.entities[1].neighborhood, "Great for families");

        assert_eq!(out.entities[2].id, "hex-2");
        assert_eq!(out.entities[2].name, "hex-2");
        assert_eq!(out.entities[2].lat, 0.0);
    }

    #[test]
    fn test_empty_response() {
        let out = normalize(&[], &PriorityList::default());
        assert!(out.entities.is_empty());
    }
}
