//! Per-feature 0-100 scores for one geographic entity

use crate::error::{Error, Result};
use crate::feature::FeatureKey;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest possible per-feature score
pub const MAX_SCORE: u8 = 100;

/// Score for every feature, each in `0..=100`
///
/// Serialized as a JSON object keyed by feature wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureScores([u8; FeatureKey::COUNT]);

impl FeatureScores {
    /// Build from `(feature, score)` pairs; unspecified features score 0
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (FeatureKey, i64)>,
    {
        let mut scores = Self::default();
        for (feature, score) in pairs {
            scores.set(feature, score)?;
        }
        Ok(scores)
    }

    /// Every feature set to the same score
    pub fn uniform(score: u8) -> Result<Self> {
        Self::from_pairs(FeatureKey::ALL.map(|f| (f, i64::from(score))))
    }

    pub fn get(&self, feature: FeatureKey) -> u8 {
        self.0[feature.index()]
    }

    /// Set a score, rejecting values outside `0..=100`
    pub fn set(&mut self, feature: FeatureKey, score: i64) -> Result<()> {
        if !(0..=i64::from(MAX_SCORE)).contains(&score) {
            return Err(Error::ScoreOutOfRange { feature, score });
        }
        self.0[feature.index()] = score as u8;
        Ok(())
    }

    /// Set a score already known to be in range, saturating otherwise
    pub(crate) fn set_clamped(&mut self, feature: FeatureKey, score: u8) {
        self.0[feature.index()] = score.min(MAX_SCORE);
    }

    /// `(feature, score)` pairs in canonical feature order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, u8)> + '_ {
        FeatureKey::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

impl Serialize for FeatureScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FeatureKey::COUNT))?;
        for (feature, score) in self.iter() {
            map.serialize_entry(&feature, &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = FeatureScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of feature name to score in 0..=100")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FeatureScores, A::Error> {
                let mut scores = FeatureScores::default();
                while let Some((feature, score)) = access.next_entry::<FeatureKey, i64>()? {
                    scores.set(feature, score).map_err(de::Error::custom)?;
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        let mut scores = FeatureScores::default();
        assert!(scores.set(FeatureKey::Parks, 100).is_ok());
        assert!(matches!(
            scores.set(FeatureKey::Parks, 101),
            Err(Error::ScoreOutOfRange { feature: FeatureKey::Parks, score: 101 })
        ));
        assert!(scores.set(FeatureKey::Parks, -1).is_err());
        assert_eq!(scores.get(FeatureKey::Parks), 100);
    }

    #[test]
    fn test_json_shape() {
        let scores = FeatureScores::from_pairs([(FeatureKey::MartaStops, 42)]).unwrap();
        let value = serde_json::to_value(scores).unwrap();
        assert_eq!(value["martaStops"], 42);
        assert_eq!(value["crime"], 0);

        let parsed: FeatureScores = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, scores);
    }

    #[test]
    fn test_json_rejects_out_of_range() {
        let result: std::result::Result<FeatureScores, _> =
            serde_json::from_str(r#"{"crime": 150}"#);
        assert!(result.is_err());
    }
}
