//! Feature keys and their static metadata
//!
//! The eight lifestyle features form a closed set. Every lookup (labels,
//! backend column names, backend weight keys) is an exhaustive `match`, so
//! adding a feature without its metadata does not compile.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight scored lifestyle features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    Crime,
    Schools,
    MartaStops,
    Restaurants,
    Parks,
    Grocery,
    Hospitals,
    PoliceStations,
}

/// Label register used by the UI for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelContext {
    Short,
    Narrative,
    Lifestyle,
}

impl FeatureKey {
    /// Number of features in the closed set
    pub const COUNT: usize = 8;

    /// Every feature, in canonical (export column) order
    pub const ALL: [FeatureKey; Self::COUNT] = [
        FeatureKey::Crime,
        FeatureKey::Schools,
        FeatureKey::MartaStops,
        FeatureKey::Restaurants,
        FeatureKey::Parks,
        FeatureKey::Grocery,
        FeatureKey::Hospitals,
        FeatureKey::PoliceStations,
    ];

    /// Slot of this feature in fixed-size per-feature tables
    pub const fn index(self) -> usize {
        match self {
            FeatureKey::Crime => 0,
            FeatureKey::Schools => 1,
            FeatureKey::MartaStops => 2,
            FeatureKey::Restaurants => 3,
            FeatureKey::Parks => 4,
            FeatureKey::Grocery => 5,
            FeatureKey::Hospitals => 6,
            FeatureKey::PoliceStations => 7,
        }
    }

    /// Name used by the UI and in JSON payloads
    pub const fn wire_name(self) -> &'static str {
        match self {
            FeatureKey::Crime => "crime",
            FeatureKey::Schools => "schools",
            FeatureKey::MartaStops => "martaStops",
            FeatureKey::Restaurants => "restaurants",
            FeatureKey::Parks => "parks",
            FeatureKey::Grocery => "grocery",
            FeatureKey::Hospitals => "hospitals",
            FeatureKey::PoliceStations => "policeStations",
        }
    }

    /// Column label used in tables and the CSV export
    pub const fn label(self) -> &'static str {
        match self {
            FeatureKey::Crime => "Safety",
            FeatureKey::Schools => "Schools",
            FeatureKey::MartaStops => "MARTA",
            FeatureKey::Restaurants => "Restaurants",
            FeatureKey::Parks => "Parks",
            FeatureKey::Grocery => "Grocery",
            FeatureKey::Hospitals => "Hospitals",
            FeatureKey::PoliceStations => "Police",
        }
    }

    /// Contextual display name
    pub const fn display_name(self, context: LabelContext) -> &'static str {
        use LabelContext::*;
        match (self, context) {
            (FeatureKey::Restaurants, Short) => "Dining",
            (FeatureKey::Restaurants, Narrative) => "Culinary Scene",
            (FeatureKey::Restaurants, Lifestyle) => "Nightlife & Entertainment",
            (FeatureKey::Crime, Short) => "Safety",
            (FeatureKey::Crime, Narrative) => "Community Security",
            (FeatureKey::Crime, Lifestyle) => "Peace of Mind",
            (FeatureKey::Hospitals, Short) => "Healthcare",
            (FeatureKey::Hospitals, Narrative) => "Medical Access",
            (FeatureKey::Hospitals, Lifestyle) => "Wellness & Care",
            (FeatureKey::Schools, Short) => "Education",
            (FeatureKey::Schools, Narrative) => "School Quality",
            (FeatureKey::Schools, Lifestyle) => "Family-Friendly Learning",
            (FeatureKey::Parks, Short) => "Green Space",
            (FeatureKey::Parks, Narrative) => "Recreation Areas",
            (FeatureKey::Parks, Lifestyle) => "Active Lifestyle",
            (FeatureKey::Grocery, Short) => "Shopping",
            (FeatureKey::Grocery, Narrative) => "Fresh Food Access",
            (FeatureKey::Grocery, Lifestyle) => "Convenience & Supplies",
            (FeatureKey::PoliceStations, Short) => "Security",
            (FeatureKey::PoliceStations, Narrative) => "Law Enforcement",
            (FeatureKey::PoliceStations, Lifestyle) => "Neighborhood Watch",
            (FeatureKey::MartaStops, Short) => "Transit",
            (FeatureKey::MartaStops, Narrative) => "Public Transportation",
            (FeatureKey::MartaStops, Lifestyle) => "Urban Mobility",
        }
    }

    /// Accessibility column carrying this feature in `/data/pois` records
    pub const fn backend_column(self) -> &'static str {
        match self {
            FeatureKey::Restaurants => "restaurant_accessibility",
            FeatureKey::Parks => "park_accessibility",
            FeatureKey::Grocery => "grocery_store_accessibility",
            FeatureKey::Hospitals => "hospital_accessibility",
            FeatureKey::PoliceStations => "police_station_accessibility",
            FeatureKey::MartaStops => "marta_stop_accessibility",
            FeatureKey::Schools => "school_accessibility",
            FeatureKey::Crime => "crime_incident_accessibility",
        }
    }

    /// Key used for this feature in the upstream `user_weights` map
    pub const fn backend_key(self) -> &'static str {
        match self {
            FeatureKey::Restaurants => "restaurant",
            FeatureKey::Parks => "park",
            FeatureKey::Grocery => "grocery_store",
            FeatureKey::Hospitals => "hospital",
            FeatureKey::PoliceStations => "police_station",
            FeatureKey::MartaStops => "marta_stop",
            FeatureKey::Schools => "school",
            FeatureKey::Crime => "crime_incident",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FeatureKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        FeatureKey::ALL
            .into_iter()
            .find(|f| f.wire_name() == trimmed)
            .ok_or_else(|| Error::InvalidFeatureKey(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, feature) in FeatureKey::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_parse_wire_names() {
        assert_eq!("martaStops".parse::<FeatureKey>().unwrap(), FeatureKey::MartaStops);
        assert_eq!(" crime ".parse::<FeatureKey>().unwrap(), FeatureKey::Crime);
        assert!(matches!(
            "marta_stops".parse::<FeatureKey>(),
            Err(Error::InvalidFeatureKey(_))
        ));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&FeatureKey::PoliceStations).unwrap();
        assert_eq!(json, "\"policeStations\"");
        let parsed: FeatureKey = serde_json::from_str("\"martaStops\"").unwrap();
        assert_eq!(parsed, FeatureKey::MartaStops);
    }

    #[test]
    fn test_backend_vocabularies() {
        assert_eq!(FeatureKey::Crime.backend_column(), "crime_incident_accessibility");
        assert_eq!(FeatureKey::Grocery.backend_column(), "grocery_store_accessibility");
        assert_eq!(FeatureKey::MartaStops.backend_key(), "marta_stop");
        assert_eq!(FeatureKey::PoliceStations.backend_key(), "police_station");
    }

    #[test]
    fn test_labels() {
        assert_eq!(FeatureKey::Crime.label(), "Safety");
        assert_eq!(FeatureKey::MartaStops.label(), "MARTA");
        assert_eq!(
            FeatureKey::Parks.display_name(LabelContext::Narrative),
            "Recreation Areas"
        );
    }
}
