//! User profile and the `/data/pois` request built from it

use crate::priority::PriorityList;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kilometres per mile
pub const KM_PER_MILE: f64 = 1.60934;

/// Search radius when the profile sets none
pub const DEFAULT_RADIUS_KM: f64 = 12.0;

/// Downtown Atlanta `[lat, lng]`
pub const DEFAULT_CENTER: [f64; 2] = [33.749, -84.388];

fn default_budget() -> f64 {
    1000.0
}

fn default_has_car() -> bool {
    true
}

/// Anchor location chosen during onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Onboarding answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default = "default_budget")]
    pub budget: f64,

    #[serde(default)]
    pub unit_type: String,

    /// `false` means the user walks / takes transit
    #[serde(default = "default_has_car", alias = "transportation")]
    pub has_car: bool,

    #[serde(default)]
    pub location: Option<Location>,

    /// Search radius in miles
    #[serde(default)]
    pub radius: Option<f64>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            unit_type: String::new(),
            has_car: default_has_car(),
            location: None,
            radius: None,
        }
    }
}

/// Body of `POST /data/pois`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiRequest {
    pub radius_km: f64,
    pub center: [f64; 2],
    /// Backend feature key -> positional weight
    pub user_weights: BTreeMap<String, u32>,
    pub budget: f64,
    pub has_car: bool,
}

impl PoiRequest {
    pub fn from_profile(profile: &UserProfile, priorities: &PriorityList) -> Self {
        let user_weights = priorities
            .weighted()
            .map(|(feature, weight)| (feature.backend_key().to_string(), weight))
            .collect();

        Self {
            radius_km: profile.radius.map_or(DEFAULT_RADIUS_KM, |miles| miles * KM_PER_MILE),
            center: profile
                .location
                .as_ref()
                .map_or(DEFAULT_CENTER, |loc| [loc.lat, loc.lng]),
            user_weights,
            budget: profile.budget,
            has_car: profile.has_car,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = PoiRequest::from_profile(&UserProfile::default(), &PriorityList::default());
        assert_eq!(request.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(request.center, DEFAULT_CENTER);
        assert_eq!(request.budget, 1000.0);
        assert!(request.has_car);

        // default order puts policeStations first and crime last
        assert_eq!(request.user_weights["police_station"], 8);
        assert_eq!(request.user_weights["crime_incident"], 1);
        assert_eq!(request.user_weights.values().sum::<u32>(), 36);
    }

    #[test]
    fn test_request_from_profile() {
        let profile = UserProfile {
            budget: 2200.0,
            unit_type: "apartment".to_string(),
            has_car: false,
            location: Some(Location {
                lat: 33.78,
                lng: -84.38,
                address: None,
            }),
            radius: Some(5.0),
        };
        let request = PoiRequest::from_profile(&profile, &PriorityList::default());
        assert!((request.radius_km - 8.0467).abs() < 1e-9);
        assert_eq!(request.center, [33.78, -84.38]);
        assert!(!request.has_car);
    }

    #[test]
    fn test_profile_json_defaults_and_alias() {
        let profile: UserProfile = serde_json::from_str(r#"{"transportation": false}"#).unwrap();
        assert_eq!(profile.budget, 1000.0);
        assert!(!profile.has_car);
        assert!(profile.radius.is_none());

        let value = serde_json::to_value(&UserProfile::default()).unwrap();
        assert_eq!(value["hasCar"], true);
    }

    #[test]
    fn test_request_wire_shape() {
        let request = PoiRequest::from_profile(&UserProfile::default(), &PriorityList::default());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["center"], serde_json::json!([33.749, -84.388]));
        assert_eq!(value["user_weights"]["marta_stop"], 2);
        assert_eq!(value["has_car"], true);
    }
}
