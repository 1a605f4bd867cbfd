//! Built-in Atlanta street data
//!
//! Used as the "mock" data source when no backend is configured, and as
//! known-good input in tests. Scores are listed in canonical feature order:
//! crime, schools, martaStops, restaurants, parks, grocery, hospitals,
//! policeStations.

use crate::cluster::Cluster;
use crate::entity::{Entity, FitScore};
use crate::feature::FeatureKey;
use crate::scores::FeatureScores;

fn street(
    id: &str,
    name: &str,
    neighborhood: &str,
    lat: f64,
    lng: f64,
    scores: [u8; FeatureKey::COUNT],
    cluster: Cluster,
) -> Entity {
    let mut feature_scores = FeatureScores::default();
    for (feature, score) in FeatureKey::ALL.into_iter().zip(scores) {
        feature_scores.set_clamped(feature, score);
    }
    Entity {
        id: id.to_string(),
        name: name.to_string(),
        neighborhood: neighborhood.to_string(),
        lat,
        lng,
        scores: feature_scores,
        cluster,
        fit_score: FitScore::Unscored,
        raw_match_score: None,
    }
}

/// The twenty Atlanta streets shipped with the app (unscored)
pub fn atlanta_streets() -> Vec<Entity> {
    vec![
        street("1", "Peachtree Street NW", "Midtown", 33.7847, -84.3830, [75, 72, 100, 95, 80, 92, 85, 88], Cluster::Excellent),
        street("2", "Ponce de Leon Avenue", "Poncey-Highland", 33.7734, -84.3495, [70, 68, 95, 85, 74, 82, 75, 72], Cluster::VeryGood),
        street("3", "Virginia Avenue", "Virginia-Highland", 33.7881, -84.3515, [82, 85, 65, 88, 92, 85, 68, 75], Cluster::VeryGood),
        street("4", "Piedmont Avenue NE", "Midtown", 33.7826, -84.3765, [78, 75, 92, 92, 98, 88, 95, 85], Cluster::Excellent),
        street("5", "Edgewood Avenue SE", "Old Fourth Ward", 33.7626, -84.3663, [62, 65, 82, 75, 70, 72, 72, 65], Cluster::Good),
        street("6", "North Highland Avenue", "Virginia-Highland", 33.7845, -84.3485, [80, 78, 72, 85, 85, 90, 70, 75], Cluster::VeryGood),
        street("7", "Memorial Drive", "Grant Park", 33.7403, -84.3661, [60, 72, 70, 65, 88, 68, 65, 62], Cluster::Good),
        street("8", "Roswell Road", "Buckhead", 33.8490, -84.3671, [92, 95, 55, 92, 75, 95, 88, 95], Cluster::VeryGood),
        street("9", "Decatur Street", "Decatur", 33.7748, -84.2963, [85, 92, 75, 82, 82, 85, 78, 82], Cluster::VeryGood),
        street("10", "West Peachtree Street", "Midtown", 33.7810, -84.3860, [75, 72, 100, 95, 75, 85, 85, 82], Cluster::Excellent),
        street("11", "Flat Shoals Avenue", "East Atlanta", 33.7283, -84.3416, [52, 62, 62, 60, 65, 62, 55, 55], Cluster::Fair),
        street("12", "Lee Street SW", "West End", 33.7358, -84.4149, [50, 62, 72, 55, 72, 62, 60, 52], Cluster::Fair),
        street("13", "Buford Highway", "Brookhaven", 33.8593, -84.3370, [75, 82, 62, 98, 65, 92, 75, 75], Cluster::VeryGood),
        street("14", "Candler Road", "Candler Park", 33.7643, -84.3397, [65, 75, 72, 65, 82, 72, 62, 65], Cluster::Good),
        street("15", "Peachtree Road NE", "Buckhead", 33.8455, -84.3625, [95, 95, 62, 92, 72, 95, 88, 95], Cluster::Excellent),
        street("16", "Moreland Avenue", "Little Five Points", 33.7621, -84.3476, [62, 65, 82, 75, 72, 72, 62, 62], Cluster::Good),
        street("17", "North Avenue NE", "Midtown", 33.7719, -84.3839, [72, 72, 92, 85, 75, 82, 92, 82], Cluster::VeryGood),
        street("18", "DeKalb Avenue", "Inman Park", 33.7578, -84.3524, [72, 75, 82, 72, 82, 75, 72, 72], Cluster::Good),
        street("19", "Juniper Street", "Midtown", 33.7798, -84.3845, [75, 72, 95, 95, 82, 85, 85, 82], Cluster::Excellent),
        street("20", "Boulevard NE", "Old Fourth Ward", 33.7595, -84.3698, [62, 65, 82, 65, 82, 72, 72, 62], Cluster::Good),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::PriorityList;
    use std::collections::HashSet;

    #[test]
    fn test_twenty_unique_streets() {
        let streets = atlanta_streets();
        assert_eq!(streets.len(), 20);
        let ids: HashSet<&str> = streets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
        assert!(streets.iter().all(|s| !s.fit_score.is_scored()));
    }

    #[test]
    fn test_peachtree_fixture() {
        let streets = atlanta_streets();
        let peachtree = &streets[0];
        assert_eq!(peachtree.name, "Peachtree Street NW");
        assert_eq!(peachtree.scores.get(FeatureKey::MartaStops), 100);
        assert_eq!(peachtree.scores.get(FeatureKey::Crime), 75);
        assert_eq!(peachtree.scores.get(FeatureKey::PoliceStations), 88);

        let canonical = PriorityList::new(FeatureKey::ALL.to_vec()).unwrap();
        let scored = peachtree.scored(&canonical);
        let fit = scored.fit_score.value().unwrap();
        assert!((fit - 8.425).abs() < 1e-9);
        assert_eq!(scored.cluster, Cluster::VeryGood);
    }
}
