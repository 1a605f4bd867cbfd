//! CSV export of a ranked analysis
//!
//! Layout: header row, one row per entity (descending fit score), an empty
//! row, then one row per priority in ranked order.

use crate::entity::{sort_by_fit, Entity};
use crate::feature::FeatureKey;
use crate::priority::PriorityList;
use crate::selection::Bookmarks;

/// Title row preceding the priority listing
pub const PRIORITY_SECTION_TITLE: &str = "Your Priority Rankings (Higher = More Important):";

/// Header line for entity rows
pub fn csv_header() -> String {
    let mut columns = vec!["Rank", "Street Name", "Neighborhood", "Fit Score"];
    columns.extend(FeatureKey::ALL.iter().map(|f| f.label()));
    columns.push("Bookmarked");
    columns.join(",")
}

/// Quote a field when it holds a delimiter, quote or line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn entity_row(rank: usize, entity: &Entity, bookmarks: &Bookmarks) -> String {
    let name = entity.display_name();
    let mut fields = vec![
        rank.to_string(),
        escape(&name),
        escape(&name),
        format!("{:.2}", entity.fit_score.value().unwrap_or(0.0)),
    ];
    fields.extend(entity.scores.iter().map(|(_, score)| score.to_string()));
    fields.push(if bookmarks.contains(&entity.id) { "Yes" } else { "No" }.to_string());
    fields.join(",")
}

/// Serialize `entities` ranked under `priorities`
///
/// Unscored entities are scored first; entities carrying a score keep it.
pub fn export_csv(entities: &[Entity], priorities: &PriorityList, bookmarks: &Bookmarks) -> String {
    let mut ranked: Vec<Entity> = entities
        .iter()
        .map(|e| if e.fit_score.is_scored() { e.clone() } else { e.scored(priorities) })
        .collect();
    sort_by_fit(&mut ranked);

    let mut lines = Vec::with_capacity(ranked.len() + priorities.len() + 3);
    lines.push(csv_header());
    lines.extend(
        ranked
            .iter()
            .enumerate()
            .map(|(index, entity)| entity_row(index + 1, entity, bookmarks)),
    );
    lines.push(String::new());
    lines.push(PRIORITY_SECTION_TITLE.to_string());
    lines.extend(
        priorities
            .iter()
            .enumerate()
            .map(|(index, feature)| format!("{},Priority {}", feature.label(), index + 1)),
    );

    tracing::debug!(rows = ranked.len(), "Built CSV export");
    lines.join("\n")
}

/// Default download name, e.g. `whyhere-atlanta-analysis-1700000000000.csv`
pub fn default_filename(unix_millis: i64) -> String {
    format!("whyhere-atlanta-analysis-{}.csv", unix_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::atlanta_streets;

    fn canonical() -> PriorityList {
        PriorityList::new(FeatureKey::ALL.to_vec()).unwrap()
    }

    #[test]
    fn test_header() {
        assert_eq!(
            csv_header(),
            "Rank,Street Name,Neighborhood,Fit Score,Safety,Schools,MARTA,Restaurants,Parks,Grocery,Hospitals,Police,Bookmarked"
        );
    }

    #[test]
    fn test_rows_sorted_with_priority_footer() {
        let streets = atlanta_streets();
        let bookmarks: Bookmarks = ["1"].into_iter().collect();
        let csv = export_csv(&streets, &canonical(), &bookmarks);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 1 + streets.len() + 2 + FeatureKey::COUNT);
        assert_eq!(lines[streets.len() + 1], "");
        assert_eq!(lines[streets.len() + 2], PRIORITY_SECTION_TITLE);
        assert_eq!(lines[streets.len() + 3], "Safety,Priority 1");
        assert_eq!(lines.last().copied(), Some("Police,Priority 8"));

        let fits: Vec<f64> = lines[1..=streets.len()]
            .iter()
            .map(|line| line.split(',').nth(3).unwrap().parse().unwrap())
            .collect();
        assert!(fits.windows(2).all(|pair| pair[0] >= pair[1]));

        let peachtree = lines
            .iter()
            .find(|line| line.contains("Midtown") && line.ends_with("Yes"))
            .unwrap();
        assert!(peachtree.contains(",8.43,75,72,100,95,80,92,85,88,"));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut street = atlanta_streets().remove(0);
        street.neighborhood = "Inman \"Park\"".to_string();
        let csv = export_csv(&[street], &canonical(), &Bookmarks::new());
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("1,\"Inman \"\"Park\"\"\",\"Inman \"\"Park\"\"\","));
        assert!(row.ends_with(",No"));
    }

    #[test]
    fn test_default_filename() {
        assert_eq!(
            default_filename(1_700_000_000_000),
            "whyhere-atlanta-analysis-1700000000000.csv"
        );
    }
}
