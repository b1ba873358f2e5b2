use std::collections::BTreeSet;

use crate::aggregators::types::CorrelationPoint;
use crate::dataset::Dataset;

/// Every record of the table as a scatter point, stably sorted by date.
///
/// Nothing is filtered: rows with null readings pass through so the point count always
/// matches the table.
pub fn scatter_data(dataset: &Dataset) -> Vec<CorrelationPoint> {
    let mut points: Vec<CorrelationPoint> =
        dataset.records().iter().map(CorrelationPoint::from).collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Keeps the points whose country is in `selected`, preserving their order.
pub fn select(points: &[CorrelationPoint], selected: &BTreeSet<String>) -> Vec<CorrelationPoint> {
    points
        .iter()
        .filter(|p| selected.contains(&p.country))
        .cloned()
        .collect()
}

/// Scatter points for the countries a viewer has selected.
pub fn scatter_selection(dataset: &Dataset, selected: &BTreeSet<String>) -> Vec<CorrelationPoint> {
    select(&scatter_data(dataset), selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::VaccinationRecord;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            VaccinationRecord {
                daily_vaccinations: Some(3.0),
                ..VaccinationRecord::new("Bland", ymd(2021, 1, 3))
            },
            VaccinationRecord {
                total_vaccinations: Some(10.0),
                ..VaccinationRecord::new("Aland", ymd(2021, 1, 1))
            },
            VaccinationRecord::new("Cland", ymd(2021, 1, 3)),
            VaccinationRecord::new("Aland", ymd(2021, 1, 2)),
        ])
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_by_date_without_filtering() {
        let dataset = sample();
        let points = scatter_data(&dataset);

        assert_eq!(points.len(), dataset.len());
        assert!(points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let points = scatter_data(&sample());

        let order: Vec<&str> = points.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(order, vec!["Aland", "Aland", "Bland", "Cland"]);
        assert_eq!(points[0].total_vaccinations, Some(10.0));
        assert_eq!(points[2].daily_vaccinations, Some(3.0));
    }

    #[test]
    fn test_selection_is_idempotent() {
        let points = scatter_data(&sample());
        let selected = set(&["Aland", "Cland"]);

        let once = select(&points, &selected);
        let twice = select(&once, &selected);

        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
        assert_eq!(scatter_selection(&sample(), &selected), once);
    }

    #[test]
    fn test_empty_selection_is_empty() {
        assert!(scatter_selection(&sample(), &BTreeSet::new()).is_empty());
    }
}
