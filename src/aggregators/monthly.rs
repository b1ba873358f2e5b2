use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::aggregators::error::AggregationError;
use crate::aggregators::periods::month_end;
use crate::aggregators::types::{CountrySeries, SeriesPoint};
use crate::aggregators::utility::mean;
use crate::dataset::{Dataset, Metric};

/// Averages `column` per calendar month for each of `countries`.
///
/// Null and zero readings are treated as "not yet reporting" and dropped before bucketing,
/// so a month made only of such readings produces no point. Countries without any usable
/// reading produce no series. Output is ordered by country name, then month.
///
/// # Errors
///
/// Fails when `column` does not name a numeric column of the table.
pub fn monthly_average<S: AsRef<str>>(
    dataset: &Dataset,
    countries: &[S],
    column: &str,
) -> Result<Vec<CountrySeries>, AggregationError> {
    let metric: Metric = column.parse()?;
    let wanted: HashSet<&str> = countries.iter().map(AsRef::as_ref).collect();

    let mut buckets: BTreeMap<&str, BTreeMap<NaiveDate, Vec<f64>>> = BTreeMap::new();

    for record in dataset.records() {
        if !wanted.contains(record.country.as_str()) {
            continue;
        }

        let Some(value) = metric.value(record) else {
            continue;
        };
        if value == 0.0 || value.is_nan() {
            continue;
        }

        buckets
            .entry(record.country.as_str())
            .or_default()
            .entry(month_end(record.date)?)
            .or_default()
            .push(value);
    }

    let series = buckets
        .into_iter()
        .map(|(country, months)| CountrySeries {
            country: country.to_string(),
            points: months
                .into_iter()
                .filter_map(|(period, values)| {
                    mean(&values).map(|avg| SeriesPoint {
                        period,
                        value: Some(avg),
                    })
                })
                .collect(),
            default_visible: true,
        })
        .collect();

    Ok(series)
}
