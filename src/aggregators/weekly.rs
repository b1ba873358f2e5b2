use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::aggregators::error::AggregationError;
use crate::aggregators::periods::{next_week, week_end};
use crate::aggregators::types::{CountrySeries, SeriesPoint};
use crate::aggregators::utility::mean;
use crate::dataset::Dataset;

/// Resamples `daily_vaccinations` into Sunday-ending weeks for every country in the table.
///
/// Each series covers every week from the country's first record to its last; weeks with no
/// non-null reading keep a `None` value rather than being interpolated or dropped.
/// `default_visible` is set for countries in `highlight` and does not affect what is computed.
pub fn weekly_downsample<S: AsRef<str>>(
    dataset: &Dataset,
    highlight: &[S],
) -> Result<Vec<CountrySeries>, AggregationError> {
    let highlight: HashSet<&str> = highlight.iter().map(AsRef::as_ref).collect();

    let mut groups: BTreeMap<&str, BTreeMap<NaiveDate, Vec<f64>>> = BTreeMap::new();

    for record in dataset.records() {
        let bucket = groups
            .entry(record.country.as_str())
            .or_default()
            .entry(week_end(record.date)?)
            .or_default();

        if let Some(value) = record.daily_vaccinations.filter(|v| !v.is_nan()) {
            bucket.push(value);
        }
    }

    let mut series = Vec::with_capacity(groups.len());

    for (country, weeks) in groups {
        let (Some(&first), Some(&last)) = (weeks.keys().next(), weeks.keys().next_back()) else {
            continue;
        };

        let mut points = Vec::new();
        let mut period = first;
        loop {
            points.push(SeriesPoint {
                period,
                value: weeks.get(&period).and_then(|values| mean(values)),
            });
            if period >= last {
                break;
            }
            period = next_week(period)?;
        }

        series.push(CountrySeries {
            country: country.to_string(),
            points,
            default_visible: highlight.contains(country),
        });
    }

    Ok(series)
}
