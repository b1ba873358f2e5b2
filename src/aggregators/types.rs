//! Data types produced by the aggregators and consumed by the chart builders.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::VaccinationRecord;

/// One bucket of a series: the period label (bucket end date) and its mean.
///
/// `value` is `None` for a bucket that held no usable values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: NaiveDate,
    pub value: Option<f64>,
}

/// A per-country series, periods in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    pub country: String,
    pub points: Vec<SeriesPoint>,
    /// Rendering hint: whether the chart shows this series before any user interaction.
    pub default_visible: bool,
}

impl CountrySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One scatter point of the daily-vs-total correlation chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPoint {
    pub country: String,
    pub daily_vaccinations: Option<f64>,
    pub total_vaccinations: Option<f64>,
    pub date: NaiveDate,
    pub total_vaccinations_per_hundred: Option<f64>,
}

impl From<&VaccinationRecord> for CorrelationPoint {
    fn from(record: &VaccinationRecord) -> Self {
        CorrelationPoint {
            country: record.country.clone(),
            daily_vaccinations: record.daily_vaccinations,
            total_vaccinations: record.total_vaccinations,
            date: record.date,
            total_vaccinations_per_hundred: record.total_vaccinations_per_hundred,
        }
    }
}
