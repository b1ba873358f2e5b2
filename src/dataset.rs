//! The vaccination table, decoded from CSV once and shared read-only afterwards.
//!
//! Rows are deserialized with serde straight into [`VaccinationRecord`]. Empty numeric
//! cells become `None`; a bad date or number fails the whole load.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::aggregators::error::AggregationError;

/// Columns every source file must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "country",
    "date",
    "daily_vaccinations",
    "total_vaccinations",
    "people_fully_vaccinated_per_hundred",
    "total_vaccinations_per_hundred",
];

/// Non-numeric columns that may appear in the source file.
const TEXT_COLUMNS: &[&str] = &["country", "date", "iso_code", "vaccines"];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One row of the source file: a single country on a single day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VaccinationRecord {
    pub country: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub total_vaccinations: Option<f64>,
    #[serde(default)]
    pub people_vaccinated: Option<f64>,
    #[serde(default)]
    pub people_fully_vaccinated: Option<f64>,
    #[serde(default)]
    pub daily_vaccinations_raw: Option<f64>,
    #[serde(default)]
    pub daily_vaccinations: Option<f64>,
    #[serde(default)]
    pub total_vaccinations_per_hundred: Option<f64>,
    #[serde(default)]
    pub people_vaccinated_per_hundred: Option<f64>,
    #[serde(default)]
    pub people_fully_vaccinated_per_hundred: Option<f64>,
    #[serde(default)]
    pub daily_vaccinations_per_million: Option<f64>,
    #[serde(default)]
    pub vaccines: Option<String>,
}

impl VaccinationRecord {
    /// A record with only the identifying fields set. Mostly useful for building tables by hand.
    pub fn new(country: &str, date: NaiveDate) -> Self {
        VaccinationRecord {
            country: country.to_string(),
            date,
            iso_code: None,
            total_vaccinations: None,
            people_vaccinated: None,
            people_fully_vaccinated: None,
            daily_vaccinations_raw: None,
            daily_vaccinations: None,
            total_vaccinations_per_hundred: None,
            people_vaccinated_per_hundred: None,
            people_fully_vaccinated_per_hundred: None,
            daily_vaccinations_per_million: None,
            vaccines: None,
        }
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component (`YYYY-MM-DD HH:MM:SS`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10)?;
    if raw.len() > 10 && !matches!(raw.as_bytes()[10], b' ' | b'T') {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("unparseable date '{raw}'")))
}

/// A numeric column that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalVaccinations,
    PeopleVaccinated,
    PeopleFullyVaccinated,
    DailyVaccinationsRaw,
    DailyVaccinations,
    TotalVaccinationsPerHundred,
    PeopleVaccinatedPerHundred,
    PeopleFullyVaccinatedPerHundred,
    DailyVaccinationsPerMillion,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::TotalVaccinations,
        Metric::PeopleVaccinated,
        Metric::PeopleFullyVaccinated,
        Metric::DailyVaccinationsRaw,
        Metric::DailyVaccinations,
        Metric::TotalVaccinationsPerHundred,
        Metric::PeopleVaccinatedPerHundred,
        Metric::PeopleFullyVaccinatedPerHundred,
        Metric::DailyVaccinationsPerMillion,
    ];

    /// The CSV header naming this column.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalVaccinations => "total_vaccinations",
            Metric::PeopleVaccinated => "people_vaccinated",
            Metric::PeopleFullyVaccinated => "people_fully_vaccinated",
            Metric::DailyVaccinationsRaw => "daily_vaccinations_raw",
            Metric::DailyVaccinations => "daily_vaccinations",
            Metric::TotalVaccinationsPerHundred => "total_vaccinations_per_hundred",
            Metric::PeopleVaccinatedPerHundred => "people_vaccinated_per_hundred",
            Metric::PeopleFullyVaccinatedPerHundred => "people_fully_vaccinated_per_hundred",
            Metric::DailyVaccinationsPerMillion => "daily_vaccinations_per_million",
        }
    }

    pub fn value(self, record: &VaccinationRecord) -> Option<f64> {
        match self {
            Metric::TotalVaccinations => record.total_vaccinations,
            Metric::PeopleVaccinated => record.people_vaccinated,
            Metric::PeopleFullyVaccinated => record.people_fully_vaccinated,
            Metric::DailyVaccinationsRaw => record.daily_vaccinations_raw,
            Metric::DailyVaccinations => record.daily_vaccinations,
            Metric::TotalVaccinationsPerHundred => record.total_vaccinations_per_hundred,
            Metric::PeopleVaccinatedPerHundred => record.people_vaccinated_per_hundred,
            Metric::PeopleFullyVaccinatedPerHundred => record.people_fully_vaccinated_per_hundred,
            Metric::DailyVaccinationsPerMillion => record.daily_vaccinations_per_million,
        }
    }
}

impl FromStr for Metric {
    type Err = AggregationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(metric) = Metric::ALL.into_iter().find(|m| m.column() == name) {
            return Ok(metric);
        }
        if TEXT_COLUMNS.contains(&name) {
            Err(AggregationError::NonNumericColumn(name.to_string()))
        } else {
            Err(AggregationError::UnknownColumn(name.to_string()))
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// The full vaccination table. Never mutated after construction.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    records: Vec<VaccinationRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<VaccinationRecord>) -> Self {
        Dataset { records }
    }

    /// Decodes a CSV payload, transparently gunzipping it first when it carries the gzip magic.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(&GZIP_MAGIC) {
            debug!(compressed_bytes = bytes.len(), "Decompressing gzip dataset");
            Self::from_reader(GzDecoder::new(bytes))
        } else {
            Self::from_reader(bytes)
        }
    }

    /// Decodes CSV rows from `reader`.
    ///
    /// # Errors
    ///
    /// Fails when a required column is missing or any row holds an unparseable date or number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers().context("failed to read CSV header")?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            bail!("dataset is missing required columns: {}", missing.join(", "));
        }

        let mut records = Vec::new();
        for (idx, result) in rdr.deserialize().enumerate() {
            let record: VaccinationRecord =
                result.with_context(|| format!("malformed record at data line {}", idx + 1))?;
            records.push(record);
        }

        let dataset = Dataset { records };
        info!(
            rows = dataset.len(),
            countries = dataset.countries().len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[VaccinationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest dates in the table, or `None` when it is empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
