//! Chart definitions: which countries and columns each page plots.
//!
//! Defaults reproduce the published dashboard. A JSON file can override any part of it:
//! ```json
//! {
//!   "average_charts": [
//!     {
//!       "countries": ["India", "Spain"],
//!       "column": "people_fully_vaccinated_per_hundred",
//!       "y_label": "Fully vaccinated (%)",
//!       "title": "Fully vaccinated, India vs Spain"
//!     }
//!   ],
//!   "highlight": ["India", "Spain"]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One monthly-average line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageChart {
    pub countries: Vec<String>,
    pub column: String,
    pub y_label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Charts on `/average_vaccinations`, in page order.
    pub average_charts: Vec<AverageChart>,
    /// Countries shown by default on the weekly chart.
    pub highlight: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            average_charts: vec![
                AverageChart {
                    countries: strings(&["China", "United Kingdom", "United States"]),
                    column: "total_vaccinations".to_string(),
                    y_label: "Average total_vaccinations".to_string(),
                    title: "Average total vaccinations vs. Date for China, United Kingdom, \
                            and United States"
                        .to_string(),
                },
                AverageChart {
                    countries: strings(&["India", "Spain", "United States"]),
                    column: "people_fully_vaccinated_per_hundred".to_string(),
                    y_label: "Average percentage of population fully vaccinated".to_string(),
                    title: "Average percentage of population fully vaccinated vs. Date for \
                            India, Spain, and United States"
                        .to_string(),
                },
            ],
            highlight: strings(&[
                "United States",
                "China",
                "Japan",
                "Germany",
                "United Kingdom",
            ]),
        }
    }
}

impl ChartConfig {
    /// Loads the config from a JSON file at `path`. Missing keys fall back to the defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chart config '{path}'"))?;
        let config: ChartConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid chart config '{path}'"))?;
        info!(
            path,
            average_charts = config.average_charts.len(),
            highlight = config.highlight.len(),
            "Chart config loaded"
        );
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();

        assert_eq!(config.average_charts.len(), 2);
        assert_eq!(config.average_charts[0].column, "total_vaccinations");
        assert_eq!(
            config.average_charts[1].countries,
            vec!["India", "Spain", "United States"]
        );
        assert_eq!(config.highlight.len(), 5);
        assert!(config.highlight.contains(&"Japan".to_string()));
    }

    #[test]
    fn test_load_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "highlight": ["India"] }}"#).unwrap();

        let config = ChartConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.highlight, vec!["India"]);
        assert_eq!(config.average_charts, ChartConfig::default().average_charts);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(ChartConfig::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(ChartConfig::load_or_default(None).unwrap(), ChartConfig::default());
    }
}
