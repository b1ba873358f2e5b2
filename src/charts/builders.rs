use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::json;

use crate::aggregators::{CorrelationPoint, CountrySeries};
use crate::charts::figure::{
    AxisLayout, AxisValues, Button, Figure, Layout, Title, Trace, UpdateMenu, Visibility,
};
use crate::config::AverageChart;

pub const WEEKLY_TITLE: &str = "Daily Vaccination Rates";
pub const CORRELATION_TITLE: &str = "Correlation between Daily Vaccinations and Total Vaccinations";

const TICK_ANGLE: i32 = 45;

fn date_axis(range: Option<[NaiveDate; 2]>) -> AxisLayout {
    AxisLayout {
        title: "Date".into(),
        tickangle: Some(TICK_ANGLE),
        range,
    }
}

fn series_trace(series: &CountrySeries, mode: &'static str) -> Trace {
    let mut trace = Trace::scatter(
        &series.country,
        mode,
        AxisValues::Dates(series.points.iter().map(|p| p.period).collect()),
        AxisValues::Numbers(series.points.iter().map(|p| p.value).collect()),
    );
    trace.visible = series.default_visible.into();
    trace
}

/// One line per country for a monthly-average chart.
pub fn average_chart(series: &[CountrySeries], chart: &AverageChart) -> Figure {
    Figure {
        data: series.iter().map(|s| series_trace(s, "lines")).collect(),
        layout: Layout {
            title: chart.title.as_str().into(),
            xaxis: date_axis(None),
            yaxis: AxisLayout::titled(&chart.y_label),
            showlegend: true,
            updatemenus: Vec::new(),
        },
    }
}

/// Weekly daily-vaccination lines with "Select All" and "Reset" buttons.
///
/// "Reset" restores each trace to its series' `default_visible` flag.
pub fn weekly_chart(series: &[CountrySeries], date_range: Option<(NaiveDate, NaiveDate)>) -> Figure {
    let all_visible: Vec<_> = series.iter().map(|_| Visibility::Visible.to_value()).collect();
    let defaults: Vec<_> = series
        .iter()
        .map(|s| Visibility::from(s.default_visible).to_value())
        .collect();

    let buttons = vec![
        Button {
            label: "Select All".to_string(),
            method: "update",
            args: vec![json!({ "visible": all_visible }), json!({ "showlegend": true })],
        },
        Button {
            label: "Reset".to_string(),
            method: "update",
            args: vec![json!({ "visible": defaults }), json!({ "showlegend": true })],
        },
    ];

    Figure {
        data: series.iter().map(|s| series_trace(s, "lines+markers")).collect(),
        layout: Layout {
            title: WEEKLY_TITLE.into(),
            xaxis: date_axis(date_range.map(|(first, last)| [first, last])),
            yaxis: AxisLayout::titled("Daily Vaccinations"),
            showlegend: true,
            updatemenus: vec![UpdateMenu {
                kind: "buttons",
                direction: None,
                showactive: None,
                buttons,
                x: 0.99,
                y: 1.15,
                xanchor: None,
                yanchor: None,
            }],
        },
    }
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Daily vs. total vaccinations, one marker trace per country in order of first appearance.
pub fn correlation_chart(points: &[CorrelationPoint]) -> Figure {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&CorrelationPoint>> = BTreeMap::new();
    for point in points {
        let members = groups.entry(point.country.as_str()).or_default();
        if members.is_empty() {
            order.push(&point.country);
        }
        members.push(point);
    }

    let data = order
        .into_iter()
        .map(|country| {
            let members = groups.remove(country).unwrap_or_default();

            let mut trace = Trace::scatter(
                country,
                "markers",
                AxisValues::Numbers(members.iter().map(|p| p.daily_vaccinations).collect()),
                AxisValues::Numbers(members.iter().map(|p| p.total_vaccinations).collect()),
            );
            trace.text = Some(
                members
                    .iter()
                    .map(|p| {
                        format!(
                            "date={}<br>country={}<br>total_vaccinations_per_hundred={}",
                            p.date,
                            p.country,
                            fmt_optional(p.total_vaccinations_per_hundred)
                        )
                    })
                    .collect(),
            );
            trace.hovertemplate = Some(
                "daily_vaccinations=%{x}<br>total_vaccinations=%{y}<br>%{text}<extra></extra>"
                    .to_string(),
            );
            trace
        })
        .collect();

    let buttons = vec![
        Button {
            label: "Select All".to_string(),
            method: "restyle",
            args: vec![json!({ "visible": true })],
        },
        Button {
            label: "Clear Selection".to_string(),
            method: "restyle",
            args: vec![json!({ "visible": "legendonly" })],
        },
    ];

    Figure {
        data,
        layout: Layout {
            title: Title::from(CORRELATION_TITLE),
            xaxis: AxisLayout::titled("daily_vaccinations"),
            yaxis: AxisLayout::titled("total_vaccinations"),
            showlegend: true,
            updatemenus: vec![UpdateMenu {
                kind: "dropdown",
                direction: Some("down"),
                showactive: Some(true),
                buttons,
                x: 0.99,
                y: 1.15,
                xanchor: Some("right"),
                yanchor: Some("top"),
            }],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::SeriesPoint;
    use serde_json::Value;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(country: &str, visible: bool) -> CountrySeries {
        CountrySeries {
            country: country.to_string(),
            points: vec![
                SeriesPoint {
                    period: ymd(2021, 1, 10),
                    value: Some(1.0),
                },
                SeriesPoint {
                    period: ymd(2021, 1, 17),
                    value: None,
                },
            ],
            default_visible: visible,
        }
    }

    #[test]
    fn test_weekly_chart_visibility_and_reset() {
        let figure = weekly_chart(
            &[series("Aland", true), series("Bland", false)],
            Some((ymd(2021, 1, 4), ymd(2021, 1, 20))),
        );

        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].visible, Visibility::Visible);
        assert_eq!(figure.data[1].visible, Visibility::LegendOnly);
        assert_eq!(figure.data[1].mode, "lines+markers");

        let json: Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();
        let buttons = &json["layout"]["updatemenus"][0]["buttons"];
        assert_eq!(buttons[0]["label"], "Select All");
        assert_eq!(buttons[0]["args"][0]["visible"], serde_json::json!([true, true]));
        assert_eq!(buttons[1]["label"], "Reset");
        assert_eq!(
            buttons[1]["args"][0]["visible"],
            serde_json::json!([true, "legendonly"])
        );
        assert_eq!(
            json["layout"]["xaxis"]["range"],
            serde_json::json!(["2021-01-04", "2021-01-20"])
        );
    }

    #[test]
    fn test_average_chart_uses_config_labels() {
        let chart = AverageChart {
            countries: vec!["Aland".to_string()],
            column: "total_vaccinations".to_string(),
            y_label: "Average total".to_string(),
            title: "Totals".to_string(),
        };

        let figure = average_chart(&[series("Aland", true)], &chart);

        assert_eq!(figure.layout.title.text, "Totals");
        assert_eq!(figure.layout.yaxis.title.text, "Average total");
        assert_eq!(figure.layout.xaxis.tickangle, Some(45));
        assert_eq!(figure.data[0].x.len(), 2);
        assert!(figure.layout.updatemenus.is_empty());
    }

    #[test]
    fn test_correlation_chart_groups_by_country() {
        let point = |country: &str, daily: f64| CorrelationPoint {
            country: country.to_string(),
            daily_vaccinations: Some(daily),
            total_vaccinations: None,
            date: ymd(2021, 1, 1),
            total_vaccinations_per_hundred: Some(0.5),
        };
        let points = vec![point("Bland", 1.0), point("Aland", 2.0), point("Bland", 3.0)];

        let figure = correlation_chart(&points);

        let names: Vec<&str> = figure.data.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Bland", "Aland"]);
        assert_eq!(figure.data[0].x, AxisValues::Numbers(vec![Some(1.0), Some(3.0)]));
        let text = figure.data[1].text.as_ref().unwrap();
        assert_eq!(
            text[0],
            "date=2021-01-01<br>country=Aland<br>total_vaccinations_per_hundred=0.5"
        );
        let labels: Vec<&str> = figure.layout.updatemenus[0]
            .buttons
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Select All", "Clear Selection"]);
    }

    #[test]
    fn test_correlation_hover_marks_missing_per_hundred() {
        let points = vec![CorrelationPoint {
            country: "Aland".to_string(),
            daily_vaccinations: None,
            total_vaccinations: Some(10.0),
            date: ymd(2021, 1, 2),
            total_vaccinations_per_hundred: None,
        }];

        let figure = correlation_chart(&points);

        assert_eq!(
            figure.data[0].text.as_ref().unwrap()[0],
            "date=2021-01-02<br>country=Aland<br>total_vaccinations_per_hundred=n/a"
        );
        assert_eq!(figure.data[0].x, AxisValues::Numbers(vec![None]));
    }

    #[test]
    fn test_empty_inputs_produce_valid_figures() {
        assert!(correlation_chart(&[]).data.is_empty());
        assert!(weekly_chart(&[], None).to_json().is_ok());
    }
}
