//! HTML pages for each route, and static export of the whole site to disk.
//!
//! Pages embed Plotly figure JSON and load plotly.js from its CDN.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::aggregators::{monthly_average, scatter_data, weekly_downsample};
use crate::charts::{Figure, average_chart, correlation_chart, weekly_chart};
use crate::config::ChartConfig;
use crate::dataset::Dataset;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

/// Page links shown on every page, as `(href, label)`.
const NAV: &[(&str, &str)] = &[
    ("index.html", "Home"),
    ("average_vaccinations.html", "Average vaccinations"),
    ("plot.html", "Daily vaccination rates"),
    ("correlation.html", "Daily vs. total correlation"),
];

/// Whether links point at server routes or at exported `.html` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    Routes,
    Files,
}

impl LinkStyle {
    fn href(self, file: &str) -> String {
        match self {
            LinkStyle::Files => file.to_string(),
            LinkStyle::Routes if file == "index.html" => "/".to_string(),
            LinkStyle::Routes => format!("/{}", file.trim_end_matches(".html")),
        }
    }
}

fn nav(links: LinkStyle) -> String {
    NAV.iter()
        .map(|(file, label)| {
            format!(
                "<a href=\"{}\">{}</a>",
                html_escape::encode_double_quoted_attribute(&links.href(file)),
                html_escape::encode_text(label)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn layout(title: &str, body: &str, links: LinkStyle) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{PLOTLY_CDN}\"></script>\n</head>\n<body>\n\
         <nav>{nav}</nav>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = html_escape::encode_text(title),
        nav = nav(links),
    )
}

/// Renders a figure into a `div` plus the script that draws it.
fn plot_div(id: &str, figure: &Figure) -> Result<String> {
    // "</" inside the JSON would close the script element early.
    let json = figure.to_json()?.replace("</", "<\\/");
    Ok(format!(
        "<div id=\"{id}\" style=\"width:100%;height:600px;\"></div>\n<script>\n\
         (function() {{ var fig = {json}; Plotly.newPlot(\"{id}\", fig.data, fig.layout); }})();\n\
         </script>"
    ))
}

pub fn index_page(links: LinkStyle) -> String {
    let body = "<p>Interactive charts of COVID-19 vaccination progress by country.</p>\n<ul>\n\
         <li>Average vaccinations: monthly averages for selected countries.</li>\n\
         <li>Daily vaccination rates: weekly averages for every country.</li>\n\
         <li>Daily vs. total correlation: every reported day, coloured by country.</li>\n</ul>";
    layout("COVID-19 Vaccination Progress", body, links)
}

/// Both monthly-average charts. Each chart is computed from the table independently.
pub fn average_vaccinations_page(
    dataset: &Dataset,
    config: &ChartConfig,
    links: LinkStyle,
) -> Result<String> {
    let mut body = String::new();
    for (idx, chart) in config.average_charts.iter().enumerate() {
        let series = monthly_average(dataset, &chart.countries, &chart.column)?;
        debug!(
            column = %chart.column,
            series = series.len(),
            "Monthly averages computed"
        );
        body.push_str(&plot_div(&format!("plot_div_{}", idx + 1), &average_chart(&series, chart))?);
        body.push('\n');
    }
    Ok(layout("Average Vaccinations", &body, links))
}

pub fn plot_page(dataset: &Dataset, config: &ChartConfig, links: LinkStyle) -> Result<String> {
    let series = weekly_downsample(dataset, &config.highlight)?;
    debug!(
        series = series.len(),
        visible = series.iter().filter(|s| s.default_visible).count(),
        "Weekly series computed"
    );
    let figure = weekly_chart(&series, dataset.date_range());
    Ok(layout("Daily Vaccination Rates", &plot_div("plot", &figure)?, links))
}

pub fn correlation_page(dataset: &Dataset, links: LinkStyle) -> Result<String> {
    let points = scatter_data(dataset);
    let figure = correlation_chart(&points);
    Ok(layout(
        "Daily vs. Total Vaccinations",
        &plot_div("correlation", &figure)?,
        links,
    ))
}

/// Writes every page as a standalone `.html` file under `dir`, returning the written paths.
#[tracing::instrument(skip(dataset, config), fields(dir = %dir.display()))]
pub fn export_site(dataset: &Dataset, config: &ChartConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let links = LinkStyle::Files;
    let pages = [
        ("index.html", index_page(links)),
        (
            "average_vaccinations.html",
            average_vaccinations_page(dataset, config, links)?,
        ),
        ("plot.html", plot_page(dataset, config, links)?),
        ("correlation.html", correlation_page(dataset, links)?),
    ];

    let mut written = Vec::with_capacity(pages.len());
    for (name, html) in pages {
        let path = dir.join(name);
        fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Page written");
        written.push(path);
    }

    info!(pages = written.len(), "Site exported");
    Ok(written)
}
