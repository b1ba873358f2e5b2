//! CLI entry point for the vaccination charts service.
//!
//! Serves the chart pages over HTTP, exports them as static HTML, or summarises the
//! loaded dataset.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vaccination_charts::{
    config::ChartConfig,
    dataset::Dataset,
    output::export_site,
    routes::{AppState, serve},
    source::{load_dataset, source_for},
};

#[derive(Parser)]
#[command(name = "vaccination_charts")]
#[command(about = "Interactive COVID-19 vaccination charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the chart pages over HTTP
    Serve {
        /// Path or URL of the vaccinations CSV (optionally gzipped)
        #[arg(short, long, default_value = "country_vaccinations.csv")]
        data: String,

        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: String,

        /// Optional JSON file overriding the chart definitions
        #[arg(long)]
        charts: Option<String>,
    },
    /// Write every page as a standalone HTML file
    Render {
        /// Path or URL of the vaccinations CSV (optionally gzipped)
        #[arg(short, long, default_value = "country_vaccinations.csv")]
        data: String,

        /// Directory to write the pages to
        #[arg(short, long, default_value = "site")]
        output_dir: String,

        /// Optional JSON file overriding the chart definitions
        #[arg(long)]
        charts: Option<String>,
    },
    /// Log every country in the dataset with its row count and date span
    ListCountries {
        /// Path or URL of the vaccinations CSV (optionally gzipped)
        #[arg(short, long, default_value = "country_vaccinations.csv")]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/vaccination_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vaccination_charts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, bind, charts } => {
            let config = ChartConfig::load_or_default(charts.as_deref())?;
            let dataset = load(&data).await?;
            serve(AppState::new(dataset, config), &bind).await?;
        }
        Commands::Render {
            data,
            output_dir,
            charts,
        } => {
            let config = ChartConfig::load_or_default(charts.as_deref())?;
            let dataset = load(&data).await?;
            let written = export_site(&dataset, &config, Path::new(&output_dir))?;
            for path in written {
                info!(path = %path.display(), "Wrote page");
            }
        }
        Commands::ListCountries { data } => {
            let dataset = load(&data).await?;
            list_countries(&dataset);
        }
    }

    Ok(())
}

/// Loads the table once; it is shared read-only from here on.
async fn load(location: &str) -> Result<Arc<Dataset>> {
    let source = source_for(location);
    let dataset = load_dataset(source.as_ref()).await?;
    Ok(Arc::new(dataset))
}

fn list_countries(dataset: &Dataset) {
    let mut spans: BTreeMap<&str, (usize, NaiveDate, NaiveDate)> = BTreeMap::new();
    for record in dataset.records() {
        let entry = spans
            .entry(record.country.as_str())
            .or_insert((0, record.date, record.date));
        entry.0 += 1;
        entry.1 = entry.1.min(record.date);
        entry.2 = entry.2.max(record.date);
    }

    for (country, (rows, first, last)) in &spans {
        info!(country, rows, first = %first, last = %last, "Country");
    }

    info!(
        countries = spans.len(),
        rows = dataset.len(),
        "Country list summary"
    );
}
