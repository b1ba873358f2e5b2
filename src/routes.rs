//! HTTP surface: one GET route per page plus a JSON endpoint for scatter selections.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::aggregators::{CorrelationPoint, scatter_data, scatter_selection};
use crate::config::ChartConfig;
use crate::dataset::Dataset;
use crate::output::{self, LinkStyle};

/// Read-only state shared by every request.
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: ChartConfig,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: ChartConfig) -> Arc<Self> {
        Arc::new(AppState { dataset, config })
    }
}

/// A failed request. Rendered as a 500 with the error text as body.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/average_vaccinations", get(average_vaccinations))
        .route("/plot", get(plot))
        .route("/correlation", get(correlation))
        .route("/api/correlation", get(correlation_points))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
#[tracing::instrument(skip(state))]
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(output::index_page(LinkStyle::Routes))
}

#[tracing::instrument(skip(state))]
async fn average_vaccinations(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let html = output::average_vaccinations_page(&state.dataset, &state.config, LinkStyle::Routes)?;
    Ok(Html(html))
}

#[tracing::instrument(skip(state))]
async fn plot(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let html = output::plot_page(&state.dataset, &state.config, LinkStyle::Routes)?;
    Ok(Html(html))
}

#[tracing::instrument(skip(state))]
async fn correlation(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let html = output::correlation_page(&state.dataset, LinkStyle::Routes)?;
    Ok(Html(html))
}

#[derive(Debug, Deserialize)]
pub struct SelectionParams {
    /// Comma-separated country names. Absent means every country.
    pub countries: Option<String>,
}

impl SelectionParams {
    pub fn selected(&self) -> Option<BTreeSet<String>> {
        self.countries.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

#[tracing::instrument(skip(state))]
async fn correlation_points(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> Json<Vec<CorrelationPoint>> {
    let points = match params.selected() {
        Some(selected) => scatter_selection(&state.dataset, &selected),
        None => scatter_data(&state.dataset),
    };
    info!(points = points.len(), "Correlation selection computed");
    Json(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_params() {
        let absent = SelectionParams { countries: None };
        assert_eq!(absent.selected(), None);

        let empty = SelectionParams {
            countries: Some(String::new()),
        };
        assert_eq!(empty.selected(), Some(BTreeSet::new()));

        let some = SelectionParams {
            countries: Some("China, India,,".to_string()),
        };
        let expected: BTreeSet<String> = ["China", "India"].iter().map(|s| s.to_string()).collect();
        assert_eq!(some.selected(), Some(expected));
    }

    #[test]
    fn test_app_error_is_internal_server_error() {
        let err = AppError::from(crate::aggregators::AggregationError::UnknownColumn(
            "x".to_string(),
        ));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
