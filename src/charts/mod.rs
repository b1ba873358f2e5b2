//! Plotly figure specifications built from aggregated series.

pub mod builders;
pub mod figure;

pub use builders::{average_chart, correlation_chart, weekly_chart};
pub use figure::Figure;
