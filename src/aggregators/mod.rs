//! Chart aggregations over the immutable vaccination table.
//!
//! Each aggregator is a pure function of the table and its parameters: monthly averages
//! for a fixed set of countries, weekly resampling of daily vaccinations for every
//! country, and the date-sorted scatter points used for the correlation chart.

pub mod correlation;
pub mod error;
pub mod monthly;
pub mod periods;
pub mod types;
pub mod utility;
pub mod weekly;

pub use correlation::{scatter_data, scatter_selection, select};
pub use error::AggregationError;
pub use monthly::monthly_average;
pub use types::{CorrelationPoint, CountrySeries, SeriesPoint};
pub use weekly::weekly_downsample;
