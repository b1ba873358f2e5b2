/// Why a chart aggregation could not be computed.
///
/// Every variant renders as `aggregation failed: <reason>` so callers can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("aggregation failed: unknown column '{0}'")]
    UnknownColumn(String),

    #[error("aggregation failed: column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("aggregation failed: invalid date {date}: {reason}")]
    InvalidDate { date: String, reason: String },
}
