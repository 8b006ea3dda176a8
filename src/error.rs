use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
/// Enum for the various errors raised while turning metric history into frames.
pub enum QueryError {
    #[error("Invalid heatmap bucket. Instance name {0:?} is not numeric.")]
    InvalidHeatmapBucket(String),

    #[error("Invalid CSV data. {0}")]
    InvalidCsvData(String),

    #[error("Endpoint error. {0}")]
    EndpointError(String),

    #[error("Out of order sample. Last timestamp {0}, received {1}.")]
    OutOfOrderSample(i64, i64),

    #[error("Invalid time window: start > end.")]
    InvalidTimeWindow,

    #[error("{0}")]
    General(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
