use crate::common::types::{Labels, Timestamp};
use crate::error::{QueryError, QueryResult};
use crate::frames::Frame;
use crate::series::MetricSeries;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Inclusive time window of a request, in epoch milliseconds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from_ms: Timestamp,
    pub to_ms: Timestamp,
}

impl TimeWindow {
    pub fn new(from_ms: Timestamp, to_ms: Timestamp) -> QueryResult<Self> {
        if from_ms > to_ms {
            return Err(QueryError::InvalidTimeWindow);
        }
        Ok(TimeWindow { from_ms, to_ms })
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.from_ms && ts <= self.to_ms
    }

    /// Window ending now and reaching the given number of milliseconds back.
    pub fn last(duration_ms: Timestamp) -> Self {
        let now = crate::common::time::current_time_millis();
        TimeWindow {
            from_ms: now - duration_ms,
            to_ms: now,
        }
    }
}

/// The output shape a target demands.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFormat {
    #[default]
    TimeSeries,
    Heatmap,
    MetricsTable,
    CsvTable,
}

impl TargetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::TimeSeries => "time_series",
            TargetFormat::Heatmap => "heatmap",
            TargetFormat::MetricsTable => "metrics_table",
            TargetFormat::CsvTable => "csv_table",
        }
    }
}

impl Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("time_series") => Ok(TargetFormat::TimeSeries),
            s if s.eq_ignore_ascii_case("heatmap") => Ok(TargetFormat::Heatmap),
            s if s.eq_ignore_ascii_case("metrics_table") => Ok(TargetFormat::MetricsTable),
            s if s.eq_ignore_ascii_case("csv_table") => Ok(TargetFormat::CsvTable),
            _ => Err(format!("invalid target format: {}", s)),
        }
    }
}

/// One panel query as it arrives from the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetQuery {
    /// Metric expression, resolved to concrete metrics by the collector.
    pub expr: String,
    #[serde(default)]
    pub format: TargetFormat,
    pub ref_id: String,
    /// Legend pattern, passed through to the external legend formatter.
    #[serde(default)]
    pub legend: Option<String>,
    /// Per-target override of the request window.
    #[serde(default)]
    pub window: Option<TimeWindow>,
}

/// A refresh request: a window, the ordered target list and a resolution
/// hint (≥ 1) governing boundary padding granularity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub window: TimeWindow,
    pub targets: Vec<TargetQuery>,
    #[serde(default = "default_resolution_hint")]
    pub resolution_hint: u32,
}

fn default_resolution_hint() -> u32 {
    1
}

impl QueryRequest {
    pub fn new(window: TimeWindow, targets: Vec<TargetQuery>) -> Self {
        QueryRequest {
            window,
            targets,
            resolution_hint: default_resolution_hint(),
        }
    }
}

/// Connection state of the endpoint a target's data came from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointState {
    #[default]
    Connected,
    Error,
}

/// Boundary view of the collector's endpoint: enough to attribute data and
/// short-circuit targets whose endpoint is in an error state. Connection
/// management itself lives in the collector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointContext {
    pub state: EndpointState,
    pub url: String,
    pub hostspec: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub labels: Labels,
}

impl EndpointContext {
    /// The message to surface when this endpoint cannot serve its target.
    pub fn error_message(&self) -> Option<String> {
        if self.state == EndpointState::Error || !self.errors.is_empty() {
            if self.errors.is_empty() {
                Some("endpoint is in an error state".to_string())
            } else {
                Some(self.errors.join("; "))
            }
        } else {
            None
        }
    }
}

/// Per-target data supplied by the collector: the endpoint it came from, the
/// query it answers and the metric buffers matching the query expression.
/// Metric buffers are borrowed read-only for the duration of one request.
#[derive(Clone, Debug)]
pub struct TargetResult<'a> {
    pub endpoint: EndpointContext,
    pub query: TargetQuery,
    pub metrics: Vec<&'a MetricSeries>,
    /// Errors the collector recorded against this query (e.g. the expression
    /// did not resolve). A non-empty list short-circuits the pipeline.
    pub errors: Vec<String>,
}

impl<'a> TargetResult<'a> {
    pub fn new(endpoint: EndpointContext, query: TargetQuery, metrics: Vec<&'a MetricSeries>) -> Self {
        TargetResult {
            endpoint,
            query,
            metrics,
            errors: vec![],
        }
    }

    /// The message to surface when this target cannot go through the
    /// pipeline, from either the endpoint state or recorded query errors.
    pub fn error_message(&self) -> Option<String> {
        if !self.errors.is_empty() {
            return Some(self.errors.join("; "));
        }
        self.endpoint.error_message()
    }
}

/// Non-fatal per-target failure, reported alongside the frames of the
/// targets that succeeded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TargetError {
    pub ref_id: String,
    pub message: String,
}

impl TargetError {
    pub fn new(ref_id: &str, message: impl Display) -> Self {
        TargetError {
            ref_id: ref_id.to_string(),
            message: message.to_string(),
        }
    }
}

/// Response of one refresh: frames in target order plus per-target error
/// descriptors for the targets that failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryResponse {
    pub frames: Vec<Frame>,
    pub errors: Vec<TargetError>,
}
