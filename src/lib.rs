pub mod common;
pub mod config;
pub mod error;
pub mod frames;
pub mod query;
pub mod series;


pub use crate::error::{QueryError, QueryResult};
pub use crate::frames::{Field, FieldOrigin, FieldValues, Frame};
pub use crate::query::{
    process_queries, EndpointContext, EndpointState, QueryRequest, QueryResponse, TargetError,
    TargetFormat, TargetQuery, TargetResult, TimeWindow,
};
pub use crate::series::{
    Instance, InstanceDomain, InstanceId, InstanceValue, MetricMeta, MetricSample, MetricSeries,
    RawValue, Semantics, ValueKind,
};
