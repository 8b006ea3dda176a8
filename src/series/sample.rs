use crate::common::types::Timestamp;
use crate::series::instance::InstanceId;
use serde::{Deserialize, Serialize};

/// Raw observed value of one instance in one snapshot. Numeric or textual
/// depending on the metric type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) => Some(*v),
            RawValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Number(_) => None,
            RawValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One instance's observation within a snapshot. `instance` is `None` for
/// singular metrics, which have no instance domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceValue {
    pub instance: Option<InstanceId>,
    pub value: RawValue,
}

impl InstanceValue {
    pub fn new(instance: Option<InstanceId>, value: impl Into<RawValue>) -> Self {
        InstanceValue {
            instance,
            value: value.into(),
        }
    }
}

/// One timestamped observation across all instances of a metric. An instance
/// missing from `values` simply was not reported in that snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp_ms: Timestamp,
    pub values: Vec<InstanceValue>,
}

impl MetricSample {
    pub fn new(timestamp_ms: Timestamp, values: Vec<InstanceValue>) -> Self {
        MetricSample { timestamp_ms, values }
    }

    /// The observation for one instance in this snapshot, if reported.
    pub fn value_for(&self, instance: Option<InstanceId>) -> Option<&RawValue> {
        self.values
            .iter()
            .find(|iv| iv.instance == instance)
            .map(|iv| &iv.value)
    }
}
