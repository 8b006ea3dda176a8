use crate::common::types::{Labels, Timestamp};
use serde::Serialize;

/// Provenance of a value column, exposed so an external legend formatter can
/// render display names from the user's pattern. The pipeline itself never
/// formats display names.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FieldOrigin {
    /// Raw metric name, e.g. `disk.dev.read`.
    pub metric: String,
    /// Instance display name; `None` for singular metrics.
    pub instance: Option<String>,
    pub labels: Labels,
    /// Units of the derived values (counters report rate units).
    pub units: String,
}

/// Column payload. Missing observations are explicit `None` markers, never
/// interpolated.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValues {
    Time(Vec<Timestamp>),
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Time(v) => v.len(),
            FieldValues::Number(v) => v.len(),
            FieldValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named, typed column of a frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub origin: Option<FieldOrigin>,
    pub values: FieldValues,
}

impl Field {
    pub fn time(name: &str, values: Vec<Timestamp>) -> Self {
        Field {
            name: name.to_string(),
            origin: None,
            values: FieldValues::Time(values),
        }
    }

    pub fn number(name: &str, values: Vec<Option<f64>>) -> Self {
        Field {
            name: name.to_string(),
            origin: None,
            values: FieldValues::Number(values),
        }
    }

    pub fn text(name: &str, values: Vec<Option<String>>) -> Self {
        Field {
            name: name.to_string(),
            origin: None,
            values: FieldValues::Text(values),
        }
    }

    pub fn with_origin(mut self, origin: FieldOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
