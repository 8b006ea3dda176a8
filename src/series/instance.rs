use crate::common::types::Labels;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of an instance within its instance domain. Stable for the
/// lifetime of a metric series, though any instance may be absent from any
/// given sample.
pub type InstanceId = u32;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
}

impl Instance {
    pub fn new(name: &str) -> Self {
        Instance {
            name: name.to_string(),
            labels: Labels::default(),
        }
    }
}

/// The set of valid instances of a metric, with display names and labels.
///
/// Kept as an ordered map so enumeration is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceDomain {
    pub instances: BTreeMap<InstanceId, Instance>,
    #[serde(default)]
    pub labels: Labels,
}

impl InstanceDomain {
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    /// Display name for an instance, falling back to the numeric id when the
    /// domain does not (or no longer does) know it.
    pub fn instance_name(&self, id: InstanceId) -> String {
        match self.instances.get(&id) {
            Some(instance) => instance.name.clone(),
            None => id.to_string(),
        }
    }
}
