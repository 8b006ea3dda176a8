use crate::common::time::interval_seconds;
use crate::common::types::Timestamp;
use crate::query::window::SelectedWindow;
use crate::series::{InstanceId, MetricMeta, RawValue};

/// One derived observation of one instance. `None` marks a point that exists
/// but cannot be rendered (counter reset, zero interval, type mismatch);
/// downstream stages treat it as missing.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedPoint {
    pub timestamp: Timestamp,
    pub value: Option<RawValue>,
}

impl DerivedPoint {
    fn valid(timestamp: Timestamp, value: RawValue) -> Self {
        DerivedPoint {
            timestamp,
            value: Some(value),
        }
    }

    fn invalid(timestamp: Timestamp) -> Self {
        DerivedPoint {
            timestamp,
            value: None,
        }
    }
}

/// How raw values become output values. Resolved once per metric, not
/// re-checked per sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeriveMode {
    /// Cumulative counters: adjacent differences divided by the sample
    /// interval in seconds.
    Rate,
    /// Instant and discrete semantics, and all textual values: samples pass
    /// through unchanged.
    Passthrough,
}

impl DeriveMode {
    pub fn for_metric(meta: &MetricMeta) -> Self {
        if meta.needs_rate_conversion() {
            DeriveMode::Rate
        } else {
            DeriveMode::Passthrough
        }
    }
}

/// Derives the output series of one instance from the selected samples.
///
/// The instance's observations are taken from the sparse snapshots in order;
/// an instance missing from some snapshot pairs with its own most recent
/// observation, not with the snapshot grid.
pub fn derive_instance_series(
    selection: &SelectedWindow,
    instance: Option<InstanceId>,
    mode: DeriveMode,
) -> Vec<DerivedPoint> {
    match mode {
        DeriveMode::Rate => derive_rate(selection, instance),
        DeriveMode::Passthrough => derive_passthrough(selection, instance),
    }
}

fn derive_passthrough(
    selection: &SelectedWindow,
    instance: Option<InstanceId>,
) -> Vec<DerivedPoint> {
    let mut points = Vec::with_capacity(selection.samples.len());
    for sample in selection.samples.iter().skip(selection.lookback) {
        if let Some(value) = sample.value_for(instance) {
            points.push(DerivedPoint::valid(sample.timestamp_ms, value.clone()));
        }
    }
    points
}

fn derive_rate(selection: &SelectedWindow, instance: Option<InstanceId>) -> Vec<DerivedPoint> {
    let mut points = Vec::with_capacity(selection.samples.len());
    let mut prev: Option<(Timestamp, f64)> = None;

    for sample in selection.samples.iter() {
        let Some(value) = sample.value_for(instance) else {
            continue;
        };
        let ts = sample.timestamp_ms;

        let Some(value) = value.as_f64() else {
            // textual value under counter semantics cannot be derived
            points.push(DerivedPoint::invalid(ts));
            prev = None;
            continue;
        };

        match prev {
            None => {
                // first observation is consumed as the predecessor
            }
            Some((prev_ts, prev_value)) => {
                if ts == prev_ts {
                    points.push(DerivedPoint::invalid(ts));
                } else if value < prev_value {
                    // counter reset or wrap, not a true negative rate
                    points.push(DerivedPoint::invalid(ts));
                } else {
                    let rate = (value - prev_value) / interval_seconds(prev_ts, ts);
                    points.push(DerivedPoint::valid(ts, RawValue::Number(rate)));
                }
            }
        }
        prev = Some((ts, value));
    }
    points
}
