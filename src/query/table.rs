use crate::common::types::Timestamp;
use crate::frames::{Field, Frame};
use crate::query::align::AlignedMetric;
use crate::query::time_series::{field_origin, values_field};
use crate::query::types::TargetQuery;
use crate::series::{InstanceId, MetricSeries, RawValue};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Joins all metrics of one target into a single table frame: columns
/// `[Time, Instance, metric...]`, one row per (timestamp, instance) pair in
/// the union across the target's metrics. Every pair appears exactly once,
/// timestamp-major; a cell is missing where that metric has no observation
/// for the pair.
pub fn build_metrics_table_frame(
    query: &TargetQuery,
    metrics: &[(&MetricSeries, AlignedMetric)],
) -> Frame {
    let mut pairs: BTreeSet<(Timestamp, Option<InstanceId>)> = BTreeSet::new();
    for (_, aligned) in metrics {
        for series in &aligned.series {
            for ts in &aligned.timestamps {
                pairs.insert((*ts, series.instance));
            }
        }
    }
    let rows: Vec<(Timestamp, Option<InstanceId>)> = pairs.into_iter().collect();

    let mut time_values = Vec::with_capacity(rows.len());
    let mut instance_values = Vec::with_capacity(rows.len());
    for (ts, instance) in &rows {
        time_values.push(*ts);
        instance_values.push(instance.map(|id| instance_display_name(metrics, id)));
    }

    let mut frame = Frame::new(&query.ref_id)
        .with_field(Field::time("Time", time_values))
        .with_field(Field::text("Instance", instance_values));

    for (series, aligned) in metrics {
        let ts_index: AHashMap<Timestamp, usize> = aligned
            .timestamps
            .iter()
            .enumerate()
            .map(|(idx, ts)| (*ts, idx))
            .collect();

        let mut column: Vec<Option<RawValue>> = Vec::with_capacity(rows.len());
        for (ts, instance) in &rows {
            let value = ts_index.get(ts).and_then(|idx| {
                aligned
                    .series
                    .iter()
                    .find(|s| s.instance == *instance)
                    .and_then(|s| s.values[*idx].clone())
            });
            column.push(value);
        }

        let field = values_field(series.meta.item_name(), series.meta.kind, &column)
            .with_origin(field_origin(series, None));
        frame.push_field(field);
    }
    frame
}

/// Display name from the first metric whose instance domain knows the id.
fn instance_display_name(metrics: &[(&MetricSeries, AlignedMetric)], id: InstanceId) -> String {
    metrics
        .iter()
        .find_map(|(series, _)| {
            series
                .instance_domain
                .as_ref()
                .and_then(|indom| indom.instance(id))
                .map(|instance| instance.name.clone())
        })
        .unwrap_or_else(|| id.to_string())
}
