use crate::error::{QueryError, QueryResult};
use crate::frames::{Field, FieldOrigin, Frame};
use crate::query::align::AlignedMetric;
use crate::query::types::TargetQuery;
use crate::series::{MetricSeries, RawValue, ValueKind};

/// Builds the value column of one instance, typed per the metric's value kind.
pub(crate) fn values_field(name: &str, kind: ValueKind, values: &[Option<RawValue>]) -> Field {
    match kind {
        ValueKind::Numeric => Field::number(
            name,
            values.iter().map(|v| v.as_ref().and_then(RawValue::as_f64)).collect(),
        ),
        ValueKind::Text => Field::text(
            name,
            values
                .iter()
                .map(|v| match v {
                    Some(RawValue::Text(s)) => Some(s.clone()),
                    Some(RawValue::Number(n)) => Some(n.to_string()),
                    None => None,
                })
                .collect(),
        ),
    }
}

pub(crate) fn field_origin(series: &MetricSeries, instance_name: Option<String>) -> FieldOrigin {
    let mut labels = series
        .instance_domain
        .as_ref()
        .map(|indom| indom.labels.clone())
        .unwrap_or_default();
    if let (Some(indom), Some(name)) = (&series.instance_domain, &instance_name) {
        if let Some(instance) = indom.instances.values().find(|i| &i.name == name) {
            labels.extend(instance.labels.clone());
        }
    }
    FieldOrigin {
        metric: series.meta.name.clone(),
        instance: instance_name,
        labels,
        units: series.meta.display_units(),
    }
}

/// One frame per (metric, instance): columns `[Time, Value]`, the value
/// column tagged with raw metric name, instance name and labels for the
/// external legend formatter.
pub fn build_time_series_frames(
    query: &TargetQuery,
    series: &MetricSeries,
    aligned: &AlignedMetric,
) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(aligned.series.len().max(1));

    if aligned.series.is_empty() {
        // no instance observed in the window: a bare frame so the panel
        // still renders "no data" under its refId
        frames.push(
            Frame::new(&query.ref_id)
                .with_name(&series.meta.name)
                .with_field(Field::time("Time", vec![])),
        );
        return frames;
    }

    for instance_series in &aligned.series {
        let instance_name = instance_series
            .instance
            .map(|id| series.instance_name(Some(id)));
        let frame_name = match &instance_name {
            Some(name) => format!("{}[{}]", series.meta.name, name),
            None => series.meta.name.clone(),
        };
        let field_name = instance_name.clone().unwrap_or_else(|| series.meta.name.clone());

        let value_field = values_field(&field_name, series.meta.kind, &instance_series.values)
            .with_origin(field_origin(series, instance_name));

        frames.push(
            Frame::new(&query.ref_id)
                .with_name(&frame_name)
                .with_field(Field::time("Time", aligned.timestamps.clone()))
                .with_field(value_field),
        );
    }
    frames
}

/// Heatmap output: structurally a time series per instance, but instance
/// names are numeric bucket boundaries and the frame set is ordered by that
/// number. A non-numeric bucket name is a structural error for the target.
pub fn build_heatmap_frames(
    query: &TargetQuery,
    series: &MetricSeries,
    aligned: &AlignedMetric,
) -> QueryResult<Vec<Frame>> {
    let frames = build_time_series_frames(query, series, aligned);

    let mut keyed: Vec<(f64, Frame)> = Vec::with_capacity(frames.len());
    for frame in frames {
        let Some(origin) = frame.fields.iter().find_map(|f| f.origin.as_ref()) else {
            // bare no-data frame, nothing to order
            keyed.push((f64::NEG_INFINITY, frame));
            continue;
        };
        let bucket = origin.instance.as_deref().unwrap_or("");
        let boundary: f64 = bucket
            .parse()
            .map_err(|_| QueryError::InvalidHeatmapBucket(bucket.to_string()))?;
        keyed.push((boundary, frame));
    }
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(keyed.into_iter().map(|(_, frame)| frame).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FieldValues;
    use crate::query::align::AlignedSeries;
    use crate::series::{Instance, InstanceDomain, MetricMeta, Semantics};

    fn indom(names: &[(u32, &str)]) -> InstanceDomain {
        let mut indom = InstanceDomain::default();
        for (id, name) in names {
            indom.instances.insert(*id, Instance::new(name));
        }
        indom
    }

    fn aligned(timestamps: Vec<i64>, series: Vec<(Option<u32>, Vec<Option<f64>>)>) -> AlignedMetric {
        AlignedMetric {
            timestamps,
            series: series
                .into_iter()
                .map(|(instance, values)| AlignedSeries {
                    instance,
                    values: values.into_iter().map(|v| v.map(RawValue::Number)).collect(),
                })
                .collect(),
        }
    }

    fn query(ref_id: &str) -> TargetQuery {
        TargetQuery {
            expr: "disk.dev.read".to_string(),
            ref_id: ref_id.to_string(),
            ..Default::default()
        }
    }

    fn counter_series(indom: InstanceDomain) -> MetricSeries {
        MetricSeries::new(MetricMeta::new(
            "disk.dev.read",
            ValueKind::Numeric,
            Semantics::Counter,
            "count",
        ))
        .with_instance_domain(indom)
    }

    #[test]
    fn test_one_frame_per_instance() {
        let series = counter_series(indom(&[(0, "sda"), (1, "sdb")]));
        let data = aligned(
            vec![1000, 2000],
            vec![
                (Some(0), vec![Some(1.0), Some(2.0)]),
                (Some(1), vec![None, Some(3.0)]),
            ],
        );
        let frames = build_time_series_frames(&query("A"), &series, &data);

        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.ref_id, "A");
            assert_eq!(frame.fields.len(), 2);
            assert!(frame.validate().is_ok());
            assert_eq!(frame.fields[0].values, FieldValues::Time(vec![1000, 2000]));
        }
        assert_eq!(frames[0].name.as_deref(), Some("disk.dev.read[sda]"));
        assert_eq!(frames[1].fields[1].values, FieldValues::Number(vec![None, Some(3.0)]));
    }

    #[test]
    fn test_origin_carries_legend_inputs() {
        let mut domain = indom(&[(0, "sda")]);
        domain
            .instances
            .get_mut(&0)
            .unwrap()
            .labels
            .insert("device_type".to_string(), "block".to_string());

        let series = counter_series(domain);
        let data = aligned(vec![1000], vec![(Some(0), vec![Some(1.0)])]);
        let frames = build_time_series_frames(&query("A"), &series, &data);

        let origin = frames[0].fields[1].origin.as_ref().unwrap();
        assert_eq!(origin.metric, "disk.dev.read");
        assert_eq!(origin.instance.as_deref(), Some("sda"));
        assert_eq!(origin.units, "count/s");
        assert_eq!(origin.labels.get("device_type").map(String::as_str), Some("block"));
    }

    #[test]
    fn test_singular_metric_yields_one_frame() {
        let series = MetricSeries::new(MetricMeta::new(
            "kernel.all.uptime",
            ValueKind::Numeric,
            Semantics::Instant,
            "sec",
        ));
        let data = aligned(vec![1000], vec![(None, vec![Some(42.0)])]);
        let frames = build_time_series_frames(&query("A"), &series, &data);

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].name.as_deref(), Some("kernel.all.uptime"));
        let origin = frames[0].fields[1].origin.as_ref().unwrap();
        assert_eq!(origin.instance, None);
    }

    #[test]
    fn test_empty_alignment_yields_bare_frame() {
        let series = counter_series(indom(&[(0, "sda")]));
        let frames = build_time_series_frames(&query("A"), &series, &AlignedMetric::default());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].row_count(), 0);
    }

    #[test]
    fn test_heatmap_orders_buckets_numerically() {
        let series = counter_series(indom(&[(0, "1024"), (1, "256"), (2, "-512")]));
        let data = aligned(
            vec![1000],
            vec![
                (Some(0), vec![Some(1.0)]),
                (Some(1), vec![Some(2.0)]),
                (Some(2), vec![Some(3.0)]),
            ],
        );
        let frames = build_heatmap_frames(&query("A"), &series, &data).unwrap();
        let buckets: Vec<&str> = frames
            .iter()
            .map(|f| f.fields[1].origin.as_ref().unwrap().instance.as_deref().unwrap())
            .collect();
        assert_eq!(buckets, vec!["-512", "256", "1024"]);
    }

    #[test]
    fn test_heatmap_rejects_non_numeric_bucket() {
        let series = counter_series(indom(&[(0, "sda")]));
        let data = aligned(vec![1000], vec![(Some(0), vec![Some(1.0)])]);
        let result = build_heatmap_frames(&query("A"), &series, &data);
        assert_eq!(
            result.unwrap_err(),
            QueryError::InvalidHeatmapBucket("sda".to_string())
        );
    }
}
