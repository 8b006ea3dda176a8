use crate::common::types::Timestamp;
use crate::query::derive::DerivedPoint;
use crate::series::{InstanceId, RawValue};

/// The derived series of one instance after alignment: one value slot per
/// union timestamp, `None` where the instance has no valid observation.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedSeries {
    pub instance: Option<InstanceId>,
    pub values: Vec<Option<RawValue>>,
}

/// All instance series of one metric on a single shared timestamp axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignedMetric {
    /// Sorted, deduplicated union of the instances' timestamps.
    pub timestamps: Vec<Timestamp>,
    /// One entry per instance, in ascending id order (singular first). Every
    /// value vector has the same length as `timestamps`.
    pub series: Vec<AlignedSeries>,
}

impl AlignedMetric {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Unifies per-instance derived series onto one shared timestamp axis.
///
/// Invalid derived points contribute their timestamp to the axis but hold a
/// missing marker. Markers are never interpolated; a gap stays a gap.
pub fn align_instances(per_instance: Vec<(Option<InstanceId>, Vec<DerivedPoint>)>) -> AlignedMetric {
    let mut timestamps: Vec<Timestamp> = per_instance
        .iter()
        .flat_map(|(_, points)| points.iter().map(|p| p.timestamp))
        .collect();
    timestamps.sort_unstable();
    timestamps.dedup();

    let mut series = Vec::with_capacity(per_instance.len());
    for (instance, points) in per_instance {
        let mut values: Vec<Option<RawValue>> = Vec::with_capacity(timestamps.len());
        let mut cursor = points.into_iter().peekable();
        for ts in &timestamps {
            match cursor.peek() {
                Some(point) if point.timestamp == *ts => {
                    values.push(cursor.next().and_then(|p| p.value));
                }
                _ => values.push(None),
            }
        }
        series.push(AlignedSeries { instance, values });
    }

    AlignedMetric { timestamps, series }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(ts: Timestamp, value: f64) -> DerivedPoint {
        DerivedPoint {
            timestamp: ts,
            value: Some(RawValue::Number(value)),
        }
    }

    fn invalid(ts: Timestamp) -> DerivedPoint {
        DerivedPoint {
            timestamp: ts,
            value: None,
        }
    }

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        let aligned = align_instances(vec![
            (Some(0), vec![valid(1000, 1.0), valid(3000, 3.0)]),
            (Some(1), vec![valid(2000, 2.0), valid(3000, 4.0)]),
        ]);
        assert_eq!(aligned.timestamps, vec![1000, 2000, 3000]);
    }

    #[test]
    fn test_all_series_share_axis_length() {
        let aligned = align_instances(vec![
            (Some(0), vec![valid(1000, 1.0), valid(2000, 2.0), valid(3000, 3.0)]),
            (Some(1), vec![valid(2000, 5.0)]),
            (Some(2), vec![]),
        ]);
        for series in &aligned.series {
            assert_eq!(series.values.len(), aligned.timestamps.len());
        }
    }

    #[test]
    fn test_missing_observations_become_markers() {
        let aligned = align_instances(vec![
            (Some(0), vec![valid(1000, 1.0), valid(2000, 2.0)]),
            (Some(1), vec![valid(2000, 5.0)]),
        ]);
        assert_eq!(aligned.series[1].values, vec![None, Some(RawValue::Number(5.0))]);
    }

    #[test]
    fn test_invalid_points_keep_their_timestamp() {
        let aligned = align_instances(vec![(Some(0), vec![valid(1000, 1.0), invalid(2000)])]);
        assert_eq!(aligned.timestamps, vec![1000, 2000]);
        assert_eq!(aligned.series[0].values, vec![Some(RawValue::Number(1.0)), None]);
    }

    #[test]
    fn test_empty_input() {
        let aligned = align_instances(vec![]);
        assert!(aligned.is_empty());
        assert!(aligned.series.is_empty());
    }
}
