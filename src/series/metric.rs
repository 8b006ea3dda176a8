use crate::common::types::Timestamp;
use crate::error::{QueryError, QueryResult};
use crate::series::instance::{InstanceDomain, InstanceId};
use crate::series::metadata::MetricMeta;
use crate::series::sample::MetricSample;
use serde::{Deserialize, Serialize};

/// History buffer of one metric: metadata, an optional instance domain, and
/// an ascending append-only sequence of snapshots.
///
/// The collector owns and appends to these buffers; the query pipeline only
/// ever borrows them immutably, so concurrent queries over different windows
/// are safe as long as the collector synchronizes its writes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub meta: MetricMeta,
    pub instance_domain: Option<InstanceDomain>,
    samples: Vec<MetricSample>,
}

impl MetricSeries {
    pub fn new(meta: MetricMeta) -> Self {
        MetricSeries {
            meta,
            instance_domain: None,
            samples: vec![],
        }
    }

    pub fn with_instance_domain(mut self, instance_domain: InstanceDomain) -> Self {
        self.instance_domain = Some(instance_domain);
        self
    }

    /// Append one snapshot. Timestamps must be strictly ascending.
    pub fn append(&mut self, sample: MetricSample) -> QueryResult<()> {
        if let Some(last) = self.samples.last() {
            if sample.timestamp_ms <= last.timestamp_ms {
                return Err(QueryError::OutOfOrderSample(
                    last.timestamp_ms,
                    sample.timestamp_ms,
                ));
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.samples.first().map(|s| s.timestamp_ms)
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.timestamp_ms)
    }

    /// Display name for an instance of this metric. Singular metrics and
    /// unknown ids fall back to the metric name and the numeric id.
    pub fn instance_name(&self, instance: Option<InstanceId>) -> String {
        match (instance, &self.instance_domain) {
            (Some(id), Some(indom)) => indom.instance_name(id),
            (Some(id), None) => id.to_string(),
            (None, _) => self.meta.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::sample::InstanceValue;

    fn sample(ts: Timestamp) -> MetricSample {
        MetricSample::new(ts, vec![InstanceValue::new(None, 1.0)])
    }

    #[test]
    fn test_append_enforces_ascending_order() {
        let mut series = MetricSeries::new(MetricMeta::default());
        series.append(sample(1000)).unwrap();
        series.append(sample(2000)).unwrap();

        assert!(matches!(
            series.append(sample(2000)),
            Err(QueryError::OutOfOrderSample(2000, 2000))
        ));
        assert!(matches!(
            series.append(sample(1500)),
            Err(QueryError::OutOfOrderSample(2000, 1500))
        ));
        assert_eq!(series.samples().len(), 2);
    }

    #[test]
    fn test_timestamp_bounds() {
        let mut series = MetricSeries::new(MetricMeta::default());
        assert!(series.is_empty());
        assert_eq!(series.first_timestamp(), None);

        series.append(sample(1000)).unwrap();
        series.append(sample(3000)).unwrap();
        assert_eq!(series.first_timestamp(), Some(1000));
        assert_eq!(series.last_timestamp(), Some(3000));
    }
}
