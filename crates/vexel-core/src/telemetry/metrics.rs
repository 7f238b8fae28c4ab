// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Metric identifiers, values, and errors.

use std::fmt::{self, Display};
use std::time::Instant;
use thiserror::Error;

/// A `namespace:name` metric identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// Broad category, e.g. `"loaders"`.
    pub namespace: String,
    /// Specific name, e.g. `"cache_hits"`.
    pub name: String,
}

impl MetricId {
    /// Creates an identifier.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Monotonic count.
    Counter,
    /// Value that moves both ways.
    Gauge,
    /// Bucketed distribution of observations.
    Histogram,
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Monotonic count.
    Counter(u64),
    /// Point-in-time value.
    Gauge(f64),
    /// Distribution summary.
    Histogram {
        /// Number of observations.
        count: u64,
        /// Sum of all observations.
        sum: f64,
        /// Inclusive upper bound of each bucket.
        bucket_bounds: Vec<f64>,
        /// Observations per bucket; the last slot counts overflow.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// The [`MetricType`] of this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
            MetricValue::Histogram { .. } => MetricType::Histogram,
        }
    }

    /// The count, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            _ => None,
        }
    }

    /// The value, if this is a gauge.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }

    /// Records one observation into a histogram value.
    pub fn observe(&mut self, sample: f64) -> MetricsResult<()> {
        match self {
            MetricValue::Histogram {
                count,
                sum,
                bucket_bounds,
                bucket_counts,
            } => {
                let slot = bucket_bounds
                    .iter()
                    .position(|bound| sample <= *bound)
                    .unwrap_or(bucket_bounds.len());
                bucket_counts[slot] += 1;
                *count += 1;
                *sum += sample;
                Ok(())
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricType::Histogram,
                found: other.metric_type(),
            }),
        }
    }
}

/// A registered metric.
#[derive(Debug, Clone)]
pub struct Metric {
    /// Identifier.
    pub id: MetricId,
    /// Human-readable description.
    pub description: String,
    /// Unit of measurement.
    pub unit: String,
    /// Current value.
    pub value: MetricValue,
    /// Last time the value changed.
    pub updated_at: Instant,
}

impl Metric {
    /// A counter starting at zero.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self::with_value(id, description, "count", MetricValue::Counter(0))
    }

    /// A gauge starting at zero.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::with_value(id, description, unit, MetricValue::Gauge(0.0))
    }

    /// An empty histogram over `bucket_bounds` (must be ascending).
    pub fn histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> MetricsResult<Self> {
        if bucket_bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(MetricsError::InvalidBuckets(id));
        }
        let bucket_counts = vec![0; bucket_bounds.len() + 1];
        Ok(Self::with_value(
            id,
            description,
            unit,
            MetricValue::Histogram {
                count: 0,
                sum: 0.0,
                bucket_bounds,
                bucket_counts,
            },
        ))
    }

    fn with_value(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        value: MetricValue,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            value,
            updated_at: Instant::now(),
        }
    }

    /// Marks the metric as just updated.
    pub fn touch(&mut self) {
        self.updated_at = Instant::now();
    }
}

/// A specialized `Result` for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors raised by the metrics system.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    /// No metric is registered under the id.
    #[error("metric not found: {0}")]
    NotFound(MetricId),
    /// The metric exists with a different type.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Type required by the operation.
        expected: MetricType,
        /// Type actually registered.
        found: MetricType,
    },
    /// Histogram bounds are not strictly ascending.
    #[error("histogram buckets for {0} are not strictly ascending")]
    InvalidBuckets(MetricId),
    /// The storage lock was poisoned by a panicking writer.
    #[error("metrics storage poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_formats_as_namespace_and_name() {
        assert_eq!(MetricId::new("loaders", "cache_hits").to_string(), "loaders:cache_hits");
    }

    #[test]
    fn histogram_buckets_observations() {
        let mut metric =
            Metric::histogram(MetricId::new("t", "h"), "test", "ms", vec![1.0, 10.0]).unwrap();
        for sample in [0.5, 5.0, 50.0, 1.0] {
            metric.value.observe(sample).unwrap();
        }
        match metric.value {
            MetricValue::Histogram {
                count,
                sum,
                bucket_counts,
                ..
            } => {
                assert_eq!(count, 4);
                assert_eq!(sum, 56.5);
                assert_eq!(bucket_counts, vec![2, 1, 1]);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn histogram_rejects_unsorted_bounds() {
        let err = Metric::histogram(MetricId::new("t", "h"), "", "ms", vec![5.0, 1.0]);
        assert!(matches!(err, Err(MetricsError::InvalidBuckets(_))));
    }

    #[test]
    fn observe_on_counter_is_type_mismatch() {
        let mut value = MetricValue::Counter(3);
        assert!(matches!(
            value.observe(1.0),
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Histogram,
                found: MetricType::Counter
            })
        ));
    }
}
