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

//! In-memory metrics registry and typed update handles.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use vexel_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};

type Storage = Arc<RwLock<HashMap<MetricId, Metric>>>;

/// Central store for loader metrics.
///
/// Registration is idempotent: registering an id that already exists with the
/// same type returns a handle to the existing metric, so several registries can
/// report into one `MetricsRegistry` without resetting each other.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    storage: Storage,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, metric: Metric) -> MetricsResult<MetricId> {
        let mut storage = self.storage.write().map_err(|_| MetricsError::Poisoned)?;
        let id = metric.id.clone();
        match storage.get(&id) {
            Some(existing) if existing.value.metric_type() != metric.value.metric_type() => {
                Err(MetricsError::TypeMismatch {
                    expected: metric.value.metric_type(),
                    found: existing.value.metric_type(),
                })
            }
            Some(_) => Ok(id),
            None => {
                storage.insert(id.clone(), metric);
                Ok(id)
            }
        }
    }

    /// Registers (or reuses) a counter.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = self.register(Metric::counter(MetricId::new(namespace, name), description))?;
        Ok(CounterHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Registers (or reuses) a gauge.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = self.register(Metric::gauge(
            MetricId::new(namespace, name),
            description,
            unit,
        ))?;
        Ok(GaugeHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// Registers (or reuses) a histogram with ascending `buckets`.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let metric = Metric::histogram(MetricId::new(namespace, name), description, unit, buckets)?;
        let id = self.register(metric)?;
        Ok(HistogramHandle {
            id,
            storage: self.storage.clone(),
        })
    }

    /// A copy of the metric registered under `id`.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self.storage.read().map_err(|_| MetricsError::Poisoned)?;
        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::NotFound(id.clone()))
    }

    /// Whether `id` is registered.
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.storage
            .read()
            .map(|storage| storage.contains_key(id))
            .unwrap_or(false)
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.storage.read().map(|storage| storage.len()).unwrap_or(0)
    }

    /// Copies of every metric in `namespace`, sorted by name.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        let Ok(storage) = self.storage.read() else {
            return Vec::new();
        };
        let mut metrics: Vec<Metric> = storage
            .values()
            .filter(|metric| metric.id.namespace == namespace)
            .cloned()
            .collect();
        metrics.sort_by(|a, b| a.id.name.cmp(&b.id.name));
        metrics
    }
}

fn update<T>(
    storage: &Storage,
    id: &MetricId,
    f: impl FnOnce(&mut MetricValue) -> MetricsResult<T>,
) -> MetricsResult<T> {
    let mut storage = storage.write().map_err(|_| MetricsError::Poisoned)?;
    let metric = storage
        .get_mut(id)
        .ok_or_else(|| MetricsError::NotFound(id.clone()))?;
    let result = f(&mut metric.value)?;
    metric.touch();
    Ok(result)
}

fn read<T>(
    storage: &Storage,
    id: &MetricId,
    f: impl FnOnce(&MetricValue) -> Option<T>,
    expected: MetricType,
) -> MetricsResult<T> {
    let storage = storage.read().map_err(|_| MetricsError::Poisoned)?;
    let metric = storage
        .get(id)
        .ok_or_else(|| MetricsError::NotFound(id.clone()))?;
    f(&metric.value).ok_or(MetricsError::TypeMismatch {
        expected,
        found: metric.value.metric_type(),
    })
}

/// Handle to a registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    storage: Storage,
}

impl CounterHandle {
    /// Adds one and returns the new value.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Adds `amount` and returns the new value.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        update(&self.storage, &self.id, |value| match value {
            MetricValue::Counter(count) => {
                *count = count.saturating_add(amount);
                Ok(*count)
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: other.metric_type(),
            }),
        })
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<u64> {
        read(&self.storage, &self.id, MetricValue::as_counter, MetricType::Counter)
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    storage: Storage,
}

impl GaugeHandle {
    /// Sets the value.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.apply(|_| value).map(|_| ())
    }

    /// Adds `delta` (may be negative) and returns the new value.
    pub fn add(&self, delta: f64) -> MetricsResult<f64> {
        self.apply(|current| current + delta)
    }

    fn apply(&self, f: impl FnOnce(f64) -> f64) -> MetricsResult<f64> {
        update(&self.storage, &self.id, |value| match value {
            MetricValue::Gauge(current) => {
                *current = f(*current);
                Ok(*current)
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricType::Gauge,
                found: other.metric_type(),
            }),
        })
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<f64> {
        read(&self.storage, &self.id, MetricValue::as_gauge, MetricType::Gauge)
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered histogram.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    storage: Storage,
}

impl HistogramHandle {
    /// Records one observation.
    pub fn observe(&self, sample: f64) -> MetricsResult<()> {
        update(&self.storage, &self.id, |value| value.observe(sample))
    }

    /// Number of observations so far.
    pub fn count(&self) -> MetricsResult<u64> {
        read(
            &self.storage,
            &self.id,
            |value| match value {
                MetricValue::Histogram { count, .. } => Some(*count),
                _ => None,
            },
            MetricType::Histogram,
        )
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_accumulates() {
        let registry = MetricsRegistry::new();
        let hits = registry
            .register_counter("loaders", "cache_hits", "Cache hits")
            .unwrap();
        assert_eq!(hits.increment().unwrap(), 1);
        assert_eq!(hits.increment_by(4).unwrap(), 5);
        assert_eq!(hits.get().unwrap(), 5);
        assert!(registry.contains_metric(hits.id()));
    }

    #[test]
    fn registration_is_idempotent() {
        let registry = MetricsRegistry::new();
        let first = registry.register_counter("loaders", "misses", "").unwrap();
        first.increment().unwrap();
        let second = registry.register_counter("loaders", "misses", "").unwrap();
        assert_eq!(second.get().unwrap(), 1);
        assert_eq!(registry.metric_count(), 1);

        let clash = registry.register_gauge("loaders", "misses", "", "count");
        assert!(matches!(clash, Err(MetricsError::TypeMismatch { .. })));
    }

    #[test]
    fn gauge_moves_both_ways() {
        let registry = MetricsRegistry::new();
        let live = registry
            .register_gauge("loaders", "live", "Live loaders", "count")
            .unwrap();
        live.set(3.0).unwrap();
        assert_eq!(live.add(-1.0).unwrap(), 2.0);
        assert_eq!(live.get().unwrap(), 2.0);
    }

    #[test]
    fn histogram_counts_observations() {
        let registry = MetricsRegistry::new();
        let timing = registry
            .register_histogram("loaders", "open_time", "", "ms", vec![1.0, 10.0])
            .unwrap();
        timing.observe(0.5).unwrap();
        timing.observe(20.0).unwrap();
        assert_eq!(timing.count().unwrap(), 2);
    }

    #[test]
    fn namespace_listing_is_sorted() {
        let registry = MetricsRegistry::new();
        registry.register_counter("loaders", "b", "").unwrap();
        registry.register_counter("loaders", "a", "").unwrap();
        registry.register_counter("other", "c", "").unwrap();
        let names: Vec<_> = registry
            .namespace_metrics("loaders")
            .into_iter()
            .map(|m| m.id.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
