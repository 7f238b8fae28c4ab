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

use vexel_core::telemetry::MetricsError;
use vexel_telemetry::{CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry};

const NAMESPACE: &str = "loaders";

/// Open-time buckets, in milliseconds.
const OPEN_TIME_BUCKETS: [f64; 6] = [0.1, 1.0, 5.0, 20.0, 100.0, 500.0];

/// Metric handles updated by the registry and its handles.
#[derive(Clone)]
pub(crate) struct LoaderMetrics {
    pub(crate) cache_hits: CounterHandle,
    pub(crate) cache_misses: CounterHandle,
    pub(crate) open_failures: CounterHandle,
    pub(crate) live: GaugeHandle,
    pub(crate) open_time: HistogramHandle,
}

impl LoaderMetrics {
    pub(crate) fn register(metrics: &MetricsRegistry) -> Result<Self, MetricsError> {
        Ok(Self {
            cache_hits: metrics.register_counter(
                NAMESPACE,
                "cache_hits",
                "Loads served by an existing loader",
            )?,
            cache_misses: metrics.register_counter(
                NAMESPACE,
                "cache_misses",
                "Loads that constructed a new loader",
            )?,
            open_failures: metrics.register_counter(
                NAMESPACE,
                "open_failures",
                "Sources a loader refused to open",
            )?,
            live: metrics.register_gauge(NAMESPACE, "live", "Loaders in the registry", "count")?,
            open_time: metrics.register_histogram(
                NAMESPACE,
                "open_time",
                "Time to construct and open a loader",
                "ms",
                OPEN_TIME_BUCKETS.to_vec(),
            )?,
        })
    }

    pub(crate) fn count(counter: &CounterHandle) {
        if let Err(e) = counter.increment() {
            log::warn!("Failed to update {}: {e}", counter.id());
        }
    }

    pub(crate) fn adjust_live(&self, delta: f64) {
        if let Err(e) = self.live.add(delta) {
            log::warn!("Failed to update {}: {e}", self.live.id());
        }
    }
}
