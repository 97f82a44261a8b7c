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

//! Bounded per-(module, kind) metric buffers.

use crate::metric::{MetricKind, MetricStats, PerformanceMetric};
use std::collections::{HashMap, VecDeque};
use std::time::SystemTime;

/// Stores observations in time-ordered ring buffers, one per
/// (module, kind) pair, each bounded at `max_metrics` with FIFO eviction.
///
/// Exact historical values are kept up to the cap; nothing is averaged
/// away. Append and eviction happen in one step, so a concurrent reader
/// behind the owning lock never sees an over-full buffer.
#[derive(Debug)]
pub struct MetricStore {
    max_metrics: usize,
    buffers: HashMap<(String, MetricKind), VecDeque<PerformanceMetric>>,
}

impl MetricStore {
    /// Creates an empty store bounding each buffer at `max_metrics`.
    pub fn new(max_metrics: usize) -> Self {
        Self {
            max_metrics,
            buffers: HashMap::new(),
        }
    }

    /// Appends a metric to its buffer, evicting the oldest sample once the
    /// bound is exceeded.
    pub fn record(&mut self, metric: PerformanceMetric) {
        let key = (metric.module.clone(), metric.kind);
        let buffer = self.buffers.entry(key).or_default();
        if buffer.len() == self.max_metrics {
            buffer.pop_front();
        }
        buffer.push_back(metric);
    }

    /// Returns stored metrics filtered by module, kind, and inclusive time
    /// range, newest first.
    pub fn query(
        &self,
        module: Option<&str>,
        kind: Option<MetricKind>,
        from: Option<SystemTime>,
        to: Option<SystemTime>,
    ) -> Vec<PerformanceMetric> {
        let mut result: Vec<PerformanceMetric> = self
            .buffers
            .iter()
            .filter(|((m, k), _)| {
                module.map(|wanted| wanted == m).unwrap_or(true)
                    && kind.map(|wanted| wanted == *k).unwrap_or(true)
            })
            .flat_map(|(_, buffer)| buffer.iter().cloned())
            .filter(|metric| {
                from.map(|from| metric.timestamp >= from).unwrap_or(true)
                    && to.map(|to| metric.timestamp <= to).unwrap_or(true)
            })
            .collect();

        result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        result
    }

    /// Computes statistics over the buffered window for one
    /// (module, kind) pair.
    pub fn stats(&self, module: &str, kind: MetricKind) -> MetricStats {
        let values: Vec<f64> = self
            .buffers
            .get(&(module.to_string(), kind))
            .map(|buffer| buffer.iter().map(|m| m.value).collect())
            .unwrap_or_default();
        MetricStats::from_values(&values)
    }

    /// Computes statistics over every module's buffer of `kind` (for
    /// fleet-scoped rules), or a single module's when `module` is given.
    ///
    /// The fleet-wide view merges the matching buffers in chronological
    /// order before computing.
    pub fn stats_scoped(&self, module: Option<&str>, kind: MetricKind) -> MetricStats {
        match module {
            Some(module) => self.stats(module, kind),
            None => {
                let mut metrics: Vec<&PerformanceMetric> = self
                    .buffers
                    .iter()
                    .filter(|((_, k), _)| *k == kind)
                    .flat_map(|(_, buffer)| buffer.iter())
                    .collect();
                metrics.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
                let values: Vec<f64> = metrics.iter().map(|m| m.value).collect();
                MetricStats::from_values(&values)
            }
        }
    }

    /// Number of buffered samples across every pair.
    pub fn len(&self) -> usize {
        self.buffers.values().map(|b| b.len()).sum()
    }

    /// Returns `true` when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
