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

//! Host telemetry sampling.
//!
//! Samples system-wide CPU and memory utilization via `sysinfo` and feeds
//! them into a [`PerformanceMonitor`] under one module name, so a fleet
//! gets host telemetry without every module reporting it by hand.

use crate::metric::{MetricKind, PerformanceMetric};
use crate::monitor::PerformanceMonitor;
use sysinfo::System;

/// Samples host CPU and memory into a monitor.
///
/// CPU utilization is measured between consecutive samples; the first
/// sample after construction may read `0`.
pub struct SystemCollector {
    system: System,
    module: String,
}

impl SystemCollector {
    /// Creates a collector reporting under `module`.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            system: System::new(),
            module: module.into(),
        }
    }

    /// Takes one sample and records it, returning the stored metrics.
    pub fn sample(&mut self, monitor: &PerformanceMonitor) -> Vec<PerformanceMetric> {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu_percent = self.system.global_cpu_usage() as f64;
        let total = self.system.total_memory();
        let memory_percent = if total > 0 {
            self.system.used_memory() as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        log::trace!(
            "System sample for '{}': cpu {cpu_percent:.1}%, memory {memory_percent:.1}%",
            self.module
        );

        vec![
            monitor.record_metric(MetricKind::Cpu, &self.module, cpu_percent, "%"),
            monitor.record_metric(MetricKind::Memory, &self.module, memory_percent, "%"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitoringConfig;

    #[test]
    fn sample_records_cpu_and_memory() {
        let monitor = PerformanceMonitor::new(MonitoringConfig::default());
        let mut collector = SystemCollector::new("host");

        let metrics = collector.sample(&monitor);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].kind, MetricKind::Cpu);
        assert_eq!(metrics[1].kind, MetricKind::Memory);
        assert!(metrics.iter().all(|m| m.value >= 0.0 && m.value <= 100.0));
        assert_eq!(
            monitor
                .get_metrics(Some("host"), None, None, None)
                .len(),
            2
        );
    }
}
