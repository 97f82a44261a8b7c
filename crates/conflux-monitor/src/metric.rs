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

//! Metric observations and windowed statistics.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::time::SystemTime;

/// The category of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Processor utilization.
    Cpu,
    /// Memory utilization.
    Memory,
    /// Request/response latency.
    ResponseTime,
    /// Work completed per unit time.
    Throughput,
    /// Share of failing operations.
    ErrorRate,
    /// Anything the caller defines.
    Custom,
}

impl MetricKind {
    /// Returns the wire-friendly name of the kind (e.g. `"cpu"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::ResponseTime => "response_time",
            MetricKind::Throughput => "throughput",
            MetricKind::ErrorRate => "error_rate",
            MetricKind::Custom => "custom",
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One numeric observation reported by a module.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetric {
    /// Generated identifier.
    pub id: String,
    /// When the observation was recorded.
    pub timestamp: SystemTime,
    /// The observation's category.
    pub kind: MetricKind,
    /// The reporting module.
    pub module: String,
    /// The observed value.
    pub value: f64,
    /// Unit of measurement (e.g. `"%"`, `"ms"`).
    pub unit: String,
}

/// Qualitative direction of a metric's buffered history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Values are generally rising beyond the tolerance.
    Increasing,
    /// Values are generally falling beyond the tolerance.
    Decreasing,
    /// No clear direction.
    Stable,
}

impl Trend {
    /// Returns the wire-friendly name of the trend (e.g. `"increasing"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slopes within this tolerance count as stable.
const TREND_TOLERANCE: f64 = 0.1;

/// How many of the most recent samples the trend looks at.
const TREND_WINDOW: usize = 5;

/// Statistics over one (module, kind) buffer.
#[derive(Debug, Clone, Serialize)]
pub struct MetricStats {
    /// The most recent value, `0.0` with no samples.
    pub current: f64,
    /// Smallest buffered value.
    pub min: f64,
    /// Largest buffered value.
    pub max: f64,
    /// Mean of the buffered values.
    pub avg: f64,
    /// Number of buffered samples.
    pub count: usize,
    /// Direction of the recent history.
    pub trend: Trend,
}

impl MetricStats {
    /// The all-zero statistics reported for an empty buffer.
    pub fn empty() -> Self {
        Self {
            current: 0.0,
            min: 0.0,
            max: 0.0,
            avg: 0.0,
            count: 0,
            trend: Trend::Stable,
        }
    }

    /// Computes statistics over chronologically ordered values.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let current = values[values.len() - 1];
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;

        let trend = if values.len() >= 3 {
            let window = &values[values.len().saturating_sub(TREND_WINDOW)..];
            let slope = (window[window.len() - 1] - window[0]) / window.len() as f64;
            if slope > TREND_TOLERANCE {
                Trend::Increasing
            } else if slope < -TREND_TOLERANCE {
                Trend::Decreasing
            } else {
                Trend::Stable
            }
        } else {
            Trend::Stable
        };

        Self {
            current,
            min,
            max,
            avg,
            count: values.len(),
            trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_all_zero_and_stable() {
        let stats = MetricStats::from_values(&[]);
        assert_eq!(stats.current, 0.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.avg, 0.0);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.trend, Trend::Stable);
    }

    #[test]
    fn rising_sequence_trends_increasing() {
        let stats = MetricStats::from_values(&[50.0, 60.0, 70.0]);
        assert_eq!(stats.current, 70.0);
        assert_eq!(stats.min, 50.0);
        assert_eq!(stats.max, 70.0);
        assert!((stats.avg - 60.0).abs() < 1e-9);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.trend, Trend::Increasing);
    }

    #[test]
    fn falling_sequence_trends_decreasing() {
        let stats = MetricStats::from_values(&[70.0, 60.0, 50.0]);
        assert_eq!(stats.trend, Trend::Decreasing);
    }

    #[test]
    fn flat_sequence_is_stable() {
        let stats = MetricStats::from_values(&[55.0, 55.1, 55.0, 55.05]);
        assert_eq!(stats.trend, Trend::Stable);
    }

    #[test]
    fn fewer_than_three_samples_never_trend() {
        let stats = MetricStats::from_values(&[1.0, 100.0]);
        assert_eq!(stats.trend, Trend::Stable);
    }

    #[test]
    fn trend_only_looks_at_the_recent_window() {
        // A long-ago spike must not mask the recent climb.
        let stats = MetricStats::from_values(&[500.0, 1.0, 2.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(stats.trend, Trend::Increasing);
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(MetricKind::ResponseTime.as_str(), "response_time");
        assert_eq!(MetricKind::ErrorRate.to_string(), "error_rate");
    }
}
