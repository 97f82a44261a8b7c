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

//! Alert rules and materialized alerts.

use crate::metric::{MetricKind, MetricStats};
use serde::Serialize;
use std::fmt::{self, Display};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// How serious a breach is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Informational; no action expected.
    Info,
    /// Needs attention soon.
    Warning,
    /// Needs attention now.
    Critical,
}

impl Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        };
        write!(f, "{name}")
    }
}

/// The comparison a rule applies to the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    /// Breach when the current value exceeds the threshold.
    GreaterThan,
    /// Breach when the current value is below the threshold.
    LessThan,
    /// Breach when the current value equals the threshold.
    Equals,
    /// Breach when the current value differs from the threshold.
    NotEquals,
    /// Breach when the current value deviates from the buffered average by
    /// more than `threshold` percent.
    PercentageChange,
}

impl AlertCondition {
    /// Evaluates the condition against windowed statistics.
    pub fn is_breached(&self, stats: &MetricStats, threshold: f64) -> bool {
        match self {
            AlertCondition::GreaterThan => stats.current > threshold,
            AlertCondition::LessThan => stats.current < threshold,
            AlertCondition::Equals => (stats.current - threshold).abs() < 1e-9,
            AlertCondition::NotEquals => (stats.current - threshold).abs() >= 1e-9,
            AlertCondition::PercentageChange => {
                if stats.avg == 0.0 {
                    return false;
                }
                let change = (stats.current - stats.avg) / stats.avg * 100.0;
                change.abs() > threshold
            }
        }
    }
}

/// A standing threshold/duration condition over one metric kind.
///
/// Rules persist for the monitor's lifetime; disabling one stops new alerts
/// but does not retroactively clear existing ones.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRule {
    /// Generated identifier.
    pub id: String,
    /// Short operator-facing name.
    pub name: String,
    /// Longer description, used in alert messages.
    pub description: String,
    /// The metric kind this rule watches.
    pub kind: MetricKind,
    /// Restrict the rule to one module; `None` applies it fleet-wide.
    pub module: Option<String>,
    /// The comparison against `threshold`.
    pub condition: AlertCondition,
    /// The boundary value.
    pub threshold: f64,
    /// How long the breach must hold continuously before firing.
    pub duration: Duration,
    /// Severity of alerts this rule produces.
    pub severity: AlertSeverity,
    /// Disabled rules are skipped during evaluation.
    pub enabled: bool,
    /// Minimum interval between successive firings, measured from the last
    /// firing regardless of the previous alert's state.
    pub cooldown: Duration,
}

impl AlertRule {
    /// Creates an enabled rule with a generated id, no module scope, zero
    /// duration, and zero cooldown.
    pub fn new(
        name: impl Into<String>,
        kind: MetricKind,
        condition: AlertCondition,
        threshold: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            kind,
            module: None,
            condition,
            threshold,
            duration: Duration::ZERO,
            severity: AlertSeverity::Warning,
            enabled: true,
            cooldown: Duration::ZERO,
        }
    }

    /// Sets the description used in alert messages.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Scopes the rule to a single module.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Sets the minimum breach duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: AlertSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the re-fire cooldown.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Disables the rule.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Lifecycle state of an alert.
///
/// Legal transitions: `Active -> Acknowledged`, `Active -> Resolved`,
/// `Acknowledged -> Resolved`. Nothing returns to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Fired and unhandled.
    Active,
    /// An operator has seen it.
    Acknowledged,
    /// The breach is over, manually or automatically.
    Resolved,
}

/// A materialized breach of a rule.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// Generated identifier.
    pub id: String,
    /// The rule that fired.
    pub rule_id: String,
    /// The firing rule's name, denormalized for display.
    pub rule_name: String,
    /// Severity inherited from the rule.
    pub severity: AlertSeverity,
    /// Operator-facing description of the breach.
    pub message: String,
    /// Current lifecycle state.
    pub status: AlertStatus,
    /// When the rule fired.
    pub fired_at: SystemTime,
    /// When the alert was acknowledged, if it was.
    pub acknowledged_at: Option<SystemTime>,
    /// When the alert was resolved, if it was.
    pub resolved_at: Option<SystemTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(current: f64, avg: f64) -> MetricStats {
        MetricStats {
            current,
            min: current.min(avg),
            max: current.max(avg),
            avg,
            count: 5,
            trend: crate::metric::Trend::Stable,
        }
    }

    #[test]
    fn greater_and_less_than() {
        assert!(AlertCondition::GreaterThan.is_breached(&stats(81.0, 50.0), 80.0));
        assert!(!AlertCondition::GreaterThan.is_breached(&stats(80.0, 50.0), 80.0));
        assert!(AlertCondition::LessThan.is_breached(&stats(2.0, 5.0), 3.0));
    }

    #[test]
    fn equals_and_not_equals() {
        assert!(AlertCondition::Equals.is_breached(&stats(3.0, 3.0), 3.0));
        assert!(AlertCondition::NotEquals.is_breached(&stats(3.5, 3.0), 3.0));
    }

    #[test]
    fn percentage_change_compares_against_the_average() {
        // 150 is 50% above an average of 100.
        assert!(AlertCondition::PercentageChange.is_breached(&stats(150.0, 100.0), 40.0));
        assert!(!AlertCondition::PercentageChange.is_breached(&stats(150.0, 100.0), 60.0));
        // A zero average can never breach.
        assert!(!AlertCondition::PercentageChange.is_breached(&stats(10.0, 0.0), 1.0));
    }

    #[test]
    fn builder_produces_unique_ids() {
        let a = AlertRule::new("a", MetricKind::Cpu, AlertCondition::GreaterThan, 80.0);
        let b = AlertRule::new("b", MetricKind::Cpu, AlertCondition::GreaterThan, 80.0);
        assert_ne!(a.id, b.id);
        assert!(a.enabled);
        assert_eq!(a.duration, Duration::ZERO);
    }
}
