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

//! Rule evaluation: breach hysteresis, cooldown, and the alert store.

use crate::alert::{Alert, AlertRule, AlertSeverity, AlertStatus};
use crate::config::MonitoringConfig;
use crate::metric::MetricStats;
use crate::notify::{build_channels, Notification, NotificationChannel};
use crate::store::MetricStore;
use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime};
use uuid::Uuid;

/// The monitor's mutable core: metric buffers, rules, alerts, and the
/// notification log. One logical owner; the facade and the checker thread
/// share it behind a single mutex.
pub(crate) struct AlertEngine {
    pub(crate) store: MetricStore,
    rules: HashMap<String, AlertRule>,
    alerts: HashMap<String, Alert>,
    notifications: Vec<Notification>,
    channels: Vec<Box<dyn NotificationChannel>>,
    /// Per rule: when the current uninterrupted breach started.
    breach_since: HashMap<String, Instant>,
    /// Per rule: when it last fired, for cooldown accounting. Independent
    /// of the produced alert's lifecycle.
    last_fired: HashMap<String, Instant>,
    max_alerts: usize,
    enable_auto_resolution: bool,
}

impl AlertEngine {
    pub fn new(config: &MonitoringConfig) -> Self {
        Self {
            store: MetricStore::new(config.max_metrics),
            rules: HashMap::new(),
            alerts: HashMap::new(),
            notifications: Vec::new(),
            channels: build_channels(&config.channels),
            breach_since: HashMap::new(),
            last_fired: HashMap::new(),
            max_alerts: config.max_alerts,
            enable_auto_resolution: config.enable_auto_resolution,
        }
    }

    pub fn add_rule(&mut self, rule: AlertRule) -> String {
        let id = rule.id.clone();
        self.rules.insert(id.clone(), rule);
        id
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        self.breach_since.remove(id);
        self.rules.remove(id).is_some()
    }

    pub fn rules(&self) -> Vec<AlertRule> {
        self.rules.values().cloned().collect()
    }

    /// The default rule set loaded at initialization.
    pub fn load_default_rules(&mut self) {
        use crate::alert::AlertCondition::GreaterThan;
        use crate::metric::MetricKind;

        let five_minutes = Duration::from_secs(300);
        let ten_minutes = Duration::from_secs(600);

        self.add_rule(
            AlertRule::new("High CPU usage", MetricKind::Cpu, GreaterThan, 80.0)
                .with_description("CPU usage above 80%")
                .with_duration(five_minutes)
                .with_severity(AlertSeverity::Warning)
                .with_cooldown(ten_minutes),
        );
        self.add_rule(
            AlertRule::new("High memory usage", MetricKind::Memory, GreaterThan, 90.0)
                .with_description("Memory usage above 90%")
                .with_duration(five_minutes)
                .with_severity(AlertSeverity::Critical)
                .with_cooldown(ten_minutes),
        );
        self.add_rule(
            AlertRule::new(
                "Slow response time",
                MetricKind::ResponseTime,
                GreaterThan,
                5000.0,
            )
            .with_description("Response time above 5s")
            .with_duration(five_minutes)
            .with_severity(AlertSeverity::Warning)
            .with_cooldown(ten_minutes),
        );
        self.add_rule(
            AlertRule::new("High error rate", MetricKind::ErrorRate, GreaterThan, 5.0)
                .with_description("Error rate above 5%")
                .with_duration(five_minutes)
                .with_severity(AlertSeverity::Critical)
                .with_cooldown(ten_minutes),
        );
    }

    /// One evaluation pass over every enabled rule.
    ///
    /// A breach must hold uninterrupted for the rule's `duration` before it
    /// fires, and re-firing is suppressed until `cooldown` has elapsed
    /// since the rule last fired. A failure while evaluating one rule never
    /// stops the rest of the pass.
    pub fn check_rules(&mut self) {
        let now = Instant::now();
        let rules: Vec<AlertRule> = self.rules.values().cloned().collect();

        for rule in rules {
            if !rule.enabled {
                self.breach_since.remove(&rule.id);
                continue;
            }

            let stats = self.store.stats_scoped(rule.module.as_deref(), rule.kind);
            let breached = stats.count > 0 && rule.condition.is_breached(&stats, rule.threshold);

            if breached {
                let since = *self.breach_since.entry(rule.id.clone()).or_insert(now);
                if now.duration_since(since) < rule.duration {
                    continue;
                }
                let cooled_down = self
                    .last_fired
                    .get(&rule.id)
                    .map(|fired| now.duration_since(*fired) >= rule.cooldown)
                    .unwrap_or(true);
                if cooled_down {
                    self.fire(&rule, &stats);
                    self.last_fired.insert(rule.id.clone(), now);
                }
            } else {
                self.breach_since.remove(&rule.id);
                if self.enable_auto_resolution {
                    self.auto_resolve(&rule.id);
                }
            }
        }
    }

    fn fire(&mut self, rule: &AlertRule, stats: &MetricStats) {
        let description = if rule.description.is_empty() {
            &rule.name
        } else {
            &rule.description
        };
        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            severity: rule.severity,
            message: format!(
                "{description}: current {:.2}, threshold {:.2}, trend {}",
                stats.current, rule.threshold, stats.trend
            ),
            status: AlertStatus::Active,
            fired_at: SystemTime::now(),
            acknowledged_at: None,
            resolved_at: None,
        };
        log::warn!("Alert fired ({}): {}", alert.severity, alert.message);

        for channel in &self.channels {
            self.notifications.extend(channel.deliver(&alert));
        }

        self.alerts.insert(alert.id.clone(), alert);
        if self.alerts.len() > self.max_alerts {
            self.evict_oldest_alert();
        }
    }

    fn evict_oldest_alert(&mut self) {
        let oldest = self
            .alerts
            .values()
            .min_by_key(|alert| alert.fired_at)
            .map(|alert| alert.id.clone());
        if let Some(id) = oldest {
            self.alerts.remove(&id);
        }
    }

    /// Resolves active alerts of a rule whose condition stopped breaching.
    /// Acknowledged alerts are left for the operator.
    fn auto_resolve(&mut self, rule_id: &str) {
        for alert in self.alerts.values_mut() {
            if alert.rule_id == rule_id && alert.status == AlertStatus::Active {
                alert.status = AlertStatus::Resolved;
                alert.resolved_at = Some(SystemTime::now());
                log::info!("Alert {} auto-resolved.", alert.id);
            }
        }
    }

    pub fn alerts(
        &self,
        severity: Option<AlertSeverity>,
        status: Option<AlertStatus>,
    ) -> Vec<Alert> {
        let mut result: Vec<Alert> = self
            .alerts
            .values()
            .filter(|alert| {
                severity.map(|s| alert.severity == s).unwrap_or(true)
                    && status.map(|s| alert.status == s).unwrap_or(true)
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.fired_at.cmp(&a.fired_at));
        result
    }

    pub fn acknowledge(&mut self, id: &str) -> bool {
        match self.alerts.get_mut(id) {
            Some(alert) if alert.status == AlertStatus::Active => {
                alert.status = AlertStatus::Acknowledged;
                alert.acknowledged_at = Some(SystemTime::now());
                true
            }
            Some(alert) => alert.status == AlertStatus::Acknowledged,
            None => false,
        }
    }

    pub fn resolve(&mut self, id: &str) -> bool {
        match self.alerts.get_mut(id) {
            Some(alert) => {
                if alert.status != AlertStatus::Resolved {
                    alert.status = AlertStatus::Resolved;
                    alert.resolved_at = Some(SystemTime::now());
                }
                true
            }
            None => false,
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.clone()
    }
}
