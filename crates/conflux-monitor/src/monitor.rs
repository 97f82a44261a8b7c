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

//! The performance monitor facade.

use crate::alert::{Alert, AlertRule, AlertSeverity, AlertStatus};
use crate::config::MonitoringConfig;
use crate::engine::AlertEngine;
use crate::metric::{MetricKind, MetricStats, PerformanceMetric};
use crate::notify::Notification;
use crossbeam_channel::{RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::SystemTime;
use uuid::Uuid;

/// Ingests numeric samples, evaluates alert rules on a background interval,
/// and dispatches notifications.
///
/// Construction is cheap and passive; [`initialize`](Self::initialize)
/// loads the default rule set and starts the periodic checker. Every
/// operation is safe to call concurrently with the checker: the mutable
/// core lives behind one mutex, and bounded-buffer append and eviction
/// happen as a single step under it.
pub struct PerformanceMonitor {
    config: MonitoringConfig,
    engine: Arc<Mutex<AlertEngine>>,
    running: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PerformanceMonitor {
    /// Creates a monitor from its configuration.
    pub fn new(config: MonitoringConfig) -> Self {
        let engine = AlertEngine::new(&config);
        Self {
            config,
            engine: Arc::new(Mutex::new(engine)),
            running: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Loads the default alert rules and starts the periodic checker.
    /// Calling it on a running monitor is a no-op.
    pub fn initialize(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        self.engine.lock().unwrap().load_default_rules();

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let engine = Arc::clone(&self.engine);
        let running = Arc::clone(&self.running);
        let interval = self.config.check_interval;

        let handle = thread::spawn(move || {
            log::info!("Alert checker started (interval {interval:?}).");
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => engine.lock().unwrap().check_rules(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            running.store(false, Ordering::SeqCst);
            log::info!("Alert checker stopped.");
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
    }

    /// Records one observation, returning the stored metric.
    pub fn record_metric(
        &self,
        kind: MetricKind,
        module: &str,
        value: f64,
        unit: &str,
    ) -> PerformanceMetric {
        let metric = PerformanceMetric {
            id: Uuid::new_v4().to_string(),
            timestamp: SystemTime::now(),
            kind,
            module: module.to_string(),
            value,
            unit: unit.to_string(),
        };
        self.engine.lock().unwrap().store.record(metric.clone());
        metric
    }

    /// Returns stored metrics filtered by module, kind, and inclusive time
    /// range, newest first.
    pub fn get_metrics(
        &self,
        module: Option<&str>,
        kind: Option<MetricKind>,
        from: Option<SystemTime>,
        to: Option<SystemTime>,
    ) -> Vec<PerformanceMetric> {
        self.engine.lock().unwrap().store.query(module, kind, from, to)
    }

    /// Statistics over the buffered window for one (module, kind) pair.
    pub fn get_metric_stats(&self, module: &str, kind: MetricKind) -> MetricStats {
        self.engine.lock().unwrap().store.stats(module, kind)
    }

    /// Adds a rule to the live set, returning its id.
    pub fn add_alert_rule(&self, rule: AlertRule) -> String {
        self.engine.lock().unwrap().add_rule(rule)
    }

    /// Removes a rule, returning whether a rule with that id existed.
    /// Existing alerts from the rule are not retroactively cleared.
    pub fn remove_alert_rule(&self, id: &str) -> bool {
        self.engine.lock().unwrap().remove_rule(id)
    }

    /// The current rule set, in no particular order.
    pub fn alert_rules(&self) -> Vec<AlertRule> {
        self.engine.lock().unwrap().rules()
    }

    /// Runs one rule evaluation pass immediately, outside the interval.
    pub fn check_now(&self) {
        self.engine.lock().unwrap().check_rules();
    }

    /// Alerts filtered by severity and status, newest first.
    pub fn get_alerts(
        &self,
        severity: Option<AlertSeverity>,
        status: Option<AlertStatus>,
    ) -> Vec<Alert> {
        self.engine.lock().unwrap().alerts(severity, status)
    }

    /// Alerts still in the `Active` state, newest first.
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.get_alerts(None, Some(AlertStatus::Active))
    }

    /// Every alert regardless of state, newest first.
    pub fn alert_history(&self) -> Vec<Alert> {
        self.get_alerts(None, None)
    }

    /// Marks an active alert as acknowledged. Returns `false` for unknown
    /// ids and for alerts already resolved.
    pub fn acknowledge_alert(&self, id: &str) -> bool {
        self.engine.lock().unwrap().acknowledge(id)
    }

    /// Resolves an alert from any state, stamping `resolved_at`. Returns
    /// `false` for unknown ids.
    pub fn resolve_alert(&self, id: &str) -> bool {
        self.engine.lock().unwrap().resolve(id)
    }

    /// The append-only log of delivery attempts.
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.engine.lock().unwrap().notifications()
    }

    /// Returns `true` while the periodic checker is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the periodic checker. Safe to call repeatedly; metrics,
    /// alerts, and notifications are retained.
    pub fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for PerformanceMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertCondition;
    use std::time::Duration;

    fn monitor() -> PerformanceMonitor {
        PerformanceMonitor::new(MonitoringConfig::default())
    }

    #[test]
    fn initialize_loads_default_rules_and_starts_the_checker() {
        let mut monitor = monitor();
        monitor.initialize();

        assert!(monitor.is_running());
        let rules = monitor.alert_rules();
        assert!(rules.iter().any(|r| r.name == "High CPU usage"));

        monitor.shutdown();
        assert!(!monitor.is_running());
    }

    #[test]
    fn record_metric_returns_the_stored_observation() {
        let monitor = monitor();
        let metric = monitor.record_metric(MetricKind::Cpu, "api", 75.5, "%");

        assert!(!metric.id.is_empty());
        assert_eq!(metric.kind, MetricKind::Cpu);
        assert_eq!(metric.module, "api");
        assert_eq!(metric.value, 75.5);
        assert_eq!(metric.unit, "%");
    }

    #[test]
    fn buffers_respect_the_configured_bound() {
        let monitor = PerformanceMonitor::new(MonitoringConfig {
            max_metrics: 100,
            ..Default::default()
        });
        for i in 0..150 {
            monitor.record_metric(MetricKind::Cpu, "api", i as f64, "%");
        }

        let metrics = monitor.get_metrics(Some("api"), Some(MetricKind::Cpu), None, None);
        assert_eq!(metrics.len(), 100);
    }

    #[test]
    fn stats_follow_the_recorded_sequence() {
        let monitor = monitor();
        for value in [50.0, 60.0, 70.0] {
            monitor.record_metric(MetricKind::Cpu, "m", value, "%");
        }

        let stats = monitor.get_metric_stats("m", MetricKind::Cpu);
        assert_eq!(stats.current, 70.0);
        assert_eq!(stats.min, 50.0);
        assert_eq!(stats.max, 70.0);
        assert!((stats.avg - 60.0).abs() < 1e-9);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.trend, crate::metric::Trend::Increasing);
    }

    #[test]
    fn background_checker_fires_rules_without_external_calls() {
        let mut monitor = PerformanceMonitor::new(MonitoringConfig {
            check_interval: Duration::from_millis(10),
            ..Default::default()
        });
        monitor.initialize();
        monitor.add_alert_rule(AlertRule::new(
            "hot",
            MetricKind::Cpu,
            AlertCondition::GreaterThan,
            80.0,
        ));
        monitor.record_metric(MetricKind::Cpu, "m", 95.0, "%");

        std::thread::sleep(Duration::from_millis(60));
        monitor.shutdown();

        assert!(!monitor.active_alerts().is_empty());
    }

    #[test]
    fn unknown_alert_ids_are_probed_not_thrown() {
        let monitor = monitor();
        assert!(!monitor.acknowledge_alert("ghost"));
        assert!(!monitor.resolve_alert("ghost"));
    }

    #[test]
    fn shutdown_twice_is_a_no_op() {
        let mut monitor = monitor();
        monitor.initialize();
        monitor.record_metric(MetricKind::Cpu, "m", 42.0, "%");

        monitor.shutdown();
        monitor.shutdown();

        // State survives shutdown; only the checker stops.
        assert_eq!(monitor.get_metrics(None, None, None, None).len(), 1);
    }
}
