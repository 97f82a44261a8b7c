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

//! Drives the monitor end to end: samples, a rule, an alert, notifications.
//!
//! Run with `RUST_LOG=info cargo run --example alerting`.

use conflux_monitor::{
    AlertCondition, AlertRule, ChannelsConfig, MetricKind, MonitoringConfig, PerformanceMonitor,
    WebhookConfig,
};
use std::time::Duration;

fn main() {
    env_logger::init();

    let mut monitor = PerformanceMonitor::new(MonitoringConfig {
        check_interval: Duration::from_millis(100),
        channels: ChannelsConfig {
            webhook: Some(WebhookConfig {
                url: "https://example.com/alerts".to_string(),
            }),
            ..Default::default()
        },
        ..Default::default()
    });
    monitor.initialize();

    monitor.add_alert_rule(
        AlertRule::new("Queue latency", MetricKind::ResponseTime, AlertCondition::GreaterThan, 250.0)
            .with_description("Queue latency above 250ms")
            .with_cooldown(Duration::from_secs(5)),
    );

    for latency in [120.0, 180.0, 310.0, 420.0] {
        monitor.record_metric(MetricKind::ResponseTime, "queue", latency, "ms");
        std::thread::sleep(Duration::from_millis(150));
    }

    let stats = monitor.get_metric_stats("queue", MetricKind::ResponseTime);
    println!("latency stats: {stats:?}");

    for alert in monitor.alert_history() {
        println!("alert [{}] {}", alert.severity, alert.message);
    }
    for notification in monitor.get_notifications() {
        println!(
            "notification via {} to {}: {:?}",
            notification.channel, notification.recipient, notification.status
        );
    }

    monitor.shutdown();
}
