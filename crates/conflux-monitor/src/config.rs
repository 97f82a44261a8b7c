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

//! Configuration for the performance monitor.

use std::time::Duration;

/// Construction-time configuration for
/// [`PerformanceMonitor`](crate::PerformanceMonitor).
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Bound on each (module, kind) metric buffer; oldest samples are
    /// evicted first.
    pub max_metrics: usize,
    /// Bound on the alert store; the oldest alert is evicted past it.
    pub max_alerts: usize,
    /// Interval between rule evaluation passes.
    pub check_interval: Duration,
    /// Automatically resolve active alerts whose condition stopped
    /// breaching.
    pub enable_auto_resolution: bool,
    /// Delivery channels for alert notifications; an absent channel is
    /// disabled.
    pub channels: ChannelsConfig,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_metrics: 10_000,
            max_alerts: 1_000,
            check_interval: Duration::from_secs(60),
            enable_auto_resolution: true,
            channels: ChannelsConfig::default(),
        }
    }
}

/// Per-channel delivery configuration.
#[derive(Debug, Clone, Default)]
pub struct ChannelsConfig {
    /// Email delivery, when configured.
    pub email: Option<EmailConfig>,
    /// Slack delivery, when configured.
    pub slack: Option<SlackConfig>,
    /// Generic webhook delivery, when configured.
    pub webhook: Option<WebhookConfig>,
    /// SMS delivery, when configured.
    pub sms: Option<SmsConfig>,
}

/// Email channel settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Sender address.
    pub from: String,
    /// Recipient addresses; one notification is recorded per recipient.
    pub recipients: Vec<String>,
}

/// Slack channel settings.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Incoming-webhook URL.
    pub webhook_url: String,
}

/// Generic webhook channel settings.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint receiving the JSON alert payload.
    pub url: String,
}

/// SMS channel settings.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Recipient phone numbers.
    pub recipients: Vec<String>,
}
