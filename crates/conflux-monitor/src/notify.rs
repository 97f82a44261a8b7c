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

//! Notification channels.
//!
//! Channels are opaque sinks: the monitor's only contract with them is
//! "attempt delivery, record sent or failed". A failed delivery is recorded
//! and logged, never raised to the caller.

use crate::alert::{Alert, AlertSeverity};
use crate::config::ChannelsConfig;
use crate::error::MonitorError;
use serde_json::json;
use std::fmt::{self, Display};
use std::time::SystemTime;

/// The delivery medium of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Email delivery.
    Email,
    /// Slack webhook delivery.
    Slack,
    /// Generic webhook delivery.
    Webhook,
    /// SMS delivery.
    Sms,
}

impl Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Email => "email",
            ChannelKind::Slack => "slack",
            ChannelKind::Webhook => "webhook",
            ChannelKind::Sms => "sms",
        };
        write!(f, "{name}")
    }
}

/// Whether a delivery attempt succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// The channel accepted the message.
    Sent,
    /// The channel rejected or could not take the message.
    Failed,
}

/// One recorded delivery attempt. Append-only.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Notification {
    /// The alert being delivered.
    pub alert_id: String,
    /// The medium used.
    pub channel: ChannelKind,
    /// Address, webhook URL, or phone number.
    pub recipient: String,
    /// The rendered message.
    pub message: String,
    /// When the attempt was made.
    pub sent_at: SystemTime,
    /// Outcome of the attempt.
    pub status: DeliveryStatus,
}

/// An opaque delivery sink for alerts.
pub trait NotificationChannel: Send {
    /// The channel's medium.
    fn kind(&self) -> ChannelKind;

    /// Attempts delivery of `alert`, returning one record per recipient.
    fn deliver(&self, alert: &Alert) -> Vec<Notification>;
}

fn record(alert: &Alert, channel: ChannelKind, recipient: &str, message: String, status: DeliveryStatus) -> Notification {
    Notification {
        alert_id: alert.id.clone(),
        channel,
        recipient: recipient.to_string(),
        message,
        sent_at: SystemTime::now(),
        status,
    }
}

fn failed(alert: &Alert, channel: ChannelKind, recipient: &str, message: String, reason: &str) -> Notification {
    let error = MonitorError::DeliveryFailed {
        channel: channel.to_string(),
        reason: reason.to_string(),
    };
    log::warn!("{error}");
    record(alert, channel, recipient, message, DeliveryStatus::Failed)
}

/// Email sink. Renders a severity-tagged subject line per recipient.
pub struct EmailChannel {
    from: String,
    recipients: Vec<String>,
}

impl EmailChannel {
    /// Creates the sink from its settings.
    pub fn new(from: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            from: from.into(),
            recipients,
        }
    }
}

impl NotificationChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    fn deliver(&self, alert: &Alert) -> Vec<Notification> {
        let subject = format!(
            "[{}] {}",
            alert.severity.to_string().to_uppercase(),
            alert.rule_name
        );
        self.recipients
            .iter()
            .map(|recipient| {
                if recipient.is_empty() {
                    return failed(
                        alert,
                        ChannelKind::Email,
                        recipient,
                        alert.message.clone(),
                        "empty recipient address",
                    );
                }
                log::info!("Email to {recipient} (from {}): {subject}", self.from);
                record(
                    alert,
                    ChannelKind::Email,
                    recipient,
                    alert.message.clone(),
                    DeliveryStatus::Sent,
                )
            })
            .collect()
    }
}

/// Slack sink. Renders a color-coded attachment to an incoming webhook.
pub struct SlackChannel {
    webhook_url: String,
}

impl SlackChannel {
    /// Creates the sink from its webhook URL.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
        }
    }

    fn color(severity: AlertSeverity) -> &'static str {
        match severity {
            AlertSeverity::Critical => "#ff0000",
            AlertSeverity::Warning => "#ffaa00",
            AlertSeverity::Info => "#0000ff",
        }
    }
}

impl NotificationChannel for SlackChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Slack
    }

    fn deliver(&self, alert: &Alert) -> Vec<Notification> {
        if self.webhook_url.is_empty() {
            return vec![failed(
                alert,
                ChannelKind::Slack,
                &self.webhook_url,
                alert.message.clone(),
                "no webhook URL configured",
            )];
        }

        let payload = json!({
            "text": format!("[{}] {}", alert.severity.to_string().to_uppercase(), alert.rule_name),
            "attachments": [{
                "color": Self::color(alert.severity),
                "fields": [
                    {"title": "severity", "value": alert.severity.to_string(), "short": true},
                    {"title": "message", "value": alert.message, "short": false},
                ],
            }],
        });
        log::info!("Slack notification to {}: {payload}", self.webhook_url);

        vec![record(
            alert,
            ChannelKind::Slack,
            &self.webhook_url,
            alert.message.clone(),
            DeliveryStatus::Sent,
        )]
    }
}

/// Generic webhook sink. Posts the alert as a JSON payload.
pub struct WebhookChannel {
    url: String,
}

impl WebhookChannel {
    /// Creates the sink from its endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl NotificationChannel for WebhookChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    fn deliver(&self, alert: &Alert) -> Vec<Notification> {
        if self.url.is_empty() {
            return vec![failed(
                alert,
                ChannelKind::Webhook,
                &self.url,
                alert.message.clone(),
                "no endpoint URL configured",
            )];
        }

        let payload = json!({
            "alert_id": alert.id,
            "rule_id": alert.rule_id,
            "rule_name": alert.rule_name,
            "severity": alert.severity,
            "message": alert.message,
            "status": alert.status,
        });
        log::info!("Webhook notification to {}: {payload}", self.url);

        vec![record(
            alert,
            ChannelKind::Webhook,
            &self.url,
            alert.message.clone(),
            DeliveryStatus::Sent,
        )]
    }
}

/// SMS sink. Renders a short text per recipient.
pub struct SmsChannel {
    recipients: Vec<String>,
}

impl SmsChannel {
    /// Creates the sink from its recipient list.
    pub fn new(recipients: Vec<String>) -> Self {
        Self { recipients }
    }
}

impl NotificationChannel for SmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    fn deliver(&self, alert: &Alert) -> Vec<Notification> {
        // SMS bodies are kept short; the full context lives in the alert.
        let mut text = format!("{}: {}", alert.rule_name, alert.message);
        text.truncate(160);

        self.recipients
            .iter()
            .map(|recipient| {
                if recipient.is_empty() {
                    return failed(
                        alert,
                        ChannelKind::Sms,
                        recipient,
                        text.clone(),
                        "empty recipient number",
                    );
                }
                log::info!("SMS to {recipient}: {text}");
                record(alert, ChannelKind::Sms, recipient, text.clone(), DeliveryStatus::Sent)
            })
            .collect()
    }
}

/// Builds the enabled sinks from the channel configuration.
pub(crate) fn build_channels(config: &ChannelsConfig) -> Vec<Box<dyn NotificationChannel>> {
    let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();
    if let Some(email) = &config.email {
        channels.push(Box::new(EmailChannel::new(
            email.from.clone(),
            email.recipients.clone(),
        )));
    }
    if let Some(slack) = &config.slack {
        channels.push(Box::new(SlackChannel::new(slack.webhook_url.clone())));
    }
    if let Some(webhook) = &config.webhook {
        channels.push(Box::new(WebhookChannel::new(webhook.url.clone())));
    }
    if let Some(sms) = &config.sms {
        channels.push(Box::new(SmsChannel::new(sms.recipients.clone())));
    }
    channels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertStatus;

    fn alert() -> Alert {
        Alert {
            id: "a-1".to_string(),
            rule_id: "r-1".to_string(),
            rule_name: "High CPU usage".to_string(),
            severity: AlertSeverity::Critical,
            message: "CPU usage above 80%: current 95, threshold 80".to_string(),
            status: AlertStatus::Active,
            fired_at: SystemTime::now(),
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn email_records_one_notification_per_recipient() {
        let channel = EmailChannel::new(
            "alerts@example.com",
            vec!["ops@example.com".to_string(), "dev@example.com".to_string()],
        );

        let notifications = channel.deliver(&alert());

        assert_eq!(notifications.len(), 2);
        assert!(notifications
            .iter()
            .all(|n| n.status == DeliveryStatus::Sent && n.channel == ChannelKind::Email));
    }

    #[test]
    fn empty_webhook_url_records_a_failure() {
        let channel = WebhookChannel::new("");
        let notifications = channel.deliver(&alert());

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].status, DeliveryStatus::Failed);
    }

    #[test]
    fn slack_delivery_is_recorded_as_sent() {
        let channel = SlackChannel::new("https://hooks.slack.example/T000/B000");
        let notifications = channel.deliver(&alert());

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].status, DeliveryStatus::Sent);
        assert_eq!(notifications[0].alert_id, "a-1");
    }

    #[test]
    fn sms_text_is_truncated() {
        let channel = SmsChannel::new(vec!["+15550100".to_string()]);
        let mut long = alert();
        long.message = "x".repeat(500);

        let notifications = channel.deliver(&long);
        assert!(notifications[0].message.len() <= 160);
    }

    #[test]
    fn channels_are_built_from_present_configs_only() {
        let config = ChannelsConfig {
            webhook: Some(crate::config::WebhookConfig {
                url: "https://example.com/hook".to_string(),
            }),
            ..Default::default()
        };

        let channels = build_channels(&config);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].kind(), ChannelKind::Webhook);
    }
}
