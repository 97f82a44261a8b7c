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

//! # Conflux Monitor
//!
//! Turns a stream of numeric samples into bounded statistics and
//! rule-driven alerts.
//!
//! The [`PerformanceMonitor`] ingests per-module observations into bounded
//! ring buffers, computes windowed statistics with trend detection,
//! evaluates standing alert rules with duration and cooldown semantics, and
//! dispatches notifications to configured channels. It is deliberately
//! independent of the rest of the workspace: any caller able to report a
//! number can be monitored.

#![warn(missing_docs)]

pub mod alert;
pub mod config;
mod engine;
pub mod error;
pub mod metric;
pub mod monitor;
pub mod notify;
pub mod store;
pub mod system;

pub use alert::{Alert, AlertCondition, AlertRule, AlertSeverity, AlertStatus};
pub use config::{
    ChannelsConfig, EmailConfig, MonitoringConfig, SlackConfig, SmsConfig, WebhookConfig,
};
pub use error::MonitorError;
pub use metric::{MetricKind, MetricStats, PerformanceMetric, Trend};
pub use monitor::PerformanceMonitor;
pub use notify::{ChannelKind, DeliveryStatus, Notification, NotificationChannel};
pub use system::SystemCollector;
