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

//! # Conflux Sync
//!
//! Keeps the externally observable state of registered modules convergent.
//!
//! The [`StateSyncManager`] attaches to anything implementing
//! [`StateAccess`](conflux_core::StateAccess), performs pairwise or
//! fleet-wide synchronization with pluggable conflict resolution, keeps a
//! bounded per-pair history of outcomes, and supports point-in-time
//! snapshots of the whole fleet.

#![warn(missing_docs)]

pub mod config;
pub mod conflict;
pub mod error;
pub mod events;
pub mod history;
pub mod manager;
pub mod metrics;
pub mod scheduler;
pub mod store;

pub use config::StateSyncConfig;
pub use conflict::{ConflictResolutionStrategy, ConflictResolver, SyncSide, Winner};
pub use error::SyncError;
pub use events::StateChangeEvent;
pub use history::{SyncRecord, SyncStatus};
pub use manager::{StateSnapshot, StateSyncManager, SyncOutcome};
pub use metrics::SyncMetrics;
