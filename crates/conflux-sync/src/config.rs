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

//! Configuration for the state synchronization manager.

use crate::conflict::ConflictResolutionStrategy;
use std::time::Duration;

/// Construction-time configuration for
/// [`StateSyncManager`](crate::StateSyncManager).
#[derive(Debug, Clone)]
pub struct StateSyncConfig {
    /// Run [`sync_all`](crate::StateSyncManager::sync_all) on a background
    /// interval without external calls.
    pub enable_auto_sync: bool,
    /// Interval between automatic fleet synchronizations.
    pub sync_interval: Duration,
    /// How competing states are resolved when they conflict.
    pub conflict_resolution: ConflictResolutionStrategy,
    /// Keep per-pair sync outcome history.
    pub enable_history: bool,
    /// Bound on each (source, target) history list; oldest entries are
    /// evicted first.
    pub max_history_size: usize,
}

impl Default for StateSyncConfig {
    fn default() -> Self {
        Self {
            enable_auto_sync: false,
            sync_interval: Duration::from_secs(30),
            conflict_resolution: ConflictResolutionStrategy::LastWriteWins,
            enable_history: true,
            max_history_size: 100,
        }
    }
}
