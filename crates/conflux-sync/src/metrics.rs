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

//! Aggregate synchronization counters.

use serde::Serialize;

/// Counters accumulated across every synchronization attempt.
#[derive(Debug, Clone, Default)]
pub(crate) struct SyncCounters {
    pub total_syncs: u64,
    pub successful_syncs: u64,
    pub failed_syncs: u64,
    pub conflicts: u64,
    pub total_duration_ms: f64,
}

impl SyncCounters {
    pub fn record(&mut self, success: bool, conflict: bool, duration_ms: f64) {
        self.total_syncs += 1;
        if success {
            self.successful_syncs += 1;
        } else {
            self.failed_syncs += 1;
        }
        if conflict {
            self.conflicts += 1;
        }
        self.total_duration_ms += duration_ms;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A snapshot of the manager's aggregate counters.
#[derive(Debug, Clone, Serialize)]
pub struct SyncMetrics {
    /// Synchronization attempts, successful or not.
    pub total_syncs: u64,
    /// Attempts whose winning state reached the target.
    pub successful_syncs: u64,
    /// Attempts that failed.
    pub failed_syncs: u64,
    /// Share of attempts that detected a conflict, in `[0, 1]`.
    pub conflict_rate: f64,
    /// Mean attempt duration in milliseconds.
    pub average_duration_ms: f64,
    /// Currently registered modules.
    pub registered_modules: usize,
}

impl SyncMetrics {
    pub(crate) fn from_counters(counters: &SyncCounters, registered_modules: usize) -> Self {
        let total = counters.total_syncs;
        Self {
            total_syncs: total,
            successful_syncs: counters.successful_syncs,
            failed_syncs: counters.failed_syncs,
            conflict_rate: if total > 0 {
                counters.conflicts as f64 / total as f64
            } else {
                0.0
            },
            average_duration_ms: if total > 0 {
                counters.total_duration_ms / total as f64
            } else {
                0.0
            },
            registered_modules,
        }
    }
}
