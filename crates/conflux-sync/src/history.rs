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

//! Bounded, per-pair synchronization history.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::SystemTime;

/// Terminal status of a synchronization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// The winning state reached the target.
    Completed,
    /// The attempt failed; the target was left untouched.
    Failed,
}

/// One recorded outcome of a synchronization attempt.
#[derive(Debug, Clone, Serialize)]
pub struct SyncRecord {
    /// Generated identifier for this attempt.
    pub sync_id: String,
    /// The module whose state was pushed.
    pub source_module: String,
    /// The module that received the winning state.
    pub target_module: String,
    /// When the attempt finished.
    pub timestamp: SystemTime,
    /// Whether the attempt completed.
    pub success: bool,
    /// Terminal status of the attempt.
    pub status: SyncStatus,
    /// Whether the two states were in conflict.
    pub conflict_detected: bool,
    /// Name of the module whose state won, when a conflict was resolved.
    pub winner: Option<String>,
}

/// Append-ordered history lists keyed by (source, target), each bounded at
/// `max_size` with FIFO eviction.
#[derive(Debug)]
pub struct SyncHistory {
    max_size: usize,
    records: HashMap<(String, String), VecDeque<SyncRecord>>,
}

impl SyncHistory {
    /// Creates an empty history bounded at `max_size` records per pair.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            records: HashMap::new(),
        }
    }

    /// Appends a record for its (source, target) pair, evicting the oldest
    /// entry for that pair once the bound is exceeded.
    pub fn push(&mut self, record: SyncRecord) {
        let key = (record.source_module.clone(), record.target_module.clone());
        let list = self.records.entry(key).or_default();
        if list.len() == self.max_size {
            list.pop_front();
        }
        list.push_back(record);
    }

    /// Returns the history for an ordered pair, oldest first. Empty if the
    /// pair never synchronized.
    pub fn for_pair(&self, source: &str, target: &str) -> Vec<SyncRecord> {
        self.records
            .get(&(source.to_string(), target.to_string()))
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
