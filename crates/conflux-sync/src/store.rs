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

//! The manager's internal copy of each registered module's state.

use serde_json::Value;
use std::collections::HashMap;
use std::time::SystemTime;

/// A stored state value plus its last-write stamp.
///
/// The stamp doubles as the secondary key when two conflicting states carry
/// identical version markers.
#[derive(Debug, Clone)]
pub struct StoredState {
    /// The captured state value.
    pub value: Value,
    /// When this entry was last written.
    pub updated_at: SystemTime,
}

/// Name-keyed storage of captured module states.
#[derive(Debug, Default)]
pub struct StateStore {
    entries: HashMap<String, StoredState>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the stored state for `module`, if any.
    pub fn get(&self, module: &str) -> Option<&StoredState> {
        self.entries.get(module)
    }

    /// Writes `value` for `module`, stamping the entry with the current time.
    pub fn set(&mut self, module: impl Into<String>, value: Value) {
        self.entries.insert(
            module.into(),
            StoredState {
                value,
                updated_at: SystemTime::now(),
            },
        );
    }

    /// Removes the entry for `module`, if any.
    pub fn remove(&mut self, module: &str) {
        self.entries.remove(module);
    }

    /// Returns `true` when an entry exists for `module`.
    pub fn contains(&self, module: &str) -> bool {
        self.entries.contains_key(module)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_round_trips() {
        let mut store = StateStore::new();
        store.set("analytics", json!({"rows": 10}));

        let stored = store.get("analytics").unwrap();
        assert_eq!(stored.value, json!({"rows": 10}));
        assert!(store.contains("analytics"));
    }

    #[test]
    fn overwrite_refreshes_the_stamp() {
        let mut store = StateStore::new();
        store.set("m", json!(1));
        let first = store.get("m").unwrap().updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));

        store.set("m", json!(2));
        let second = store.get("m").unwrap();
        assert_eq!(second.value, json!(2));
        assert!(second.updated_at > first);
    }

    #[test]
    fn remove_unknown_is_a_no_op() {
        let mut store = StateStore::new();
        store.remove("ghost");
        assert!(store.is_empty());
    }
}
