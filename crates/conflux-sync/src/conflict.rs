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

//! Conflict detection and pluggable resolution.
//!
//! State is opaque application data, so the manager never merges it; a
//! strategy only needs a total order over the two competing copies. Each
//! strategy is a pure decision `(source, target) -> winner`, which keeps new
//! strategies out of the sync loop entirely.

use serde_json::Value;
use std::time::SystemTime;

/// One side of a conflicting synchronization.
#[derive(Debug, Clone)]
pub struct SyncSide<'a> {
    /// Name of the module this state belongs to.
    pub module: &'a str,
    /// The competing state value.
    pub state: &'a Value,
    /// The state's version marker (`0` when absent).
    pub version: u64,
    /// When the manager last recorded a write for this module.
    pub updated_at: SystemTime,
}

/// Which side of a conflict supplies the surviving state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// The source's state is pushed to the target.
    Source,
    /// The target keeps its own state.
    Target,
}

/// A pure decision function selecting a winning state between two divergent
/// copies.
#[derive(Debug, Clone, Copy)]
pub enum ConflictResolutionStrategy {
    /// The side with the higher version marker wins.
    LastWriteWins,
    /// The side with the lower version marker wins.
    FirstWriteWins,
    /// A caller-supplied decision function.
    Custom(fn(&SyncSide<'_>, &SyncSide<'_>) -> Winner),
}

/// Applies the configured strategy to conflicting state pairs.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    strategy: ConflictResolutionStrategy,
}

impl ConflictResolver {
    /// Creates a resolver for `strategy`.
    pub fn new(strategy: ConflictResolutionStrategy) -> Self {
        Self { strategy }
    }

    /// Decides the winner between two conflicting sides.
    ///
    /// Ties on the version marker are broken deterministically: the side
    /// whose store entry was written more recently wins under
    /// `LastWriteWins` (the older write under `FirstWriteWins`), and a tie
    /// on the stamp falls back to the lexicographically smaller module name.
    pub fn resolve(&self, source: &SyncSide<'_>, target: &SyncSide<'_>) -> Winner {
        match self.strategy {
            ConflictResolutionStrategy::LastWriteWins => {
                Self::ordered(source, target, std::cmp::Ordering::Greater)
            }
            ConflictResolutionStrategy::FirstWriteWins => {
                Self::ordered(source, target, std::cmp::Ordering::Less)
            }
            ConflictResolutionStrategy::Custom(decide) => decide(source, target),
        }
    }

    fn ordered(
        source: &SyncSide<'_>,
        target: &SyncSide<'_>,
        preferred: std::cmp::Ordering,
    ) -> Winner {
        let by_version = source.version.cmp(&target.version);
        if by_version != std::cmp::Ordering::Equal {
            return if by_version == preferred {
                Winner::Source
            } else {
                Winner::Target
            };
        }

        let by_stamp = source.updated_at.cmp(&target.updated_at);
        if by_stamp != std::cmp::Ordering::Equal {
            return if by_stamp == preferred {
                Winner::Source
            } else {
                Winner::Target
            };
        }

        // Full tie: the lexicographically smaller module name wins.
        if source.module <= target.module {
            Winner::Source
        } else {
            Winner::Target
        }
    }
}

/// Extracts the numeric `version` marker from a state value, if present.
pub(crate) fn version_marker(state: &Value) -> Option<u64> {
    state.get("version").and_then(Value::as_u64)
}

/// Returns `true` when the two states are in conflict.
///
/// A conflict exists only when both sides carry a numeric `version` marker
/// and the push is not a plain fast-forward (the target's version is not
/// strictly older than the source's). Versionless or structurally equal
/// states never conflict.
pub(crate) fn detect_conflict(source: &Value, target: &Value) -> bool {
    if source == target {
        return false;
    }
    match (version_marker(source), version_marker(target)) {
        (Some(source_version), Some(target_version)) => target_version >= source_version,
        _ => false,
    }
}
