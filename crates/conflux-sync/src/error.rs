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

//! Errors raised by the synchronization layer.

use thiserror::Error;

/// An error raised by the state synchronization manager.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// A module with the same name is already registered.
    #[error("module already registered: {0}")]
    AlreadyRegistered(String),

    /// The named module is not registered with the manager.
    #[error("module not registered: {0}")]
    ModuleNotRegistered(String),

    /// The module's state lock was poisoned by a panicking holder.
    #[error("state lock poisoned for module: {0}")]
    LockPoisoned(String),
}
