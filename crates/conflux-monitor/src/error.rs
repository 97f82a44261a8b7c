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

//! Errors raised by the monitoring layer.

use thiserror::Error;

/// An error raised by the performance monitor.
///
/// Routine probes (unknown alert or rule ids) return sentinels instead of
/// this type; these variants cover genuine misuse and internal faults.
#[derive(Debug, Clone, Error)]
pub enum MonitorError {
    /// A notification channel failed to deliver. Recorded, never thrown
    /// from the monitor's public surface.
    #[error("notification delivery failed on {channel}: {reason}")]
    DeliveryFailed {
        /// The channel that failed.
        channel: String,
        /// Why delivery failed.
        reason: String,
    },

    /// The monitor's internal lock was poisoned by a panicking holder.
    #[error("monitor state lock poisoned")]
    StatePoisoned,
}
