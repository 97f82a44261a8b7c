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

//! Bounded retry with exponential backoff.

use std::thread;
use std::time::Duration;

/// Retry parameters for a delivery attempt.
///
/// The backoff doubles after each failed attempt: `backoff`, `2*backoff`,
/// `4*backoff`, ...
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` means try exactly once.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Runs `operation` until it succeeds or the retry budget is exhausted,
    /// sleeping between attempts. Returns the last error on exhaustion.
    pub fn execute<T, E>(&self, mut operation: impl FnMut() -> Result<T, E>) -> Result<T, E> {
        let mut attempt = 0;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(_) if attempt < self.max_retries => {
                    let delay = self.backoff * 2u32.saturating_pow(attempt);
                    log::debug!("Attempt {} failed, retrying in {delay:?}.", attempt + 1);
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_without_retry() {
        let policy = RetryPolicy::none();
        let result: Result<u32, &str> = policy.execute(|| Ok(5));
        assert_eq!(result, Ok(5));
    }

    #[test]
    fn retries_until_success() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(1),
        };
        let mut calls = 0;
        let result: Result<u32, &str> = policy.execute(|| {
            calls += 1;
            if calls < 3 {
                Err("not yet")
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result, Ok(3));
    }

    #[test]
    fn returns_last_error_when_budget_exhausted() {
        let policy = RetryPolicy {
            max_retries: 2,
            backoff: Duration::from_millis(1),
        };
        let mut calls = 0;
        let result: Result<u32, u32> = policy.execute(|| {
            calls += 1;
            Err(calls)
        });

        assert_eq!(result, Err(3));
        assert_eq!(calls, 3);
    }
}
