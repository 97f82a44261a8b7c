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

//! The interval worker behind automatic synchronization.

use crossbeam_channel::{RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Runs a task on a fixed interval on a background thread.
///
/// The worker parks on a channel between ticks, so [`stop`](Self::stop)
/// takes effect immediately instead of waiting out the interval. Stopping
/// is idempotent, and dropping a running scheduler stops it.
#[derive(Debug)]
pub struct SyncScheduler {
    running: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SyncScheduler {
    /// Creates a scheduler with no worker running.
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Starts the worker, invoking `task` once per `interval`.
    ///
    /// A second `start` while the worker is running is a no-op.
    pub fn start(&mut self, interval: Duration, mut task: impl FnMut() + Send + 'static) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let running = Arc::clone(&self.running);

        let handle = thread::spawn(move || {
            log::info!("Sync scheduler started (interval {interval:?}).");
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => task(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            running.store(false, Ordering::SeqCst);
            log::info!("Sync scheduler stopped.");
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
    }

    /// Stops the worker and waits for it to exit. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while the worker thread is alive.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
