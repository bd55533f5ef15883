//! Request Gate
//!
//! Enforces a minimum interval after each pipeline run: a run does not start
//! sooner than `min_interval` after the most recent one finished. The lock is
//! only taken to read or record that finish time, so runs already past the
//! gate may overlap.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub struct RequestGate {
    min_interval: Duration,
    last_finished: Mutex<Option<Instant>>,
}

/// Records the finish time when dropped, so a run whose future is cancelled
/// still counts towards the interval.
struct FinishGuard<'a> {
    gate: &'a RequestGate,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.gate.record_finish();
    }
}

impl RequestGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_finished: Mutex::new(None),
        }
    }

    /// Waits out the remaining interval, runs `run` and records its finish time.
    pub async fn run<F, T>(&self, run: F) -> T
    where
        F: Future<Output = T>,
    {
        if let Some(wait) = self.remaining_wait() {
            debug!(wait_ms = wait.as_millis() as u64, "Delaying request to respect minimum interval");
            tokio::time::sleep(wait).await;
        }

        let _finish = FinishGuard { gate: self };
        run.await
    }

    fn remaining_wait(&self) -> Option<Duration> {
        let last_finished = self
            .last_finished
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let elapsed = (*last_finished)?.elapsed();
        (elapsed < self.min_interval).then(|| self.min_interval - elapsed)
    }

    fn record_finish(&self) {
        let mut last_finished = self
            .last_finished
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last_finished = Some(Instant::now());
    }
}
