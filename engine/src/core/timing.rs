//! Drift-corrected response clock.
//!
//! The clock counts logical ticks of a fixed quantum. After every tick the
//! delay until the next one is shortened by however far the wall clock has run
//! ahead of the logical count, so scheduler latency under load is absorbed
//! tick by tick instead of compounding over a long response window.
//!
//! Reported time is therefore quantised: with the default 100 ms quantum a
//! response is measured to the nearest completed decisecond.
//!
//! The tick loop runs on the tokio timer, so `start()` must be called from
//! within a tokio runtime. Tests pause the runtime clock to get exact values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::error::EngineError;

#[derive(Debug)]
pub struct Clock {
    quantum: Duration,
    logical_ms: Arc<AtomicU64>,
    started_at: Option<Instant>,
    ever_started: bool,
    ticker: Option<JoinHandle<()>>,
}

impl Clock {
    pub fn new(quantum: Duration) -> Self {
        Self {
            quantum,
            logical_ms: Arc::new(AtomicU64::new(0)),
            started_at: None,
            ever_started: false,
            ticker: None,
        }
    }

    /// Resets the count to zero and begins ticking.
    pub fn start(&mut self) {
        self.cancel_ticker();

        // A fresh counter per run, so a ticker that is still winding down
        // after `abort()` cannot write into the new measurement.
        let logical_ms = Arc::new(AtomicU64::new(0));
        self.logical_ms = logical_ms.clone();

        let started_at = Instant::now();
        self.started_at = Some(started_at);
        self.ever_started = true;

        let quantum_ms = self.quantum.as_millis().max(1) as u64;
        self.ticker = Some(tokio::spawn(async move {
            let mut delay = Duration::from_millis(quantum_ms);
            let mut logical = 0u64;
            loop {
                tokio::time::sleep(delay).await;
                logical += quantum_ms;
                logical_ms.store(logical, Ordering::Release);
                let wall = started_at.elapsed().as_millis() as u64;
                delay = next_delay(quantum_ms, wall, logical);
            }
        }));
    }

    /// Cancels the pending tick. The last measured value stays readable.
    pub fn stop(&mut self) {
        self.cancel_ticker();
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Elapsed seconds as of the last completed tick.
    pub fn elapsed(&self) -> Result<f64, EngineError> {
        self.elapsed_ms().map(|ms| ms as f64 / 1000.0)
    }

    pub fn elapsed_ms(&self) -> Result<u64, EngineError> {
        if !self.ever_started {
            return Err(EngineError::ClockNotStarted);
        }
        Ok(self.logical_ms.load(Ordering::Acquire))
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

/// Delay before the next tick: one quantum, minus how far the wall clock has
/// drifted past the logical count. A tick that fired early lengthens the next
/// delay; a backlog larger than one quantum fires immediately.
pub fn next_delay(quantum_ms: u64, wall_ms: u64, logical_ms: u64) -> Duration {
    let drift = wall_ms as i64 - logical_ms as i64;
    let delay = (quantum_ms as i64 - drift).max(0);
    Duration::from_millis(delay as u64)
}
