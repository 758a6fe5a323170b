//! Active session timer

use std::future;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

struct Running {
    ticker: Interval,
    elapsed: u64,
}

/// Count-up of ticks since the last observed transition into connected.
///
/// The held `Interval` is the timer handle: while it exists a second start
/// is refused, and dropping it is what stops the count.
pub struct SessionTimer {
    period: Duration,
    keep_alive_every: u64,
    running: Option<Running>,
}

impl SessionTimer {
    pub fn new(period: Duration, keep_alive_every: u64) -> Self {
        Self {
            period,
            keep_alive_every: keep_alive_every.max(1),
            running: None,
        }
    }

    /// Start counting from zero. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.running.is_some() {
            return false;
        }
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.running = Some(Running { ticker, elapsed: 0 });
        true
    }

    /// Stop and discard the count. Returns the discarded value, if any.
    pub fn stop(&mut self) -> Option<u64> {
        self.running.take().map(|r| r.elapsed)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn elapsed(&self) -> Option<u64> {
        self.running.as_ref().map(|r| r.elapsed)
    }

    /// Wait for the next tick and return the new elapsed count.
    ///
    /// Never resolves while stopped. Cancel-safe: a tick is only counted once
    /// the underlying interval has fired.
    pub async fn tick(&mut self) -> u64 {
        match self.running.as_mut() {
            Some(running) => {
                running.ticker.tick().await;
                running.elapsed += 1;
                running.elapsed
            }
            None => future::pending().await,
        }
    }

    /// Whether this elapsed count is due a keep-alive
    pub fn keep_alive_due(&self, elapsed: u64) -> bool {
        elapsed > 0 && elapsed % self.keep_alive_every == 0
    }
}
