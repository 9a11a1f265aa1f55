//! Cancellable periodic refresh.

use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

/// One firing of a [`RefreshTimer`], tagged with the timer that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTick {
    pub generation: u64,
}

/// Background task that sends a [`RefreshTick`] every `period`, first one a
/// full period after start. Aborted when dropped.
#[derive(Debug)]
pub struct RefreshTimer {
    generation: u64,
    period: Duration,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start(generation: u64, period: Duration, tx: UnboundedSender<RefreshTick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(RefreshTick { generation }).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(generation, period_secs = period.as_secs(), "Auto-refresh timer started");
        Self { generation, period, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!(generation = self.generation, "Auto-refresh timer cancelled");
    }
}
