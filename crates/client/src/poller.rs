use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

use crate::accounts::AccountStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Periodic silent refresh of an [`AccountStore`].
///
/// Each refresh is awaited before the next tick, so two polls never run at
/// the same time. Dropping the poller stops it.
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
    period: Duration,
}

impl Poller {
    /// Starts polling. The first refresh happens one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: AccountStore, period: Duration) -> Self {
        let period = period.max(MIN_POLL_INTERVAL);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tracing::trace!("polling accounts");
                store.refresh_accounts().await;
            }
        });
        tracing::debug!(?period, "account poller started");
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
