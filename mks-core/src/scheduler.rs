use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::StoreConfig;
use crate::store::Store;

/// Background task that purges a [`Store`] on a fixed interval
///
/// The task runs until [`PurgeScheduler::shutdown`] is called or the
/// scheduler is dropped. If a purge overruns its slot the missed ticks are
/// skipped and the next one fires on the following interval boundary.
///
/// # Example
///
/// ```rust,no_run
/// use mks_core::{PurgeScheduler, Store, StoreConfig};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = StoreConfig::default().with_purge_interval(Duration::from_secs(1));
///     let store = Store::with_config(config.clone());
///     let _purger = PurgeScheduler::spawn(store.clone(), &config);
///     // serve requests with `store` ...
/// }
/// ```
pub struct PurgeScheduler {
    shutdown_tx: watch::Sender<bool>,
    interval: Duration,
}

impl PurgeScheduler {
    /// Spawns the purge loop for `store` on the current Tokio runtime,
    /// ticking every `config.purge_interval`
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context, or if the
    /// purge interval is zero.
    pub fn spawn(store: Store, config: &StoreConfig) -> Self {
        let interval = config.purge_interval;
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "mks_core::PurgeScheduler requires a Tokio runtime. \
                 Ensure you are calling PurgeScheduler::spawn() \
                 from within a #[tokio::main] or #[tokio::test] context, \
                 or from code running on a Tokio runtime."
            );
        }
        assert!(!interval.is_zero(), "purge interval must be non-zero");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(Self::purge_task(store, interval, shutdown_rx));

        Self {
            shutdown_tx,
            interval,
        }
    }

    async fn purge_task(store: Store, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first immediate tick - we want to wait for the interval first
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = store.purge();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = store.len(), "purged expired links");
                    }
                }
                changed = shutdown_rx.changed() => {
                    // A closed channel means the scheduler handle is gone
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::debug!("purge scheduler stopped");
                        break;
                    }
                }
            }
        }
    }

    /// Returns the configured interval between purges
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops the background purge task
    ///
    /// This is called automatically when the scheduler is dropped,
    /// but can be called manually if needed.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for PurgeScheduler {
    fn drop(&mut self) {
        // Signal the purge task to stop when the handle is dropped
        let _ = self.shutdown_tx.send(true);
    }
}
