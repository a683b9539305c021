//! History retention sweeper.
//!
//! Background task that periodically prunes history beyond the retention
//! window so a long-running session does not grow without bound.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::HistoryStore;

/// How often the sweeper prunes old history.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Periodic history pruner.
pub struct RetentionSweeper {
    store: Arc<HistoryStore>,
    retention_days: i64,
}

impl RetentionSweeper {
    pub fn new(store: Arc<HistoryStore>, retention_days: i64) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    /// Run the sweep loop. Exits when the provided token is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Retention sweeper cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let removed = self.store.delete_older_than(self.retention_days);
                    if removed > 0 {
                        tracing::info!(removed, "Pruned old history points");
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use stillwatch_core::reading::TemperatureReading;

    fn aged_reading(days_old: i64) -> TemperatureReading {
        TemperatureReading {
            id: 0,
            name: "Kolv".to_string(),
            temperature: 78.0,
            observed_at: Utc::now() - ChronoDuration::days(days_old),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_schedule_and_exits_on_cancel() {
        let store = Arc::new(HistoryStore::new());
        store.append_batch(&[aged_reading(10), aged_reading(0)]);

        let sweeper = RetentionSweeper::new(Arc::clone(&store), 7);
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        let handle = tokio::spawn(async move { sweeper.run(cancel_clone).await });

        // The first tick fires immediately and prunes the stale point.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.total_points(), 1);

        cancel.cancel();
        handle.await.expect("sweeper task should exit cleanly");
    }
}
