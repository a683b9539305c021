//! Loss-of-telemetry watchdog.
//!
//! A background task ticks once per second and compares the time since the
//! last received batch against the configured timeout. Crossing the timeout
//! raises exactly one data-loss alert per silence episode; the next batch
//! re-arms it silently.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use stillwatch_core::alert::DataLossAlert;
use stillwatch_events::bus::{EventBus, MonitorEvent, EVENT_DATA_LOSS};

/// Interval between watchdog checks.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Silence threshold used until `start` provides one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct WatchdogState {
    last_received: Instant,
    timeout: Duration,
    alarmed: bool,
}

/// Running tick task, present while the watchdog is started.
struct WatchdogTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Watches for telemetry silence and alerts once per episode.
///
/// The tick task, [`report_received`](Self::report_received), and
/// [`update_timeout`](Self::update_timeout) may run on different tasks; the
/// shared state sits behind a mutex held only for the length of a check.
pub struct DataLossWatchdog {
    events: Arc<EventBus>,
    state: Arc<Mutex<WatchdogState>>,
    task: Mutex<Option<WatchdogTask>>,
}

impl DataLossWatchdog {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            events,
            state: Arc::new(Mutex::new(WatchdogState {
                last_received: Instant::now(),
                timeout: DEFAULT_TIMEOUT,
                alarmed: false,
            })),
            task: Mutex::new(None),
        }
    }

    /// Start the periodic check with the given silence threshold.
    ///
    /// Calling while already running is a no-op (the running timeout is
    /// kept; use [`update_timeout`](Self::update_timeout) to change it).
    /// A zero timeout is the degenerate "alarmed from the first tick"
    /// configuration and is accepted as such.
    pub fn start(&self, timeout: Duration) {
        let mut task = self.task.lock().expect("watchdog task lock poisoned");
        if task.is_some() {
            return;
        }

        {
            let mut state = self.state.lock().expect("watchdog state lock poisoned");
            state.timeout = timeout;
            state.last_received = Instant::now();
            state.alarmed = false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticks(
            Arc::clone(&self.state),
            Arc::clone(&self.events),
            cancel.clone(),
        ));
        *task = Some(WatchdogTask { cancel, handle });

        tracing::info!(timeout_secs = timeout.as_secs(), "Data-loss watchdog started");
    }

    /// Record that a batch arrived.
    ///
    /// Returns the watchdog to Nominal without emitting anything — silence
    /// ending is the recovery signal.
    pub fn report_received(&self) {
        let mut state = self.state.lock().expect("watchdog state lock poisoned");
        state.last_received = Instant::now();
        if state.alarmed {
            state.alarmed = false;
            tracing::debug!("Telemetry resumed, watchdog re-armed");
        }
    }

    /// Change the silence threshold without resetting the episode clock or
    /// the alarm state.
    pub fn update_timeout(&self, timeout: Duration) {
        let mut state = self.state.lock().expect("watchdog state lock poisoned");
        state.timeout = timeout;
    }

    /// Stop the periodic check. Idempotent; once this returns, no further
    /// alert can fire until the next `start`.
    pub async fn stop(&self) {
        let task = self
            .task
            .lock()
            .expect("watchdog task lock poisoned")
            .take();

        if let Some(WatchdogTask { cancel, handle }) = task {
            cancel.cancel();
            // Wait out any in-flight tick so no alert can trail the stop.
            let _ = handle.await;
            tracing::info!("Data-loss watchdog stopped");
        }
    }
}

/// Tick loop: check once per second until cancelled.
async fn run_ticks(
    state: Arc<Mutex<WatchdogState>>,
    events: Arc<EventBus>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => check(&state, &events),
        }
    }
}

/// Compare elapsed silence against the timeout and alarm at most once.
fn check(state: &Mutex<WatchdogState>, events: &EventBus) {
    let alert = {
        let mut state = state.lock().expect("watchdog state lock poisoned");
        if state.alarmed || state.last_received.elapsed() < state.timeout {
            None
        } else {
            state.alarmed = true;
            Some(DataLossAlert::new(state.timeout))
        }
    };

    if let Some(alert) = alert {
        tracing::error!(
            timeout_secs = alert.timeout_secs,
            "No sensor data received within the timeout"
        );
        events.publish(
            MonitorEvent::new(EVENT_DATA_LOSS)
                .with_payload(serde_json::to_value(&alert).unwrap_or_else(|_| serde_json::json!({}))),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test(start_paused = true)]
    async fn one_alert_per_silence_episode() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;

        let event = rx.recv().await.expect("the timeout should fire an alert");
        assert_eq!(event.event_type, EVENT_DATA_LOSS);
        assert_eq!(event.payload["severity"], "data_loss");
        assert_eq!(event.payload["timeout_secs"], 5);

        // Staying silent produces no repeat alerts.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        watchdog.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn report_received_rearms_for_the_next_episode() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;
        rx.recv().await.expect("first episode alerts");

        // Recovery is silent.
        watchdog.report_received();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        // A second gap alerts again.
        tokio::time::sleep(Duration::from_secs(4)).await;
        let event = rx.recv().await.expect("second episode alerts");
        assert_eq!(event.event_type, EVENT_DATA_LOSS);

        watchdog.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn frequent_reports_keep_the_watchdog_quiet() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::from_secs(5));
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_secs(3)).await;
            watchdog.report_received();
        }

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        watchdog.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_alert_fires_after_stop() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::from_secs(5));
        watchdog.stop().await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent_and_keeps_the_running_timeout() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::from_secs(60));
        // A second start must not replace the 60 s timeout with 1 s.
        watchdog.start(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        watchdog.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn update_timeout_applies_without_resetting_the_clock() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        // 10 s have already elapsed, so shortening the timeout to 5 s trips
        // the alarm on the next tick.
        watchdog.update_timeout(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(2)).await;
        let event = rx.recv().await.expect("shortened timeout should alarm");
        assert_eq!(event.event_type, EVENT_DATA_LOSS);

        watchdog.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_alarms_on_the_first_tick() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let watchdog = DataLossWatchdog::new(Arc::clone(&bus));

        watchdog.start(Duration::ZERO);
        tokio::time::sleep(Duration::from_secs(1)).await;

        let event = rx.recv().await.expect("degenerate timeout alarms at once");
        assert_eq!(event.event_type, EVENT_DATA_LOSS);

        watchdog.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let bus = Arc::new(EventBus::default());
        let watchdog = DataLossWatchdog::new(bus);

        watchdog.stop().await;
        watchdog.start(Duration::from_secs(5));
        watchdog.stop().await;
        watchdog.stop().await;
    }
}
