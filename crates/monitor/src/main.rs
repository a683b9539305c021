//! `stillwatch-monitor` — distillation rig temperature monitor.
//!
//! Polls the rig firmware (or a local mock) once per update interval,
//! classifies readings against per-sensor thresholds, publishes
//! deduplicated alerts on the event bus, watches for telemetry loss, and
//! keeps a bounded in-memory history for trend display.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stillwatch_events::{AlertLogger, EventBus};
use stillwatch_monitor::config::MonitorConfig;
use stillwatch_monitor::session::MonitoringSession;
use stillwatch_monitor::settings::SensorSettings;
use stillwatch_monitor::store::HistoryStore;
use stillwatch_monitor::sweeper::RetentionSweeper;
use stillwatch_monitor::watchdog::DataLossWatchdog;
use stillwatch_poller::{ApiClient, MockSource, ReadingSource};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stillwatch_monitor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = MonitorConfig::from_env();
    tracing::info!(
        api_url = %config.sensor_api_url,
        mock = config.use_mock_data,
        interval_secs = config.update_interval.as_secs(),
        "Loaded monitor configuration"
    );

    // --- Event bus + alert delivery ---
    let event_bus = Arc::new(EventBus::default());
    let logger_cancel = CancellationToken::new();
    let logger_handle = tokio::spawn(AlertLogger::run(
        event_bus.subscribe(),
        logger_cancel.clone(),
    ));
    tracing::info!("Event bus created, alert logger subscribed");

    // --- History store + retention sweeper ---
    let store = Arc::new(HistoryStore::new());
    let sweeper = RetentionSweeper::new(Arc::clone(&store), config.history_retention_days);
    let sweep_cancel = CancellationToken::new();
    let sweep_cancel_clone = sweep_cancel.clone();
    let sweeper_handle = tokio::spawn(async move { sweeper.run(sweep_cancel_clone).await });

    // --- Watchdog ---
    let watchdog = Arc::new(DataLossWatchdog::new(Arc::clone(&event_bus)));
    watchdog.start(config.data_timeout);

    // --- Settings + session ---
    let settings = Arc::new(SensorSettings::new());
    let session = MonitoringSession::new(
        settings,
        Arc::clone(&store),
        Arc::clone(&event_bus),
        Arc::clone(&watchdog),
    );

    // --- Reading source ---
    let source: Box<dyn ReadingSource> = if config.use_mock_data {
        tracing::info!("Using the mock reading source");
        Box::new(MockSource::new())
    } else {
        Box::new(ApiClient::new(&config.sensor_api_url))
    };

    // --- Poll loop ---
    let poll_cancel = CancellationToken::new();
    let poll_handle = tokio::spawn(poll_loop(
        source,
        session,
        config.update_interval,
        poll_cancel.clone(),
    ));
    tracing::info!("Monitoring started");

    shutdown_signal().await;

    // --- Graceful shutdown ---
    tracing::info!("Shutting down");

    poll_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), poll_handle).await;

    watchdog.stop().await;

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;

    logger_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), logger_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Fetch a batch once per interval and feed it to the session.
async fn poll_loop(
    mut source: Box<dyn ReadingSource>,
    mut session: MonitoringSession,
    update_interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(update_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Poll loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                match source.fetch().await {
                    Ok(readings) => {
                        tracing::debug!(count = readings.len(), "Received reading batch");
                        session.process_batch(&readings);
                    }
                    Err(e) => {
                        // The watchdog escalates sustained silence; a single
                        // missed poll is only worth a warning.
                        tracing::warn!(error = %e, "Poll failed");
                    }
                }
            }
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the service shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
