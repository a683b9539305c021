//! Alert delivery via the service log.
//!
//! [`AlertLogger`] subscribes to the bus and renders every alert event as a
//! structured log line. It is the delivery channel for a headless
//! deployment; richer channels (push, UI) would hang off the same bus.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::bus::{
    MonitorEvent, EVENT_DATA_LOSS, EVENT_SENSOR_MISCONFIGURED, EVENT_TEMPERATURE_ALERT,
};

/// Background task that logs every alert event on the bus.
pub struct AlertLogger;

impl AlertLogger {
    /// Consume events until cancelled or the bus is closed.
    pub async fn run(mut rx: broadcast::Receiver<MonitorEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Alert logger cancelled");
                    break;
                }
                event = rx.recv() => match event {
                    Ok(event) => log_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Alert logger lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}

/// Render one event at a level matching its severity.
fn log_event(event: &MonitorEvent) {
    let message = event
        .payload
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("");
    let sensor = event.sensor_name.as_deref().unwrap_or("-");

    match event.event_type.as_str() {
        EVENT_DATA_LOSS => tracing::error!(%message, "Telemetry lost"),
        EVENT_SENSOR_MISCONFIGURED => {
            tracing::warn!(sensor, %message, "Sensor misconfigured");
        }
        EVENT_TEMPERATURE_ALERT => {
            match event.payload.get("severity").and_then(|s| s.as_str()) {
                Some("critical") => tracing::error!(sensor, %message, "Critical temperature"),
                Some("warning") => tracing::warn!(sensor, %message, "Temperature warning"),
                _ => tracing::info!(sensor, %message, "Temperature update"),
            }
        }
        other => tracing::debug!(event_type = other, "Unhandled event type"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
