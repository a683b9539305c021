//! Per-batch monitoring pipeline.
//!
//! [`MonitoringSession`] consumes the batches a reading source produces:
//! it feeds the watchdog, classifies every reading against its sensor's
//! thresholds, lets the dedup engine decide what to announce, publishes
//! alerts on the event bus, and appends the raw batch to history.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use stillwatch_core::alert::{AlertSeverity, TemperatureAlert};
use stillwatch_core::dedup::AlertDedupEngine;
use stillwatch_core::reading::TemperatureReading;
use stillwatch_core::thresholds::{classify, StatusTier, ThresholdSet};
use stillwatch_events::bus::{
    EventBus, MonitorEvent, EVENT_SENSOR_MISCONFIGURED, EVENT_TEMPERATURE_ALERT,
};

use crate::settings::ThresholdProvider;
use crate::store::HistoryStore;
use crate::watchdog::DataLossWatchdog;

/// One rig's monitoring pipeline.
///
/// `process_batch` takes `&mut self`, so batches are serialized by
/// ownership — drive a session from a single poll loop and never feed it
/// two batches concurrently.
pub struct MonitoringSession {
    thresholds: Arc<dyn ThresholdProvider>,
    store: Arc<HistoryStore>,
    events: Arc<EventBus>,
    watchdog: Arc<DataLossWatchdog>,
    dedup: AlertDedupEngine,
    /// Sensors already flagged for a disordered threshold set.
    misconfigured: HashSet<String>,
}

impl MonitoringSession {
    pub fn new(
        thresholds: Arc<dyn ThresholdProvider>,
        store: Arc<HistoryStore>,
        events: Arc<EventBus>,
        watchdog: Arc<DataLossWatchdog>,
    ) -> Self {
        Self {
            thresholds,
            store,
            events,
            watchdog,
            dedup: AlertDedupEngine::new(),
            misconfigured: HashSet::new(),
        }
    }

    /// Consume one polled batch.
    pub fn process_batch(&mut self, readings: &[TemperatureReading]) {
        self.watchdog.report_received();

        for reading in readings {
            self.evaluate_reading(reading);
        }

        self.store.append_batch(readings);
    }

    fn evaluate_reading(&mut self, reading: &TemperatureReading) {
        let set = self.thresholds.thresholds_for(&reading.name);
        self.track_misconfiguration(reading, &set);

        let tier = classify(reading.temperature, &set);
        if !self.dedup.should_announce(&reading.name, tier) {
            return;
        }

        let (severity, threshold_value) = match tier {
            StatusTier::Critical => (AlertSeverity::Critical, Some(set.critical_temp)),
            StatusTier::Warning => (AlertSeverity::Warning, Some(set.warning_temp)),
            StatusTier::Optimal => (AlertSeverity::Optimal, Some(set.optimal_min)),
            // TooLow never announces; the dedup engine already said no.
            StatusTier::TooLow => return,
        };

        let alert = TemperatureAlert {
            sensor_id: reading.id,
            sensor_name: reading.name.clone(),
            temperature: reading.temperature,
            threshold_value,
            severity,
            message: alert_message(reading, severity, threshold_value),
            timestamp: Utc::now(),
        };

        match severity {
            AlertSeverity::Critical => tracing::error!(
                sensor = %reading.name,
                temperature = reading.temperature,
                "Critical temperature"
            ),
            AlertSeverity::Warning => tracing::warn!(
                sensor = %reading.name,
                temperature = reading.temperature,
                "Temperature warning"
            ),
            _ => tracing::info!(
                sensor = %reading.name,
                temperature = reading.temperature,
                "Optimal temperature reached"
            ),
        }

        self.publish(EVENT_TEMPERATURE_ALERT, &alert);
    }

    /// Flag a disordered threshold set once per misconfiguration episode.
    ///
    /// An ordered set re-arms the flag, so the sensor is flagged again if it
    /// is later misconfigured anew.
    fn track_misconfiguration(&mut self, reading: &TemperatureReading, set: &ThresholdSet) {
        if set.is_ordered() {
            self.misconfigured.remove(&reading.name);
            return;
        }

        if !self.misconfigured.insert(reading.name.clone()) {
            return;
        }

        tracing::warn!(
            sensor = %reading.name,
            optimal_min = set.optimal_min,
            warning_temp = set.warning_temp,
            critical_temp = set.critical_temp,
            "Disordered threshold set; classifying conservatively"
        );

        let alert = TemperatureAlert {
            sensor_id: reading.id,
            sensor_name: reading.name.clone(),
            temperature: reading.temperature,
            threshold_value: None,
            severity: AlertSeverity::Misconfigured,
            message: format!(
                "{}: threshold set is disordered (optimal_min {}, warning {}, critical {})",
                reading.name, set.optimal_min, set.warning_temp, set.critical_temp
            ),
            timestamp: Utc::now(),
        };
        self.publish(EVENT_SENSOR_MISCONFIGURED, &alert);
    }

    fn publish(&self, event_type: &str, alert: &TemperatureAlert) {
        let event = MonitorEvent::new(event_type)
            .with_sensor(alert.sensor_id, &alert.sensor_name)
            .with_payload(serde_json::to_value(alert).unwrap_or_else(|_| serde_json::json!({})));
        self.events.publish(event);
    }
}

/// Human-readable alert text for delivery channels.
fn alert_message(
    reading: &TemperatureReading,
    severity: AlertSeverity,
    threshold_value: Option<f64>,
) -> String {
    match (severity, threshold_value) {
        (AlertSeverity::Critical, Some(threshold)) => format!(
            "{}: {:.1}°C (critical: {}°C)",
            reading.name, reading.temperature, threshold
        ),
        (AlertSeverity::Warning, Some(threshold)) => format!(
            "{}: {:.1}°C (warning: {}°C)",
            reading.name, reading.temperature, threshold
        ),
        _ => format!(
            "{}: {:.1}°C - back in the optimal band",
            reading.name, reading.temperature
        ),
    }
}
