//! Alert event types for threshold crossings and telemetry loss.

use std::time::Duration;

use serde::Serialize;

use crate::types::{SensorId, Timestamp};

/// Severity of an emitted alert event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Sensor settled into its optimal band after an excursion.
    Optimal,
    /// Value crossed the warning threshold but not the critical threshold.
    Warning,
    /// Value crossed the critical threshold.
    Critical,
    /// No telemetry received within the watchdog timeout.
    DataLoss,
    /// The sensor's threshold set is disordered; readings are classified
    /// conservatively until it is corrected.
    Misconfigured,
}

/// A single per-sensor alert emitted by the monitoring session.
#[derive(Debug, Clone, Serialize)]
pub struct TemperatureAlert {
    /// The sensor that triggered the alert.
    pub sensor_id: SensorId,
    /// Sensor name as reported by the firmware.
    pub sensor_name: String,
    /// The observed temperature that triggered the alert.
    pub temperature: f64,
    /// The threshold the reading crossed, when one applies.
    pub threshold_value: Option<f64>,
    pub severity: AlertSeverity,
    /// Human-readable summary for delivery channels.
    pub message: String,
    /// When the alert was raised.
    pub timestamp: Timestamp,
}

/// Alert raised by the watchdog when telemetry goes silent.
#[derive(Debug, Clone, Serialize)]
pub struct DataLossAlert {
    pub severity: AlertSeverity,
    /// The configured silence threshold that was exceeded.
    pub timeout_secs: u64,
    pub message: String,
}

impl DataLossAlert {
    pub fn new(timeout: Duration) -> Self {
        let timeout_secs = timeout.as_secs();
        Self {
            severity: AlertSeverity::DataLoss,
            timeout_secs,
            message: format!(
                "No data from the sensors for {timeout_secs} seconds! Check the rig immediately!"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
