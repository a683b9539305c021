//! Firmware wire model.
//!
//! The rig firmware serves `GET /api/temperatures`:
//!
//! ```json
//! {
//!   "sensors": [
//!     { "id": 0, "name": "Kolv", "temperature": 65.3,
//!       "status": "optimal", "led_color": "green" }
//!   ],
//!   "timestamp": 1234567890,
//!   "sensor_count": 3
//! }
//! ```
//!
//! The firmware's own `status`/`led_color` classification is informational
//! only; the monitor always classifies locally against its own thresholds.

use chrono::Utc;
use serde::Deserialize;

use stillwatch_core::reading::TemperatureReading;
use stillwatch_core::types::SensorId;

/// Top-level response from `GET /api/temperatures`.
#[derive(Debug, Deserialize)]
pub struct TemperatureResponse {
    pub sensors: Vec<WireSensor>,
    /// Seconds counter from the firmware. Uptime-based on most boards, so
    /// readings are stamped at receive time instead.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub sensor_count: i32,
}

/// One sensor entry as reported by the firmware.
#[derive(Debug, Deserialize)]
pub struct WireSensor {
    pub id: SensorId,
    pub name: String,
    pub temperature: f64,
    /// Firmware-side tier label ("cold", "optimal", "warning", "critical").
    #[serde(default)]
    pub status: String,
    /// Firmware LED state ("blue", "green", "yellow", "red").
    #[serde(default)]
    pub led_color: String,
}

impl TemperatureResponse {
    /// Convert into domain readings, stamped at receive time.
    pub fn into_readings(self) -> Vec<TemperatureReading> {
        let observed_at = Utc::now();
        self.sensors
            .into_iter()
            .map(|sensor| TemperatureReading {
                id: sensor.id,
                name: sensor.name,
                temperature: sensor.temperature,
                observed_at,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
