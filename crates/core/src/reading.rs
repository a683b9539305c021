use serde::{Deserialize, Serialize};

use crate::types::{SensorId, Timestamp};

/// A single temperature observation delivered by the polling layer.
///
/// Immutable once created; a poll cycle produces one reading per sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Sensor index on the rig (0-based).
    pub id: SensorId,
    /// Sensor name, matching the threshold configuration keys.
    pub name: String,
    /// Observed temperature in degrees Celsius.
    pub temperature: f64,
    /// When the batch carrying this reading was received.
    pub observed_at: Timestamp,
}
