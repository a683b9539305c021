//! History downsampling for trend display.
//!
//! Raw history accumulates one point per sensor per poll cycle, far denser
//! than a trend graph needs. [`downsample`] reduces each sensor's series to
//! at most one point per minimum interval while keeping the endpoints.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::reading::TemperatureReading;
use crate::types::{SensorId, Timestamp};

/// One stored history sample.
///
/// Raw points are immutable once appended; reads copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub sensor_id: SensorId,
    pub sensor_name: String,
    pub temperature: f64,
    pub timestamp: Timestamp,
}

impl From<&TemperatureReading> for HistoryPoint {
    fn from(reading: &TemperatureReading) -> Self {
        Self {
            sensor_id: reading.id,
            sensor_name: reading.name.clone(),
            temperature: reading.temperature,
            timestamp: reading.observed_at,
        }
    }
}

/// Reduce a series to at most one point per `min_interval`, per sensor.
///
/// Each sensor's group keeps its first point, then every point at least
/// `min_interval` after the previously kept one, and always its last point
/// so the trend line ends at the most recent reading. Groups are merged and
/// returned ordered by timestamp ascending.
///
/// Idempotent: reducing an already-reduced series with the same interval
/// returns it unchanged.
pub fn downsample(points: &[HistoryPoint], min_interval: Duration) -> Vec<HistoryPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut groups: BTreeMap<&str, Vec<&HistoryPoint>> = BTreeMap::new();
    for point in points {
        groups.entry(point.sensor_name.as_str()).or_default().push(point);
    }

    let mut kept = Vec::new();
    for (_, mut group) in groups {
        group.sort_by_key(|p| p.timestamp);

        let mut last_kept: Option<Timestamp> = None;
        for point in &group {
            let keep = match last_kept {
                None => true,
                Some(ts) => point.timestamp - ts >= min_interval,
            };
            if keep {
                kept.push((*point).clone());
                last_kept = Some(point.timestamp);
            }
        }

        // The most recent point must always survive, even when the interval
        // rule would have skipped it.
        if let Some(last) = group.last() {
            if last_kept != Some(last.timestamp) {
                kept.push((*last).clone());
            }
        }
    }

    kept.sort_by_key(|p| p.timestamp);
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
