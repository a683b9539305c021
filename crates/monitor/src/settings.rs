//! Threshold settings keyed by sensor name.
//!
//! A single lookup capability replaces per-sensor getter plumbing: the
//! session asks for a sensor's [`ThresholdSet`] at classification time and
//! the settings layer answers from its cache.

use std::collections::HashMap;
use std::sync::RwLock;

use stillwatch_core::error::CoreError;
use stillwatch_core::thresholds::ThresholdSet;

/// Synchronous threshold lookup at classification time.
pub trait ThresholdProvider: Send + Sync {
    /// Resolve the threshold set for a sensor name.
    ///
    /// Unknown sensors resolve to the stock defaults rather than failing.
    fn thresholds_for(&self, sensor_name: &str) -> ThresholdSet;
}

/// In-memory settings store with live updates.
///
/// Sensors without an explicit entry resolve to
/// [`ThresholdSet::default_for`]. [`set_thresholds`](Self::set_thresholds)
/// validates the ordering invariant, so a disordered set can only reach
/// classification through an external configuration source; the session
/// handles that case defensively.
#[derive(Debug, Default)]
pub struct SensorSettings {
    thresholds: RwLock<HashMap<String, ThresholdSet>>,
}

impl SensorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the thresholds for one sensor.
    pub fn set_thresholds(&self, sensor_name: &str, set: ThresholdSet) -> Result<(), CoreError> {
        set.validate()?;
        self.thresholds
            .write()
            .expect("threshold lock poisoned")
            .insert(sensor_name.to_string(), set);
        tracing::debug!(
            sensor = sensor_name,
            optimal_min = set.optimal_min,
            warning_temp = set.warning_temp,
            critical_temp = set.critical_temp,
            "Thresholds updated"
        );
        Ok(())
    }
}

impl ThresholdProvider for SensorSettings {
    fn thresholds_for(&self, sensor_name: &str) -> ThresholdSet {
        self.thresholds
            .read()
            .expect("threshold lock poisoned")
            .get(sensor_name)
            .copied()
            .unwrap_or_else(|| ThresholdSet::default_for(sensor_name))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use stillwatch_core::sensor_names::SENSOR_KOLV;

    #[test]
    fn unknown_sensors_resolve_to_stock_defaults() {
        let settings = SensorSettings::new();
        assert_eq!(
            settings.thresholds_for(SENSOR_KOLV),
            ThresholdSet::new(70.0, 80.0, 90.0)
        );
        assert_eq!(
            settings.thresholds_for("Mystery"),
            ThresholdSet::new(70.0, 80.0, 90.0)
        );
    }

    #[test]
    fn updates_are_visible_to_subsequent_lookups() {
        let settings = SensorSettings::new();
        let custom = ThresholdSet::new(60.0, 75.0, 88.0);
        settings
            .set_thresholds(SENSOR_KOLV, custom)
            .expect("ordered set should be accepted");

        assert_eq!(settings.thresholds_for(SENSOR_KOLV), custom);
    }

    #[test]
    fn disordered_sets_are_rejected() {
        let settings = SensorSettings::new();
        let result = settings.set_thresholds(SENSOR_KOLV, ThresholdSet::new(90.0, 80.0, 70.0));
        assert_matches!(result, Err(CoreError::Validation(_)));

        // The rejected set must not shadow the defaults.
        assert_eq!(
            settings.thresholds_for(SENSOR_KOLV),
            ThresholdSet::new(70.0, 80.0, 90.0)
        );
    }
}
