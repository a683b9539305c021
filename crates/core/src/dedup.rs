//! Alert deduplication for threshold crossings.
//!
//! Operators need one alert per crossing event, not one per poll tick, but
//! must be re-alerted when an excursion recurs after the sensor returns to a
//! lower tier. Warning and Critical debounce independently, so falling back
//! from Critical re-announces Warning.

use std::collections::HashMap;

use crate::thresholds::StatusTier;

/// Announcement flags for one sensor, one per severity band.
#[derive(Debug, Clone, Copy, Default)]
struct SensorAlertState {
    announced_warning: bool,
    announced_critical: bool,
    announced_optimal: bool,
}

/// Tracks which severity band has already been announced per sensor.
///
/// Unknown sensors get fresh all-false state on first sight; evaluation
/// never fails.
#[derive(Debug, Default)]
pub struct AlertDedupEngine {
    state: HashMap<String, SensorAlertState>,
}

impl AlertDedupEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tier observed for a sensor and decide whether to announce.
    ///
    /// Returns `true` when this observation is a fresh crossing that warrants
    /// an alert. `TooLow` never announces and fully resets the sensor's
    /// flags, so re-entering any higher tier announces again.
    pub fn should_announce(&mut self, sensor_name: &str, tier: StatusTier) -> bool {
        let state = self.state.entry(sensor_name.to_string()).or_default();

        match tier {
            StatusTier::Critical => {
                let announce = !state.announced_critical;
                state.announced_critical = true;
                state.announced_warning = false;
                state.announced_optimal = false;
                announce
            }
            StatusTier::Warning => {
                // Falling back out of Critical re-announces Warning.
                let announce = !state.announced_warning || state.announced_critical;
                state.announced_warning = true;
                state.announced_critical = false;
                state.announced_optimal = false;
                announce
            }
            StatusTier::Optimal => {
                // Recovering from an excursion is worth one announcement.
                let announce = !state.announced_optimal
                    || state.announced_warning
                    || state.announced_critical;
                state.announced_optimal = true;
                state.announced_warning = false;
                state.announced_critical = false;
                announce
            }
            StatusTier::TooLow => {
                *state = SensorAlertState::default();
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
