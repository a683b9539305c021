//! Threshold classification for temperature readings.
//!
//! Pure logic — no settings access. The monitor resolves a [`ThresholdSet`]
//! per sensor and passes it in.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sensor_names::{SENSOR_DESTILLAT, SENSOR_KOLV, SENSOR_KYLARE};

/// Status tier for a classified reading, ordered by increasing temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    TooLow,
    Optimal,
    Warning,
    Critical,
}

/// Per-sensor classification boundaries.
///
/// Invariant: `optimal_min < warning_temp < critical_temp`. The settings
/// layer validates sets before handing them out; [`classify`] still behaves
/// sensibly on a disordered set (see its docs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Lower bound of the optimal band.
    pub optimal_min: f64,
    /// Lower bound of the warning band.
    pub warning_temp: f64,
    /// Lower bound of the critical band (unbounded above).
    pub critical_temp: f64,
}

impl ThresholdSet {
    pub fn new(optimal_min: f64, warning_temp: f64, critical_temp: f64) -> Self {
        Self {
            optimal_min,
            warning_temp,
            critical_temp,
        }
    }

    /// Check the ordering invariant.
    pub fn is_ordered(&self) -> bool {
        self.optimal_min < self.warning_temp && self.warning_temp < self.critical_temp
    }

    /// Validate the ordering invariant, naming the offending values.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.is_ordered() {
            return Err(CoreError::Validation(format!(
                "thresholds must satisfy optimal_min < warning_temp < critical_temp, \
                 got {} / {} / {}",
                self.optimal_min, self.warning_temp, self.critical_temp
            )));
        }
        Ok(())
    }

    /// Stock boundaries for a sensor, keyed by its canonical name.
    ///
    /// Unknown sensors get the boiler defaults.
    pub fn default_for(sensor_name: &str) -> Self {
        match sensor_name {
            SENSOR_KOLV => Self::new(70.0, 80.0, 90.0),
            SENSOR_DESTILLAT => Self::new(75.0, 85.0, 95.0),
            SENSOR_KYLARE => Self::new(20.0, 30.0, 40.0),
            _ => Self::new(70.0, 80.0, 90.0),
        }
    }
}

/// Map a temperature onto its status tier.
///
/// Checks run highest tier first, so boundary values land in the higher tier
/// (half-open intervals, the top tier unbounded). On a disordered set the
/// same fixed order classifies conservatively: the highest tier whose lower
/// bound the temperature meets wins.
pub fn classify(temperature: f64, thresholds: &ThresholdSet) -> StatusTier {
    if temperature >= thresholds.critical_temp {
        StatusTier::Critical
    } else if temperature >= thresholds.warning_temp {
        StatusTier::Warning
    } else if temperature >= thresholds.optimal_min {
        StatusTier::Optimal
    } else {
        StatusTier::TooLow
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn kolv() -> ThresholdSet {
        ThresholdSet::new(70.0, 80.0, 90.0)
    }

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(StatusTier::TooLow < StatusTier::Optimal);
        assert!(StatusTier::Optimal < StatusTier::Warning);
        assert!(StatusTier::Warning < StatusTier::Critical);
    }

    #[test]
    fn classifies_each_band() {
        assert_eq!(classify(60.0, &kolv()), StatusTier::TooLow);
        assert_eq!(classify(75.0, &kolv()), StatusTier::Optimal);
        assert_eq!(classify(85.0, &kolv()), StatusTier::Warning);
        assert_eq!(classify(95.0, &kolv()), StatusTier::Critical);
    }

    #[test]
    fn boundaries_belong_to_the_higher_tier() {
        assert_eq!(classify(70.0, &kolv()), StatusTier::Optimal);
        assert_eq!(classify(80.0, &kolv()), StatusTier::Warning);
        assert_eq!(classify(90.0, &kolv()), StatusTier::Critical);

        assert_eq!(classify(79.999, &kolv()), StatusTier::Optimal);
        assert_eq!(classify(89.999, &kolv()), StatusTier::Warning);
        assert_eq!(classify(69.999, &kolv()), StatusTier::TooLow);
    }

    #[test]
    fn top_tier_is_unbounded() {
        assert_eq!(classify(1000.0, &kolv()), StatusTier::Critical);
    }

    #[test]
    fn disordered_set_classifies_conservatively() {
        // warning above critical: anything past critical is still Critical,
        // and the band between them resolves to the higher tier first.
        let set = ThresholdSet::new(70.0, 95.0, 90.0);
        assert!(!set.is_ordered());
        assert_eq!(classify(96.0, &set), StatusTier::Critical);
        assert_eq!(classify(92.0, &set), StatusTier::Critical);
        assert_eq!(classify(80.0, &set), StatusTier::Optimal);
    }

    #[test]
    fn validate_rejects_disordered_sets() {
        assert!(ThresholdSet::new(80.0, 80.0, 90.0).validate().is_err());
        assert!(ThresholdSet::new(70.0, 90.0, 80.0).validate().is_err());
        assert!(kolv().validate().is_ok());
    }

    #[test]
    fn stock_defaults_per_sensor() {
        assert_eq!(
            ThresholdSet::default_for("Destillat"),
            ThresholdSet::new(75.0, 85.0, 95.0)
        );
        assert_eq!(
            ThresholdSet::default_for("Kylare"),
            ThresholdSet::new(20.0, 30.0, 40.0)
        );
        // Unknown sensors fall back to the boiler defaults.
        assert_eq!(ThresholdSet::default_for("Pannrum"), kolv());
    }
}
