//! Well-known sensor name constants.
//!
//! The canonical names the rig firmware reports, and the keys the settings
//! layer stores thresholds under.

/// Boiler pot sensor.
pub const SENSOR_KOLV: &str = "Kolv";

/// Distillate outlet sensor.
pub const SENSOR_DESTILLAT: &str = "Destillat";

/// Condenser coolant sensor.
pub const SENSOR_KYLARE: &str = "Kylare";
