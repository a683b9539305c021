/// Sensor identifiers are the small integer indices reported by the rig
/// firmware (0-based).
pub type SensorId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
