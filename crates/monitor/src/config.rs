use std::time::Duration;

/// Runtime configuration loaded from environment variables.
///
/// All fields have defaults suitable for a rig on the stock firmware
/// address. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the rig firmware API.
    pub sensor_api_url: String,
    /// Generate readings locally instead of polling the firmware.
    pub use_mock_data: bool,
    /// Interval between poll cycles.
    pub update_interval: Duration,
    /// Silence threshold before the watchdog raises a data-loss alert.
    pub data_timeout: Duration,
    /// Days of raw history the retention sweeper keeps.
    pub history_retention_days: i64,
    /// Minutes of history fed to the trend view.
    pub trend_window_minutes: i64,
    /// Minimum seconds between points in the downsampled trend series.
    pub trend_min_interval_secs: i64,
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default               |
    /// |---------------------------|-----------------------|
    /// | `SENSOR_API_URL`          | `http://192.168.7.75` |
    /// | `USE_MOCK_DATA`           | `false`               |
    /// | `UPDATE_INTERVAL_SECS`    | `3`                   |
    /// | `DATA_TIMEOUT_SECS`       | `5`                   |
    /// | `HISTORY_RETENTION_DAYS`  | `7`                   |
    /// | `TREND_WINDOW_MINUTES`    | `120`                 |
    /// | `TREND_MIN_INTERVAL_SECS` | `120`                 |
    pub fn from_env() -> Self {
        let sensor_api_url =
            std::env::var("SENSOR_API_URL").unwrap_or_else(|_| "http://192.168.7.75".into());

        let use_mock_data = std::env::var("USE_MOCK_DATA")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let update_interval_secs: u64 = std::env::var("UPDATE_INTERVAL_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("UPDATE_INTERVAL_SECS must be a valid u64");

        let data_timeout_secs: u64 = std::env::var("DATA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DATA_TIMEOUT_SECS must be a valid u64");

        let history_retention_days: i64 = std::env::var("HISTORY_RETENTION_DAYS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .expect("HISTORY_RETENTION_DAYS must be a valid i64");

        let trend_window_minutes: i64 = std::env::var("TREND_WINDOW_MINUTES")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("TREND_WINDOW_MINUTES must be a valid i64");

        let trend_min_interval_secs: i64 = std::env::var("TREND_MIN_INTERVAL_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("TREND_MIN_INTERVAL_SECS must be a valid i64");

        Self {
            sensor_api_url,
            use_mock_data,
            update_interval: Duration::from_secs(update_interval_secs),
            data_timeout: Duration::from_secs(data_timeout_secs),
            history_retention_days,
            trend_window_minutes,
            trend_min_interval_secs,
        }
    }
}
