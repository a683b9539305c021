//! In-memory temperature history.
//!
//! Append-only keyed time-series with range queries — the working set a
//! small rig accumulates over a session fits comfortably in memory, and the
//! retention sweeper bounds it. Raw points are immutable once appended;
//! every read copies.

use std::sync::RwLock;

use chrono::{Duration, Utc};

use stillwatch_core::history::{downsample, HistoryPoint};
use stillwatch_core::reading::TemperatureReading;
use stillwatch_core::types::Timestamp;

/// Append-only history store, shared via `Arc<HistoryStore>`.
#[derive(Debug, Default)]
pub struct HistoryStore {
    points: RwLock<Vec<HistoryPoint>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point per reading.
    pub fn append_batch(&self, readings: &[TemperatureReading]) {
        if readings.is_empty() {
            return;
        }
        let mut points = self.points.write().expect("history lock poisoned");
        points.extend(readings.iter().map(HistoryPoint::from));
    }

    /// All points for one sensor, oldest first.
    pub fn history_for_sensor(&self, sensor_name: &str) -> Vec<HistoryPoint> {
        let mut result: Vec<HistoryPoint> = self
            .points
            .read()
            .expect("history lock poisoned")
            .iter()
            .filter(|p| p.sensor_name == sensor_name)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.timestamp);
        result
    }

    /// Points with `from <= timestamp <= to`, oldest first.
    pub fn range(&self, from: Timestamp, to: Timestamp) -> Vec<HistoryPoint> {
        let mut result: Vec<HistoryPoint> = self
            .points
            .read()
            .expect("history lock poisoned")
            .iter()
            .filter(|p| p.timestamp >= from && p.timestamp <= to)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.timestamp);
        result
    }

    /// Points from the trailing `minutes`, oldest first.
    pub fn recent(&self, minutes: i64) -> Vec<HistoryPoint> {
        let cutoff = Utc::now() - Duration::minutes(minutes);
        let mut result: Vec<HistoryPoint> = self
            .points
            .read()
            .expect("history lock poisoned")
            .iter()
            .filter(|p| p.timestamp >= cutoff)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.timestamp);
        result
    }

    /// Trailing window reduced to at most one point per `min_interval`,
    /// ready for trend display.
    pub fn recent_downsampled(&self, minutes: i64, min_interval: Duration) -> Vec<HistoryPoint> {
        downsample(&self.recent(minutes), min_interval)
    }

    /// Timestamp of the newest stored point.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.points
            .read()
            .expect("history lock poisoned")
            .iter()
            .map(|p| p.timestamp)
            .max()
    }

    pub fn total_points(&self) -> usize {
        self.points.read().expect("history lock poisoned").len()
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.points.write().expect("history lock poisoned").clear();
    }

    /// Drop points older than `days`. Returns how many were removed.
    pub fn delete_older_than(&self, days: i64) -> usize {
        let cutoff = Utc::now() - Duration::days(days);
        let mut points = self.points.write().expect("history lock poisoned");
        let before = points.len();
        points.retain(|p| p.timestamp >= cutoff);
        before - points.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
