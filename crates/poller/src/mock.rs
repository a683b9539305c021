//! Mock reading source for development and tests.
//!
//! Simulates the rig with a gradual random walk per sensor, so the trend
//! view and alerting behave like they would against live hardware instead
//! of jumping around randomly.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use stillwatch_core::reading::TemperatureReading;
use stillwatch_core::sensor_names::{SENSOR_DESTILLAT, SENSOR_KOLV, SENSOR_KYLARE};
use stillwatch_core::types::SensorId;

use crate::{PollError, ReadingSource};

/// One simulated sensor: current value, step size, plausible range.
#[derive(Debug, Clone)]
struct SimulatedSensor {
    id: SensorId,
    name: &'static str,
    temperature: f64,
    step: f64,
    min: f64,
    max: f64,
}

/// Generates plausible rig telemetry without hardware.
#[derive(Debug, Clone)]
pub struct MockSource {
    sensors: Vec<SimulatedSensor>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            sensors: vec![
                SimulatedSensor {
                    id: 0,
                    name: SENSOR_KOLV,
                    temperature: 78.0,
                    step: 0.5,
                    min: 65.0,
                    max: 95.0,
                },
                SimulatedSensor {
                    id: 1,
                    name: SENSOR_DESTILLAT,
                    temperature: 82.0,
                    step: 0.3,
                    min: 70.0,
                    max: 100.0,
                },
                SimulatedSensor {
                    id: 2,
                    name: SENSOR_KYLARE,
                    temperature: 25.0,
                    step: 0.2,
                    min: 15.0,
                    max: 45.0,
                },
            ],
        }
    }

    /// Advance every sensor one step and return the batch.
    pub fn next_batch(&mut self) -> Vec<TemperatureReading> {
        let mut rng = rand::rng();
        let observed_at = Utc::now();

        self.sensors
            .iter_mut()
            .map(|sensor| {
                sensor.temperature += rng.random_range(-1.0..=1.0) * sensor.step;
                sensor.temperature = sensor.temperature.clamp(sensor.min, sensor.max);

                TemperatureReading {
                    id: sensor.id,
                    name: sensor.name.to_string(),
                    // Report with one decimal, like the firmware does.
                    temperature: (sensor.temperature * 10.0).round() / 10.0,
                    observed_at,
                }
            })
            .collect()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadingSource for MockSource {
    async fn fetch(&mut self) -> Result<Vec<TemperatureReading>, PollError> {
        Ok(self.next_batch())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
