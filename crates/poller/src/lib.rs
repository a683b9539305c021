//! Reading acquisition for stillwatch.
//!
//! The monitor does not own sensor acquisition; it consumes whatever a
//! [`ReadingSource`] produces once per update interval. Two sources ship
//! here: [`ApiClient`] polls the rig firmware over HTTP, and [`MockSource`]
//! simulates a rig locally for development.

pub mod client;
pub mod mock;
pub mod wire;

use async_trait::async_trait;

use stillwatch_core::reading::TemperatureReading;

pub use client::ApiClient;
pub use mock::MockSource;

/// Errors from a reading source.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Firmware returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A source of temperature reading batches.
#[async_trait]
pub trait ReadingSource: Send {
    /// Fetch the current batch of readings, one per sensor.
    async fn fetch(&mut self) -> Result<Vec<TemperatureReading>, PollError>;
}
