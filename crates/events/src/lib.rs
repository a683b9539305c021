//! Stillwatch event bus and alert delivery.
//!
//! This crate is the alert sink for the monitoring pipeline:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MonitorEvent`] — the canonical monitoring event envelope.
//! - [`delivery`] — delivery channels (currently the service log).

pub mod bus;
pub mod delivery;

pub use bus::{EventBus, MonitorEvent};
pub use delivery::AlertLogger;
