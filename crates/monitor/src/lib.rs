//! Stillwatch monitoring runtime.
//!
//! Wires the pure domain logic from `stillwatch-core` to clocks and state:
//! threshold settings, the in-memory history store, the data-loss watchdog,
//! and the per-batch monitoring session. The binary in `main.rs` assembles
//! these around a poll loop.

pub mod config;
pub mod session;
pub mod settings;
pub mod store;
pub mod sweeper;
pub mod watchdog;
