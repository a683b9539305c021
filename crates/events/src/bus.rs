//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`MonitorEvent`]s.
//! The monitoring session, the watchdog, and the settings layer publish;
//! delivery channels subscribe independently. It is designed to be shared
//! via `Arc<EventBus>` across the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use stillwatch_core::types::SensorId;

/// Event type for a temperature threshold crossing.
pub const EVENT_TEMPERATURE_ALERT: &str = "temperature.alert";

/// Event type for a telemetry loss episode.
pub const EVENT_DATA_LOSS: &str = "monitor.data_loss";

/// Event type for a disordered threshold set.
pub const EVENT_SENSOR_MISCONFIGURED: &str = "sensor.misconfigured";

// ---------------------------------------------------------------------------
// MonitorEvent
// ---------------------------------------------------------------------------

/// A monitoring event published on the bus.
///
/// Constructed via [`MonitorEvent::new`] and enriched with the builder
/// methods [`with_sensor`](MonitorEvent::with_sensor) and
/// [`with_payload`](MonitorEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorEvent {
    /// Dot-separated event name, e.g. `"temperature.alert"`.
    pub event_type: String,

    /// Sensor index, when the event concerns a single sensor.
    pub sensor_id: Option<SensorId>,

    /// Sensor name, when the event concerns a single sensor.
    pub sensor_name: Option<String>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl MonitorEvent {
    /// Create a new event with only the required `event_type`.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            sensor_id: None,
            sensor_name: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the originating sensor to the event.
    pub fn with_sensor(mut self, id: SensorId, name: impl Into<String>) -> Self {
        self.sensor_id = Some(id);
        self.sensor_name = Some(name.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`MonitorEvent`].
///
/// # Usage
///
/// ```rust
/// use stillwatch_events::bus::{EventBus, MonitorEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(MonitorEvent::new("temperature.alert"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<MonitorEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: MonitorEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = MonitorEvent::new("temperature.alert")
            .with_sensor(0, "Kolv")
            .with_payload(serde_json::json!({"severity": "critical"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "temperature.alert");
        assert_eq!(received.sensor_id, Some(0));
        assert_eq!(received.sensor_name.as_deref(), Some("Kolv"));
        assert_eq!(received.payload["severity"], "critical");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(MonitorEvent::new("monitor.data_loss"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, "monitor.data_loss");
        assert_eq!(e2.event_type, "monitor.data_loss");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(MonitorEvent::new("orphan.event"));
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = MonitorEvent::new("bare.event");
        assert_eq!(event.event_type, "bare.event");
        assert!(event.sensor_id.is_none());
        assert!(event.sensor_name.is_none());
        assert!(event.payload.is_object());
    }
}
