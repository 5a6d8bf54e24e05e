//! Outer event envelope carrying routing metadata.

use chrono::{DateTime, Utc};
use contrail_common::types::ContainerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::ContainerEvent;

/// Identity and time assigned to an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStamp {
    /// Unique envelope ID.
    pub id: Uuid,
    /// When the envelope was produced.
    pub timestamp: DateTime<Utc>,
}

impl EventStamp {
    /// Stamps with a random ID and the current time.
    #[must_use]
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

/// Typed payload of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPayload {
    /// A container lifecycle event.
    Container(ContainerEvent),
}

/// Event delivered downstream.
///
/// Name and image fields are copied from the payload so subscribers can
/// filter without decoding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique envelope ID.
    pub id: Uuid,
    /// Container the event is about.
    pub container_id: ContainerId,
    /// When the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Container name.
    pub container_name: String,
    /// Image ID.
    pub image_id: String,
    /// Image name.
    pub image_name: String,
    /// Typed payload.
    pub payload: EventPayload,
}

impl Envelope {
    /// Returns the container event payload.
    #[must_use]
    pub const fn container_event(&self) -> &ContainerEvent {
        match &self.payload {
            EventPayload::Container(event) => event,
        }
    }
}

/// Wraps a container event in an envelope.
#[must_use]
pub fn build_envelope(
    container_id: &ContainerId,
    event: ContainerEvent,
    stamp: EventStamp,
) -> Envelope {
    Envelope {
        id: stamp.id,
        container_id: container_id.clone(),
        timestamp: stamp.timestamp,
        container_name: event.name.clone(),
        image_id: event.image_id.clone(),
        image_name: event.image_name.clone(),
        payload: EventPayload::Container(event),
    }
}

#[cfg(test)]
mod tests {
    use contrail_common::types::EventPhase;

    use super::*;

    #[test]
    fn envelope_copies_routing_fields() {
        let event = ContainerEvent {
            phase: EventPhase::Exited,
            name: "web".into(),
            image_id: "abcd".into(),
            image_name: "nginx:1.27".into(),
            exit_code: 137,
            ..ContainerEvent::default()
        };
        let stamp = EventStamp::now();
        let envelope = build_envelope(&ContainerId::new("c1"), event.clone(), stamp);

        assert_eq!(envelope.id, stamp.id);
        assert_eq!(envelope.timestamp, stamp.timestamp);
        assert_eq!(envelope.container_id.as_str(), "c1");
        assert_eq!(envelope.container_name, "web");
        assert_eq!(envelope.image_id, "abcd");
        assert_eq!(envelope.image_name, "nginx:1.27");
        assert_eq!(envelope.container_event(), &event);
    }

    #[test]
    fn payload_serializes_under_container_key() {
        let envelope = build_envelope(
            &ContainerId::new("c2"),
            ContainerEvent::new(EventPhase::Destroyed),
            EventStamp::now(),
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["container_id"], "c2");
        assert_eq!(value["payload"]["container"]["phase"], "destroyed");
    }

    #[test]
    fn stamps_are_unique() {
        assert_ne!(EventStamp::now().id, EventStamp::now().id);
    }
}
