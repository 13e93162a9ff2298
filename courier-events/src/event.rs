//! Event definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use uuid::Uuid;

/// Event trait
///
/// Anything dispatched through an [`EventDispatcher`](crate::EventDispatcher)
/// implements this trait. The event name is the routing key; the dispatcher
/// never looks at the payload.
pub trait Event: Send + Sync + Debug + 'static {
    /// Get event name
    fn event_name(&self) -> &str;

    /// Get event payload
    fn payload(&self) -> &serde_json::Value;

    /// Get event timestamp
    fn timestamp(&self) -> DateTime<Utc>;

    /// Get event ID
    fn event_id(&self) -> Uuid;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Base event metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event ID
    pub id: Uuid,

    /// Event name, used as the routing key
    pub name: String,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Optional correlation ID for tracing
    pub correlation_id: Option<Uuid>,

    /// Optional causation ID (ID of the event that caused this event)
    pub causation_id: Option<Uuid>,
}

impl EventMetadata {
    /// Create new event metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            causation_id: None,
        }
    }

    /// Set correlation ID
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Set causation ID
    pub fn with_causation_id(mut self, id: Uuid) -> Self {
        self.causation_id = Some(id);
        self
    }
}

/// Event carrying an arbitrary JSON payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEvent {
    /// Event metadata
    #[serde(flatten)]
    pub metadata: EventMetadata,

    /// Event payload
    pub payload: serde_json::Value,
}

impl JsonEvent {
    /// Create new event
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            metadata: EventMetadata::new(name),
            payload,
        }
    }

    /// Create event from existing metadata
    pub fn with_metadata(metadata: EventMetadata, payload: serde_json::Value) -> Self {
        Self { metadata, payload }
    }
}

impl Event for JsonEvent {
    fn event_name(&self) -> &str {
        &self.metadata.name
    }

    fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.metadata.timestamp
    }

    fn event_id(&self) -> Uuid {
        self.metadata.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
