//! Domain events published about the notification aggregate.
//!
//! Every event embeds an [`EventEnvelope`] whose fields are flattened into the
//! event's JSON object:
//!
//! ```json
//! {
//!   "eventId": "6f1c…",
//!   "eventType": "NotificationDelivered",
//!   "aggregateId": "notif_…",
//!   "aggregateType": "Notification",
//!   "occurredAt": "2024-06-01T09:00:00.000Z",
//!   "correlationId": "b2e4…",
//!   "version": 1,
//!   "customerId": "cust-001",
//!   ...
//! }
//! ```

use crate::constants::AGGREGATE_TYPE_NOTIFICATION;
use crate::dto::CreateNotificationRequest;
use crate::enums::{ChannelType, NotificationEventType, NotificationPriority};
use crate::error::{DeliveryFailure, NotificationError, NotificationResult};
use crate::json::{Payload, now_millis, timestamp, timestamp_option};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_EVENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DEFAULT_EVENT_VERSION
}

// ============================================================================
// Envelope
// ============================================================================

/// Header shared by every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    event_id: String,
    event_type: String,
    aggregate_id: String,
    aggregate_type: String,
    #[serde(with = "timestamp")]
    occurred_at: DateTime<Utc>,
    correlation_id: String,
    #[serde(default = "default_version")]
    version: u32,
}

impl EventEnvelope {
    /// Fresh envelope with a random event ID and correlation ID, stamped now.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            event_type: event_type.into(),
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: now_millis(),
            correlation_id: Uuid::new_v4().to_string(),
            version: DEFAULT_EVENT_VERSION,
        }
    }

    fn for_notification(event_type: &str, notification_id: impl Into<String>) -> Self {
        Self::new(event_type, notification_id, AGGREGATE_TYPE_NOTIFICATION)
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

/// Read access to the envelope of any domain event.
pub trait DomainEvent {
    fn envelope(&self) -> &EventEnvelope;

    fn event_id(&self) -> &str {
        self.envelope().event_id()
    }

    fn event_type(&self) -> &str {
        self.envelope().event_type()
    }

    fn aggregate_id(&self) -> &str {
        self.envelope().aggregate_id()
    }

    fn aggregate_type(&self) -> &str {
        self.envelope().aggregate_type()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.envelope().occurred_at()
    }

    fn correlation_id(&self) -> &str {
        self.envelope().correlation_id()
    }

    fn version(&self) -> u32 {
        self.envelope().version()
    }
}

/// Envelope access, identity by event ID, and the correlation/version
/// overrides that may be applied before publishing.
macro_rules! domain_event {
    ($event:ty) => {
        impl DomainEvent for $event {
            fn envelope(&self) -> &EventEnvelope {
                &self.envelope
            }
        }

        impl PartialEq for $event {
            fn eq(&self, other: &Self) -> bool {
                self.envelope.event_id == other.envelope.event_id
            }
        }

        impl Eq for $event {}

        impl std::hash::Hash for $event {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&self.envelope.event_id, state);
            }
        }

        impl $event {
            /// Continues an existing workflow instead of starting a new correlation.
            pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
                self.envelope.correlation_id = correlation_id.into();
                self
            }

            pub fn with_version(mut self, version: u32) -> Self {
                self.envelope.version = version;
                self
            }
        }
    };
}

// ============================================================================
// Events
// ============================================================================

/// A notification was accepted for processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreatedEvent {
    #[serde(flatten)]
    envelope: EventEnvelope,
    pub customer_id: String,
    pub notification_event_type: NotificationEventType,
    pub priority: NotificationPriority,
    #[serde(default)]
    pub source_service: Option<String>,
    pub payload: Payload,
}

impl NotificationCreatedEvent {
    pub const EVENT_TYPE: &'static str = "NotificationCreated";

    pub fn new(
        notification_id: impl Into<String>,
        customer_id: impl Into<String>,
        notification_event_type: NotificationEventType,
        priority: NotificationPriority,
        source_service: Option<String>,
        payload: Payload,
    ) -> Self {
        Self {
            envelope: EventEnvelope::for_notification(Self::EVENT_TYPE, notification_id),
            customer_id: customer_id.into(),
            notification_event_type,
            priority,
            source_service,
            payload,
        }
    }

    pub fn from_request(
        notification_id: impl Into<String>,
        request: &CreateNotificationRequest,
    ) -> Self {
        Self::new(
            notification_id,
            request.customer_id.clone(),
            request.event_type,
            request.priority,
            request.source_service.clone(),
            request.payload.clone(),
        )
    }
}

domain_event!(NotificationCreatedEvent);

/// A provider confirmed delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDeliveredEvent {
    #[serde(flatten)]
    envelope: EventEnvelope,
    pub customer_id: String,
    pub channel_type: ChannelType,
    pub provider: String,
    #[serde(with = "timestamp")]
    pub delivered_at: DateTime<Utc>,
    pub attempt_number: u32,
    #[serde(default)]
    pub external_id: Option<String>,
}

impl NotificationDeliveredEvent {
    pub const EVENT_TYPE: &'static str = "NotificationDelivered";

    /// Delivered now; override with [`with_delivered_at`](Self::with_delivered_at).
    pub fn new(
        notification_id: impl Into<String>,
        customer_id: impl Into<String>,
        channel_type: ChannelType,
        provider: impl Into<String>,
        attempt_number: u32,
    ) -> Self {
        let envelope = EventEnvelope::for_notification(Self::EVENT_TYPE, notification_id);
        Self {
            delivered_at: envelope.occurred_at,
            envelope,
            customer_id: customer_id.into(),
            channel_type,
            provider: provider.into(),
            attempt_number,
            external_id: None,
        }
    }

    pub fn with_delivered_at(mut self, delivered_at: DateTime<Utc>) -> Self {
        self.delivered_at = delivered_at;
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

domain_event!(NotificationDeliveredEvent);

/// A delivery attempt failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFailedEvent {
    #[serde(flatten)]
    envelope: EventEnvelope,
    pub customer_id: String,
    pub channel_type: ChannelType,
    pub provider: String,
    pub error_message: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(with = "timestamp")]
    pub failed_at: DateTime<Utc>,
    pub attempt_number: u32,
    pub will_retry: bool,
    #[serde(default, with = "timestamp_option")]
    pub next_retry_at: Option<DateTime<Utc>>,
}

impl NotificationFailedEvent {
    pub const EVENT_TYPE: &'static str = "NotificationFailed";

    /// Failed now, no retry scheduled.
    pub fn new(
        notification_id: impl Into<String>,
        customer_id: impl Into<String>,
        channel_type: ChannelType,
        provider: impl Into<String>,
        error_message: impl Into<String>,
        attempt_number: u32,
    ) -> Self {
        let envelope = EventEnvelope::for_notification(Self::EVENT_TYPE, notification_id);
        Self {
            failed_at: envelope.occurred_at,
            envelope,
            customer_id: customer_id.into(),
            channel_type,
            provider: provider.into(),
            error_message: error_message.into(),
            error_code: None,
            attempt_number,
            will_retry: false,
            next_retry_at: None,
        }
    }

    /// Event describing `failure`. The error code is the failure's code and
    /// no retry is scheduled yet.
    pub fn from_failure(
        notification_id: impl Into<String>,
        customer_id: impl Into<String>,
        failure: &DeliveryFailure,
    ) -> Self {
        Self::new(
            notification_id,
            customer_id,
            failure.channel_type,
            failure.provider.clone(),
            failure.message.clone(),
            failure.attempt_number,
        )
        .with_error_code(DeliveryFailure::ERROR_CODE)
    }

    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    pub fn with_failed_at(mut self, failed_at: DateTime<Utc>) -> Self {
        self.failed_at = failed_at;
        self
    }

    /// Schedules a retry, which also marks the event as retrying.
    pub fn with_retry_at(mut self, next_retry_at: DateTime<Utc>) -> Self {
        self.will_retry = true;
        self.next_retry_at = Some(next_retry_at);
        self
    }
}

domain_event!(NotificationFailedEvent);

// ============================================================================
// Union
// ============================================================================

/// Any notification domain event, discriminated by `eventType` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NotificationEvent {
    Created(NotificationCreatedEvent),
    Delivered(NotificationDeliveredEvent),
    Failed(NotificationFailedEvent),
}

impl NotificationEvent {
    /// Decodes a JSON tree, dispatching on its `eventType`.
    pub fn from_value(value: Value) -> NotificationResult<Self> {
        let event_type = value
            .get("eventType")
            .and_then(Value::as_str)
            .ok_or_else(|| NotificationError::invalid_field("eventType", "is required"))?
            .to_string();

        let decoded = match event_type.as_str() {
            NotificationCreatedEvent::EVENT_TYPE => serde_json::from_value(value).map(Self::Created),
            NotificationDeliveredEvent::EVENT_TYPE => {
                serde_json::from_value(value).map(Self::Delivered)
            }
            NotificationFailedEvent::EVENT_TYPE => serde_json::from_value(value).map(Self::Failed),
            other => return Err(NotificationError::unknown_code("event type", other)),
        };
        decoded.map_err(|e| NotificationError::serialization("Failed to decode domain event", e))
    }
}

impl<'de> Deserialize<'de> for NotificationEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl DomainEvent for NotificationEvent {
    fn envelope(&self) -> &EventEnvelope {
        match self {
            Self::Created(e) => e.envelope(),
            Self::Delivered(e) => e.envelope(),
            Self::Failed(e) => e.envelope(),
        }
    }
}

impl From<NotificationCreatedEvent> for NotificationEvent {
    fn from(event: NotificationCreatedEvent) -> Self {
        Self::Created(event)
    }
}

impl From<NotificationDeliveredEvent> for NotificationEvent {
    fn from(event: NotificationDeliveredEvent) -> Self {
        Self::Delivered(event)
    }
}

impl From<NotificationFailedEvent> for NotificationEvent {
    fn from(event: NotificationFailedEvent) -> Self {
        Self::Failed(event)
    }
}
