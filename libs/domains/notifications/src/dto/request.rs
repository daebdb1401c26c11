use crate::config::ValidationLimits;
use crate::constants::UNKNOWN_SOURCE_SERVICE;
use crate::enums::{NotificationEventType, NotificationPriority};
use crate::error::{NotificationError, NotificationResult};
use crate::json::{Payload, now_millis, timestamp, timestamp_option};
use crate::utils::generate_event_id;
use crate::validation::{
    check_customer_id, check_payload_size, check_source_service, validate_customer_id,
    validate_not_blank,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use validator::Validate;

/// Missing or `null` priority falls back to MEDIUM.
fn priority_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<NotificationPriority, D::Error> {
    Ok(Option::<NotificationPriority>::deserialize(d)?.unwrap_or_default())
}

// ============================================================================
// Create Notification Request
// ============================================================================

/// Request from a business service to notify a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub event_type: NotificationEventType,
    #[validate(custom(function = "validate_customer_id"))]
    pub customer_id: String,
    /// Template variables and event data.
    pub payload: Payload,
    #[serde(default, deserialize_with = "priority_or_default")]
    pub priority: NotificationPriority,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub source_service: Option<String>,
    /// Deliver no earlier than this instant.
    #[serde(default, with = "timestamp_option")]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Drop the notification if not delivered by this instant.
    #[serde(default, with = "timestamp_option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl CreateNotificationRequest {
    pub fn builder() -> CreateNotificationRequestBuilder {
        CreateNotificationRequestBuilder::default()
    }

    /// Field checks against explicit limits, including the serialized
    /// payload size.
    pub fn validate_with(&self, limits: &ValidationLimits) -> NotificationResult<()> {
        check_customer_id(&self.customer_id, limits)?;
        if let Some(source) = &self.source_service {
            check_source_service(source, limits)?;
        }
        check_payload_size(&self.payload, limits)
    }
}

/// Collects the request fields; `build` requires event type, customer ID and
/// payload. Priority defaults to MEDIUM.
#[derive(Debug, Clone, Default)]
pub struct CreateNotificationRequestBuilder {
    event_type: Option<NotificationEventType>,
    customer_id: Option<String>,
    payload: Option<Payload>,
    priority: NotificationPriority,
    source_service: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    metadata: Option<HashMap<String, String>>,
}

impl CreateNotificationRequestBuilder {
    pub fn event_type(mut self, event_type: NotificationEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn source_service(mut self, source_service: impl Into<String>) -> Self {
        self.source_service = Some(source_service.into());
        self
    }

    pub fn scheduled_at(mut self, scheduled_at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> NotificationResult<CreateNotificationRequest> {
        Ok(CreateNotificationRequest {
            event_type: self
                .event_type
                .ok_or_else(|| NotificationError::invalid_field("eventType", "Event type is required"))?,
            customer_id: self
                .customer_id
                .ok_or_else(|| NotificationError::invalid_field("customerId", "Customer ID is required"))?,
            payload: self
                .payload
                .ok_or_else(|| NotificationError::invalid_field("payload", "Payload is required"))?,
            priority: self.priority,
            source_service: self.source_service,
            scheduled_at: self.scheduled_at,
            expires_at: self.expires_at,
            metadata: self.metadata,
        })
    }
}

// ============================================================================
// Notification Event
// ============================================================================

/// Message published on the `notification-events` topic.
///
/// Identity is the event ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEventDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub event_id: String,
    pub event_type: NotificationEventType,
    #[validate(custom(function = "validate_not_blank"))]
    pub customer_id: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub source_service: String,
    #[serde(default, deserialize_with = "priority_or_default")]
    pub priority: NotificationPriority,
    pub payload: Payload,
    #[serde(default = "now_millis", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl NotificationEventDto {
    /// New event stamped with the current time and MEDIUM priority.
    pub fn new(
        event_id: impl Into<String>,
        event_type: NotificationEventType,
        customer_id: impl Into<String>,
        source_service: impl Into<String>,
        payload: Payload,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type,
            customer_id: customer_id.into(),
            source_service: source_service.into(),
            priority: NotificationPriority::default(),
            payload,
            timestamp: now_millis(),
            correlation_id: None,
            trace_id: None,
            metadata: None,
        }
    }

    /// Event for an accepted request under a fresh event ID. A request
    /// without a source service is attributed to `unknown`.
    pub fn from_request(request: CreateNotificationRequest) -> Self {
        let source_service = request
            .source_service
            .unwrap_or_else(|| UNKNOWN_SOURCE_SERVICE.to_string());
        Self {
            priority: request.priority,
            metadata: request.metadata,
            ..Self::new(
                generate_event_id(),
                request.event_type,
                request.customer_id,
                source_service,
                request.payload,
            )
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl PartialEq for NotificationEventDto {
    fn eq(&self, other: &Self) -> bool {
        self.event_id == other.event_id
    }
}

impl Eq for NotificationEventDto {}

impl Hash for NotificationEventDto {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Payload {
        let mut payload = Payload::new();
        payload.insert("amount".into(), json!(42.5));
        payload
    }

    #[test]
    fn test_builder_defaults_and_required_fields() {
        let request = CreateNotificationRequest::builder()
            .event_type(NotificationEventType::PaymentConfirmation)
            .customer_id("cust-001")
            .payload(payload())
            .build()
            .unwrap();
        assert_eq!(request.priority, NotificationPriority::Medium);
        assert!(request.validate().is_ok());

        let err = CreateNotificationRequest::builder()
            .event_type(NotificationEventType::PaymentConfirmation)
            .customer_id("cust-001")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("payload"));
    }

    #[test]
    fn test_request_validation() {
        let mut request = CreateNotificationRequest::builder()
            .event_type(NotificationEventType::FraudAlert)
            .customer_id("bad id!")
            .payload(payload())
            .build()
            .unwrap();
        assert!(request.validate().is_err());

        request.customer_id = "cust-001".into();
        request.source_service = Some("s".repeat(101));
        assert!(request.validate().is_err());
        assert!(request.validate_with(&ValidationLimits::default()).is_err());

        request.source_service = Some("payments".into());
        let tiny = ValidationLimits::default().with_max_payload_bytes(4);
        assert!(request.validate_with(&tiny).is_err());
        assert!(request.validate_with(&ValidationLimits::default()).is_ok());
    }

    #[test]
    fn test_request_missing_priority_defaults_to_medium() {
        let request: CreateNotificationRequest = serde_json::from_str(
            r#"{"eventType":"SECURITY_ALERT","customerId":"cust-001","payload":{}}"#,
        )
        .unwrap();
        assert_eq!(request.priority, NotificationPriority::Medium);
        assert_eq!(request.scheduled_at, None);

        let err = serde_json::from_str::<CreateNotificationRequest>(
            r#"{"eventType":"NOT_A_TYPE","customerId":"cust-001","payload":{}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_null_priority_defaults_to_medium() {
        let request: CreateNotificationRequest = serde_json::from_str(
            r#"{"eventType":"SECURITY_ALERT","customerId":"cust-001","payload":{},"priority":null}"#,
        )
        .unwrap();
        assert_eq!(request.priority, NotificationPriority::Medium);

        let event: NotificationEventDto = serde_json::from_str(
            r#"{"eventId":"evt_1","eventType":"FRAUD_ALERT","customerId":"cust-001",
                "sourceService":"fraud","payload":{},"priority":null}"#,
        )
        .unwrap();
        assert_eq!(event.priority, NotificationPriority::Medium);

        let err = serde_json::from_str::<CreateNotificationRequest>(
            r#"{"eventType":"SECURITY_ALERT","customerId":"cust-001","payload":{},"priority":"SOON"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_event_dto_identity_and_validation() {
        let a = NotificationEventDto::new(
            "evt_1",
            NotificationEventType::TransactionAlert,
            "cust-001",
            "core-banking",
            payload(),
        );
        let b = a.clone().with_priority(NotificationPriority::Critical);
        assert_eq!(a, b);
        assert!(a.validate().is_ok());

        let blank = NotificationEventDto::new(
            " ",
            NotificationEventType::TransactionAlert,
            "cust-001",
            "",
            payload(),
        );
        let err = blank.validate().unwrap_err();
        assert!(err.field_errors().contains_key("event_id"));
        assert!(err.field_errors().contains_key("source_service"));
    }

    #[test]
    fn test_event_from_request() {
        let request = CreateNotificationRequest::builder()
            .event_type(NotificationEventType::StatementReady)
            .customer_id("cust-001")
            .payload(payload())
            .priority(NotificationPriority::Low)
            .build()
            .unwrap();
        let event = NotificationEventDto::from_request(request);
        assert!(event.event_id.starts_with("evt_"));
        assert_eq!(event.source_service, "unknown");
        assert_eq!(event.priority, NotificationPriority::Low);
    }
}
