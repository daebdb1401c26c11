//! Notifications Domain
//!
//! Shared data contracts for the notification platform. Services that create,
//! route, deliver or audit notifications depend on this crate for the wire
//! format they exchange over the event stream.
//!
//! # Contents
//!
//! - Closed vocabularies: event types, priorities, statuses, channels,
//!   providers, delivery statuses
//! - Value objects: customer info, delivery attempts
//! - Requests, responses and the `notification-events` message
//! - Domain events with a shared envelope
//! - Topic registry and correlation headers
//! - Retry timing, ID generation, validation and JSON helpers
//!
//! Delivery, scheduling and persistence live in the consuming services.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Business service │  ← builds CreateNotificationRequest
//! └────────┬─────────┘
//!          │ NotificationEventDto + EventHeaders
//! ┌────────▼─────────┐
//! │ notification-    │
//! │ events topic     │
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ Delivery engine  │  ← records DeliveryAttempts, computes retries
//! └────────┬─────────┘
//!          │ NotificationCreated / Delivered / Failed events
//! ┌────────▼─────────┐
//! │ Output topics    │
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_notifications::{
//!     CreateNotificationRequest, NotificationEventDto, NotificationEventType,
//!     NotificationPriority, json,
//! };
//! use validator::Validate;
//!
//! let request = CreateNotificationRequest::builder()
//!     .event_type(NotificationEventType::PaymentConfirmation)
//!     .customer_id("cust-001")
//!     .payload(payload)
//!     .priority(NotificationPriority::High)
//!     .build()?;
//! request.validate()?;
//!
//! let event = NotificationEventDto::from_request(request);
//! producer.send("notification-events", json::to_json(&event)?).await?;
//! ```

pub mod config;
pub mod constants;
pub mod dto;
pub mod enums;
pub mod error;
pub mod events;
pub mod headers;
pub mod json;
pub mod models;
pub mod topics;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::{RetryPolicy, TopicSettings, ValidationLimits};
pub use dto::{
    CreateNotificationRequest, DeliveryStatusResponse, NotificationEventDto, NotificationResponse,
};
pub use enums::{
    ChannelProvider, ChannelType, DeliveryStatus, NotificationEventType, NotificationPriority,
    NotificationStatus,
};
pub use error::{DeliveryFailure, NotificationError, NotificationResult};
pub use events::{
    DomainEvent, EventEnvelope, NotificationCreatedEvent, NotificationDeliveredEvent,
    NotificationEvent, NotificationFailedEvent,
};
pub use headers::{EventHeaders, HeaderKey};
pub use json::Payload;
pub use models::{CustomerInfo, DeliveryAttempt};
pub use topics::{Topic, TopicDef};
