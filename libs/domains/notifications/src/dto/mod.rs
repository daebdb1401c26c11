//! Request and response payloads exchanged with host services.

mod request;
mod response;

pub use request::{CreateNotificationRequest, CreateNotificationRequestBuilder, NotificationEventDto};
pub use response::{DeliveryStatusResponse, NotificationResponse};
