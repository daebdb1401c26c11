//! Closed vocabularies shared across the notification platform.
//!
//! Every enumeration serializes through its wire code and rejects unknown
//! codes with [`crate::NotificationError::UnknownCode`] instead of falling
//! back to a default.

mod channel;
mod delivery_status;
mod event_type;
mod priority;
mod provider;
mod status;

pub use channel::ChannelType;
pub use delivery_status::DeliveryStatus;
pub use event_type::NotificationEventType;
pub use priority::NotificationPriority;
pub use provider::ChannelProvider;
pub use status::NotificationStatus;
