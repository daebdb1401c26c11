use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Lifecycle state of a notification.
///
/// ```text
/// CREATED ─> QUEUED ─> PROCESSING ─┬─> DELIVERED ─> READ
///                                  ├─> FAILED   ┐
///                                  ├─> BOUNCED  ┴─ (retryable)
///                                  └─> EXPIRED
/// ```
///
/// Only the values and their predicates live here; transition enforcement
/// belongs to the owning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Created,
    Queued,
    Processing,
    Delivered,
    Failed,
    Bounced,
    Read,
    Expired,
}

impl NotificationStatus {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Queued => "Queued",
            Self::Processing => "Processing",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Bounced => "Bounced",
            Self::Read => "Read",
            Self::Expired => "Expired",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Created => "Notification has been created",
            Self::Queued => "Notification is queued for processing",
            Self::Processing => "Notification is being processed",
            Self::Delivered => "Notification has been delivered",
            Self::Failed => "Notification delivery failed",
            Self::Bounced => "Notification was bounced back",
            Self::Read => "Notification has been read by recipient",
            Self::Expired => "Notification has expired",
        }
    }

    pub fn from_code(code: &str) -> NotificationResult<Self> {
        code.parse().map_err(|_| {
            tracing::debug!(code, "Unknown notification status");
            NotificationError::unknown_code("notification status", code)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// No further processing is expected from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Failed | Self::Bounced | Self::Read | Self::Expired
        )
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Delivered | Self::Read)
    }

    /// A new attempt cycle may be started from this state.
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Failed | Self::Bounced)
    }

    /// The notification reached the recipient (DELIVERED or later).
    pub fn is_delivered_or_later(&self) -> bool {
        matches!(self, Self::Delivered | Self::Read)
    }
}

impl TryFrom<String> for NotificationStatus {
    type Error = NotificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}
