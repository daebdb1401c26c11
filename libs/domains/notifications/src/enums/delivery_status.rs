use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Outcome of a single delivery attempt as reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    /// Handed to the provider, not yet confirmed.
    Sent,
    Delivered,
    Failed,
    Bounced,
    RateLimited,
    Expired,
}

impl DeliveryStatus {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Sent => "Sent",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Bounced => "Bounced",
            Self::RateLimited => "Rate Limited",
            Self::Expired => "Expired",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Pending => "Delivery is pending",
            Self::Sent => "Message has been sent to provider",
            Self::Delivered => "Message has been delivered",
            Self::Failed => "Delivery failed",
            Self::Bounced => "Message bounced back",
            Self::RateLimited => "Delivery rate limited",
            Self::Expired => "Delivery attempt expired",
        }
    }

    pub fn from_code(code: &str) -> NotificationResult<Self> {
        code.parse().map_err(|_| {
            tracing::debug!(code, "Unknown delivery status");
            NotificationError::unknown_code("delivery status", code)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Failed | Self::Bounced | Self::Expired
        )
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Failed | Self::RateLimited)
    }
}

impl TryFrom<String> for DeliveryStatus {
    type Error = NotificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}
