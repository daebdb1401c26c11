use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Delivery medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    Email,
    Sms,
    Push,
    InApp,
    Webhook,
    Voice,
    Letter,
    Fax,
}

impl ChannelType {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::Push => "Push Notification",
            Self::InApp => "In-App",
            Self::Webhook => "Webhook",
            Self::Voice => "Voice Call",
            Self::Letter => "Physical Letter",
            Self::Fax => "Fax",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Email => "Electronic mail notifications",
            Self::Sms => "Short message service notifications",
            Self::Push => "Mobile push notifications",
            Self::InApp => "In-application notifications",
            Self::Webhook => "HTTP webhook notifications",
            Self::Voice => "Voice call notifications",
            Self::Letter => "Physical mail notifications",
            Self::Fax => "Fax notifications",
        }
    }

    /// MIME types the channel can carry.
    pub fn supported_content_types(&self) -> &'static [&'static str] {
        match self {
            Self::Email => &["text/html", "text/plain"],
            Self::Sms | Self::Letter | Self::Fax => &["text/plain"],
            Self::Push | Self::InApp | Self::Webhook => &["application/json"],
            Self::Voice => &["audio/wav"],
        }
    }

    pub fn supports_content_type(&self, content_type: &str) -> bool {
        self.supported_content_types()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(content_type))
    }

    pub fn from_code(code: &str) -> NotificationResult<Self> {
        code.parse().map_err(|_| {
            tracing::debug!(code, "Unknown channel type");
            NotificationError::unknown_code("channel type", code)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn is_real_time(&self) -> bool {
        matches!(self, Self::Push | Self::InApp | Self::Sms)
    }

    /// Anything but physical mail, voice and fax.
    pub fn is_digital(&self) -> bool {
        !matches!(self, Self::Letter | Self::Voice | Self::Fax)
    }

    pub fn supports_rich_content(&self) -> bool {
        matches!(self, Self::Email | Self::InApp | Self::Push)
    }
}

impl TryFrom<String> for ChannelType {
    type Error = NotificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for channel in ChannelType::all() {
            assert_eq!(ChannelType::from_code(channel.code()).unwrap(), channel);
        }
        assert_eq!(ChannelType::InApp.code(), "IN_APP");
        assert!(ChannelType::from_code("CARRIER_PIGEON").is_err());
    }

    #[test]
    fn test_predicates() {
        assert!(ChannelType::Sms.is_real_time());
        assert!(!ChannelType::Email.is_real_time());
        assert!(ChannelType::Webhook.is_digital());
        assert!(!ChannelType::Fax.is_digital());
        assert!(ChannelType::Push.supports_rich_content());
        assert!(!ChannelType::Sms.supports_rich_content());
    }

    #[test]
    fn test_content_types() {
        assert!(ChannelType::Email.supports_content_type("text/html"));
        assert!(ChannelType::Email.supports_content_type("TEXT/PLAIN"));
        assert!(!ChannelType::Sms.supports_content_type("text/html"));
        assert_eq!(ChannelType::Voice.supported_content_types(), &["audio/wav"]);
    }
}
