use super::ChannelType;
use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// External service that performs delivery on one or more channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelProvider {
    // Email
    Sendgrid,
    AwsSes,
    Mailgun,

    // SMS
    Twilio,
    AwsSns,

    // Push
    Firebase,
    Apns,

    /// In-house multi-channel implementation.
    Custom,
}

impl ChannelProvider {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sendgrid => "SendGrid",
            Self::AwsSes => "Amazon SES",
            Self::Mailgun => "Mailgun",
            Self::Twilio => "Twilio",
            Self::AwsSns => "Amazon SNS",
            Self::Firebase => "Firebase",
            Self::Apns => "Apple Push",
            Self::Custom => "Custom Provider",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sendgrid => "SendGrid email service",
            Self::AwsSes => "Amazon Simple Email Service",
            Self::Mailgun => "Mailgun email service",
            Self::Twilio => "Twilio SMS service",
            Self::AwsSns => "Amazon Simple Notification Service",
            Self::Firebase => "Firebase Cloud Messaging",
            Self::Apns => "Apple Push Notification Service",
            Self::Custom => "Custom implementation",
        }
    }

    pub fn supported_channels(&self) -> &'static [ChannelType] {
        match self {
            Self::Sendgrid | Self::AwsSes | Self::Mailgun => &[ChannelType::Email],
            Self::Twilio => &[ChannelType::Sms, ChannelType::Voice],
            Self::AwsSns => &[ChannelType::Sms, ChannelType::Push],
            Self::Firebase | Self::Apns => &[ChannelType::Push],
            Self::Custom => &[
                ChannelType::Email,
                ChannelType::Sms,
                ChannelType::Push,
                ChannelType::Webhook,
            ],
        }
    }

    pub fn supports(&self, channel: ChannelType) -> bool {
        self.supported_channels().contains(&channel)
    }

    /// Every provider able to deliver on `channel`, in declaration order.
    pub fn providers_for(channel: ChannelType) -> Vec<Self> {
        Self::iter().filter(|p| p.supports(channel)).collect()
    }

    pub fn from_code(code: &str) -> NotificationResult<Self> {
        code.parse().map_err(|_| {
            tracing::debug!(code, "Unknown channel provider");
            NotificationError::unknown_code("channel provider", code)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

impl TryFrom<String> for ChannelProvider {
    type Error = NotificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}
