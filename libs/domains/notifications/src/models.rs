//! Value objects shared by requests, responses and events.

use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_TIMEZONE};
use crate::enums::{ChannelType, NotificationStatus};
use crate::error::{NotificationError, NotificationResult};
use crate::json::timestamp_option;
use crate::validation::{validate_not_blank, validate_phone_number};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};
use validator::Validate;

// ============================================================================
// Customer
// ============================================================================

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn language_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(default_language))
}

fn timezone_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(default_timezone))
}

/// Recipient details used for personalization and routing.
///
/// Identity is the customer ID: two values with the same ID are equal even
/// when their contact details differ.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[validate(custom(function = "validate_not_blank"))]
    pub customer_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
    /// Defaults to `en`, also when sent as `null`.
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub preferred_language: String,
    /// Defaults to `UTC`, also when sent as `null`.
    #[serde(default = "default_timezone", deserialize_with = "timezone_or_default")]
    pub timezone: String,
}

impl CustomerInfo {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            first_name: None,
            last_name: None,
            email: None,
            phone_number: None,
            preferred_language: default_language(),
            timezone: default_timezone(),
        }
    }

    pub fn with_name(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// `None` keeps the default language.
    pub fn with_preferred_language(mut self, language: Option<String>) -> Self {
        self.preferred_language = language.unwrap_or_else(default_language);
        self
    }

    /// `None` keeps the default timezone.
    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = timezone.unwrap_or_else(default_timezone);
        self
    }

    /// "First Last", whichever single name is present, or `None`.
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }
}

impl PartialEq for CustomerInfo {
    fn eq(&self, other: &Self) -> bool {
        self.customer_id == other.customer_id
    }
}

impl Eq for CustomerInfo {}

impl Hash for CustomerInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.customer_id.hash(state);
    }
}

// ============================================================================
// Delivery Attempt
// ============================================================================

/// One try at delivering a notification through a channel.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAttempt {
    /// 1-based.
    #[validate(range(min = 1))]
    pub attempt_number: u32,
    pub channel_type: ChannelType,
    pub provider: String,
    pub status: NotificationStatus,
    #[serde(default, with = "timestamp_option")]
    pub attempted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    /// Provider-side message identifier.
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default, with = "timestamp_option")]
    pub next_retry_at: Option<DateTime<Utc>>,
}

impl DeliveryAttempt {
    pub fn builder() -> DeliveryAttemptBuilder {
        DeliveryAttemptBuilder::default()
    }

    pub fn is_successful(&self) -> bool {
        self.status == NotificationStatus::Delivered
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self.status,
            NotificationStatus::Failed | NotificationStatus::Bounced
        )
    }
}

impl PartialEq for DeliveryAttempt {
    fn eq(&self, other: &Self) -> bool {
        self.attempt_number == other.attempt_number
            && self.channel_type == other.channel_type
            && self.provider == other.provider
            && self.attempted_at == other.attempted_at
    }
}

impl Eq for DeliveryAttempt {}

impl Hash for DeliveryAttempt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attempt_number.hash(state);
        self.channel_type.hash(state);
        self.provider.hash(state);
        self.attempted_at.hash(state);
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryAttemptBuilder {
    attempt_number: u32,
    channel_type: Option<ChannelType>,
    provider: Option<String>,
    status: Option<NotificationStatus>,
    attempted_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    error_code: Option<String>,
    external_id: Option<String>,
    duration_ms: Option<u64>,
    next_retry_at: Option<DateTime<Utc>>,
}

impl DeliveryAttemptBuilder {
    pub fn attempt_number(mut self, attempt_number: u32) -> Self {
        self.attempt_number = attempt_number;
        self
    }

    pub fn channel_type(mut self, channel_type: ChannelType) -> Self {
        self.channel_type = Some(channel_type);
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn status(mut self, status: NotificationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn attempted_at(mut self, attempted_at: DateTime<Utc>) -> Self {
        self.attempted_at = Some(attempted_at);
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn next_retry_at(mut self, next_retry_at: DateTime<Utc>) -> Self {
        self.next_retry_at = Some(next_retry_at);
        self
    }

    /// Fails when channel, provider or status is missing, or the attempt
    /// number is 0.
    pub fn build(self) -> NotificationResult<DeliveryAttempt> {
        let attempt = DeliveryAttempt {
            attempt_number: self.attempt_number,
            channel_type: self
                .channel_type
                .ok_or_else(|| NotificationError::invalid_field("channelType", "is required"))?,
            provider: self
                .provider
                .ok_or_else(|| NotificationError::invalid_field("provider", "is required"))?,
            status: self
                .status
                .ok_or_else(|| NotificationError::invalid_field("status", "is required"))?,
            attempted_at: self.attempted_at,
            error_message: self.error_message,
            error_code: self.error_code,
            external_id: self.external_id,
            duration_ms: self.duration_ms,
            next_retry_at: self.next_retry_at,
        };
        attempt.validate()?;
        Ok(attempt)
    }
}
