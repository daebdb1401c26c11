//! Event-stream topic definitions.
//!
//! Collaborating services produce and consume these topics; this crate only
//! names them and records their provisioning defaults.
//!
//! ```text
//!  input                         output                       dead letter
//!  ─────                         ──────                       ───────────
//!  notification-events ──┐  ┌──> notification-created
//!  user-preference-updates │  ├──> notification-processed
//!  template-updates        ├──┤──> notification-delivered
//!  channel-config...     ──┘  ├──> notification-failed ───────> delivery-failures-dlq
//!                             ├──> notification-retry
//!                             └──> delivery-status-updates
//!  notification-events (unprocessable) ──────────────────────> notification-events-dlq
//! ```

use crate::config::TopicSettings;
use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub const DEFAULT_PARTITIONS: u32 = 10;
pub const DEFAULT_REPLICATION_FACTOR: u16 = 3;
pub const RETENTION_MS_7_DAYS: u64 = 604_800_000;
pub const RETENTION_MS_30_DAYS: u64 = 2_592_000_000;

/// Topic cleanup policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CleanupPolicy {
    Delete,
    Compact,
}

/// Direction of a topic relative to the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TopicGroup {
    Input,
    Output,
    DeadLetter,
}

/// Static topic definition.
///
/// # Example
///
/// ```rust,ignore
/// use domain_notifications::topics::{NotificationEventsTopic, TopicDef};
///
/// consumer.subscribe(&[NotificationEventsTopic::topic_name()])?;
/// ```
pub trait TopicDef: Send + Sync {
    const TOPIC_NAME: &'static str;

    /// Where unprocessable messages from this topic are parked.
    const DEAD_LETTER_TOPIC: Option<&'static str> = None;

    const PARTITIONS: u32 = DEFAULT_PARTITIONS;

    const REPLICATION_FACTOR: u16 = DEFAULT_REPLICATION_FACTOR;

    const RETENTION_MS: u64 = RETENTION_MS_7_DAYS;

    const CLEANUP_POLICY: CleanupPolicy = CleanupPolicy::Delete;

    fn topic_name() -> &'static str {
        Self::TOPIC_NAME
    }

    fn dead_letter_topic() -> Option<&'static str> {
        Self::DEAD_LETTER_TOPIC
    }

    fn settings() -> TopicSettings {
        TopicSettings {
            partitions: Self::PARTITIONS,
            replication_factor: Self::REPLICATION_FACTOR,
            retention_ms: Self::RETENTION_MS,
            cleanup_policy: Self::CLEANUP_POLICY,
        }
    }
}

/// Inbound notification requests from business services.
pub struct NotificationEventsTopic;

impl TopicDef for NotificationEventsTopic {
    const TOPIC_NAME: &'static str = "notification-events";
    const DEAD_LETTER_TOPIC: Option<&'static str> = Some("notification-events-dlq");
}

/// Published once a notification has been accepted.
pub struct NotificationCreatedTopic;

impl TopicDef for NotificationCreatedTopic {
    const TOPIC_NAME: &'static str = "notification-created";
}

pub struct NotificationDeliveredTopic;

impl TopicDef for NotificationDeliveredTopic {
    const TOPIC_NAME: &'static str = "notification-delivered";
}

/// Failed deliveries; undeliverable messages end up in the delivery DLQ.
pub struct NotificationFailedTopic;

impl TopicDef for NotificationFailedTopic {
    const TOPIC_NAME: &'static str = "notification-failed";
    const DEAD_LETTER_TOPIC: Option<&'static str> = Some("delivery-failures-dlq");
}

pub struct NotificationRetryTopic;

impl TopicDef for NotificationRetryTopic {
    const TOPIC_NAME: &'static str = "notification-retry";
}

/// Delivery status history, kept for a month for support lookups.
pub struct DeliveryStatusTopic;

impl TopicDef for DeliveryStatusTopic {
    const TOPIC_NAME: &'static str = "delivery-status-updates";
    const RETENTION_MS: u64 = RETENTION_MS_30_DAYS;
}

/// Registry of every topic known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Topic {
    // Input
    #[strum(serialize = "notification-events")]
    NotificationEvents,
    #[strum(serialize = "user-preference-updates")]
    UserPreferenceUpdates,
    #[strum(serialize = "template-updates")]
    TemplateUpdates,
    #[strum(serialize = "channel-configuration-updates")]
    ChannelConfigurationUpdates,

    // Output
    #[strum(serialize = "notification-created")]
    NotificationCreated,
    #[strum(serialize = "notification-processed")]
    NotificationProcessed,
    #[strum(serialize = "notification-delivered")]
    NotificationDelivered,
    #[strum(serialize = "notification-failed")]
    NotificationFailed,
    #[strum(serialize = "notification-retry")]
    NotificationRetry,
    #[strum(serialize = "delivery-status-updates")]
    DeliveryStatusUpdates,

    // Dead letter
    #[strum(serialize = "notification-events-dlq")]
    NotificationEventsDlq,
    #[strum(serialize = "delivery-failures-dlq")]
    DeliveryFailuresDlq,
}

impl Topic {
    /// Topic name on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotificationEvents => NotificationEventsTopic::TOPIC_NAME,
            Self::UserPreferenceUpdates => "user-preference-updates",
            Self::TemplateUpdates => "template-updates",
            Self::ChannelConfigurationUpdates => "channel-configuration-updates",
            Self::NotificationCreated => NotificationCreatedTopic::TOPIC_NAME,
            Self::NotificationProcessed => "notification-processed",
            Self::NotificationDelivered => NotificationDeliveredTopic::TOPIC_NAME,
            Self::NotificationFailed => NotificationFailedTopic::TOPIC_NAME,
            Self::NotificationRetry => NotificationRetryTopic::TOPIC_NAME,
            Self::DeliveryStatusUpdates => DeliveryStatusTopic::TOPIC_NAME,
            Self::NotificationEventsDlq => "notification-events-dlq",
            Self::DeliveryFailuresDlq => "delivery-failures-dlq",
        }
    }

    pub fn group(&self) -> TopicGroup {
        match self {
            Self::NotificationEvents
            | Self::UserPreferenceUpdates
            | Self::TemplateUpdates
            | Self::ChannelConfigurationUpdates => TopicGroup::Input,
            Self::NotificationEventsDlq | Self::DeliveryFailuresDlq => TopicGroup::DeadLetter,
            _ => TopicGroup::Output,
        }
    }

    /// Dead-letter topic receiving this topic's unprocessable messages.
    pub fn dead_letter(&self) -> Option<Topic> {
        match self {
            Self::NotificationEvents => Some(Self::NotificationEventsDlq),
            Self::NotificationFailed => Some(Self::DeliveryFailuresDlq),
            _ => None,
        }
    }

    /// Provisioning defaults for this topic.
    ///
    /// Reference-data topics (preferences, templates, channel configuration)
    /// are compacted so consumers can rebuild the latest state per key.
    /// Status updates and dead letters are kept for 30 days.
    pub fn settings(&self) -> TopicSettings {
        let base = TopicSettings::default();
        match self {
            Self::UserPreferenceUpdates
            | Self::TemplateUpdates
            | Self::ChannelConfigurationUpdates => {
                base.with_cleanup_policy(CleanupPolicy::Compact)
            }
            Self::DeliveryStatusUpdates => DeliveryStatusTopic::settings(),
            Self::NotificationEventsDlq | Self::DeliveryFailuresDlq => {
                base.with_retention_ms(RETENTION_MS_30_DAYS)
            }
            _ => base,
        }
    }

    pub fn from_name(name: &str) -> NotificationResult<Self> {
        name.parse()
            .map_err(|_| NotificationError::unknown_code("topic", name))
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn in_group(group: TopicGroup) -> Vec<Self> {
        Self::iter().filter(|t| t.group() == group).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_defs() {
        assert_eq!(NotificationEventsTopic::topic_name(), "notification-events");
        assert_eq!(
            NotificationEventsTopic::dead_letter_topic(),
            Some("notification-events-dlq")
        );
        assert_eq!(NotificationCreatedTopic::dead_letter_topic(), None);
        assert_eq!(NotificationRetryTopic::PARTITIONS, 10);
        assert_eq!(DeliveryStatusTopic::settings().retention_ms, RETENTION_MS_30_DAYS);
    }

    #[test]
    fn test_registry_names_match_display() {
        for topic in Topic::all() {
            assert_eq!(topic.to_string(), topic.name());
            assert_eq!(Topic::from_name(topic.name()).unwrap(), topic);
        }
        assert!(Topic::from_name("notification-archive").is_err());
    }

    #[test]
    fn test_groups() {
        assert_eq!(Topic::in_group(TopicGroup::Input).len(), 4);
        assert_eq!(Topic::in_group(TopicGroup::Output).len(), 6);
        assert_eq!(Topic::in_group(TopicGroup::DeadLetter).len(), 2);
    }

    #[test]
    fn test_dead_letters_point_into_dead_letter_group() {
        for topic in Topic::all() {
            if let Some(dlq) = topic.dead_letter() {
                assert_eq!(dlq.group(), TopicGroup::DeadLetter);
            }
        }
        assert_eq!(
            Topic::NotificationEvents.dead_letter().map(|t| t.name()),
            NotificationEventsTopic::dead_letter_topic()
        );
    }

    #[test]
    fn test_settings() {
        assert_eq!(
            Topic::TemplateUpdates.settings().cleanup_policy,
            CleanupPolicy::Compact
        );
        assert_eq!(
            Topic::NotificationCreated.settings(),
            NotificationCreatedTopic::settings()
        );
        assert_eq!(CleanupPolicy::Compact.to_string(), "compact");
    }
}
