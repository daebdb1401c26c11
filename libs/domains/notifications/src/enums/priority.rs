use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Urgency of a notification.
///
/// Serialized by symbolic name. Parsing ignores ASCII case, so `"high"` and
/// `"HIGH"` both resolve to [`NotificationPriority::High`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum NotificationPriority {
    /// Immediate delivery, no delay.
    Critical,
    High,
    /// Default for standard notifications.
    #[default]
    Medium,
    Low,
}

impl NotificationPriority {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Numeric rank; lower means more urgent.
    pub fn level(&self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Critical => "Immediate delivery required",
            Self::High => "High priority delivery",
            Self::Medium => "Normal priority delivery",
            Self::Low => "Low priority delivery",
        }
    }

    /// Delay before the first delivery attempt, in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        match self {
            Self::Critical => 0,
            Self::High => 1_000,
            Self::Medium => 5_000,
            Self::Low => 30_000,
        }
    }

    /// Delivery expiry window advertised with the priority, in milliseconds.
    ///
    /// This is wire metadata only. Processing deadlines come from
    /// [`crate::utils::get_timeout_for_priority`], which uses a tighter table
    /// (CRITICAL 10s, HIGH 30s, MEDIUM 5m, LOW 30m).
    pub fn timeout_ms(&self) -> u64 {
        match self {
            Self::Critical => 30_000,
            Self::High => 60_000,
            Self::Medium => 300_000,
            Self::Low => 3_600_000,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms())
    }

    /// Case-insensitive lookup by name.
    pub fn from_code(code: &str) -> NotificationResult<Self> {
        code.parse().map_err(|_| {
            tracing::debug!(code, "Invalid notification priority");
            NotificationError::unknown_code("priority", code)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// True when `self` is strictly more urgent than `other`.
    pub fn is_higher_than(&self, other: &Self) -> bool {
        self.level() < other.level()
    }
}

/// Orders by urgency: the most urgent priority sorts first.
impl Ord for NotificationPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level().cmp(&other.level())
    }
}

impl PartialOrd for NotificationPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for NotificationPriority {
    type Error = NotificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}
