//! Tunables for retry timing, validation limits and topic provisioning.
//!
//! Each struct has constant defaults and a [`FromEnv`] implementation so host
//! services can override individual values without code changes.

use crate::constants::{
    DEFAULT_RETRY_DELAY, MAX_CUSTOMER_ID_LENGTH, MAX_PAYLOAD_SIZE_BYTES, MAX_RETRY_DELAY,
    MAX_SOURCE_SERVICE_LENGTH, MAX_TEMPLATE_SIZE_BYTES, MIN_CUSTOMER_ID_LENGTH,
    RETRY_BACKOFF_MULTIPLIER,
};
use crate::topics::{CleanupPolicy, DEFAULT_PARTITIONS, DEFAULT_REPLICATION_FACTOR, RETENTION_MS_7_DAYS};
use chrono::{DateTime, TimeDelta, Utc};
use core_config::{env_duration_ms_or, env_parse_or, ConfigError, FromEnv};
use std::time::Duration;

// ============================================================================
// Retry Policy
// ============================================================================

/// Exponential backoff for delivery retries.
///
/// `delay(n) = min(base_delay * backoff_multiplier^(n - 1), max_delay)`.
/// Attempt numbers start at 1, so the first retry waits exactly `base_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub backoff_multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_RETRY_DELAY,
            backoff_multiplier: RETRY_BACKOFF_MULTIPLIER,
            max_delay: MAX_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Multipliers below 1.0 (or NaN) are raised to 1.0 so delays never shrink.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier.max(1.0);
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before retrying after attempt `attempt_number`.
    ///
    /// Attempt 0 is treated as attempt 1.
    pub fn delay_for_attempt(&self, attempt_number: u32) -> Duration {
        let exponent = i32::try_from(attempt_number.saturating_sub(1)).unwrap_or(i32::MAX);
        let max_ms = self.max_delay.as_millis() as f64;
        let delay_ms = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);

        if !delay_ms.is_finite() || delay_ms >= max_ms {
            self.max_delay
        } else {
            Duration::from_millis(delay_ms as u64)
        }
    }

    /// Wall-clock instant of the next retry, measured from `now`.
    pub fn next_retry_at(&self, attempt_number: u32, now: DateTime<Utc>) -> DateTime<Utc> {
        let delay = TimeDelta::from_std(self.delay_for_attempt(attempt_number))
            .unwrap_or(TimeDelta::MAX);
        now.checked_add_signed(delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl FromEnv for RetryPolicy {
    /// Reads:
    /// - NOTIFICATION_RETRY_BASE_DELAY_MS (default 60000)
    /// - NOTIFICATION_RETRY_BACKOFF_MULTIPLIER (default 2.0)
    /// - NOTIFICATION_RETRY_MAX_DELAY_MS (default 21600000)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self::new()
            .with_base_delay(env_duration_ms_or(
                "NOTIFICATION_RETRY_BASE_DELAY_MS",
                defaults.base_delay,
            )?)
            .with_backoff_multiplier(env_parse_or(
                "NOTIFICATION_RETRY_BACKOFF_MULTIPLIER",
                defaults.backoff_multiplier,
            )?)
            .with_max_delay(env_duration_ms_or(
                "NOTIFICATION_RETRY_MAX_DELAY_MS",
                defaults.max_delay,
            )?))
    }
}

// ============================================================================
// Validation Limits
// ============================================================================

/// Bounds applied by the field validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub min_customer_id_len: usize,
    pub max_customer_id_len: usize,
    pub max_payload_bytes: usize,
    pub max_template_bytes: usize,
    pub max_source_service_len: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_customer_id_len: MIN_CUSTOMER_ID_LENGTH,
            max_customer_id_len: MAX_CUSTOMER_ID_LENGTH,
            max_payload_bytes: MAX_PAYLOAD_SIZE_BYTES,
            max_template_bytes: MAX_TEMPLATE_SIZE_BYTES,
            max_source_service_len: MAX_SOURCE_SERVICE_LENGTH,
        }
    }
}

impl ValidationLimits {
    pub fn with_customer_id_len(mut self, min: usize, max: usize) -> Self {
        self.min_customer_id_len = min;
        self.max_customer_id_len = max.max(min);
        self
    }

    pub fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    pub fn with_max_template_bytes(mut self, bytes: usize) -> Self {
        self.max_template_bytes = bytes;
        self
    }
}

impl FromEnv for ValidationLimits {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let min = env_parse_or("NOTIFICATION_MIN_CUSTOMER_ID_LENGTH", defaults.min_customer_id_len)?;
        let max = env_parse_or("NOTIFICATION_MAX_CUSTOMER_ID_LENGTH", defaults.max_customer_id_len)?;
        if min > max {
            return Err(ConfigError::ParseError {
                key: "NOTIFICATION_MIN_CUSTOMER_ID_LENGTH".to_string(),
                details: format!("minimum {} exceeds maximum {}", min, max),
            });
        }

        Ok(Self {
            min_customer_id_len: min,
            max_customer_id_len: max,
            max_payload_bytes: env_parse_or(
                "NOTIFICATION_MAX_PAYLOAD_BYTES",
                defaults.max_payload_bytes,
            )?,
            max_template_bytes: env_parse_or(
                "NOTIFICATION_MAX_TEMPLATE_BYTES",
                defaults.max_template_bytes,
            )?,
            max_source_service_len: env_parse_or(
                "NOTIFICATION_MAX_SOURCE_SERVICE_LENGTH",
                defaults.max_source_service_len,
            )?,
        })
    }
}

// ============================================================================
// Topic Settings
// ============================================================================

/// Provisioning settings for an event-stream topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicSettings {
    pub partitions: u32,
    pub replication_factor: u16,
    pub retention_ms: u64,
    pub cleanup_policy: CleanupPolicy,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            retention_ms: RETENTION_MS_7_DAYS,
            cleanup_policy: CleanupPolicy::Delete,
        }
    }
}

impl TopicSettings {
    pub fn with_partitions(mut self, partitions: u32) -> Self {
        self.partitions = partitions.max(1);
        self
    }

    pub fn with_replication_factor(mut self, factor: u16) -> Self {
        self.replication_factor = factor.max(1);
        self
    }

    pub fn with_retention_ms(mut self, retention_ms: u64) -> Self {
        self.retention_ms = retention_ms;
        self
    }

    pub fn with_cleanup_policy(mut self, policy: CleanupPolicy) -> Self {
        self.cleanup_policy = policy;
        self
    }

    pub fn retention(&self) -> Duration {
        Duration::from_millis(self.retention_ms)
    }
}

impl FromEnv for TopicSettings {
    /// Cluster-wide overrides; per-topic retention and cleanup policy still
    /// come from [`crate::topics::Topic::settings`].
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(defaults
            .with_partitions(env_parse_or("NOTIFICATION_TOPIC_PARTITIONS", defaults.partitions)?)
            .with_replication_factor(env_parse_or(
                "NOTIFICATION_TOPIC_REPLICATION_FACTOR",
                defaults.replication_factor,
            )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_retry_delay_progression() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(60));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(120));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(240));
        // attempt 0 behaves like the first attempt
        assert_eq!(policy.delay_for_attempt(0), policy.delay_for_attempt(1));
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(10), MAX_RETRY_DELAY);
        assert_eq!(policy.delay_for_attempt(u32::MAX), MAX_RETRY_DELAY);
    }

    #[test]
    fn test_retry_delay_is_non_decreasing() {
        let policy = RetryPolicy::default().with_base_delay(Duration::from_millis(750));
        let mut previous = Duration::ZERO;
        for attempt in 1..64 {
            let delay = policy.delay_for_attempt(attempt);
            assert!(delay >= previous, "attempt {} went backwards", attempt);
            assert!(delay <= MAX_RETRY_DELAY);
            previous = delay;
        }
    }

    #[test]
    fn test_multiplier_floor() {
        let policy = RetryPolicy::default().with_backoff_multiplier(0.5);
        assert_eq!(policy.backoff_multiplier, 1.0);
        assert_eq!(policy.delay_for_attempt(5), policy.base_delay);
    }

    #[test]
    fn test_next_retry_at_uses_given_clock() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let policy = RetryPolicy::default().with_base_delay(Duration::from_secs(30));

        assert_eq!(policy.next_retry_at(1, now), now + TimeDelta::seconds(30));
        assert_eq!(policy.next_retry_at(3, now), now + TimeDelta::seconds(120));
    }

    #[test]
    fn test_retry_policy_from_env() {
        temp_env::with_vars(
            [
                ("NOTIFICATION_RETRY_BASE_DELAY_MS", Some("5000")),
                ("NOTIFICATION_RETRY_BACKOFF_MULTIPLIER", Some("3")),
                ("NOTIFICATION_RETRY_MAX_DELAY_MS", None),
            ],
            || {
                let policy = RetryPolicy::from_env().unwrap();
                assert_eq!(policy.base_delay, Duration::from_secs(5));
                assert_eq!(policy.backoff_multiplier, 3.0);
                assert_eq!(policy.max_delay, MAX_RETRY_DELAY);
            },
        );
    }

    #[test]
    fn test_retry_policy_from_env_rejects_garbage() {
        temp_env::with_var("NOTIFICATION_RETRY_BASE_DELAY_MS", Some("soon"), || {
            let err = RetryPolicy::from_env().unwrap_err();
            assert!(err.to_string().contains("NOTIFICATION_RETRY_BASE_DELAY_MS"));
        });
    }

    #[test]
    fn test_validation_limits_from_env() {
        temp_env::with_vars(
            [
                ("NOTIFICATION_MIN_CUSTOMER_ID_LENGTH", Some("5")),
                ("NOTIFICATION_MAX_CUSTOMER_ID_LENGTH", Some("40")),
                ("NOTIFICATION_MAX_PAYLOAD_BYTES", None),
            ],
            || {
                let limits = ValidationLimits::from_env().unwrap();
                assert_eq!(limits.min_customer_id_len, 5);
                assert_eq!(limits.max_customer_id_len, 40);
                assert_eq!(limits.max_payload_bytes, MAX_PAYLOAD_SIZE_BYTES);
            },
        );
    }

    #[test]
    fn test_validation_limits_reject_inverted_range() {
        temp_env::with_vars(
            [
                ("NOTIFICATION_MIN_CUSTOMER_ID_LENGTH", Some("50")),
                ("NOTIFICATION_MAX_CUSTOMER_ID_LENGTH", Some("10")),
            ],
            || {
                assert!(ValidationLimits::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_topic_settings_defaults_and_env() {
        let defaults = TopicSettings::default();
        assert_eq!(defaults.partitions, 10);
        assert_eq!(defaults.replication_factor, 3);
        assert_eq!(defaults.retention(), Duration::from_secs(7 * 24 * 60 * 60));

        temp_env::with_var("NOTIFICATION_TOPIC_PARTITIONS", Some("0"), || {
            assert_eq!(TopicSettings::from_env().unwrap().partitions, 1);
        });
    }
}
