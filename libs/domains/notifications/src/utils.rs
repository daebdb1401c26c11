//! Identifier generation, priority tables, retry timing and log masking.

use crate::config::RetryPolicy;
use crate::constants::{
    CRITICAL_MAX_RETRIES, CRITICAL_TIMEOUT, DEFAULT_CUSTOMER_NAME, DEFAULT_MAX_RETRIES,
    HIGH_TIMEOUT, LOW_TIMEOUT, MEDIUM_TIMEOUT, VAR_CUSTOMER_NAME,
};
use crate::enums::{NotificationEventType, NotificationPriority};
use crate::json::Payload;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// `notif_` followed by 32 lowercase hex digits.
pub fn generate_notification_id() -> String {
    format!("notif_{}", Uuid::new_v4().simple())
}

/// `evt_` followed by 32 lowercase hex digits.
pub fn generate_event_id() -> String {
    format!("evt_{}", Uuid::new_v4().simple())
}

/// `corr_` followed by a hyphenated UUID.
pub fn generate_correlation_id() -> String {
    format!("corr_{}", Uuid::new_v4().hyphenated())
}

/// Processing timeout for a priority.
///
/// This is the canonical timeout table. [`NotificationPriority::timeout_ms`]
/// carries a different, longer set of values that is kept only as wire
/// metadata.
pub fn get_timeout_for_priority(priority: NotificationPriority) -> Duration {
    match priority {
        NotificationPriority::Critical => CRITICAL_TIMEOUT,
        NotificationPriority::High => HIGH_TIMEOUT,
        NotificationPriority::Medium => MEDIUM_TIMEOUT,
        NotificationPriority::Low => LOW_TIMEOUT,
    }
}

pub fn get_max_retries_for_priority(priority: NotificationPriority) -> u32 {
    match priority {
        NotificationPriority::Critical => CRITICAL_MAX_RETRIES,
        _ => DEFAULT_MAX_RETRIES,
    }
}

/// When to retry after `attempt_number`, using the default backoff
/// (multiplier 2.0, capped at 6 hours).
pub fn calculate_next_retry(attempt_number: u32, base_delay: Duration) -> DateTime<Utc> {
    calculate_next_retry_from(Utc::now(), attempt_number, base_delay)
}

/// [`calculate_next_retry`] against an explicit clock.
pub fn calculate_next_retry_from(
    now: DateTime<Utc>,
    attempt_number: u32,
    base_delay: Duration,
) -> DateTime<Utc> {
    RetryPolicy::default()
        .with_base_delay(base_delay)
        .next_retry_at(attempt_number, now)
}

/// Customer name from the `customerName` template variable.
///
/// Non-string values use their JSON text; a missing or `null` value yields
/// "Valued Customer".
pub fn extract_customer_name(payload: &Payload) -> String {
    match payload.get(VAR_CUSTOMER_NAME) {
        None | Some(Value::Null) => DEFAULT_CUSTOMER_NAME.to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    }
}

/// Security events, fraud alerts and maintenance notices skip the queue.
pub fn requires_immediate_processing(event_type: NotificationEventType) -> bool {
    event_type.is_security_related()
        || matches!(
            event_type,
            NotificationEventType::FraudAlert | NotificationEventType::SystemMaintenance
        )
}

/// Masks a value for logs: first two and last two characters survive.
///
/// Absent values and values of four characters or fewer become `***`.
pub fn sanitize_for_logging(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "***".to_string();
    };
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "***".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}***{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use serde_json::json;

    #[test]
    fn test_id_formats() {
        let id = generate_notification_id();
        assert!(id.starts_with("notif_"));
        assert_eq!(id.len(), "notif_".len() + 32);
        assert!(id["notif_".len()..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let evt = generate_event_id();
        assert!(evt.starts_with("evt_") && evt.len() == 36);

        let corr = generate_correlation_id();
        assert!(Uuid::parse_str(corr.strip_prefix("corr_").unwrap()).is_ok());
        assert_ne!(generate_event_id(), generate_event_id());
    }

    #[test]
    fn test_priority_tables() {
        assert_eq!(get_timeout_for_priority(NotificationPriority::Critical), Duration::from_secs(10));
        assert_eq!(get_timeout_for_priority(NotificationPriority::Low), Duration::from_secs(1800));
        assert_eq!(get_max_retries_for_priority(NotificationPriority::Critical), 5);
        assert_eq!(get_max_retries_for_priority(NotificationPriority::Medium), 3);
    }

    #[test]
    fn test_next_retry_backoff() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let base = Duration::from_secs(60);
        assert_eq!(calculate_next_retry_from(now, 1, base), now + TimeDelta::seconds(60));
        assert_eq!(calculate_next_retry_from(now, 3, base), now + TimeDelta::seconds(240));
        assert_eq!(calculate_next_retry_from(now, 30, base), now + TimeDelta::hours(6));
    }

    #[test]
    fn test_extract_customer_name() {
        let mut payload = Payload::new();
        assert_eq!(extract_customer_name(&payload), "Valued Customer");
        payload.insert("customerName".into(), json!("Ada Lovelace"));
        assert_eq!(extract_customer_name(&payload), "Ada Lovelace");
        payload.insert("customerName".into(), json!(42));
        assert_eq!(extract_customer_name(&payload), "42");
    }

    #[test]
    fn test_requires_immediate_processing() {
        assert!(requires_immediate_processing(NotificationEventType::PasswordChange));
        assert!(requires_immediate_processing(NotificationEventType::SystemMaintenance));
        assert!(!requires_immediate_processing(NotificationEventType::Promotional));
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging(None), "***");
        assert_eq!(sanitize_for_logging(Some("abcd")), "***");
        assert_eq!(sanitize_for_logging(Some("customer-42")), "cu***42");
        assert_eq!(sanitize_for_logging(Some("żółwiątko")), "żó***ko");
    }
}
