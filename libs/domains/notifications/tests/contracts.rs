//! End-to-end checks of the notification contracts as a consuming service
//! sees them.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use domain_notifications::json::{self, Payload};
use domain_notifications::utils::{calculate_next_retry, calculate_next_retry_from};
use domain_notifications::validation::is_valid_customer_id;
use domain_notifications::{
    ChannelProvider, ChannelType, CreateNotificationRequest, CustomerInfo, DeliveryAttempt,
    DeliveryStatus, DeliveryStatusResponse, NotificationEventType, NotificationPriority,
    NotificationStatus,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use strum::IntoEnumIterator;

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + TimeDelta::minutes(minutes)
}

#[test]
fn test_every_enum_round_trips_through_its_code() {
    for v in NotificationEventType::all() {
        assert_eq!(NotificationEventType::from_code(v.code()).unwrap().code(), v.code());
    }
    for v in NotificationPriority::all() {
        assert_eq!(NotificationPriority::from_code(v.code()).unwrap(), v);
    }
    for v in NotificationStatus::all() {
        assert_eq!(NotificationStatus::from_code(v.code()).unwrap(), v);
    }
    for v in ChannelType::all() {
        assert_eq!(ChannelType::from_code(v.code()).unwrap(), v);
    }
    for v in ChannelProvider::all() {
        assert_eq!(ChannelProvider::from_code(v.code()).unwrap(), v);
    }
    for v in DeliveryStatus::all() {
        assert_eq!(DeliveryStatus::from_code(v.code()).unwrap(), v);
    }

    assert!(NotificationEventType::from_code("UNKNOWN_EVENT").is_err());
    assert!(NotificationPriority::from_code("URGENT").is_err());
    assert!(NotificationStatus::from_code("ARCHIVED").is_err());
    assert!(ChannelType::from_code("PIGEON").is_err());
    assert!(ChannelProvider::from_code("POSTMARK").is_err());
    assert!(DeliveryStatus::from_code("").is_err());
}

#[test]
fn test_priority_urgency_is_a_strict_total_order() {
    let all: Vec<_> = NotificationPriority::iter().collect();
    for a in &all {
        assert!(!a.is_higher_than(a));
        for b in &all {
            if a != b {
                assert!(a.is_higher_than(b) ^ b.is_higher_than(a));
            }
            assert_eq!(a.is_higher_than(b), a.level() < b.level());
        }
    }

    let mut sorted = vec![
        NotificationPriority::Low,
        NotificationPriority::Critical,
        NotificationPriority::Medium,
        NotificationPriority::High,
    ];
    sorted.sort();
    assert_eq!(sorted, all);
}

#[test]
fn test_first_retry_waits_base_delay() {
    let base = Duration::from_secs(60);
    let before = Utc::now();
    let next = calculate_next_retry(1, base);
    let after = Utc::now();
    assert!(next >= before + TimeDelta::seconds(60) - TimeDelta::milliseconds(5));
    assert!(next <= after + TimeDelta::seconds(60));
}

#[test]
fn test_retry_delay_is_non_decreasing_and_capped() {
    let now = at(0);
    let base = Duration::from_secs(90);
    let mut previous = now;
    for attempt in 1..=40 {
        let next = calculate_next_retry_from(now, attempt, base);
        assert!(next >= previous);
        assert!(next - now <= TimeDelta::hours(6));
        previous = next;
    }
    assert_eq!(previous - now, TimeDelta::hours(6));
}

#[test]
fn test_delivery_status_aggregation() {
    let failed = DeliveryAttempt::builder()
        .attempt_number(1)
        .channel_type(ChannelType::Email)
        .provider("SENDGRID")
        .status(NotificationStatus::Failed)
        .attempted_at(at(0))
        .error_message("SMTP 421 try again later")
        .next_retry_at(at(1))
        .build()
        .unwrap();
    let delivered = DeliveryAttempt::builder()
        .attempt_number(2)
        .channel_type(ChannelType::Email)
        .provider("SENDGRID")
        .status(NotificationStatus::Delivered)
        .attempted_at(at(1))
        .external_id("sg-123")
        .build()
        .unwrap();

    let response = DeliveryStatusResponse::new(
        "notif_1",
        "cust-001",
        NotificationStatus::Delivered,
        vec![failed, delivered],
    );
    assert_eq!(response.total_attempts, 2);
    assert_eq!(response.successful_deliveries, 1);
    assert_eq!(response.failed_deliveries, 1);
    assert_eq!(response.last_attempt_at, Some(at(1)));
    assert!(response.has_successful_delivery());
    assert_eq!(response.last_error.as_deref(), Some("SMTP 421 try again later"));

    let wire = json::to_json(&response).unwrap();
    let back: DeliveryStatusResponse = json::from_json(&wire).unwrap();
    assert_eq!(back, response);
}

#[test]
fn test_customer_full_name() {
    assert_eq!(CustomerInfo::new("c1").full_name(), None);
    assert_eq!(
        CustomerInfo::new("c1")
            .with_name(None, Some("Hopper".into()))
            .full_name()
            .as_deref(),
        Some("Hopper")
    );
}

#[test]
fn test_customer_id_examples() {
    assert!(!is_valid_customer_id("ab"));
    assert!(is_valid_customer_id("ab_12-XY"));
    assert!(!is_valid_customer_id("bad id!"));
}

#[test]
fn test_create_request_json_round_trip() {
    let mut payload = Payload::new();
    payload.insert("customerName".into(), json!("Grace Hopper"));
    payload.insert("transactionAmount".into(), json!(125.5));
    payload.insert("tags".into(), json!(["card", "online"]));

    let request = CreateNotificationRequest::builder()
        .event_type(NotificationEventType::TransactionAlert)
        .customer_id("cust-001")
        .payload(payload)
        .priority(NotificationPriority::High)
        .source_service("card-processing")
        .scheduled_at(at(5))
        .expires_at(at(65))
        .metadata(HashMap::from([("channel".to_string(), "EMAIL".to_string())]))
        .build()
        .unwrap();

    let wire = json::to_json(&request).unwrap();
    assert!(wire.contains(r#""scheduledAt":"2024-06-01T09:05:00.000Z""#));
    assert!(wire.contains(r#""eventType":"TRANSACTION_ALERT""#));

    let back: CreateNotificationRequest = json::from_json(&wire).unwrap();
    assert_eq!(back, request);
}
