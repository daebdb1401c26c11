use crate::enums::{NotificationEventType, NotificationPriority, NotificationStatus};
use crate::error::{NotificationError, NotificationResult};
use crate::json::timestamp_option;
use crate::models::DeliveryAttempt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Notification Response
// ============================================================================

/// Snapshot of a notification and its lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub event_id: String,
    pub event_type: NotificationEventType,
    pub customer_id: String,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    #[serde(default)]
    pub source_service: Option<String>,
    #[serde(default, with = "timestamp_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_option")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_option")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_option")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_option")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NotificationResponse {
    /// Checks that the lifecycle timestamps agree with `status`.
    ///
    /// `delivered_at` requires DELIVERED or READ, `read_at` requires READ,
    /// and present timestamps must not run backwards
    /// (created ≤ processed ≤ delivered ≤ read).
    pub fn check_lifecycle(&self) -> NotificationResult<()> {
        if self.delivered_at.is_some() && !self.status.is_delivered_or_later() {
            return Err(NotificationError::invalid_field(
                "deliveredAt",
                format!("set while status is {}", self.status),
            ));
        }
        if self.read_at.is_some() && self.status != NotificationStatus::Read {
            return Err(NotificationError::invalid_field(
                "readAt",
                format!("set while status is {}", self.status),
            ));
        }

        let ordered = [
            ("createdAt", self.created_at),
            ("processedAt", self.processed_at),
            ("deliveredAt", self.delivered_at),
            ("readAt", self.read_at),
        ];
        let mut previous: Option<(&str, DateTime<Utc>)> = None;
        for (field, value) in ordered {
            let Some(value) = value else { continue };
            if let Some((prev_field, prev)) = previous {
                if value < prev {
                    return Err(NotificationError::invalid_field(
                        field,
                        format!("precedes {prev_field}"),
                    ));
                }
            }
            previous = Some((field, value));
        }
        Ok(())
    }
}

// ============================================================================
// Delivery Status Response
// ============================================================================

fn attempts_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<DeliveryAttempt>, D::Error> {
    Ok(Option::<Vec<DeliveryAttempt>>::deserialize(d)?.unwrap_or_default())
}

/// Delivery history of a notification with a derived summary.
///
/// The summary fields are recomputed from `delivery_attempts` by [`new`] and
/// [`set_delivery_attempts`]; they are public only so the type can be read
/// back from JSON.
///
/// [`new`]: DeliveryStatusResponse::new
/// [`set_delivery_attempts`]: DeliveryStatusResponse::set_delivery_attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatusResponse {
    pub notification_id: String,
    pub customer_id: String,
    pub overall_status: NotificationStatus,
    #[serde(default)]
    pub total_attempts: u32,
    #[serde(default)]
    pub successful_deliveries: u32,
    #[serde(default)]
    pub failed_deliveries: u32,
    #[serde(default, with = "timestamp_option")]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_option")]
    pub next_retry_at: Option<DateTime<Utc>>,
    /// `null` reads as an empty history.
    #[serde(default, deserialize_with = "attempts_or_empty")]
    pub delivery_attempts: Vec<DeliveryAttempt>,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl DeliveryStatusResponse {
    pub fn new(
        notification_id: impl Into<String>,
        customer_id: impl Into<String>,
        overall_status: NotificationStatus,
        delivery_attempts: Vec<DeliveryAttempt>,
    ) -> Self {
        let mut response = Self {
            notification_id: notification_id.into(),
            customer_id: customer_id.into(),
            overall_status,
            total_attempts: 0,
            successful_deliveries: 0,
            failed_deliveries: 0,
            last_attempt_at: None,
            next_retry_at: None,
            delivery_attempts: Vec::new(),
            last_error: None,
        };
        response.set_delivery_attempts(delivery_attempts);
        response
    }

    /// Replaces the attempt list and recomputes the summary.
    pub fn set_delivery_attempts(&mut self, attempts: Vec<DeliveryAttempt>) {
        self.delivery_attempts = attempts;
        self.recompute_summary();
    }

    fn recompute_summary(&mut self) {
        let attempts = &self.delivery_attempts;
        self.total_attempts = attempts.len() as u32;
        self.successful_deliveries = attempts.iter().filter(|a| a.is_successful()).count() as u32;
        self.failed_deliveries = attempts.iter().filter(|a| a.is_failed()).count() as u32;
        self.last_attempt_at = attempts.iter().filter_map(|a| a.attempted_at).max();
        // earliest pending retry across every attempt, failed or not
        self.next_retry_at = attempts.iter().filter_map(|a| a.next_retry_at).min();
        // last failure in list order, not by timestamp
        self.last_error = attempts
            .iter()
            .rev()
            .find(|a| a.is_failed())
            .and_then(|a| a.error_message.clone());
    }

    pub fn has_successful_delivery(&self) -> bool {
        self.successful_deliveries > 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed_deliveries > 0
    }

    /// A retry is scheduled after `now`.
    pub fn will_retry(&self, now: DateTime<Utc>) -> bool {
        self.next_retry_at.is_some_and(|at| at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ChannelType;
    use chrono::{TimeDelta, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + TimeDelta::minutes(minutes)
    }

    fn attempt(n: u32, status: NotificationStatus, at: Option<DateTime<Utc>>) -> DeliveryAttempt {
        let mut builder = DeliveryAttempt::builder()
            .attempt_number(n)
            .channel_type(ChannelType::Email)
            .provider("SENDGRID")
            .status(status)
            .error_message(format!("error {n}"));
        if let Some(at) = at {
            builder = builder.attempted_at(at);
        }
        builder.build().unwrap()
    }

    fn response(status: NotificationStatus) -> NotificationResponse {
        NotificationResponse {
            id: "notif_1".into(),
            event_id: "evt_1".into(),
            event_type: NotificationEventType::PaymentConfirmation,
            customer_id: "cust-001".into(),
            priority: NotificationPriority::High,
            status,
            source_service: None,
            created_at: Some(t(0)),
            processed_at: Some(t(1)),
            delivered_at: None,
            read_at: None,
            scheduled_at: None,
        }
    }

    #[test]
    fn test_summary_for_failure_then_success() {
        let response = DeliveryStatusResponse::new(
            "notif_1",
            "cust-001",
            NotificationStatus::Delivered,
            vec![
                attempt(1, NotificationStatus::Failed, Some(t(0))),
                attempt(2, NotificationStatus::Delivered, Some(t(5))),
            ],
        );
        assert_eq!(response.total_attempts, 2);
        assert_eq!(response.successful_deliveries, 1);
        assert_eq!(response.failed_deliveries, 1);
        assert_eq!(response.last_attempt_at, Some(t(5)));
        assert!(response.has_successful_delivery());
        assert!(response.has_failures());
        assert_eq!(response.last_error.as_deref(), Some("error 1"));
    }

    #[test]
    fn test_empty_attempts_keep_defaults() {
        let response =
            DeliveryStatusResponse::new("notif_1", "cust-001", NotificationStatus::Queued, vec![]);
        assert_eq!(response.total_attempts, 0);
        assert_eq!(response.last_attempt_at, None);
        assert_eq!(response.last_error, None);
        assert!(!response.will_retry(t(0)));
    }

    #[test]
    fn test_null_attempts_read_as_empty() {
        let response: DeliveryStatusResponse = serde_json::from_str(
            r#"{"notificationId":"n","customerId":"c","overallStatus":"FAILED","deliveryAttempts":null}"#,
        )
        .unwrap();
        assert!(response.delivery_attempts.is_empty());
        assert_eq!(response.total_attempts, 0);
        assert_eq!(response.last_error, None);

        let missing: DeliveryStatusResponse = serde_json::from_str(
            r#"{"notificationId":"n","customerId":"c","overallStatus":"FAILED"}"#,
        )
        .unwrap();
        assert_eq!(missing, response);
    }

    #[test]
    fn test_last_error_follows_list_order() {
        let response = DeliveryStatusResponse::new(
            "notif_1",
            "cust-001",
            NotificationStatus::Failed,
            vec![
                attempt(2, NotificationStatus::Bounced, Some(t(10))),
                attempt(1, NotificationStatus::Failed, Some(t(0))),
                attempt(3, NotificationStatus::Processing, None),
            ],
        );
        assert_eq!(response.last_error.as_deref(), Some("error 1"));
        assert_eq!(response.last_attempt_at, Some(t(10)));
    }

    #[test]
    fn test_next_retry_is_earliest_across_all_attempts() {
        let mut delivered = attempt(1, NotificationStatus::Delivered, Some(t(0)));
        delivered.next_retry_at = Some(t(20));
        let mut failed = attempt(2, NotificationStatus::Failed, Some(t(1)));
        failed.next_retry_at = Some(t(30));

        let mut response =
            DeliveryStatusResponse::new("notif_1", "cust-001", NotificationStatus::Failed, vec![]);
        response.set_delivery_attempts(vec![failed, delivered]);
        assert_eq!(response.next_retry_at, Some(t(20)));
        assert!(response.will_retry(t(19)));
        assert!(!response.will_retry(t(20)));
        assert_eq!(response.total_attempts, 2);
    }

    #[test]
    fn test_lifecycle_checks() {
        assert!(response(NotificationStatus::Processing).check_lifecycle().is_ok());

        let mut delivered = response(NotificationStatus::Processing);
        delivered.delivered_at = Some(t(2));
        assert!(delivered.check_lifecycle().is_err());
        delivered.status = NotificationStatus::Delivered;
        assert!(delivered.check_lifecycle().is_ok());

        delivered.read_at = Some(t(3));
        assert!(delivered.check_lifecycle().is_err());
        delivered.status = NotificationStatus::Read;
        assert!(delivered.check_lifecycle().is_ok());

        delivered.read_at = Some(t(-1));
        let err = delivered.check_lifecycle().unwrap_err();
        assert!(err.to_string().contains("readAt"));
    }
}
