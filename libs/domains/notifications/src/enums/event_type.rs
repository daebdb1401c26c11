use crate::error::{NotificationError, NotificationResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Business event that triggers a notification.
///
/// Drives routing, template selection and prioritization in the services
/// consuming the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEventType {
    // Financial
    TransactionAlert,
    PaymentConfirmation,
    PaymentFailed,
    RefundProcessed,

    // Security
    SecurityAlert,
    LoginAttempt,
    PasswordChange,
    DeviceRegistration,

    // Account
    AccountUpdate,
    AccountCreated,
    AccountSuspended,
    AccountClosed,

    // KYC / compliance
    KycUpdate,
    DocumentRequired,
    ComplianceAlert,

    // Fraud
    FraudAlert,
    SuspiciousActivity,

    // Statements
    StatementReady,
    MonthlySummary,

    // Marketing
    Promotional,
    ProductAnnouncement,
    FeatureUpdate,

    // System
    SystemMaintenance,
    ServiceOutage,
    ScheduledDowntime,

    // Support
    TicketCreated,
    TicketUpdated,
    TicketResolved,
}

impl NotificationEventType {
    /// Wire code, e.g. `PAYMENT_CONFIRMATION`.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TransactionAlert => "Transaction Alert",
            Self::PaymentConfirmation => "Payment Confirmation",
            Self::PaymentFailed => "Payment Failed",
            Self::RefundProcessed => "Refund Processed",
            Self::SecurityAlert => "Security Alert",
            Self::LoginAttempt => "Login Attempt",
            Self::PasswordChange => "Password Change",
            Self::DeviceRegistration => "Device Registration",
            Self::AccountUpdate => "Account Update",
            Self::AccountCreated => "Account Created",
            Self::AccountSuspended => "Account Suspended",
            Self::AccountClosed => "Account Closed",
            Self::KycUpdate => "KYC Update",
            Self::DocumentRequired => "Document Required",
            Self::ComplianceAlert => "Compliance Alert",
            Self::FraudAlert => "Fraud Alert",
            Self::SuspiciousActivity => "Suspicious Activity",
            Self::StatementReady => "Statement Ready",
            Self::MonthlySummary => "Monthly Summary",
            Self::Promotional => "Promotional",
            Self::ProductAnnouncement => "Product Announcement",
            Self::FeatureUpdate => "Feature Update",
            Self::SystemMaintenance => "System Maintenance",
            Self::ServiceOutage => "Service Outage",
            Self::ScheduledDowntime => "Scheduled Downtime",
            Self::TicketCreated => "Support Ticket Created",
            Self::TicketUpdated => "Support Ticket Updated",
            Self::TicketResolved => "Support Ticket Resolved",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::TransactionAlert => "Financial transaction notifications",
            Self::PaymentConfirmation => "Payment processing confirmations",
            Self::PaymentFailed => "Failed payment notifications",
            Self::RefundProcessed => "Refund processing notifications",
            Self::SecurityAlert => "Security-related alerts",
            Self::LoginAttempt => "Login attempt notifications",
            Self::PasswordChange => "Password change confirmations",
            Self::DeviceRegistration => "New device registration",
            Self::AccountUpdate => "Account information updates",
            Self::AccountCreated => "New account creation",
            Self::AccountSuspended => "Account suspension notifications",
            Self::AccountClosed => "Account closure notifications",
            Self::KycUpdate => "Know Your Customer updates",
            Self::DocumentRequired => "Required document notifications",
            Self::ComplianceAlert => "Compliance-related notifications",
            Self::FraudAlert => "Fraud detection alerts",
            Self::SuspiciousActivity => "Suspicious activity notifications",
            Self::StatementReady => "Account statement notifications",
            Self::MonthlySummary => "Monthly account summary",
            Self::Promotional => "Marketing and promotional content",
            Self::ProductAnnouncement => "New product announcements",
            Self::FeatureUpdate => "Platform feature updates",
            Self::SystemMaintenance => "System maintenance notifications",
            Self::ServiceOutage => "Service outage notifications",
            Self::ScheduledDowntime => "Scheduled maintenance notifications",
            Self::TicketCreated => "Support ticket notifications",
            Self::TicketUpdated => "Support ticket updates",
            Self::TicketResolved => "Support ticket resolution",
        }
    }

    /// Look up an event type by its exact wire code.
    pub fn from_code(code: &str) -> NotificationResult<Self> {
        code.parse().map_err(|_| {
            tracing::debug!(code, "Unknown notification event type");
            NotificationError::unknown_code("notification event type", code)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn is_security_related(&self) -> bool {
        matches!(
            self,
            Self::SecurityAlert
                | Self::LoginAttempt
                | Self::PasswordChange
                | Self::DeviceRegistration
                | Self::FraudAlert
                | Self::SuspiciousActivity
        )
    }

    pub fn is_financial_related(&self) -> bool {
        matches!(
            self,
            Self::TransactionAlert
                | Self::PaymentConfirmation
                | Self::PaymentFailed
                | Self::RefundProcessed
        )
    }

    pub fn is_marketing(&self) -> bool {
        matches!(
            self,
            Self::Promotional | Self::ProductAnnouncement | Self::FeatureUpdate
        )
    }
}

impl TryFrom<String> for NotificationEventType {
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
        for event_type in NotificationEventType::all() {
            let code = event_type.code();
            assert_eq!(NotificationEventType::from_code(code).unwrap(), event_type);
            assert_eq!(event_type.to_string(), code);
        }
        assert_eq!(NotificationEventType::all().count(), 28);
    }

    #[test]
    fn test_codes_match_wire_names() {
        assert_eq!(NotificationEventType::KycUpdate.code(), "KYC_UPDATE");
        assert_eq!(
            NotificationEventType::PaymentConfirmation.code(),
            "PAYMENT_CONFIRMATION"
        );
        assert_eq!(NotificationEventType::KycUpdate.display_name(), "KYC Update");
    }

    #[test]
    fn test_unknown_code_fails() {
        let err = NotificationEventType::from_code("LOTTERY_WIN").unwrap_err();
        assert!(matches!(err, NotificationError::UnknownCode { .. }));
        assert!(err.to_string().contains("LOTTERY_WIN"));

        // lookup is exact, not case-insensitive
        assert!(NotificationEventType::from_code("fraud_alert").is_err());
    }

    #[test]
    fn test_categories() {
        assert!(NotificationEventType::FraudAlert.is_security_related());
        assert!(!NotificationEventType::FraudAlert.is_financial_related());
        assert!(NotificationEventType::RefundProcessed.is_financial_related());
        assert!(NotificationEventType::FeatureUpdate.is_marketing());
        assert!(!NotificationEventType::SystemMaintenance.is_marketing());
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&NotificationEventType::TicketResolved).unwrap();
        assert_eq!(json, "\"TICKET_RESOLVED\"");

        let parsed: NotificationEventType = serde_json::from_str("\"LOGIN_ATTEMPT\"").unwrap();
        assert_eq!(parsed, NotificationEventType::LoginAttempt);

        assert!(serde_json::from_str::<NotificationEventType>("\"NOPE\"").is_err());
    }
}
