//! Platform-wide constants: consumer groups, header keys, timeouts, retry
//! and rate-limit settings, template variables and validation limits.
//!
//! Topic names live in [`crate::topics`].

use std::time::Duration;

// ============================================================================
// Consumer Groups
// ============================================================================

pub const CONSUMER_GROUP_NOTIFICATION_SERVICE: &str = "notification-service";
pub const CONSUMER_GROUP_AUDIT_SERVICE: &str = "audit-service";
pub const CONSUMER_GROUP_ANALYTICS_SERVICE: &str = "analytics-service";

// ============================================================================
// Header Keys
// ============================================================================

pub const HEADER_CORRELATION_ID: &str = "X-Correlation-ID";
pub const HEADER_TRACE_ID: &str = "X-Trace-ID";
pub const HEADER_CUSTOMER_ID: &str = "X-Customer-ID";
pub const HEADER_EVENT_TYPE: &str = "X-Event-Type";
pub const HEADER_PRIORITY: &str = "X-Priority";
pub const HEADER_SOURCE_SERVICE: &str = "X-Source-Service";
pub const HEADER_RETRY_COUNT: &str = "X-Retry-Count";
pub const HEADER_MAX_RETRIES: &str = "X-Max-Retries";

// ============================================================================
// Timeouts
// ============================================================================

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const CRITICAL_TIMEOUT: Duration = Duration::from_secs(10);
pub const HIGH_TIMEOUT: Duration = Duration::from_secs(30);
pub const MEDIUM_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const LOW_TIMEOUT: Duration = Duration::from_secs(30 * 60);

// ============================================================================
// Retry
// ============================================================================

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const CRITICAL_MAX_RETRIES: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(6 * 60 * 60);
pub const RETRY_BACKOFF_MULTIPLIER: f64 = 2.0;

// ============================================================================
// Rate Limiting
// ============================================================================

pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;
pub const CRITICAL_RATE_LIMIT_PER_MINUTE: u32 = 1000;

// ============================================================================
// Template Variables
// ============================================================================

pub const VAR_CUSTOMER_NAME: &str = "customerName";
pub const VAR_CUSTOMER_EMAIL: &str = "customerEmail";
pub const VAR_CUSTOMER_PHONE: &str = "customerPhone";
pub const VAR_TRANSACTION_AMOUNT: &str = "transactionAmount";
pub const VAR_TRANSACTION_DATE: &str = "transactionDate";
pub const VAR_MERCHANT_NAME: &str = "merchantName";
pub const VAR_ACCOUNT_NUMBER: &str = "accountNumber";

// ============================================================================
// Validation Limits
// ============================================================================

pub const MIN_CUSTOMER_ID_LENGTH: usize = 3;
pub const MAX_CUSTOMER_ID_LENGTH: usize = 100;
pub const MAX_SOURCE_SERVICE_LENGTH: usize = 100;
/// 1 MiB of serialized JSON.
pub const MAX_PAYLOAD_SIZE_BYTES: usize = 1_048_576;
/// 64 KiB.
pub const MAX_TEMPLATE_SIZE_BYTES: usize = 65_536;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_FROM_EMAIL: &str = "noreply@company.com";
pub const UNKNOWN_SOURCE_SERVICE: &str = "unknown";
pub const DEFAULT_CUSTOMER_NAME: &str = "Valued Customer";

/// Aggregate type stamped on every notification domain event.
pub const AGGREGATE_TYPE_NOTIFICATION: &str = "Notification";
