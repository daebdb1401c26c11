//! Field validators shared by the DTOs and value objects.
//!
//! The `validate_*` functions plug into `#[validate(custom(function = ...))]`;
//! the `check_*` functions take explicit [`ValidationLimits`] and report a
//! [`NotificationError::InvalidField`].

use crate::config::ValidationLimits;
use crate::error::{NotificationError, NotificationResult};
use crate::json::{Payload, serialized_size};
use crate::utils::sanitize_for_logging;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Letters, digits, hyphens and underscores.
static CUSTOMER_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// E.164-style phone number, optional leading `+`.
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap());

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Customer ID check with explicit bounds.
///
/// The value is trimmed first; blank values, values outside
/// `[min_customer_id_len, max_customer_id_len]` and values containing
/// anything besides `[A-Za-z0-9_-]` are rejected.
pub fn check_customer_id(value: &str, limits: &ValidationLimits) -> NotificationResult<()> {
    customer_id_rule(value, limits).map_err(|e| {
        tracing::debug!(
            customer_id = %sanitize_for_logging(Some(value)),
            reason = %e.code,
            "Rejected customer ID"
        );
        NotificationError::invalid_field(
            "customerId",
            e.message.unwrap_or(Cow::Borrowed("invalid customer ID")),
        )
    })
}

fn customer_id_rule(value: &str, limits: &ValidationLimits) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(rule("required", "Customer ID is required"));
    }
    let len = trimmed.chars().count();
    if len < limits.min_customer_id_len || len > limits.max_customer_id_len {
        return Err(rule(
            "invalid_customer_id_length",
            format!(
                "Customer ID must be between {} and {} characters",
                limits.min_customer_id_len, limits.max_customer_id_len
            ),
        ));
    }
    if !CUSTOMER_ID_CHARS.is_match(trimmed) {
        return Err(rule(
            "invalid_customer_id",
            "Customer ID may only contain letters, digits, hyphens and underscores",
        ));
    }
    Ok(())
}

/// Custom validator for customer IDs using the default limits.
pub fn validate_customer_id(value: &str) -> Result<(), ValidationError> {
    customer_id_rule(value, &ValidationLimits::default())
}

pub fn is_valid_customer_id(value: &str) -> bool {
    validate_customer_id(value).is_ok()
}

pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    if !PHONE_NUMBER.is_match(value) {
        return Err(rule("invalid_phone_number", "Invalid phone number format"));
    }
    Ok(())
}

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required", "must not be blank"));
    }
    Ok(())
}

/// Serialized payload must fit within `limits.max_payload_bytes`.
pub fn check_payload_size(payload: &Payload, limits: &ValidationLimits) -> NotificationResult<()> {
    let size = serialized_size(payload)?;
    if size > limits.max_payload_bytes {
        tracing::debug!(size, max = limits.max_payload_bytes, "Rejected oversized payload");
        return Err(NotificationError::invalid_field(
            "payload",
            format!(
                "serialized payload is {size} bytes, limit is {}",
                limits.max_payload_bytes
            ),
        ));
    }
    Ok(())
}

/// Template body must fit within `limits.max_template_bytes` (UTF-8 bytes).
pub fn check_template_size(template: &str, limits: &ValidationLimits) -> NotificationResult<()> {
    if template.len() > limits.max_template_bytes {
        return Err(NotificationError::invalid_field(
            "template",
            format!(
                "template is {} bytes, limit is {}",
                template.len(),
                limits.max_template_bytes
            ),
        ));
    }
    Ok(())
}

pub fn check_source_service(value: &str, limits: &ValidationLimits) -> NotificationResult<()> {
    if value.chars().count() > limits.max_source_service_len {
        return Err(NotificationError::invalid_field(
            "sourceService",
            format!(
                "Source service name cannot exceed {} characters",
                limits.max_source_service_len
            ),
        ));
    }
    Ok(())
}

/// Rejects blank required strings with a field-level message.
pub fn check_not_blank(field: &str, value: &str) -> NotificationResult<()> {
    if value.trim().is_empty() {
        return Err(NotificationError::invalid_field(field, "is required"));
    }
    Ok(())
}
