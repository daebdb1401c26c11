//! Error types for the notification contracts.

use crate::enums::ChannelType;
use core_config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Result type for notification contract operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors raised while building, validating or (de)serializing contracts.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// One or more field-level validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A single field holds a malformed or missing value.
    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    /// A wire code does not name any value of the enumeration.
    #[error("Unknown {kind}: {code}")]
    UnknownCode { kind: &'static str, code: String },

    /// The JSON codec rejected a value.
    #[error("{context}: {source}")]
    Serialization {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A delivery attempt failed; interpretation is up to the delivery engine.
    #[error(transparent)]
    DeliveryFailed(#[from] DeliveryFailure),

    /// Configuration could not be loaded from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NotificationError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        NotificationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_code(kind: &'static str, code: impl Into<String>) -> Self {
        NotificationError::UnknownCode {
            kind,
            code: code.into(),
        }
    }

    pub fn serialization(context: &'static str, source: serde_json::Error) -> Self {
        NotificationError::Serialization { context, source }
    }

    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            NotificationError::Validation(_) | NotificationError::InvalidField { .. } => {
                "VALIDATION_ERROR"
            }
            NotificationError::UnknownCode { .. } => "UNKNOWN_CODE",
            NotificationError::Serialization { .. } => "SERIALIZATION_ERROR",
            NotificationError::DeliveryFailed(_) => DeliveryFailure::ERROR_CODE,
            NotificationError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the delivery engine may retry the operation that raised this error.
    ///
    /// Only delivery failures carry a retry decision; every other error is a
    /// contract violation and retrying the same input cannot succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            NotificationError::DeliveryFailed(failure) => failure.retryable,
            _ => false,
        }
    }
}

/// Details of a failed delivery attempt.
///
/// This type only carries data. Whether and when to retry is decided by the
/// delivery engine that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub message: String,
    pub channel_type: ChannelType,
    pub provider: String,
    pub attempt_number: u32,
    pub retryable: bool,
    pub cause: Option<String>,
}

impl DeliveryFailure {
    pub const ERROR_CODE: &'static str = "DELIVERY_FAILED";

    /// A retryable failure on the first attempt.
    pub fn new(
        message: impl Into<String>,
        channel_type: ChannelType,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            channel_type,
            provider: provider.into(),
            attempt_number: 1,
            retryable: true,
            cause: None,
        }
    }

    pub fn with_attempt(mut self, attempt_number: u32, retryable: bool) -> Self {
        self.attempt_number = attempt_number;
        self.retryable = retryable;
        self
    }

    /// Attach the underlying error's text.
    pub fn with_cause(mut self, cause: &dyn std::error::Error) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Delivery failed via {} ({}) on attempt {}: {}",
            self.channel_type, self.provider, self.attempt_number, self.message
        )?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {})", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for DeliveryFailure {}
