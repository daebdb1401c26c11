//! Out-of-band message headers for cross-service correlation.

use crate::constants::{
    HEADER_CORRELATION_ID, HEADER_CUSTOMER_ID, HEADER_EVENT_TYPE, HEADER_MAX_RETRIES,
    HEADER_PRIORITY, HEADER_RETRY_COUNT, HEADER_SOURCE_SERVICE, HEADER_TRACE_ID,
};
use crate::dto::NotificationEventDto;
use crate::enums::{NotificationEventType, NotificationPriority};
use crate::error::{NotificationError, NotificationResult};
use crate::utils::get_max_retries_for_priority;
use std::collections::HashMap;
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum HeaderKey {
    CorrelationId,
    TraceId,
    CustomerId,
    EventType,
    Priority,
    SourceService,
    RetryCount,
    MaxRetries,
}

impl HeaderKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CorrelationId => HEADER_CORRELATION_ID,
            Self::TraceId => HEADER_TRACE_ID,
            Self::CustomerId => HEADER_CUSTOMER_ID,
            Self::EventType => HEADER_EVENT_TYPE,
            Self::Priority => HEADER_PRIORITY,
            Self::SourceService => HEADER_SOURCE_SERVICE,
            Self::RetryCount => HEADER_RETRY_COUNT,
            Self::MaxRetries => HEADER_MAX_RETRIES,
        }
    }

    /// Header names compare case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|key| key.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of the correlation headers attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventHeaders {
    pub correlation_id: Option<String>,
    pub trace_id: Option<String>,
    pub customer_id: Option<String>,
    pub event_type: Option<NotificationEventType>,
    pub priority: Option<NotificationPriority>,
    pub source_service: Option<String>,
    pub retry_count: Option<u32>,
    pub max_retries: Option<u32>,
}

impl EventHeaders {
    /// Headers for the first delivery of `event`: retry count 0 and the
    /// priority's retry budget.
    pub fn from_event(event: &NotificationEventDto) -> Self {
        Self {
            correlation_id: event.correlation_id.clone(),
            trace_id: event.trace_id.clone(),
            customer_id: Some(event.customer_id.clone()),
            event_type: Some(event.event_type),
            priority: Some(event.priority),
            source_service: Some(event.source_service.clone()),
            retry_count: Some(0),
            max_retries: Some(get_max_retries_for_priority(event.priority)),
        }
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Another retry is allowed when both counters are known and the budget
    /// is not spent.
    pub fn retries_remaining(&self) -> bool {
        matches!((self.retry_count, self.max_retries), (Some(n), Some(max)) if n < max)
    }

    fn get(&self, key: HeaderKey) -> Option<String> {
        match key {
            HeaderKey::CorrelationId => self.correlation_id.clone(),
            HeaderKey::TraceId => self.trace_id.clone(),
            HeaderKey::CustomerId => self.customer_id.clone(),
            HeaderKey::EventType => self.event_type.map(|t| t.code().to_string()),
            HeaderKey::Priority => self.priority.map(|p| p.code().to_string()),
            HeaderKey::SourceService => self.source_service.clone(),
            HeaderKey::RetryCount => self.retry_count.map(|n| n.to_string()),
            HeaderKey::MaxRetries => self.max_retries.map(|n| n.to_string()),
        }
    }

    /// Present headers in [`HeaderKey`] order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        HeaderKey::iter()
            .filter_map(|key| self.get(key).map(|value| (key.as_str().to_string(), value)))
            .collect()
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.to_pairs().into_iter().collect()
    }

    /// Parses raw headers. Unknown names are ignored; malformed values fail.
    pub fn from_pairs<I, K, V>(pairs: I) -> NotificationResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Self::default();
        for (name, value) in pairs {
            let Some(key) = HeaderKey::from_name(name.as_ref()) else {
                continue;
            };
            let value = value.as_ref().trim();
            match key {
                HeaderKey::CorrelationId => headers.correlation_id = Some(value.to_string()),
                HeaderKey::TraceId => headers.trace_id = Some(value.to_string()),
                HeaderKey::CustomerId => headers.customer_id = Some(value.to_string()),
                HeaderKey::EventType => {
                    headers.event_type = Some(NotificationEventType::from_code(value)?)
                }
                HeaderKey::Priority => {
                    headers.priority = Some(NotificationPriority::from_code(value)?)
                }
                HeaderKey::SourceService => headers.source_service = Some(value.to_string()),
                HeaderKey::RetryCount => headers.retry_count = Some(parse_count(key, value)?),
                HeaderKey::MaxRetries => headers.max_retries = Some(parse_count(key, value)?),
            }
        }
        Ok(headers)
    }
}

fn parse_count(key: HeaderKey, value: &str) -> NotificationResult<u32> {
    value.parse().map_err(|_| {
        NotificationError::invalid_field(key.as_str(), format!("expected a count, got '{value}'"))
    })
}
