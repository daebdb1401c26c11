//! JSON helpers for contract objects.
//!
//! Timestamps use `yyyy-MM-ddTHH:mm:ss.SSSZ` in UTC on the wire. Use the
//! [`timestamp`] and [`timestamp_option`] modules with `#[serde(with = ...)]`
//! on `DateTime<Utc>` fields.

use crate::error::{NotificationError, NotificationResult};
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Dynamic payload carried by requests and events.
pub type Payload = Map<String, Value>;

/// Wire format for timestamps, millisecond precision with a literal `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current time truncated to milliseconds, the precision the wire keeps.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses any RFC 3339 timestamp and normalizes it to UTC.
pub fn parse_timestamp(value: &str) -> NotificationResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NotificationError::invalid_field("timestamp", e.to_string()))
}

pub mod timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Optional timestamps; `null` and a missing field both map to `None`.
///
/// Pair with `#[serde(default)]` so absent fields deserialize.
pub mod timestamp_option {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&format_timestamp(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> NotificationResult<String> {
    serde_json::to_string(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize object to JSON");
        NotificationError::serialization("Failed to serialize object to JSON", e)
    })
}

pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> NotificationResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize object to pretty JSON");
        NotificationError::serialization("Failed to serialize object to pretty JSON", e)
    })
}

/// Pretty JSON for diagnostics. Falls back to the `Debug` rendering when the
/// value cannot be serialized.
pub fn pretty_print<T: Serialize + Debug + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to pretty print JSON");
        format!("{value:?}")
    })
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> NotificationResult<T> {
    serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, "Failed to deserialize JSON");
        NotificationError::serialization("Failed to deserialize JSON", e)
    })
}

/// Parses text into a JSON tree.
pub fn parse_json(json: &str) -> NotificationResult<Value> {
    serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse JSON");
        NotificationError::serialization("Failed to parse JSON", e)
    })
}

/// Converts a typed value into a JSON tree.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> NotificationResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| NotificationError::serialization("Failed to convert object to JSON tree", e))
}

/// Converts a JSON tree into a typed value.
pub fn from_value<T: DeserializeOwned>(value: Value) -> NotificationResult<T> {
    serde_json::from_value(value)
        .map_err(|e| NotificationError::serialization("Failed to convert JSON tree to object", e))
}

pub fn map_to_value(map: Payload) -> Value {
    Value::Object(map)
}

/// Extracts the object map of a JSON tree. Non-object values are rejected.
pub fn value_to_map(value: Value) -> NotificationResult<Payload> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(NotificationError::invalid_field(
            "payload",
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
    }
}

/// Size of the compact JSON rendering, in bytes.
pub fn serialized_size<T: Serialize + ?Sized>(value: &T) -> NotificationResult<usize> {
    to_json(value).map(|s| s.len())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
