//! The response envelope and its timestamp.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::Result;

/// Outcome reported in the envelope's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Metadata block: the request timestamp first, then any extra keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    /// Stamped with the current UTC time.
    pub fn now() -> Self {
        Self { timestamp: timestamp(OffsetDateTime::now_utc()), extra: Map::new() }
    }
}

/// Uniform wrapper for every API response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    pub data: Option<T>,
    pub meta: Meta,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self { status: Status::Success, message: message.into(), data: Some(data), meta: Meta::now() }
    }

    /// An error envelope: no data, and the error's text under `meta.error`.
    pub fn error(message: impl Into<String>, error: &dyn Display) -> Self {
        Self { status: Status::Error, message: message.into(), data: None, meta: Meta::now() }
            .with_meta("error", error.to_string())
    }

    /// Adds a key to `meta`. Values that fail to serialize become `null`.
    pub fn with_meta(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.meta.extra.insert(key.to_string(), value);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Formats a time as ISO-8601 UTC with millisecond precision.
pub fn timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    at.to_offset(time::UtcOffset::UTC).format(&format).unwrap_or_default()
}

/// Serializes any envelope to a JSON string.
pub fn to_json_string<T: Serialize>(envelope: &Envelope<T>, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(envelope)?) } else { Ok(serde_json::to_string(envelope)?) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KaedeError;
    use time::macros::datetime;

    #[test]
    fn test_timestamp_format() {
        let at = datetime!(2024-03-09 07:05:01.250 UTC);
        assert_eq!(timestamp(at), "2024-03-09T07:05:01.250Z");
    }

    #[test]
    fn test_timestamp_converts_to_utc() {
        let at = datetime!(2024-03-09 14:05:01 +7);
        assert_eq!(timestamp(at), "2024-03-09T07:05:01.000Z");
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success("ok", vec![1, 2, 3]).with_meta("source_url", "https://example.com/");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "ok");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["meta"]["source_url"], "https://example.com/");
        assert!(json["meta"]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_error_envelope_carries_cause() {
        let err = KaedeError::Timeout { timeout: 30 };
        let envelope = Envelope::<()>::error("Failed to fetch homepage data", &err);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["status"], "error");
        assert!(json["data"].is_null());
        assert_eq!(json["meta"]["error"], "Request timed out after 30 seconds");
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_timestamp_serializes_first() {
        let envelope = Envelope::success("ok", ()).with_meta("aaa", 1);
        let json = to_json_string(&envelope, false).unwrap();
        assert!(json.find("timestamp").unwrap() < json.find("aaa").unwrap());
    }
}
