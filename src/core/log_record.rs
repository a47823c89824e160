//! Log record structure

use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;

/// Body substituted when a structured message cannot be serialized.
pub const SERIALIZATION_FALLBACK: &str = "[Failed to stringify log message]";

/// The message carried by a record.
///
/// Strings and numbers render verbatim; anything else renders as
/// pretty-printed JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogMessage {
    Text(String),
    Number(serde_json::Number),
    Structured(serde_json::Value),
    /// Serialization failed when the message was captured; holds the reason.
    Unserializable(String),
}

impl LogMessage {
    /// Capture any serializable value.
    ///
    /// Serialization errors are kept rather than returned, so a bad value
    /// can never fail an emission call.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::from(value),
            Err(e) => LogMessage::Unserializable(e.to_string()),
        }
    }

    /// The body text as it appears in a rendered line.
    pub fn body(&self) -> Cow<'_, str> {
        match self {
            LogMessage::Text(text) => Cow::Borrowed(text.as_str()),
            LogMessage::Number(number) => Cow::Owned(number.to_string()),
            LogMessage::Structured(value) => Cow::Owned(
                serde_json::to_string_pretty(value)
                    .unwrap_or_else(|_| SERIALIZATION_FALLBACK.to_string()),
            ),
            LogMessage::Unserializable(_) => Cow::Borrowed(SERIALIZATION_FALLBACK),
        }
    }
}

impl From<serde_json::Value> for LogMessage {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => LogMessage::Text(text),
            serde_json::Value::Number(number) => LogMessage::Number(number),
            other => LogMessage::Structured(other),
        }
    }
}

impl From<&str> for LogMessage {
    fn from(text: &str) -> Self {
        LogMessage::Text(text.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(text: String) -> Self {
        LogMessage::Text(text)
    }
}

impl From<&String> for LogMessage {
    fn from(text: &String) -> Self {
        LogMessage::Text(text.clone())
    }
}

impl From<bool> for LogMessage {
    fn from(flag: bool) -> Self {
        LogMessage::Structured(serde_json::Value::Bool(flag))
    }
}

impl From<f64> for LogMessage {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => LogMessage::Number(number),
            // NaN and infinities still read as numbers
            None => LogMessage::Text(value.to_string()),
        }
    }
}

macro_rules! integer_messages {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogMessage {
                fn from(value: $ty) -> Self {
                    LogMessage::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

integer_messages!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Optional per-message annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub kind: Option<String>,
    pub id: Option<String>,
}

impl MessageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-form category tag, rendered as `<kind> from "<id>" >>`.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Correlation identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    severity: Severity,
    message: LogMessage,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl LogRecord {
    pub fn new(
        severity: Severity,
        message: LogMessage,
        namespace: Option<String>,
        options: MessageOptions,
    ) -> Self {
        Self {
            severity,
            message,
            timestamp: Utc::now(),
            namespace,
            kind: options.kind,
            id: options.id,
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &LogMessage {
        &self.message
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(<S::Error as serde::ser::Error>::custom("cannot serialize"))
        }
    }

    #[test]
    fn test_primitive_bodies_are_verbatim() {
        assert_eq!(LogMessage::from("plain text").body(), "plain text");
        assert_eq!(LogMessage::from(42i64).body(), "42");
        assert_eq!(LogMessage::from(1.5).body(), "1.5");
        assert_eq!(LogMessage::structured(&"quoted?").body(), "quoted?");
    }

    #[test]
    fn test_structured_body_uses_two_space_indent() {
        let mut map = BTreeMap::new();
        map.insert("user", "alice");
        let body = LogMessage::structured(&map).body().into_owned();
        assert_eq!(body, "{\n  \"user\": \"alice\"\n}");
    }

    #[test]
    fn test_unserializable_body_falls_back() {
        let message = LogMessage::structured(&Unserializable);
        assert!(matches!(message, LogMessage::Unserializable(_)));
        assert_eq!(message.body(), SERIALIZATION_FALLBACK);
    }

    #[test]
    fn test_record_carries_options() {
        let record = LogRecord::new(
            Severity::Error,
            "boom".into(),
            Some("db-pool".to_string()),
            MessageOptions::new().kind("db").id("conn-7"),
        );
        assert_eq!(record.severity(), Severity::Error);
        assert_eq!(record.namespace(), Some("db-pool"));
        assert_eq!(record.kind(), Some("db"));
        assert_eq!(record.id(), Some("conn-7"));
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = LogRecord::new(
            Severity::Audit,
            LogMessage::from(7i64),
            None,
            MessageOptions::new().kind("login"),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["severity"], "audit");
        assert_eq!(json["message"], 7);
        assert_eq!(json["type"], "login");
        assert!(json.get("namespace").is_none());
    }
}
