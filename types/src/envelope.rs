//! The uniform result shape produced once per source lookup.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::Source;

/// Key holding the failure description in an error payload.
pub const ERROR_KEY: &str = "error";

const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, Error)]
#[error("payload must contain at least one field")]
pub struct EmptyPayloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadKind {
    Data,
    Error,
}

/// Decoded response fields, or a single `error` field.
///
/// Both shapes share the same ordered map so they render through one path.
/// A payload is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    kind: PayloadKind,
    fields: Map<String, Value>,
}

impl Payload {
    /// Wrap decoded response fields.
    pub fn data(fields: Map<String, Value>) -> Result<Self, EmptyPayloadError> {
        if fields.is_empty() {
            return Err(EmptyPayloadError);
        }
        Ok(Self {
            kind: PayloadKind::Data,
            fields,
        })
    }

    /// Build an error payload. A blank message becomes `unknown error`.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        let mut fields = Map::with_capacity(1);
        fields.insert(ERROR_KEY.to_string(), Value::String(message));
        Self {
            kind: PayloadKind::Error,
            fields,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == PayloadKind::Error
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self.kind {
            PayloadKind::Error => self.fields.get(ERROR_KEY).and_then(Value::as_str),
            PayloadKind::Data => None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// One source's answer: who produced it and what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    source: Source,
    payload: Payload,
}

impl Envelope {
    #[must_use]
    pub fn new(source: Source, payload: Payload) -> Self {
        Self { source, payload }
    }

    pub fn failed(source: Source, message: impl Into<String>) -> Self {
        Self::new(source, Payload::error(message))
    }

    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.payload.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn data_payload_rejects_empty_map() {
        assert!(Payload::data(Map::new()).is_err());
    }

    #[test]
    fn data_payload_keeps_field_order() {
        let payload =
            Payload::data(object(json!({"street": "Praça da Sé", "cep": "01001000"}))).unwrap();
        let keys: Vec<&str> = payload.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["street", "cep"]);
        assert!(!payload.is_error());
        assert_eq!(payload.error_message(), None);
    }

    #[test]
    fn error_payload_has_single_error_field() {
        let payload = Payload::error("connection refused");
        assert!(payload.is_error());
        assert_eq!(payload.fields().len(), 1);
        assert_eq!(payload.error_message(), Some("connection refused"));
    }

    #[test]
    fn blank_error_message_is_replaced() {
        let payload = Payload::error("   ");
        assert_eq!(payload.error_message(), Some("unknown error"));
    }

    #[test]
    fn data_with_error_key_is_still_data() {
        let payload = Payload::data(object(json!({"error": "upstream said so"}))).unwrap();
        assert!(!payload.is_error());
    }

    #[test]
    fn failed_envelope_carries_source() {
        let envelope = Envelope::failed(Source::ViaCep, "timeout");
        assert_eq!(envelope.source(), Source::ViaCep);
        assert!(envelope.is_error());
    }
}
