//! JSON wire form of an Adaptable
//!
//! `{ "topic", "headers", "path", "value"?, "status"?, "extra"?, "revision"?, "timestamp"?, "fields"? }`

use super::headers::Headers;
use super::payload::{Adaptable, Payload};
use super::pointer::JsonPointer;
use crate::error::{ProtocolError, ProtocolResult};
use crate::topic::TopicPath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
struct WireEnvelope {
    topic: String,
    #[serde(default)]
    headers: Headers,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
}

impl Adaptable {
    /// Decode the JSON wire form.
    pub fn from_json_value(value: Value) -> ProtocolResult<Self> {
        let wire: WireEnvelope = serde_json::from_value(value).map_err(invalid_envelope)?;
        Self::from_wire(wire)
    }

    /// Decode the JSON wire form from text.
    pub fn from_json_str(json: &str) -> ProtocolResult<Self> {
        let wire: WireEnvelope = serde_json::from_str(json).map_err(invalid_envelope)?;
        Self::from_wire(wire)
    }

    /// Encode into a JSON value. Object keys of a `Value` are not ordered;
    /// use `to_json_string` when header order matters.
    pub fn to_json_value(&self) -> Value {
        // a struct of strings, numbers and JSON values always serializes
        serde_json::to_value(self.to_wire()).unwrap_or(Value::Null)
    }

    /// Encode into JSON text, keeping field and header order.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.to_wire()).unwrap_or_default()
    }

    fn to_wire(&self) -> WireEnvelope {
        let payload = self.payload();
        WireEnvelope {
            topic: self.topic_path().render(),
            headers: self.headers().clone(),
            path: payload.path.render(),
            value: payload.value.clone(),
            status: payload.status,
            extra: payload.extra.clone(),
            revision: payload.revision,
            timestamp: payload.timestamp,
            fields: payload.fields.clone(),
        }
    }

    fn from_wire(wire: WireEnvelope) -> ProtocolResult<Self> {
        let topic_path = TopicPath::parse(&wire.topic)?;
        let payload = Payload {
            path: JsonPointer::parse(&wire.path),
            value: wire.value,
            status: wire.status,
            extra: wire.extra,
            revision: wire.revision,
            timestamp: wire.timestamp,
            fields: wire.fields,
        };
        Ok(Adaptable::new(topic_path, payload, wire.headers))
    }
}

fn invalid_envelope(err: serde_json::Error) -> ProtocolError {
    ProtocolError::InvalidEnvelope {
        message: err.to_string(),
    }
}
