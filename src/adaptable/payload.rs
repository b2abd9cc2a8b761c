//! Payload and the Adaptable envelope

use super::headers::Headers;
use super::pointer::JsonPointer;
use crate::topic::TopicPath;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Payload of an adaptable: where in the signal's shape, and what.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Pointer into the signal's own JSON shape
    pub path: JsonPointer,
    pub value: Option<Value>,
    /// HTTP-like status, present exactly on responses
    pub status: Option<u16>,
    /// Auxiliary JSON (e.g. enriched extra fields of events)
    pub extra: Option<Value>,
    pub revision: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Field selector of retrieve commands
    pub fields: Option<String>,
}

impl Payload {
    pub fn new(path: impl Into<JsonPointer>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_optional_value(mut self, value: Option<Value>) -> Self {
        self.value = value;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = Some(revision);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }
}

/// Transport-neutral envelope: topic path, payload and headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Adaptable {
    topic_path: TopicPath,
    payload: Payload,
    headers: Headers,
}

impl Adaptable {
    pub fn new(topic_path: TopicPath, payload: Payload, headers: Headers) -> Self {
        Self {
            topic_path,
            payload,
            headers,
        }
    }

    pub fn topic_path(&self) -> &TopicPath {
        &self.topic_path
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Same topic path and payload with other headers
    pub fn with_headers(self, headers: Headers) -> Self {
        Self { headers, ..self }
    }

    /// Same topic path and headers with another payload
    pub fn with_payload(self, payload: Payload) -> Self {
        Self { payload, ..self }
    }

    pub fn into_parts(self) -> (TopicPath, Payload, Headers) {
        (self.topic_path, self.payload, self.headers)
    }
}
