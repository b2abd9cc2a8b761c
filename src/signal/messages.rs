//! Live messages to and from a thing or one of its features

use super::entity::EntityId;
use crate::adaptable::{Headers, JsonPointer};
use serde_json::Value;

/// Direction of a live message, seen from the thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageDirection {
    /// Sent to the thing
    Inbox,
    /// Sent by the thing
    Outbox,
}

impl MessageDirection {
    pub fn token(self) -> &'static str {
        match self {
            MessageDirection::Inbox => "inbox",
            MessageDirection::Outbox => "outbox",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "inbox" => Some(MessageDirection::Inbox),
            "outbox" => Some(MessageDirection::Outbox),
            _ => None,
        }
    }
}

/// Where a message goes: thing, optional feature, direction and subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAddress {
    pub thing_id: EntityId,
    pub feature_id: Option<String>,
    pub direction: MessageDirection,
    /// Free-form subject; may contain `/`
    pub subject: String,
}

impl MessageAddress {
    pub fn new(thing_id: EntityId, direction: MessageDirection, subject: impl Into<String>) -> Self {
        Self {
            thing_id,
            feature_id: None,
            direction,
            subject: subject.into(),
        }
    }

    pub fn for_feature(mut self, feature_id: impl Into<String>) -> Self {
        self.feature_id = Some(feature_id.into());
        self
    }

    /// `[/features/<id>]/<inbox|outbox>/messages/<subject...>`
    pub fn pointer(&self) -> JsonPointer {
        let mut pointer = JsonPointer::root();
        if let Some(feature_id) = &self.feature_id {
            pointer = pointer.push("features").push(feature_id.as_str());
        }
        pointer = pointer.push(self.direction.token()).push("messages");
        for segment in self.subject.split('/') {
            pointer = pointer.push(segment);
        }
        pointer
    }

    /// Feature and direction of a message payload path; `None` if the
    /// path is not a message path.
    pub fn classify(pointer: &JsonPointer) -> Option<(Option<String>, MessageDirection)> {
        let segments: Vec<&str> = pointer.segments().iter().map(String::as_str).collect();
        match segments.as_slice() {
            ["features", feature_id, direction, "messages", _, ..] => {
                MessageDirection::from_token(direction).map(|d| (Some(feature_id.to_string()), d))
            }
            [direction, "messages", _, ..] => {
                MessageDirection::from_token(direction).map(|d| (None, d))
            }
            _ => None,
        }
    }
}

/// Live message command.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageCommand {
    pub address: MessageAddress,
    pub value: Option<Value>,
    pub headers: Headers,
}

impl MessageCommand {
    pub fn new(address: MessageAddress) -> Self {
        Self {
            address,
            value: None,
            headers: Headers::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// Response to a live message command.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageCommandResponse {
    pub address: MessageAddress,
    pub value: Option<Value>,
    pub status: u16,
    pub headers: Headers,
}

impl MessageCommandResponse {
    pub fn new(address: MessageAddress, status: u16) -> Self {
        Self {
            address,
            value: None,
            status,
            headers: Headers::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}
