//! Acknowledgements of processed signals

use super::entity::EntityId;
use crate::adaptable::Headers;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single acknowledgement, identified by its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub label: String,
    pub entity_id: EntityId,
    pub status: u16,
    pub value: Option<Value>,
    pub headers: Headers,
}

impl Acknowledgement {
    pub fn new(label: impl Into<String>, entity_id: EntityId, status: u16) -> Self {
        Self {
            label: label.into(),
            entity_id,
            status,
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

/// Outcome of one labelled acknowledgement inside an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcknowledgementOutcome {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
}

/// Aggregate of the acknowledgements requested for one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgements {
    pub entity_id: EntityId,
    /// Combined status of all outcomes
    pub status: u16,
    pub outcomes: BTreeMap<String, AcknowledgementOutcome>,
    pub headers: Headers,
}

impl Acknowledgements {
    pub fn new(entity_id: EntityId, status: u16) -> Self {
        Self {
            entity_id,
            status,
            outcomes: BTreeMap::new(),
            headers: Headers::new(),
        }
    }

    pub fn with_outcome(mut self, label: impl Into<String>, status: u16, payload: Option<Value>) -> Self {
        self.outcomes.insert(
            label.into(),
            AcknowledgementOutcome {
                status,
                payload,
                headers: Headers::new(),
            },
        );
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}
