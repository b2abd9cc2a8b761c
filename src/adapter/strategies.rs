//! Mapping strategies keyed by type tag
//!
//! Within one adapter, a type tag such as `things.commands:modifyAttribute`
//! selects the function that builds the signal. Tags are a secondary
//! lookup; routing to the adapter happens on topic attributes.

use crate::adaptable::Adaptable;
use crate::error::{ProtocolError, ProtocolResult};
use crate::signal::Signal;
use crate::topic::{Criterion, Group, TopicAttribute, TopicPath};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds a signal from a preprocessed adaptable.
pub type MappingStrategy = Arc<dyn Fn(&Adaptable) -> ProtocolResult<Signal> + Send + Sync>;

/// Type tag to strategy table of one adapter.
#[derive(Clone, Default)]
pub struct MappingStrategies {
    by_type: BTreeMap<String, MappingStrategy>,
}

impl MappingStrategies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `strategy` under `type_tag`, replacing an earlier one.
    pub fn add<F>(&mut self, type_tag: impl Into<String>, strategy: F)
    where
        F: Fn(&Adaptable) -> ProtocolResult<Signal> + Send + Sync + 'static,
    {
        self.by_type.insert(type_tag.into(), Arc::new(strategy));
    }

    pub fn find(&self, type_tag: &str) -> Option<&MappingStrategy> {
        self.by_type.get(type_tag)
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.by_type.contains_key(type_tag)
    }

    /// Registered type tags, sorted
    pub fn type_tags(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for MappingStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_type.keys()).finish()
    }
}

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

/// `<group>.<criterion>:<action><Classifier>`, or `<group>.<criterion>:<classifier>`
/// when the topic carries no action.
pub fn type_tag(
    group: Group,
    criterion: Criterion,
    action_token: Option<&str>,
    classifier: &str,
) -> String {
    let name = match action_token {
        Some(action) => format!("{}{}", action, upper_first(classifier)),
        None => classifier.to_string(),
    };
    format!("{}.{}:{}", group.token(), criterion.token(), name)
}

/// Type tag of a topic path with the given payload classifier
pub fn type_tag_of(topic_path: &TopicPath, classifier: &str) -> String {
    type_tag(
        topic_path.group(),
        topic_path.criterion(),
        topic_path.action_token(),
        classifier,
    )
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// JSON helpers shared by the mappers
// ---------------------------------------------------------------------------

/// Decode a payload value into `T`. A missing value decodes as `{}`, so
/// bodies made only of optional fields accept it.
pub(crate) fn decode_value<T: DeserializeOwned>(
    type_tag: &str,
    value: Option<&Value>,
) -> ProtocolResult<T> {
    let value = value
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| ProtocolError::malformed(type_tag, e))
}

pub(crate) fn encode_value<T: Serialize>(type_tag: &str, body: &T) -> ProtocolResult<Value> {
    serde_json::to_value(body).map_err(|e| ProtocolError::malformed(type_tag, e))
}

pub(crate) fn require_status(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<u16> {
    adaptable
        .payload()
        .status
        .ok_or_else(|| ProtocolError::malformed(type_tag, "missing status"))
}

pub(crate) fn unknown_topic_path(adaptable: &Adaptable) -> ProtocolError {
    ProtocolError::UnknownTopicPath {
        topic_path: adaptable.topic_path().render(),
        path: adaptable.payload().path.render(),
    }
}

pub(crate) fn unknown_signal(signal: &Signal) -> ProtocolError {
    ProtocolError::UnknownSignal {
        signal_name: signal.family().name().to_string(),
    }
}
