//! Entity identifiers

use crate::error::{ProtocolError, ProtocolResult};
use crate::topic::{TopicPath, WILDCARD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespaced entity identifier (`namespace:name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    namespace: String,
    name: String,
}

impl EntityId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Identifier addressing no particular entity (`_:_`)
    pub fn wildcard() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// Parse `namespace:name`; the name may itself contain colons.
    pub fn parse(input: &str) -> ProtocolResult<Self> {
        match input.split_once(':') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() => Ok(Self::new(ns, name)),
            _ => Err(ProtocolError::parse(input, "expected '<namespace>:<name>'")),
        }
    }

    /// Entity addressed by a topic path
    pub fn from_topic(topic_path: &TopicPath) -> Self {
        Self::new(topic_path.namespace(), topic_path.entity_name())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_wildcard(&self) -> bool {
        self.namespace == WILDCARD || self.name == WILDCARD
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl TryFrom<String> for EntityId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EntityId::parse(&value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}
