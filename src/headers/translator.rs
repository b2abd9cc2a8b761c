//! Header translation between wire headers and internal headers

use crate::adaptable::{keys, Headers};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Bidirectional header filter applied at the protocol boundary.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait HeaderTranslator: Send + Sync {
    /// Filter headers arriving from the wire into internal headers
    fn from_external_headers(&self, external: &Headers) -> Headers;

    /// Filter internal headers before they go onto the wire
    fn to_external_headers(&self, internal: &Headers) -> Headers;
}

/// Declares how one header key crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderDefinition {
    pub key: String,
    #[serde(default = "default_true")]
    pub read_from_external: bool,
    #[serde(default = "default_true")]
    pub write_to_external: bool,
}

fn default_true() -> bool {
    true
}

impl HeaderDefinition {
    /// A header that passes in both directions
    pub fn external(key: impl Into<String>) -> Self {
        Self {
            key: key.into().to_ascii_lowercase(),
            read_from_external: true,
            write_to_external: true,
        }
    }

    /// A header that never crosses the boundary
    pub fn internal(key: impl Into<String>) -> Self {
        Self {
            key: key.into().to_ascii_lowercase(),
            read_from_external: false,
            write_to_external: false,
        }
    }
}

/// Standard header definitions
pub fn standard_definitions() -> Vec<HeaderDefinition> {
    let mut definitions: Vec<HeaderDefinition> = [
        keys::CORRELATION_ID,
        keys::CONTENT_TYPE,
        keys::RESPONSE_REQUIRED,
        keys::REQUESTED_ACKS,
        keys::TIMEOUT,
        keys::CHANNEL,
        keys::ENTITY_ID,
        keys::IF_MATCH,
        keys::IF_NONE_MATCH,
        keys::REPLY_TO,
    ]
    .into_iter()
    .map(HeaderDefinition::external)
    .collect();
    definitions.extend(
        [keys::AUTHORIZATION_CONTEXT, keys::READ_SUBJECTS, keys::ORIGIN]
            .into_iter()
            .map(HeaderDefinition::internal),
    );
    definitions
}

/// Translator driven by a list of header definitions.
///
/// Known keys cross only in the directions their definition allows.
/// Unknown keys pass when `pass_unknown` is set and are dropped otherwise.
#[derive(Debug, Clone)]
pub struct DefinitionHeaderTranslator {
    definitions: Vec<HeaderDefinition>,
    pass_unknown: bool,
}

impl DefinitionHeaderTranslator {
    pub fn new(definitions: Vec<HeaderDefinition>, pass_unknown: bool) -> Self {
        Self {
            definitions,
            pass_unknown,
        }
    }

    /// Standard definitions, unknown headers pass
    pub fn standard() -> Self {
        Self::new(standard_definitions(), true)
    }

    /// No definitions, everything passes
    pub fn pass_through() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn definitions(&self) -> &[HeaderDefinition] {
        &self.definitions
    }

    fn definition(&self, key: &str) -> Option<&HeaderDefinition> {
        self.definitions
            .iter()
            .find(|d| d.key.eq_ignore_ascii_case(key))
    }

    fn filter(&self, headers: &Headers, allowed: impl Fn(&HeaderDefinition) -> bool) -> Headers {
        headers
            .iter()
            .filter(|(key, _)| {
                let keep = match self.definition(key) {
                    Some(definition) => allowed(definition),
                    None => self.pass_unknown,
                };
                if !keep {
                    trace!(header = %key, "dropping header at protocol boundary");
                }
                keep
            })
            .collect()
    }
}

impl Default for DefinitionHeaderTranslator {
    fn default() -> Self {
        Self::standard()
    }
}

impl HeaderTranslator for DefinitionHeaderTranslator {
    fn from_external_headers(&self, external: &Headers) -> Headers {
        self.filter(external, |d| d.read_from_external)
    }

    fn to_external_headers(&self, internal: &Headers) -> Headers {
        self.filter(internal, |d| d.write_to_external)
    }
}
