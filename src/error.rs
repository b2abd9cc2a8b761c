//! Error types surfaced at the protocol boundary
//!
//! `ProtocolError` is returned per call and never affects shared state.
//! `ResolverError` is raised once, while building the adapter resolver,
//! and indicates a broken adapter registry rather than bad input.
//! `ConfigError` covers loading the YAML configuration.

use crate::topic::Channel;
use thiserror::Error;

/// Request-time errors of the protocol adaptation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid topic path '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("no adapter handles topic path '{topic_path}' with payload path '{path}'")]
    UnknownTopicPath { topic_path: String, path: String },

    #[error("channel '{channel}' is not supported for signal type '{signal_type}'")]
    UnknownChannel { channel: Channel, signal_type: String },

    #[error("unknown signal: {signal_name}")]
    UnknownSignal { signal_name: String },

    #[error("malformed payload for '{type_tag}': {message}")]
    MalformedPayload { type_tag: String, message: String },

    #[error("invalid envelope: {message}")]
    InvalidEnvelope { message: String },
}

impl ProtocolError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(type_tag: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedPayload {
            type_tag: type_tag.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Configuration-time errors raised while building an `AdapterResolver`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("ambiguous adapters {adapters:?} for {combination}")]
    Ambiguous {
        adapters: Vec<String>,
        combination: String,
    },

    #[error("adapter id '{id}' is registered more than once")]
    DuplicateId { id: String },

    #[error("adapters '{first}' and '{second}' both claim signal family {family}")]
    DuplicateFamily {
        family: String,
        first: String,
        second: String,
    },

    #[error("adapter '{adapter}' declares no value for mandatory dimension {dimension}")]
    EmptyMandatoryDimension { adapter: String, dimension: String },
}

/// Errors loading a `ProtocolConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
