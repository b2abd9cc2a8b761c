//! Protocol facade
//!
//! `ProtocolAdapter` is the single entry point for callers at the wire
//! boundary. It owns the adapter resolver and runs both directions:
//! adaptable in, signal out; signal in, adaptable out.

use crate::adaptable::Adaptable;
use crate::adapter::{Adapter, AdapterRegistry};
use crate::config::ProtocolConfig;
use crate::error::{ProtocolResult, ResolverError};
use crate::resolver::AdapterResolver;
use crate::signal::Signal;
use crate::topic::Channel;
use std::sync::Arc;
use tracing::debug;

/// Translates between wire envelopes and signals.
///
/// Immutable after construction; wrap in an `Arc` to share between threads.
pub struct ProtocolAdapter {
    resolver: AdapterResolver,
}

impl ProtocolAdapter {
    /// Standard adapters with the configured header translator.
    pub fn new(config: &ProtocolConfig) -> Result<Self, ResolverError> {
        let translator = Arc::new(config.header_translator());
        Self::with_registry(AdapterRegistry::standard(translator))
    }

    /// Standard adapters and standard header definitions
    pub fn standard() -> Result<Self, ResolverError> {
        Self::new(&ProtocolConfig::default())
    }

    pub fn with_registry(registry: AdapterRegistry) -> Result<Self, ResolverError> {
        Ok(Self {
            resolver: AdapterResolver::from_registry(registry)?,
        })
    }

    pub fn resolver(&self) -> &AdapterResolver {
        &self.resolver
    }

    /// Adapter for an inbound adaptable, without translating it.
    pub fn resolve(&self, adaptable: &Adaptable) -> ProtocolResult<&Arc<dyn Adapter>> {
        self.resolver.resolve_by_envelope(adaptable)
    }

    /// Translate an inbound adaptable into a signal.
    pub fn from_adaptable(&self, adaptable: Adaptable) -> ProtocolResult<Signal> {
        let adapter = self.resolver.resolve_by_envelope(&adaptable)?;
        let adaptable = adapter.validate_and_preprocess(adaptable)?;
        let signal = adapter.from_adaptable(adaptable)?;
        debug!(adapter = adapter.id(), family = %signal.family(), "decoded signal");
        Ok(signal)
    }

    /// Translate a signal into an adaptable on `channel`.
    pub fn to_adaptable(&self, signal: &Signal, channel: Channel) -> ProtocolResult<Adaptable> {
        let adapter = self.resolver.resolve_by_signal(signal, channel)?;
        adapter.to_adaptable(signal, channel)
    }

    /// Decode a JSON envelope into a signal.
    pub fn from_json_str(&self, json: &str) -> ProtocolResult<Signal> {
        self.from_adaptable(Adaptable::from_json_str(json)?)
    }

    /// Encode a signal as a JSON envelope on `channel`.
    pub fn to_json_string(&self, signal: &Signal, channel: Channel) -> ProtocolResult<String> {
        Ok(self.to_adaptable(signal, channel)?.to_json_string())
    }
}
