//! SignalAdapter: the shared inbound and outbound pipeline of every adapter
//!
//! Inbound: external headers are filtered, headers implied by the topic
//! are injected, the type tag selects a mapping strategy, and the strategy
//! builds the signal. Outbound: the channel is checked, the mapper builds
//! topic and payload, and internal headers are filtered back out.

use super::strategies::{type_tag_of, unknown_topic_path, MappingStrategies};
use super::traits::{Adapter, Capabilities, PayloadMapper};
use crate::adaptable::Adaptable;
use crate::error::{ProtocolError, ProtocolResult};
use crate::headers::{from_topic_path, HeaderTranslator, DEFAULT_EXTRACTORS};
use crate::signal::{Signal, SignalFamily};
use crate::topic::{Channel, TopicPath};
use std::sync::Arc;
use tracing::trace;

/// Adapter made of a family-specific `PayloadMapper` and a shared header translator.
pub struct SignalAdapter<M: PayloadMapper> {
    mapper: M,
    capabilities: Capabilities,
    strategies: MappingStrategies,
    translator: Arc<dyn HeaderTranslator>,
}

impl<M: PayloadMapper> SignalAdapter<M> {
    pub fn new(mapper: M, translator: Arc<dyn HeaderTranslator>) -> Self {
        let capabilities = mapper.capabilities();
        let strategies = mapper.mapping_strategies();
        Self {
            mapper,
            capabilities,
            strategies,
            translator,
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn strategies(&self) -> &MappingStrategies {
        &self.strategies
    }
}

impl<M: PayloadMapper> Adapter for SignalAdapter<M> {
    fn id(&self) -> &str {
        self.mapper.family().name()
    }

    fn family(&self) -> SignalFamily {
        self.mapper.family()
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn from_adaptable(&self, adaptable: Adaptable) -> ProtocolResult<Signal> {
        let headers = self.translator.from_external_headers(adaptable.headers());
        let headers = from_topic_path::inject(headers, adaptable.topic_path(), &DEFAULT_EXTRACTORS);
        let adaptable = adaptable.with_headers(headers);

        let type_tag = self
            .type_tag(&adaptable)
            .ok_or_else(|| unknown_topic_path(&adaptable))?;
        let strategy = self
            .strategies
            .find(&type_tag)
            .ok_or_else(|| unknown_topic_path(&adaptable))?;
        trace!(adapter = self.id(), %type_tag, "mapping adaptable to signal");
        strategy(&adaptable)
    }

    fn to_adaptable(&self, signal: &Signal, channel: Channel) -> ProtocolResult<Adaptable> {
        let topic_path = self.to_topic_path(signal, channel)?;
        let payload = self.mapper.to_payload(signal)?;
        let adaptable = Adaptable::new(topic_path, payload, signal.headers().clone());

        // never emit what from_adaptable would reject
        match self.type_tag(&adaptable) {
            Some(tag) if self.strategies.contains(&tag) => {}
            _ => return Err(unknown_topic_path(&adaptable)),
        }

        let headers = self.translator.to_external_headers(adaptable.headers());
        Ok(adaptable.with_headers(headers))
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        if signal.family() != self.family() {
            return Err(ProtocolError::UnknownSignal {
                signal_name: signal.family().name().to_string(),
            });
        }
        if !self.capabilities.channels.contains(&channel) {
            return Err(ProtocolError::UnknownChannel {
                channel,
                signal_type: self.id().to_string(),
            });
        }
        self.mapper.to_topic_path(signal, channel)
    }

    fn type_tag(&self, adaptable: &Adaptable) -> Option<String> {
        let topic_path = adaptable.topic_path();
        self.mapper
            .classify(topic_path, adaptable.payload())
            .map(|classifier| type_tag_of(topic_path, &classifier))
    }
}
