//! Adapter registry: the set of adapters a resolver is built from

use super::acks::{AcknowledgementMapper, AcknowledgementsMapper};
use super::announcements::{ConnectivityAnnouncementMapper, PolicyAnnouncementMapper};
use super::entity::{
    EntityCommandMapper, EntityResponseMapper, ErrorResponseMapper, ThingEventMapper,
};
use super::messages::{MessageCommandMapper, MessageResponseMapper};
use super::signal_adapter::SignalAdapter;
use super::subscriptions::{
    SearchCommandMapper, StreamingCommandMapper, StreamingEventMapper, SubscriptionEventMapper,
};
use super::traits::{Adapter, PayloadMapper};
use crate::headers::HeaderTranslator;
use std::sync::Arc;

/// Ordered collection of adapters.
///
/// The registry accepts conflicting adapters as given; building an
/// `AdapterResolver` from it reports the conflict.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    pub fn new(adapters: Vec<Arc<dyn Adapter>>) -> Self {
        Self { adapters }
    }

    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// One adapter per signal family, all sharing `translator`.
    pub fn standard(translator: Arc<dyn HeaderTranslator>) -> Self {
        fn adapter<M: PayloadMapper>(
            mapper: M,
            translator: &Arc<dyn HeaderTranslator>,
        ) -> Arc<dyn Adapter> {
            Arc::new(SignalAdapter::new(mapper, translator.clone()))
        }

        let t = &translator;
        Self::new(vec![
            adapter(EntityCommandMapper::thing_query(), t),
            adapter(EntityCommandMapper::thing_modify(), t),
            adapter(EntityResponseMapper::thing_query(), t),
            adapter(EntityResponseMapper::thing_modify(), t),
            adapter(ThingEventMapper, t),
            adapter(ErrorResponseMapper::things(), t),
            adapter(SearchCommandMapper, t),
            adapter(SubscriptionEventMapper, t),
            adapter(StreamingCommandMapper, t),
            adapter(StreamingEventMapper, t),
            adapter(MessageCommandMapper, t),
            adapter(MessageResponseMapper, t),
            adapter(AcknowledgementMapper, t),
            adapter(AcknowledgementsMapper, t),
            adapter(EntityCommandMapper::policy_query(), t),
            adapter(EntityCommandMapper::policy_modify(), t),
            adapter(EntityResponseMapper::policy_query(), t),
            adapter(EntityResponseMapper::policy_modify(), t),
            adapter(ErrorResponseMapper::policies(), t),
            adapter(PolicyAnnouncementMapper, t),
            adapter(ConnectivityAnnouncementMapper, t),
        ])
    }

    /// Append an adapter after the registered ones.
    pub fn with(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Access the registered adapters.
    pub fn adapters(&self) -> &[Arc<dyn Adapter>] {
        &self.adapters
    }

    pub fn into_adapters(self) -> Vec<Arc<dyn Adapter>> {
        self.adapters
    }

    pub fn find(&self, id: &str) -> Option<&Arc<dyn Adapter>> {
        self.adapters.iter().find(|a| a.id() == id)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
