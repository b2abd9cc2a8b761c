//! Adapter resolution
//!
//! Inbound, an adaptable is routed to its adapter by a decision tree over
//! topic attributes, built once from the adapters' declared capabilities.
//! Outbound, a signal is routed by its family. Both lookups are read-only
//! after construction, so a resolver is shared freely between threads.

mod dimension;
mod tree;
#[cfg(test)]
mod tests;

pub use dimension::Dimension;

use crate::adaptable::Adaptable;
use crate::adapter::{Adapter, AdapterRegistry};
use crate::error::{ProtocolError, ProtocolResult, ResolverError};
use crate::signal::{Signal, SignalFamily};
use crate::topic::Channel;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};
use tree::{Candidate, DispatchTree};

/// Routes adaptables and signals to the one adapter handling them.
pub struct AdapterResolver {
    adapters: Vec<Arc<dyn Adapter>>,
    tree: DispatchTree,
    by_family: HashMap<SignalFamily, usize>,
}

impl AdapterResolver {
    /// Build the dispatch tree and family index.
    ///
    /// Fails on a repeated adapter id or two adapters claiming the same
    /// family. Fails too if an adapter declares no value for a mandatory
    /// dimension, or if two adapters would both handle some combination of
    /// topic attributes.
    pub fn new(adapters: Vec<Arc<dyn Adapter>>) -> Result<Self, ResolverError> {
        let mut ids = HashSet::with_capacity(adapters.len());
        for adapter in &adapters {
            if !ids.insert(adapter.id()) {
                return Err(ResolverError::DuplicateId {
                    id: adapter.id().to_string(),
                });
            }
        }

        let mut by_family = HashMap::with_capacity(adapters.len());
        for (index, adapter) in adapters.iter().enumerate() {
            if let Some(&first) = by_family.get(&adapter.family()) {
                let first: &Arc<dyn Adapter> = &adapters[first];
                return Err(ResolverError::DuplicateFamily {
                    family: adapter.family().name().to_string(),
                    first: first.id().to_string(),
                    second: adapter.id().to_string(),
                });
            }
            by_family.insert(adapter.family(), index);
        }

        let candidates: Vec<Candidate<'_>> = adapters
            .iter()
            .map(|a| Candidate {
                id: a.id(),
                capabilities: a.capabilities(),
            })
            .collect();
        let tree = DispatchTree::build(&candidates)?;

        info!(
            adapters = adapters.len(),
            nodes = tree.node_count(),
            depth = tree.depth(),
            "adapter resolver ready"
        );
        Ok(Self {
            adapters,
            tree,
            by_family,
        })
    }

    /// Resolver over the adapters of a registry
    pub fn from_registry(registry: AdapterRegistry) -> Result<Self, ResolverError> {
        Self::new(registry.into_adapters())
    }

    pub fn adapters(&self) -> &[Arc<dyn Adapter>] {
        &self.adapters
    }

    /// The adapter handling an inbound adaptable.
    pub fn resolve_by_envelope(&self, adaptable: &Adaptable) -> ProtocolResult<&Arc<dyn Adapter>> {
        match self.tree.evaluate(adaptable) {
            Some(index) => {
                let adapter = &self.adapters[index];
                debug!(
                    topic = %adaptable.topic_path(),
                    adapter = adapter.id(),
                    "resolved adapter by envelope"
                );
                Ok(adapter)
            }
            None => {
                debug!(topic = %adaptable.topic_path(), "no adapter for envelope");
                Err(ProtocolError::UnknownTopicPath {
                    topic_path: adaptable.topic_path().render(),
                    path: adaptable.payload().path.render(),
                })
            }
        }
    }

    /// The adapter handling an outbound signal on `channel`.
    pub fn resolve_by_signal(
        &self,
        signal: &Signal,
        channel: Channel,
    ) -> ProtocolResult<&Arc<dyn Adapter>> {
        let family = signal.family();
        let adapter = self
            .by_family
            .get(&family)
            .map(|&index| &self.adapters[index])
            .ok_or_else(|| ProtocolError::UnknownSignal {
                signal_name: family.name().to_string(),
            })?;
        if !adapter.capabilities().channels.contains(&channel) {
            return Err(ProtocolError::UnknownChannel {
                channel,
                signal_type: family.name().to_string(),
            });
        }
        debug!(%family, %channel, adapter = adapter.id(), "resolved adapter by signal");
        Ok(adapter)
    }

    /// Adapter registered for a family
    pub fn adapter_for(&self, family: SignalFamily) -> Option<&Arc<dyn Adapter>> {
        self.by_family.get(&family).map(|&index| &self.adapters[index])
    }

    /// Indented text rendering of the dispatch tree
    pub fn describe(&self) -> String {
        let ids: Vec<&str> = self.adapters.iter().map(|a| a.id()).collect();
        self.tree.describe(&ids)
    }

    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }
}
