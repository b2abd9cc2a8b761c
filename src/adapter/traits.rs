//! Adapter trait: the contract every signal-family adapter implements
//!
//! An adapter translates between one family of signals and adaptables. It
//! declares the topic attributes it handles as `Capabilities`; the resolver
//! builds its dispatch tree from those declarations alone.

use super::strategies::MappingStrategies;
use crate::adaptable::{Adaptable, Payload};
use crate::error::ProtocolResult;
use crate::signal::{Signal, SignalFamily};
use crate::topic::{
    Action, Channel, Criterion, Group, SearchAction, StreamingAction, TopicPath,
};
use std::collections::BTreeSet;

/// Topic attributes an adapter handles.
///
/// Group, channel and criterion are mandatory: every adapter declares at
/// least one value. The three action sets are optional: an empty set means
/// the adapter only handles topics without that kind of action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub groups: BTreeSet<Group>,
    pub channels: BTreeSet<Channel>,
    pub criteria: BTreeSet<Criterion>,
    pub actions: BTreeSet<Action>,
    pub search_actions: BTreeSet<SearchAction>,
    pub streaming_actions: BTreeSet<StreamingAction>,
    /// Handles envelopes with a payload status
    pub for_responses: bool,
    /// Handles topics with a trailing subject
    pub requires_subject: bool,
    /// Also handles topics whose namespace or name is the wildcard
    pub supports_wildcard_topics: bool,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.channels.extend(channels);
        self
    }

    pub fn criteria(mut self, criteria: impl IntoIterator<Item = Criterion>) -> Self {
        self.criteria.extend(criteria);
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn search_actions(mut self, actions: impl IntoIterator<Item = SearchAction>) -> Self {
        self.search_actions.extend(actions);
        self
    }

    pub fn streaming_actions(mut self, actions: impl IntoIterator<Item = StreamingAction>) -> Self {
        self.streaming_actions.extend(actions);
        self
    }

    pub fn for_responses(mut self) -> Self {
        self.for_responses = true;
        self
    }

    pub fn requires_subject(mut self) -> Self {
        self.requires_subject = true;
        self
    }

    pub fn wildcard_topics(mut self) -> Self {
        self.supports_wildcard_topics = true;
        self
    }
}

/// The contract adapters implement.
///
/// Adapters are stateless after construction and shared across threads.
pub trait Adapter: Send + Sync {
    /// Unique identifier for this adapter
    fn id(&self) -> &str;

    /// Signal family this adapter translates
    fn family(&self) -> SignalFamily;

    fn capabilities(&self) -> &Capabilities;

    /// Translate an adaptable into a signal.
    fn from_adaptable(&self, adaptable: Adaptable) -> ProtocolResult<Signal>;

    /// Translate a signal of this adapter's family into an adaptable on `channel`.
    fn to_adaptable(&self, signal: &Signal, channel: Channel) -> ProtocolResult<Adaptable>;

    /// Topic path the signal would be published under on `channel`.
    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath>;

    /// Adapter-internal lookup key of an adaptable; `None` if the payload
    /// path is not recognised.
    fn type_tag(&self, adaptable: &Adaptable) -> Option<String>;

    /// Normalise an adaptable before `from_adaptable`. The default re-parses
    /// the payload path; it is idempotent.
    fn validate_and_preprocess(&self, adaptable: Adaptable) -> ProtocolResult<Adaptable> {
        let payload = adaptable.payload();
        let normalized = Payload {
            path: payload.path.normalized(),
            ..payload.clone()
        };
        Ok(adaptable.with_payload(normalized))
    }

    fn supports_wildcard_topics(&self) -> bool {
        self.capabilities().supports_wildcard_topics
    }

    fn is_for_responses(&self) -> bool {
        self.capabilities().for_responses
    }

    fn requires_subject(&self) -> bool {
        self.capabilities().requires_subject
    }
}

/// Family-specific half of a `SignalAdapter`.
///
/// A mapper knows the JSON shape of its family; header translation and
/// strategy lookup are shared by `SignalAdapter`.
pub trait PayloadMapper: Send + Sync + 'static {
    fn family(&self) -> SignalFamily;

    fn capabilities(&self) -> Capabilities;

    /// Classifier of the payload path, the suffix of the type tag.
    /// `None` if the path addresses nothing this family knows.
    fn classify(&self, topic_path: &TopicPath, payload: &Payload) -> Option<String>;

    /// One strategy per type tag this family decodes
    fn mapping_strategies(&self) -> MappingStrategies;

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath>;

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload>;
}
