//! Dispatch dimensions
//!
//! A dimension is one enumerable attribute of an adaptable. The resolver
//! branches on dimensions in `Dimension::ORDER`; each value is addressed by
//! a dense ordinal, so a branch is a plain array index.

use crate::adaptable::Adaptable;
use crate::adapter::Capabilities;
use crate::topic::{
    Action, Channel, Criterion, Group, SearchAction, StreamingAction, TopicAttribute,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Group,
    Channel,
    Criterion,
    Action,
    SearchAction,
    StreamingAction,
    ForResponses,
    SubjectPresent,
    WildcardTopic,
}

impl Dimension {
    /// Evaluation order of the dispatch tree
    pub const ORDER: [Dimension; 9] = [
        Dimension::Group,
        Dimension::Channel,
        Dimension::Criterion,
        Dimension::Action,
        Dimension::SearchAction,
        Dimension::StreamingAction,
        Dimension::ForResponses,
        Dimension::SubjectPresent,
        Dimension::WildcardTopic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Group => "group",
            Dimension::Channel => "channel",
            Dimension::Criterion => "criterion",
            Dimension::Action => "action",
            Dimension::SearchAction => "search-action",
            Dimension::StreamingAction => "streaming-action",
            Dimension::ForResponses => "for-responses",
            Dimension::SubjectPresent => "subject-present",
            Dimension::WildcardTopic => "wildcard-topic",
        }
    }

    /// Optional dimensions may be absent from an adaptable; adapters that
    /// declare no value for them only see adaptables where they are absent.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Dimension::Action | Dimension::SearchAction | Dimension::StreamingAction
        )
    }

    /// Number of distinct values
    pub fn cardinality(self) -> usize {
        match self {
            Dimension::Group => Group::ALL.len(),
            Dimension::Channel => Channel::ALL.len(),
            Dimension::Criterion => Criterion::ALL.len(),
            Dimension::Action => Action::ALL.len(),
            Dimension::SearchAction => SearchAction::ALL.len(),
            Dimension::StreamingAction => StreamingAction::ALL.len(),
            Dimension::ForResponses | Dimension::SubjectPresent | Dimension::WildcardTopic => 2,
        }
    }

    /// Ordinals an adapter declares for this dimension.
    pub fn declared(self, capabilities: &Capabilities) -> Vec<usize> {
        fn ordinals<'a, T: TopicAttribute>(values: impl IntoIterator<Item = &'a T>) -> Vec<usize> {
            values.into_iter().map(|v| v.ordinal()).collect()
        }
        match self {
            Dimension::Group => ordinals(&capabilities.groups),
            Dimension::Channel => ordinals(&capabilities.channels),
            Dimension::Criterion => ordinals(&capabilities.criteria),
            Dimension::Action => ordinals(&capabilities.actions),
            Dimension::SearchAction => ordinals(&capabilities.search_actions),
            Dimension::StreamingAction => ordinals(&capabilities.streaming_actions),
            Dimension::ForResponses => vec![capabilities.for_responses as usize],
            Dimension::SubjectPresent => vec![capabilities.requires_subject as usize],
            Dimension::WildcardTopic => {
                if capabilities.supports_wildcard_topics {
                    vec![0, 1]
                } else {
                    vec![0]
                }
            }
        }
    }

    /// Ordinal carried by an adaptable; `None` only for an absent optional dimension.
    pub fn extract(self, adaptable: &Adaptable) -> Option<usize> {
        let topic_path = adaptable.topic_path();
        match self {
            Dimension::Group => Some(topic_path.group().ordinal()),
            Dimension::Channel => Some(topic_path.channel().ordinal()),
            Dimension::Criterion => Some(topic_path.criterion().ordinal()),
            Dimension::Action => topic_path.action().map(TopicAttribute::ordinal),
            Dimension::SearchAction => topic_path.search_action().map(TopicAttribute::ordinal),
            Dimension::StreamingAction => {
                topic_path.streaming_action().map(TopicAttribute::ordinal)
            }
            Dimension::ForResponses => Some(adaptable.payload().status.is_some() as usize),
            Dimension::SubjectPresent => Some(topic_path.subject().is_some() as usize),
            Dimension::WildcardTopic => Some(topic_path.is_wildcard_topic() as usize),
        }
    }

    /// Human-readable value for an ordinal
    pub fn label(self, ordinal: usize) -> &'static str {
        fn token<T: TopicAttribute>(ordinal: usize) -> &'static str {
            T::ALL.get(ordinal).map(|v| v.token()).unwrap_or("?")
        }
        match self {
            Dimension::Group => token::<Group>(ordinal),
            Dimension::Channel => token::<Channel>(ordinal),
            Dimension::Criterion => token::<Criterion>(ordinal),
            Dimension::Action => token::<Action>(ordinal),
            Dimension::SearchAction => token::<SearchAction>(ordinal),
            Dimension::StreamingAction => token::<StreamingAction>(ordinal),
            Dimension::ForResponses | Dimension::SubjectPresent | Dimension::WildcardTopic => {
                if ordinal == 0 {
                    "false"
                } else {
                    "true"
                }
            }
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptable::{Headers, Payload};
    use crate::topic::TopicPath;

    fn adaptable(topic: &str, payload: Payload) -> Adaptable {
        Adaptable::new(TopicPath::parse(topic).unwrap(), payload, Headers::new())
    }

    #[test]
    fn only_action_dimensions_are_optional() {
        let optional: Vec<_> = Dimension::ORDER.iter().filter(|d| d.is_optional()).collect();
        assert_eq!(
            optional,
            [&Dimension::Action, &Dimension::SearchAction, &Dimension::StreamingAction]
        );
    }

    #[test]
    fn extract_reads_topic_and_payload() {
        let a = adaptable("_/_/things/twin/search/next", Payload::new("/"));
        assert_eq!(Dimension::Group.extract(&a), Some(Group::Things.ordinal()));
        assert_eq!(Dimension::Action.extract(&a), None);
        assert_eq!(Dimension::SearchAction.extract(&a), Some(SearchAction::Next.ordinal()));
        assert_eq!(Dimension::WildcardTopic.extract(&a), Some(1));
        assert_eq!(Dimension::ForResponses.extract(&a), Some(0));

        let b = adaptable("ns/t/things/live/acks/custom", Payload::new("/").with_status(200));
        assert_eq!(Dimension::ForResponses.extract(&b), Some(1));
        assert_eq!(Dimension::SubjectPresent.extract(&b), Some(1));
        assert_eq!(Dimension::Channel.extract(&b), Some(Channel::Live.ordinal()));
    }

    #[test]
    fn wildcard_support_declares_both_values() {
        let caps = Capabilities::new().wildcard_topics();
        assert_eq!(Dimension::WildcardTopic.declared(&caps), vec![0, 1]);
        assert_eq!(Dimension::WildcardTopic.declared(&Capabilities::new()), vec![0]);
        assert!(Dimension::Action.declared(&Capabilities::new()).is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(Dimension::Criterion.label(Criterion::Errors.ordinal()), "errors");
        assert_eq!(Dimension::ForResponses.label(1), "true");
    }
}
