//! Enumerable topic attributes
//!
//! Every attribute is a closed enum with a stable lower-camel wire token and
//! a dense ordinal, so the resolver can branch on it with a plain array index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed, enumerable topic attribute.
pub trait TopicAttribute: Copy + Eq + fmt::Debug + 'static {
    /// Every value, in ordinal order
    const ALL: &'static [Self];

    /// Attribute name used in diagnostics
    const NAME: &'static str;

    /// Position of this value in `ALL`
    fn ordinal(self) -> usize;

    /// Wire token
    fn token(self) -> &'static str;

    /// Look up a value by its wire token
    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.token() == token)
    }
}

macro_rules! topic_attribute {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $token)] $variant ),+
        }

        impl TopicAttribute for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];
            const NAME: &'static str = $label;

            fn ordinal(self) -> usize {
                self as usize
            }

            fn token(self) -> &'static str {
                match self {
                    $( $name::$variant => $token ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

topic_attribute! {
    /// Entity group a topic addresses
    Group, "group" {
        Things => "things",
        Policies => "policies",
        Connections => "connections",
    }
}

impl Group {
    /// Entity type used in entity-id headers (`thing:ns:name`)
    pub fn entity_type(self) -> &'static str {
        match self {
            Group::Things => "thing",
            Group::Policies => "policy",
            Group::Connections => "connection",
        }
    }

    /// Whether topics of this group carry a channel segment
    pub fn has_channel(self) -> bool {
        matches!(self, Group::Things)
    }
}

topic_attribute! {
    /// Delivery mode of a signal
    Channel, "channel" {
        /// Persisted digital-twin state
        Twin => "twin",
        /// Pass-through to the physical device
        Live => "live",
        /// Channel-agnostic; not rendered in topic strings
        None => "none",
    }
}

topic_attribute! {
    /// Top-level message kind
    Criterion, "criterion" {
        Commands => "commands",
        Events => "events",
        Search => "search",
        Messages => "messages",
        Errors => "errors",
        Acks => "acks",
        Announcements => "announcements",
        Streaming => "streaming",
    }
}

topic_attribute! {
    /// Action of commands and events
    Action, "action" {
        Create => "create",
        Retrieve => "retrieve",
        Modify => "modify",
        Merge => "merge",
        Delete => "delete",
        Created => "created",
        Modified => "modified",
        Merged => "merged",
        Deleted => "deleted",
    }
}

topic_attribute! {
    /// Action of search topics
    SearchAction, "search action" {
        Subscribe => "subscribe",
        Request => "request",
        Cancel => "cancel",
        Created => "created",
        Next => "next",
        Complete => "complete",
        Failed => "failed",
    }
}

topic_attribute! {
    /// Action of streaming topics
    StreamingAction, "streaming action" {
        SubscribeForPersistedEvents => "subscribeForPersistedEvents",
        Request => "request",
        Cancel => "cancel",
        Created => "created",
        Next => "next",
        Complete => "complete",
        Failed => "failed",
    }
}

/// Which action slot, if any, a criterion requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActionSlot {
    Action,
    SearchAction,
    StreamingAction,
    Nothing,
}

/// How a criterion treats the trailing subject segment(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubjectRule {
    Required,
    Optional,
    Forbidden,
}

impl Criterion {
    pub(crate) fn action_slot(self) -> ActionSlot {
        match self {
            Criterion::Commands | Criterion::Events => ActionSlot::Action,
            Criterion::Search => ActionSlot::SearchAction,
            Criterion::Streaming => ActionSlot::StreamingAction,
            Criterion::Messages
            | Criterion::Errors
            | Criterion::Acks
            | Criterion::Announcements => ActionSlot::Nothing,
        }
    }

    pub(crate) fn subject_rule(self) -> SubjectRule {
        match self {
            Criterion::Messages | Criterion::Announcements => SubjectRule::Required,
            Criterion::Acks => SubjectRule::Optional,
            _ => SubjectRule::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordinals_are_dense<T: TopicAttribute>() {
        for (i, v) in T::ALL.iter().enumerate() {
            assert_eq!(v.ordinal(), i, "{} {:?}", T::NAME, v);
        }
    }

    #[test]
    fn all_attributes_have_dense_ordinals() {
        ordinals_are_dense::<Group>();
        ordinals_are_dense::<Channel>();
        ordinals_are_dense::<Criterion>();
        ordinals_are_dense::<Action>();
        ordinals_are_dense::<SearchAction>();
        ordinals_are_dense::<StreamingAction>();
    }

    #[test]
    fn tokens_round_trip() {
        for a in Action::ALL {
            assert_eq!(Action::from_token(a.token()), Some(*a));
        }
        assert_eq!(
            StreamingAction::from_token("subscribeForPersistedEvents"),
            Some(StreamingAction::SubscribeForPersistedEvents)
        );
        assert_eq!(Criterion::from_token("Commands"), None);
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let json = serde_json::to_string(&SearchAction::Complete).unwrap();
        assert_eq!(json, "\"complete\"");
        let group: Group = serde_json::from_str("\"policies\"").unwrap();
        assert_eq!(group, Group::Policies);
    }

    #[test]
    fn entity_types_per_group() {
        assert_eq!(Group::Things.entity_type(), "thing");
        assert_eq!(Group::Policies.entity_type(), "policy");
        assert_eq!(Group::Connections.entity_type(), "connection");
    }
}
