//! Signals: the typed domain messages adaptables are translated to and from
//!
//! `Signal` is a closed tagged union. Every variant belongs to exactly one
//! `SignalFamily`, and every family is handled by exactly one adapter, so
//! outbound resolution is a map lookup on the family.

mod acks;
mod announcements;
mod entity;
mod entity_signals;
mod messages;
mod resource;
mod subscription;

pub use acks::{Acknowledgement, AcknowledgementOutcome, Acknowledgements};
pub use announcements::{
    ConnectionClosed, ConnectionOpened, ConnectivityAnnouncement, ConnectivityAnnouncementKind,
    PolicyAnnouncement, PolicyAnnouncementKind, SubjectDeletion,
};
pub use entity::EntityId;
pub use entity_signals::{
    EntityCommand, EntityCommandResponse, ErrorBody, ErrorResponse, ThingEvent,
};
pub use messages::{MessageAddress, MessageCommand, MessageCommandResponse, MessageDirection};
pub use resource::{PolicyResource, Resource, ThingResource};
pub use subscription::{
    DemandRequest, PersistedEventsRange, SearchCommand, SearchCommandKind, SearchItems,
    SearchSubscribe, StreamedItem, StreamingCommandKind, StreamingEventKind,
    StreamingSubscriptionCommand, StreamingSubscriptionEvent, SubscriptionEvent,
    SubscriptionEventKind, SubscriptionFailure, SubscriptionRef,
};

use crate::adaptable::Headers;
use std::fmt;

pub type ThingCommand = EntityCommand<ThingResource>;
pub type ThingCommandResponse = EntityCommandResponse<ThingResource>;
pub type PolicyCommand = EntityCommand<PolicyResource>;
pub type PolicyCommandResponse = EntityCommandResponse<PolicyResource>;

// ---------------------------------------------------------------------------
// Signal union
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ThingQuery(ThingCommand),
    ThingModify(ThingCommand),
    PolicyQuery(PolicyCommand),
    PolicyModify(PolicyCommand),
    Message(MessageCommand),
    ThingSearch(SearchCommand),
    StreamingSubscription(StreamingSubscriptionCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    ThingQuery(ThingCommandResponse),
    ThingModify(ThingCommandResponse),
    PolicyQuery(PolicyCommandResponse),
    PolicyModify(PolicyCommandResponse),
    Message(MessageCommandResponse),
    ThingError(ErrorResponse),
    PolicyError(ErrorResponse),
    Acknowledgement(Acknowledgement),
    Acknowledgements(Acknowledgements),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Thing(ThingEvent),
    SearchSubscription(SubscriptionEvent),
    StreamingSubscription(StreamingSubscriptionEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Announcement {
    Policy(PolicyAnnouncement),
    Connectivity(ConnectivityAnnouncement),
}

/// A typed domain message.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Command(Command),
    CommandResponse(CommandResponse),
    Event(Event),
    Announcement(Announcement),
}

impl Signal {
    /// Family this signal belongs to; exhaustive over every variant.
    pub fn family(&self) -> SignalFamily {
        match self {
            Signal::Command(c) => match c {
                Command::ThingQuery(_) => SignalFamily::ThingQueryCommand,
                Command::ThingModify(_) => SignalFamily::ThingModifyCommand,
                Command::PolicyQuery(_) => SignalFamily::PolicyQueryCommand,
                Command::PolicyModify(_) => SignalFamily::PolicyModifyCommand,
                Command::Message(_) => SignalFamily::MessageCommand,
                Command::ThingSearch(_) => SignalFamily::ThingSearchCommand,
                Command::StreamingSubscription(_) => SignalFamily::StreamingSubscriptionCommand,
            },
            Signal::CommandResponse(r) => match r {
                CommandResponse::ThingQuery(_) => SignalFamily::ThingQueryCommandResponse,
                CommandResponse::ThingModify(_) => SignalFamily::ThingModifyCommandResponse,
                CommandResponse::PolicyQuery(_) => SignalFamily::PolicyQueryCommandResponse,
                CommandResponse::PolicyModify(_) => SignalFamily::PolicyModifyCommandResponse,
                CommandResponse::Message(_) => SignalFamily::MessageCommandResponse,
                CommandResponse::ThingError(_) => SignalFamily::ThingErrorResponse,
                CommandResponse::PolicyError(_) => SignalFamily::PolicyErrorResponse,
                CommandResponse::Acknowledgement(_) => SignalFamily::Acknowledgement,
                CommandResponse::Acknowledgements(_) => SignalFamily::Acknowledgements,
            },
            Signal::Event(e) => match e {
                Event::Thing(_) => SignalFamily::ThingEvent,
                Event::SearchSubscription(_) => SignalFamily::SearchSubscriptionEvent,
                Event::StreamingSubscription(_) => SignalFamily::StreamingSubscriptionEvent,
            },
            Signal::Announcement(a) => match a {
                Announcement::Policy(_) => SignalFamily::PolicyAnnouncement,
                Announcement::Connectivity(_) => SignalFamily::ConnectivityAnnouncement,
            },
        }
    }

    pub fn headers(&self) -> &Headers {
        match self {
            Signal::Command(c) => match c {
                Command::ThingQuery(s) | Command::ThingModify(s) => &s.headers,
                Command::PolicyQuery(s) | Command::PolicyModify(s) => &s.headers,
                Command::Message(s) => &s.headers,
                Command::ThingSearch(s) => &s.headers,
                Command::StreamingSubscription(s) => &s.headers,
            },
            Signal::CommandResponse(r) => match r {
                CommandResponse::ThingQuery(s) | CommandResponse::ThingModify(s) => &s.headers,
                CommandResponse::PolicyQuery(s) | CommandResponse::PolicyModify(s) => &s.headers,
                CommandResponse::Message(s) => &s.headers,
                CommandResponse::ThingError(s) | CommandResponse::PolicyError(s) => &s.headers,
                CommandResponse::Acknowledgement(s) => &s.headers,
                CommandResponse::Acknowledgements(s) => &s.headers,
            },
            Signal::Event(e) => match e {
                Event::Thing(s) => &s.headers,
                Event::SearchSubscription(s) => &s.headers,
                Event::StreamingSubscription(s) => &s.headers,
            },
            Signal::Announcement(a) => match a {
                Announcement::Policy(s) => &s.headers,
                Announcement::Connectivity(s) => &s.headers,
            },
        }
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        match self {
            Signal::Command(c) => match c {
                Command::ThingQuery(s) | Command::ThingModify(s) => &mut s.headers,
                Command::PolicyQuery(s) | Command::PolicyModify(s) => &mut s.headers,
                Command::Message(s) => &mut s.headers,
                Command::ThingSearch(s) => &mut s.headers,
                Command::StreamingSubscription(s) => &mut s.headers,
            },
            Signal::CommandResponse(r) => match r {
                CommandResponse::ThingQuery(s) | CommandResponse::ThingModify(s) => &mut s.headers,
                CommandResponse::PolicyQuery(s) | CommandResponse::PolicyModify(s) => {
                    &mut s.headers
                }
                CommandResponse::Message(s) => &mut s.headers,
                CommandResponse::ThingError(s) | CommandResponse::PolicyError(s) => &mut s.headers,
                CommandResponse::Acknowledgement(s) => &mut s.headers,
                CommandResponse::Acknowledgements(s) => &mut s.headers,
            },
            Signal::Event(e) => match e {
                Event::Thing(s) => &mut s.headers,
                Event::SearchSubscription(s) => &mut s.headers,
                Event::StreamingSubscription(s) => &mut s.headers,
            },
            Signal::Announcement(a) => match a {
                Announcement::Policy(s) => &mut s.headers,
                Announcement::Connectivity(s) => &mut s.headers,
            },
        }
    }

    /// Same signal with other headers
    pub fn with_headers(mut self, headers: Headers) -> Self {
        *self.headers_mut() = headers;
        self
    }
}

impl From<Command> for Signal {
    fn from(command: Command) -> Self {
        Signal::Command(command)
    }
}

impl From<CommandResponse> for Signal {
    fn from(response: CommandResponse) -> Self {
        Signal::CommandResponse(response)
    }
}

impl From<Event> for Signal {
    fn from(event: Event) -> Self {
        Signal::Event(event)
    }
}

impl From<Announcement> for Signal {
    fn from(announcement: Announcement) -> Self {
        Signal::Announcement(announcement)
    }
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// Adapter-level classification of signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalFamily {
    ThingQueryCommand,
    ThingModifyCommand,
    ThingQueryCommandResponse,
    ThingModifyCommandResponse,
    ThingEvent,
    ThingErrorResponse,
    ThingSearchCommand,
    SearchSubscriptionEvent,
    StreamingSubscriptionCommand,
    StreamingSubscriptionEvent,
    MessageCommand,
    MessageCommandResponse,
    Acknowledgement,
    Acknowledgements,
    PolicyQueryCommand,
    PolicyModifyCommand,
    PolicyQueryCommandResponse,
    PolicyModifyCommandResponse,
    PolicyErrorResponse,
    PolicyAnnouncement,
    ConnectivityAnnouncement,
}

impl SignalFamily {
    pub const ALL: [SignalFamily; 21] = [
        SignalFamily::ThingQueryCommand,
        SignalFamily::ThingModifyCommand,
        SignalFamily::ThingQueryCommandResponse,
        SignalFamily::ThingModifyCommandResponse,
        SignalFamily::ThingEvent,
        SignalFamily::ThingErrorResponse,
        SignalFamily::ThingSearchCommand,
        SignalFamily::SearchSubscriptionEvent,
        SignalFamily::StreamingSubscriptionCommand,
        SignalFamily::StreamingSubscriptionEvent,
        SignalFamily::MessageCommand,
        SignalFamily::MessageCommandResponse,
        SignalFamily::Acknowledgement,
        SignalFamily::Acknowledgements,
        SignalFamily::PolicyQueryCommand,
        SignalFamily::PolicyModifyCommand,
        SignalFamily::PolicyQueryCommandResponse,
        SignalFamily::PolicyModifyCommandResponse,
        SignalFamily::PolicyErrorResponse,
        SignalFamily::PolicyAnnouncement,
        SignalFamily::ConnectivityAnnouncement,
    ];

    /// Stable kebab-case name; also the id of the adapter handling the family
    pub fn name(self) -> &'static str {
        match self {
            SignalFamily::ThingQueryCommand => "thing-query-command",
            SignalFamily::ThingModifyCommand => "thing-modify-command",
            SignalFamily::ThingQueryCommandResponse => "thing-query-command-response",
            SignalFamily::ThingModifyCommandResponse => "thing-modify-command-response",
            SignalFamily::ThingEvent => "thing-event",
            SignalFamily::ThingErrorResponse => "thing-error-response",
            SignalFamily::ThingSearchCommand => "thing-search-command",
            SignalFamily::SearchSubscriptionEvent => "search-subscription-event",
            SignalFamily::StreamingSubscriptionCommand => "streaming-subscription-command",
            SignalFamily::StreamingSubscriptionEvent => "streaming-subscription-event",
            SignalFamily::MessageCommand => "message-command",
            SignalFamily::MessageCommandResponse => "message-command-response",
            SignalFamily::Acknowledgement => "acknowledgement",
            SignalFamily::Acknowledgements => "acknowledgements",
            SignalFamily::PolicyQueryCommand => "policy-query-command",
            SignalFamily::PolicyModifyCommand => "policy-modify-command",
            SignalFamily::PolicyQueryCommandResponse => "policy-query-command-response",
            SignalFamily::PolicyModifyCommandResponse => "policy-modify-command-response",
            SignalFamily::PolicyErrorResponse => "policy-error-response",
            SignalFamily::PolicyAnnouncement => "policy-announcement",
            SignalFamily::ConnectivityAnnouncement => "connectivity-announcement",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for SignalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::Action;
    use std::collections::HashSet;

    #[test]
    fn family_names_are_unique_and_reversible() {
        let names: HashSet<_> = SignalFamily::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), SignalFamily::ALL.len());
        for family in SignalFamily::ALL {
            assert_eq!(SignalFamily::from_name(family.name()), Some(family));
        }
    }

    #[test]
    fn query_and_modify_share_a_shape_but_not_a_family() {
        let cmd = ThingCommand::new(Action::Retrieve, EntityId::new("ns", "t"), ThingResource::Thing);
        let query = Signal::from(Command::ThingQuery(cmd.clone()));
        let modify = Signal::from(Command::ThingModify(cmd));
        assert_eq!(query.family(), SignalFamily::ThingQueryCommand);
        assert_eq!(modify.family(), SignalFamily::ThingModifyCommand);
    }

    #[test]
    fn headers_are_reachable_for_every_shape() {
        let ack = Signal::from(CommandResponse::Acknowledgement(Acknowledgement::new(
            "twin-persisted",
            EntityId::new("ns", "t"),
            204,
        )));
        let ack = ack.with_headers(Headers::new().with("correlation-id", "c"));
        assert_eq!(ack.headers().correlation_id(), Some("c"));
    }
}
