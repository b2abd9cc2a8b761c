//! Mappers for the search and history-streaming subscription protocols
//!
//! The action in the topic selects the body shape; the bodies themselves
//! are plain serde structs in `signal::subscription`.

use super::strategies::{
    decode_value, encode_value, type_tag, type_tag_of, unknown_signal, unknown_topic_path,
    MappingStrategies,
};
use super::traits::{Capabilities, PayloadMapper};
use crate::adaptable::{Adaptable, JsonPointer, Payload};
use crate::error::ProtocolResult;
use crate::signal::{
    Command, EntityId, Event, SearchCommand, SearchCommandKind, SearchSubscribe, Signal,
    SignalFamily, StreamingCommandKind, StreamingEventKind, StreamingSubscriptionCommand,
    StreamingSubscriptionEvent, SubscriptionEvent, SubscriptionEventKind,
};
use crate::topic::{
    Channel, Criterion, Group, SearchAction, StreamingAction, TopicAttribute, TopicPath,
    WILDCARD,
};

/// Search and streaming tags carry no classifier: `things.search:subscribe`
const NO_CLASSIFIER: &str = "";

fn add_tagged<F>(strategies: &mut MappingStrategies, tags: Vec<String>, decode: F)
where
    F: Fn(&str, &Adaptable) -> ProtocolResult<Signal> + Copy + Send + Sync + 'static,
{
    for tag in tags {
        let error_tag = tag.clone();
        strategies.add(tag, move |adaptable: &Adaptable| decode(&error_tag, adaptable));
    }
}

fn search_tags(actions: &[SearchAction]) -> Vec<String> {
    actions
        .iter()
        .map(|a| type_tag(Group::Things, Criterion::Search, Some(a.token()), NO_CLASSIFIER))
        .collect()
}

fn streaming_tags(actions: &[StreamingAction]) -> Vec<String> {
    actions
        .iter()
        .map(|a| type_tag(Group::Things, Criterion::Streaming, Some(a.token()), NO_CLASSIFIER))
        .collect()
}

fn root_only(payload: &Payload) -> Option<String> {
    payload.path.is_empty().then(|| NO_CLASSIFIER.to_string())
}

fn search_topic(channel: Channel, action: SearchAction) -> ProtocolResult<TopicPath> {
    TopicPath::builder(WILDCARD, WILDCARD)
        .things()
        .channel(channel)
        .search(action)
}

// ---------------------------------------------------------------------------
// Search commands
// ---------------------------------------------------------------------------

const SEARCH_COMMAND_ACTIONS: [SearchAction; 3] =
    [SearchAction::Subscribe, SearchAction::Request, SearchAction::Cancel];

pub struct SearchCommandMapper;

fn search_command(signal: &Signal) -> Option<&SearchCommand> {
    match signal {
        Signal::Command(Command::ThingSearch(c)) => Some(c),
        _ => None,
    }
}

fn decode_search_command(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let payload = adaptable.payload();
    let value = payload.value.as_ref();
    let kind = match adaptable.topic_path().search_action() {
        Some(SearchAction::Subscribe) => {
            let mut subscribe: SearchSubscribe = decode_value(type_tag, value)?;
            subscribe.fields = payload.fields.clone();
            SearchCommandKind::Subscribe(subscribe)
        }
        Some(SearchAction::Request) => SearchCommandKind::Request(decode_value(type_tag, value)?),
        Some(SearchAction::Cancel) => SearchCommandKind::Cancel(decode_value(type_tag, value)?),
        _ => return Err(unknown_topic_path(adaptable)),
    };
    Ok(Signal::Command(Command::ThingSearch(SearchCommand {
        kind,
        headers: adaptable.headers().clone(),
    })))
}

impl PayloadMapper for SearchCommandMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::ThingSearchCommand
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([Group::Things])
            .channels([Channel::Twin])
            .criteria([Criterion::Search])
            .search_actions(SEARCH_COMMAND_ACTIONS)
            .wildcard_topics()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        root_only(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        add_tagged(
            &mut strategies,
            search_tags(&SEARCH_COMMAND_ACTIONS),
            decode_search_command,
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let command = search_command(signal).ok_or_else(|| unknown_signal(signal))?;
        let action = match command.kind {
            SearchCommandKind::Subscribe(_) => SearchAction::Subscribe,
            SearchCommandKind::Request(_) => SearchAction::Request,
            SearchCommandKind::Cancel(_) => SearchAction::Cancel,
        };
        search_topic(channel, action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let command = search_command(signal).ok_or_else(|| unknown_signal(signal))?;
        let tag = type_tag(Group::Things, Criterion::Search, None, NO_CLASSIFIER);
        let payload = Payload::new(JsonPointer::root());
        Ok(match &command.kind {
            SearchCommandKind::Subscribe(subscribe) => {
                let mut payload = payload.with_value(encode_value(&tag, subscribe)?);
                payload.fields = subscribe.fields.clone();
                payload
            }
            SearchCommandKind::Request(request) => payload.with_value(encode_value(&tag, request)?),
            SearchCommandKind::Cancel(cancel) => payload.with_value(encode_value(&tag, cancel)?),
        })
    }
}

// ---------------------------------------------------------------------------
// Search events
// ---------------------------------------------------------------------------

const SEARCH_EVENT_ACTIONS: [SearchAction; 4] = [
    SearchAction::Created,
    SearchAction::Next,
    SearchAction::Complete,
    SearchAction::Failed,
];

pub struct SubscriptionEventMapper;

fn subscription_event(signal: &Signal) -> Option<&SubscriptionEvent> {
    match signal {
        Signal::Event(Event::SearchSubscription(e)) => Some(e),
        _ => None,
    }
}

fn decode_subscription_event(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let value = adaptable.payload().value.as_ref();
    let kind = match adaptable.topic_path().search_action() {
        Some(SearchAction::Created) => SubscriptionEventKind::Created(decode_value(type_tag, value)?),
        Some(SearchAction::Next) => SubscriptionEventKind::Next(decode_value(type_tag, value)?),
        Some(SearchAction::Complete) => {
            SubscriptionEventKind::Complete(decode_value(type_tag, value)?)
        }
        Some(SearchAction::Failed) => SubscriptionEventKind::Failed(decode_value(type_tag, value)?),
        _ => return Err(unknown_topic_path(adaptable)),
    };
    Ok(Signal::Event(Event::SearchSubscription(SubscriptionEvent {
        kind,
        headers: adaptable.headers().clone(),
    })))
}

impl PayloadMapper for SubscriptionEventMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::SearchSubscriptionEvent
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([Group::Things])
            .channels([Channel::Twin])
            .criteria([Criterion::Search])
            .search_actions(SEARCH_EVENT_ACTIONS)
            .wildcard_topics()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        root_only(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        add_tagged(
            &mut strategies,
            search_tags(&SEARCH_EVENT_ACTIONS),
            decode_subscription_event,
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let event = subscription_event(signal).ok_or_else(|| unknown_signal(signal))?;
        let action = match event.kind {
            SubscriptionEventKind::Created(_) => SearchAction::Created,
            SubscriptionEventKind::Next(_) => SearchAction::Next,
            SubscriptionEventKind::Complete(_) => SearchAction::Complete,
            SubscriptionEventKind::Failed(_) => SearchAction::Failed,
        };
        search_topic(channel, action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let event = subscription_event(signal).ok_or_else(|| unknown_signal(signal))?;
        let tag = type_tag(Group::Things, Criterion::Search, None, NO_CLASSIFIER);
        let value = match &event.kind {
            SubscriptionEventKind::Created(body) | SubscriptionEventKind::Complete(body) => {
                encode_value(&tag, body)?
            }
            SubscriptionEventKind::Next(body) => encode_value(&tag, body)?,
            SubscriptionEventKind::Failed(body) => encode_value(&tag, body)?,
        };
        Ok(Payload::new(JsonPointer::root()).with_value(value))
    }
}

// ---------------------------------------------------------------------------
// Streaming commands
// ---------------------------------------------------------------------------

const STREAMING_COMMAND_ACTIONS: [StreamingAction; 3] = [
    StreamingAction::SubscribeForPersistedEvents,
    StreamingAction::Request,
    StreamingAction::Cancel,
];

pub struct StreamingCommandMapper;

fn streaming_command(signal: &Signal) -> Option<&StreamingSubscriptionCommand> {
    match signal {
        Signal::Command(Command::StreamingSubscription(c)) => Some(c),
        _ => None,
    }
}

fn decode_streaming_command(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let value = adaptable.payload().value.as_ref();
    let kind = match adaptable.topic_path().streaming_action() {
        Some(StreamingAction::SubscribeForPersistedEvents) => {
            StreamingCommandKind::SubscribeForPersistedEvents(decode_value(type_tag, value)?)
        }
        Some(StreamingAction::Request) => StreamingCommandKind::Request(decode_value(type_tag, value)?),
        Some(StreamingAction::Cancel) => StreamingCommandKind::Cancel(decode_value(type_tag, value)?),
        _ => return Err(unknown_topic_path(adaptable)),
    };
    Ok(Signal::Command(Command::StreamingSubscription(
        StreamingSubscriptionCommand {
            entity_id: EntityId::from_topic(adaptable.topic_path()),
            resource: adaptable.payload().path.clone(),
            kind,
            headers: adaptable.headers().clone(),
        },
    )))
}

impl PayloadMapper for StreamingCommandMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::StreamingSubscriptionCommand
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([Group::Things])
            .channels([Channel::Twin])
            .criteria([Criterion::Streaming])
            .streaming_actions(STREAMING_COMMAND_ACTIONS)
    }

    fn classify(&self, _topic_path: &TopicPath, _payload: &Payload) -> Option<String> {
        Some(NO_CLASSIFIER.to_string())
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        add_tagged(
            &mut strategies,
            streaming_tags(&STREAMING_COMMAND_ACTIONS),
            decode_streaming_command,
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let command = streaming_command(signal).ok_or_else(|| unknown_signal(signal))?;
        let action = match command.kind {
            StreamingCommandKind::SubscribeForPersistedEvents(_) => {
                StreamingAction::SubscribeForPersistedEvents
            }
            StreamingCommandKind::Request(_) => StreamingAction::Request,
            StreamingCommandKind::Cancel(_) => StreamingAction::Cancel,
        };
        TopicPath::builder(command.entity_id.namespace(), command.entity_id.name())
            .things()
            .channel(channel)
            .streaming(action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let command = streaming_command(signal).ok_or_else(|| unknown_signal(signal))?;
        let topic_path = self.to_topic_path(signal, Channel::Twin)?;
        let tag = type_tag_of(&topic_path, NO_CLASSIFIER);
        let value = match &command.kind {
            StreamingCommandKind::SubscribeForPersistedEvents(range) => encode_value(&tag, range)?,
            StreamingCommandKind::Request(request) => encode_value(&tag, request)?,
            StreamingCommandKind::Cancel(cancel) => encode_value(&tag, cancel)?,
        };
        Ok(Payload::new(command.resource.clone()).with_value(value))
    }
}

// ---------------------------------------------------------------------------
// Streaming events
// ---------------------------------------------------------------------------

const STREAMING_EVENT_ACTIONS: [StreamingAction; 4] = [
    StreamingAction::Created,
    StreamingAction::Next,
    StreamingAction::Complete,
    StreamingAction::Failed,
];

pub struct StreamingEventMapper;

fn streaming_event(signal: &Signal) -> Option<&StreamingSubscriptionEvent> {
    match signal {
        Signal::Event(Event::StreamingSubscription(e)) => Some(e),
        _ => None,
    }
}

fn decode_streaming_event(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let value = adaptable.payload().value.as_ref();
    let kind = match adaptable.topic_path().streaming_action() {
        Some(StreamingAction::Created) => StreamingEventKind::Created(decode_value(type_tag, value)?),
        Some(StreamingAction::Next) => StreamingEventKind::Next(decode_value(type_tag, value)?),
        Some(StreamingAction::Complete) => {
            StreamingEventKind::Complete(decode_value(type_tag, value)?)
        }
        Some(StreamingAction::Failed) => StreamingEventKind::Failed(decode_value(type_tag, value)?),
        _ => return Err(unknown_topic_path(adaptable)),
    };
    Ok(Signal::Event(Event::StreamingSubscription(
        StreamingSubscriptionEvent {
            entity_id: EntityId::from_topic(adaptable.topic_path()),
            resource: adaptable.payload().path.clone(),
            kind,
            headers: adaptable.headers().clone(),
        },
    )))
}

impl PayloadMapper for StreamingEventMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::StreamingSubscriptionEvent
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([Group::Things])
            .channels([Channel::Twin])
            .criteria([Criterion::Streaming])
            .streaming_actions(STREAMING_EVENT_ACTIONS)
    }

    fn classify(&self, _topic_path: &TopicPath, _payload: &Payload) -> Option<String> {
        Some(NO_CLASSIFIER.to_string())
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        add_tagged(
            &mut strategies,
            streaming_tags(&STREAMING_EVENT_ACTIONS),
            decode_streaming_event,
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let event = streaming_event(signal).ok_or_else(|| unknown_signal(signal))?;
        let action = match event.kind {
            StreamingEventKind::Created(_) => StreamingAction::Created,
            StreamingEventKind::Next(_) => StreamingAction::Next,
            StreamingEventKind::Complete(_) => StreamingAction::Complete,
            StreamingEventKind::Failed(_) => StreamingAction::Failed,
        };
        TopicPath::builder(event.entity_id.namespace(), event.entity_id.name())
            .things()
            .channel(channel)
            .streaming(action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let event = streaming_event(signal).ok_or_else(|| unknown_signal(signal))?;
        let tag = type_tag(Group::Things, Criterion::Streaming, None, NO_CLASSIFIER);
        let value = match &event.kind {
            StreamingEventKind::Created(body) | StreamingEventKind::Complete(body) => {
                encode_value(&tag, body)?
            }
            StreamingEventKind::Next(body) => encode_value(&tag, body)?,
            StreamingEventKind::Failed(body) => encode_value(&tag, body)?,
        };
        Ok(Payload::new(event.resource.clone()).with_value(value))
    }
}
