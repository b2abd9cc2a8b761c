//! Mappers for signals addressing one resource of a thing or policy
//!
//! Commands and responses are generic over the resource kind, so the same
//! mapper serves things and policies; the family, channels and actions are
//! fixed by the constructor.

use super::strategies::{
    decode_value, encode_value, require_status, type_tag, unknown_signal, unknown_topic_path,
    MappingStrategies,
};
use super::traits::{Capabilities, PayloadMapper};
use crate::adaptable::{Adaptable, JsonPointer, Payload};
use crate::error::{ProtocolError, ProtocolResult};
use crate::signal::{
    Command, CommandResponse, EntityCommand, EntityCommandResponse, EntityId, ErrorBody,
    ErrorResponse, Event, PolicyResource, Resource, Signal, SignalFamily, ThingEvent,
    ThingResource,
};
use crate::topic::{Action, Channel, Criterion, Group, TopicAttribute, TopicPath};

const THING_CHANNELS: [Channel; 2] = [Channel::Twin, Channel::Live];
const POLICY_CHANNELS: [Channel; 1] = [Channel::None];

const MODIFY_ACTIONS: [Action; 4] = [Action::Create, Action::Modify, Action::Merge, Action::Delete];
const EVENT_ACTIONS: [Action; 4] = [Action::Created, Action::Modified, Action::Merged, Action::Deleted];

fn requires_value(action: Action) -> bool {
    matches!(action, Action::Create | Action::Modify | Action::Merge)
}

/// Register one strategy per (action, resource kind) pair the resource supports.
fn add_resource_strategies<R, F>(
    strategies: &mut MappingStrategies,
    criterion: Criterion,
    actions: &[Action],
    strategy: F,
) where
    R: Resource,
    F: Fn(&str, &Adaptable) -> ProtocolResult<Signal> + Clone + Send + Sync + 'static,
{
    for &action in actions {
        for &name in R::NAMES {
            if !R::supports(action, name) {
                continue;
            }
            let tag = type_tag(R::GROUP, criterion, Some(action.token()), name);
            let strategy = strategy.clone();
            let error_tag = tag.clone();
            strategies.add(tag, move |adaptable: &Adaptable| strategy(&error_tag, adaptable));
        }
    }
}

fn classify_resource<R: Resource>(payload: &Payload) -> Option<String> {
    R::classify(&payload.path).map(|resource| resource.name().to_string())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Query or modify commands on things or policies.
pub struct EntityCommandMapper<R: Resource> {
    family: SignalFamily,
    actions: &'static [Action],
    channels: &'static [Channel],
    wrap: fn(EntityCommand<R>) -> Signal,
    unwrap: fn(&Signal) -> Option<&EntityCommand<R>>,
}

impl EntityCommandMapper<ThingResource> {
    pub fn thing_query() -> Self {
        Self {
            family: SignalFamily::ThingQueryCommand,
            actions: &[Action::Retrieve],
            channels: &THING_CHANNELS,
            wrap: |c| Signal::Command(Command::ThingQuery(c)),
            unwrap: thing_query_command,
        }
    }

    pub fn thing_modify() -> Self {
        Self {
            family: SignalFamily::ThingModifyCommand,
            actions: &MODIFY_ACTIONS,
            channels: &THING_CHANNELS,
            wrap: |c| Signal::Command(Command::ThingModify(c)),
            unwrap: thing_modify_command,
        }
    }
}

impl EntityCommandMapper<PolicyResource> {
    pub fn policy_query() -> Self {
        Self {
            family: SignalFamily::PolicyQueryCommand,
            actions: &[Action::Retrieve],
            channels: &POLICY_CHANNELS,
            wrap: |c| Signal::Command(Command::PolicyQuery(c)),
            unwrap: policy_query_command,
        }
    }

    pub fn policy_modify() -> Self {
        Self {
            family: SignalFamily::PolicyModifyCommand,
            actions: &[Action::Create, Action::Modify, Action::Delete],
            channels: &POLICY_CHANNELS,
            wrap: |c| Signal::Command(Command::PolicyModify(c)),
            unwrap: policy_modify_command,
        }
    }
}

fn thing_query_command(signal: &Signal) -> Option<&EntityCommand<ThingResource>> {
    match signal {
        Signal::Command(Command::ThingQuery(c)) => Some(c),
        _ => None,
    }
}

fn thing_modify_command(signal: &Signal) -> Option<&EntityCommand<ThingResource>> {
    match signal {
        Signal::Command(Command::ThingModify(c)) => Some(c),
        _ => None,
    }
}

fn policy_query_command(signal: &Signal) -> Option<&EntityCommand<PolicyResource>> {
    match signal {
        Signal::Command(Command::PolicyQuery(c)) => Some(c),
        _ => None,
    }
}

fn policy_modify_command(signal: &Signal) -> Option<&EntityCommand<PolicyResource>> {
    match signal {
        Signal::Command(Command::PolicyModify(c)) => Some(c),
        _ => None,
    }
}

fn decode_command<R: Resource>(
    type_tag: &str,
    adaptable: &Adaptable,
) -> ProtocolResult<EntityCommand<R>> {
    let topic_path = adaptable.topic_path();
    let payload = adaptable.payload();
    let action = topic_path
        .action()
        .ok_or_else(|| unknown_topic_path(adaptable))?;
    let resource = R::classify(&payload.path).ok_or_else(|| unknown_topic_path(adaptable))?;
    if requires_value(action) && payload.value.is_none() {
        return Err(ProtocolError::malformed(type_tag, "missing value"));
    }
    Ok(EntityCommand {
        action,
        entity_id: EntityId::from_topic(topic_path),
        resource,
        value: payload.value.clone(),
        fields: payload.fields.clone(),
        headers: adaptable.headers().clone(),
    })
}

impl<R: Resource> PayloadMapper for EntityCommandMapper<R> {
    fn family(&self) -> SignalFamily {
        self.family
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([R::GROUP])
            .channels(self.channels.iter().copied())
            .criteria([Criterion::Commands])
            .actions(self.actions.iter().copied())
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        classify_resource::<R>(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        let wrap = self.wrap;
        add_resource_strategies::<R, _>(
            &mut strategies,
            Criterion::Commands,
            self.actions,
            move |tag, adaptable| decode_command::<R>(tag, adaptable).map(wrap),
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let command = (self.unwrap)(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(command.entity_id.namespace(), command.entity_id.name())
            .group(R::GROUP)
            .channel(channel)
            .commands(command.action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let command = (self.unwrap)(signal).ok_or_else(|| unknown_signal(signal))?;
        let mut payload =
            Payload::new(command.resource.pointer()).with_optional_value(command.value.clone());
        payload.fields = command.fields.clone();
        Ok(payload)
    }
}

// ---------------------------------------------------------------------------
// Command responses
// ---------------------------------------------------------------------------

/// Responses to query or modify commands on things or policies.
pub struct EntityResponseMapper<R: Resource> {
    family: SignalFamily,
    actions: &'static [Action],
    channels: &'static [Channel],
    wrap: fn(EntityCommandResponse<R>) -> Signal,
    unwrap: fn(&Signal) -> Option<&EntityCommandResponse<R>>,
}

impl EntityResponseMapper<ThingResource> {
    pub fn thing_query() -> Self {
        Self {
            family: SignalFamily::ThingQueryCommandResponse,
            actions: &[Action::Retrieve],
            channels: &THING_CHANNELS,
            wrap: |r| Signal::CommandResponse(CommandResponse::ThingQuery(r)),
            unwrap: thing_query_response,
        }
    }

    pub fn thing_modify() -> Self {
        Self {
            family: SignalFamily::ThingModifyCommandResponse,
            actions: &MODIFY_ACTIONS,
            channels: &THING_CHANNELS,
            wrap: |r| Signal::CommandResponse(CommandResponse::ThingModify(r)),
            unwrap: thing_modify_response,
        }
    }
}

impl EntityResponseMapper<PolicyResource> {
    pub fn policy_query() -> Self {
        Self {
            family: SignalFamily::PolicyQueryCommandResponse,
            actions: &[Action::Retrieve],
            channels: &POLICY_CHANNELS,
            wrap: |r| Signal::CommandResponse(CommandResponse::PolicyQuery(r)),
            unwrap: policy_query_response,
        }
    }

    pub fn policy_modify() -> Self {
        Self {
            family: SignalFamily::PolicyModifyCommandResponse,
            actions: &[Action::Create, Action::Modify, Action::Delete],
            channels: &POLICY_CHANNELS,
            wrap: |r| Signal::CommandResponse(CommandResponse::PolicyModify(r)),
            unwrap: policy_modify_response,
        }
    }
}

fn thing_query_response(signal: &Signal) -> Option<&EntityCommandResponse<ThingResource>> {
    match signal {
        Signal::CommandResponse(CommandResponse::ThingQuery(r)) => Some(r),
        _ => None,
    }
}

fn thing_modify_response(signal: &Signal) -> Option<&EntityCommandResponse<ThingResource>> {
    match signal {
        Signal::CommandResponse(CommandResponse::ThingModify(r)) => Some(r),
        _ => None,
    }
}

fn policy_query_response(signal: &Signal) -> Option<&EntityCommandResponse<PolicyResource>> {
    match signal {
        Signal::CommandResponse(CommandResponse::PolicyQuery(r)) => Some(r),
        _ => None,
    }
}

fn policy_modify_response(signal: &Signal) -> Option<&EntityCommandResponse<PolicyResource>> {
    match signal {
        Signal::CommandResponse(CommandResponse::PolicyModify(r)) => Some(r),
        _ => None,
    }
}

fn decode_response<R: Resource>(
    type_tag: &str,
    adaptable: &Adaptable,
) -> ProtocolResult<EntityCommandResponse<R>> {
    let topic_path = adaptable.topic_path();
    let payload = adaptable.payload();
    let action = topic_path
        .action()
        .ok_or_else(|| unknown_topic_path(adaptable))?;
    let resource = R::classify(&payload.path).ok_or_else(|| unknown_topic_path(adaptable))?;
    Ok(EntityCommandResponse {
        action,
        entity_id: EntityId::from_topic(topic_path),
        resource,
        value: payload.value.clone(),
        status: require_status(type_tag, adaptable)?,
        headers: adaptable.headers().clone(),
    })
}

impl<R: Resource> PayloadMapper for EntityResponseMapper<R> {
    fn family(&self) -> SignalFamily {
        self.family
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([R::GROUP])
            .channels(self.channels.iter().copied())
            .criteria([Criterion::Commands])
            .actions(self.actions.iter().copied())
            .for_responses()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        classify_resource::<R>(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        let wrap = self.wrap;
        add_resource_strategies::<R, _>(
            &mut strategies,
            Criterion::Commands,
            self.actions,
            move |tag, adaptable| decode_response::<R>(tag, adaptable).map(wrap),
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let response = (self.unwrap)(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(response.entity_id.namespace(), response.entity_id.name())
            .group(R::GROUP)
            .channel(channel)
            .commands(response.action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let response = (self.unwrap)(signal).ok_or_else(|| unknown_signal(signal))?;
        Ok(Payload::new(response.resource.pointer())
            .with_optional_value(response.value.clone())
            .with_status(response.status))
    }
}

// ---------------------------------------------------------------------------
// Thing events
// ---------------------------------------------------------------------------

/// Persisted thing events: created, modified, merged, deleted.
pub struct ThingEventMapper;

fn thing_event(signal: &Signal) -> Option<&ThingEvent> {
    match signal {
        Signal::Event(Event::Thing(e)) => Some(e),
        _ => None,
    }
}

fn decode_thing_event(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let topic_path = adaptable.topic_path();
    let payload = adaptable.payload();
    let action = topic_path
        .action()
        .ok_or_else(|| unknown_topic_path(adaptable))?;
    let resource =
        ThingResource::classify(&payload.path).ok_or_else(|| unknown_topic_path(adaptable))?;
    let revision = payload
        .revision
        .ok_or_else(|| ProtocolError::malformed(type_tag, "missing revision"))?;
    Ok(Signal::Event(Event::Thing(ThingEvent {
        action,
        thing_id: EntityId::from_topic(topic_path),
        resource,
        value: payload.value.clone(),
        revision,
        timestamp: payload.timestamp,
        extra: payload.extra.clone(),
        headers: adaptable.headers().clone(),
    })))
}

impl PayloadMapper for ThingEventMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::ThingEvent
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new()
            .groups([Group::Things])
            .channels(THING_CHANNELS)
            .criteria([Criterion::Events])
            .actions(EVENT_ACTIONS)
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        classify_resource::<ThingResource>(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        add_resource_strategies::<ThingResource, _>(
            &mut strategies,
            Criterion::Events,
            &EVENT_ACTIONS,
            decode_thing_event,
        );
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let event = thing_event(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(event.thing_id.namespace(), event.thing_id.name())
            .things()
            .channel(channel)
            .events(event.action)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let event = thing_event(signal).ok_or_else(|| unknown_signal(signal))?;
        let mut payload = Payload::new(event.resource.pointer())
            .with_optional_value(event.value.clone())
            .with_revision(event.revision);
        payload.timestamp = event.timestamp;
        payload.extra = event.extra.clone();
        Ok(payload)
    }
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

const ERROR_CLASSIFIER: &str = "error";

/// Error responses of things or policies. The payload path is always `/`.
pub struct ErrorResponseMapper {
    family: SignalFamily,
    group: Group,
    channels: &'static [Channel],
    /// Search failures are reported on wildcard topics
    wildcard: bool,
    wrap: fn(ErrorResponse) -> Signal,
    unwrap: fn(&Signal) -> Option<&ErrorResponse>,
}

impl ErrorResponseMapper {
    pub fn things() -> Self {
        Self {
            family: SignalFamily::ThingErrorResponse,
            group: Group::Things,
            channels: &THING_CHANNELS,
            wildcard: true,
            wrap: |e| Signal::CommandResponse(CommandResponse::ThingError(e)),
            unwrap: thing_error,
        }
    }

    pub fn policies() -> Self {
        Self {
            family: SignalFamily::PolicyErrorResponse,
            group: Group::Policies,
            channels: &POLICY_CHANNELS,
            wildcard: false,
            wrap: |e| Signal::CommandResponse(CommandResponse::PolicyError(e)),
            unwrap: policy_error,
        }
    }
}

fn thing_error(signal: &Signal) -> Option<&ErrorResponse> {
    match signal {
        Signal::CommandResponse(CommandResponse::ThingError(e)) => Some(e),
        _ => None,
    }
}

fn policy_error(signal: &Signal) -> Option<&ErrorResponse> {
    match signal {
        Signal::CommandResponse(CommandResponse::PolicyError(e)) => Some(e),
        _ => None,
    }
}

fn decode_error(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<ErrorResponse> {
    let status = require_status(type_tag, adaptable)?;
    let mut error: ErrorBody = decode_value(type_tag, adaptable.payload().value.as_ref())?;
    error.status = status;
    Ok(ErrorResponse {
        entity_id: EntityId::from_topic(adaptable.topic_path()),
        error,
        headers: adaptable.headers().clone(),
    })
}

impl PayloadMapper for ErrorResponseMapper {
    fn family(&self) -> SignalFamily {
        self.family
    }

    fn capabilities(&self) -> Capabilities {
        let capabilities = Capabilities::new()
            .groups([self.group])
            .channels(self.channels.iter().copied())
            .criteria([Criterion::Errors])
            .for_responses();
        if self.wildcard {
            capabilities.wildcard_topics()
        } else {
            capabilities
        }
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        payload.path.is_empty().then(|| ERROR_CLASSIFIER.to_string())
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        let tag = type_tag(self.group, Criterion::Errors, None, ERROR_CLASSIFIER);
        let error_tag = tag.clone();
        let wrap = self.wrap;
        strategies.add(tag, move |adaptable: &Adaptable| {
            decode_error(&error_tag, adaptable).map(wrap)
        });
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let error = (self.unwrap)(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(error.entity_id.namespace(), error.entity_id.name())
            .group(self.group)
            .channel(channel)
            .errors()
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let error = (self.unwrap)(signal).ok_or_else(|| unknown_signal(signal))?;
        let tag = type_tag(self.group, Criterion::Errors, None, ERROR_CLASSIFIER);
        Ok(Payload::new(JsonPointer::root())
            .with_value(encode_value(&tag, &error.error)?)
            .with_status(error.error.status))
    }
}
