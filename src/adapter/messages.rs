//! Mappers for live messages and their responses
//!
//! Messages only exist on the live channel. The topic subject and the
//! trailing segments of the payload path carry the same subject; the topic
//! is authoritative when decoding.

use super::strategies::{
    require_status, type_tag, unknown_signal, unknown_topic_path, MappingStrategies,
};
use super::traits::{Capabilities, PayloadMapper};
use crate::adaptable::{Adaptable, Payload};
use crate::error::ProtocolResult;
use crate::signal::{
    Command, CommandResponse, EntityId, MessageAddress, MessageCommand, MessageCommandResponse,
    Signal, SignalFamily,
};
use crate::topic::{Channel, Criterion, Group, TopicPath};

const MESSAGE_CLASSIFIER: &str = "message";

fn message_tag() -> String {
    type_tag(Group::Things, Criterion::Messages, None, MESSAGE_CLASSIFIER)
}

fn message_capabilities() -> Capabilities {
    Capabilities::new()
        .groups([Group::Things])
        .channels([Channel::Live])
        .criteria([Criterion::Messages])
        .requires_subject()
}

fn classify_message(payload: &Payload) -> Option<String> {
    MessageAddress::classify(&payload.path).map(|_| MESSAGE_CLASSIFIER.to_string())
}

fn decode_address(adaptable: &Adaptable) -> ProtocolResult<MessageAddress> {
    let topic_path = adaptable.topic_path();
    let subject = topic_path
        .subject()
        .ok_or_else(|| unknown_topic_path(adaptable))?;
    let (feature_id, direction) = MessageAddress::classify(&adaptable.payload().path)
        .ok_or_else(|| unknown_topic_path(adaptable))?;
    Ok(MessageAddress {
        thing_id: EntityId::from_topic(topic_path),
        feature_id,
        direction,
        subject: subject.to_string(),
    })
}

fn message_topic(address: &MessageAddress, channel: Channel) -> ProtocolResult<TopicPath> {
    TopicPath::builder(address.thing_id.namespace(), address.thing_id.name())
        .things()
        .channel(channel)
        .messages(address.subject.as_str())
}

// ---------------------------------------------------------------------------

pub struct MessageCommandMapper;

fn message_command(signal: &Signal) -> Option<&MessageCommand> {
    match signal {
        Signal::Command(Command::Message(m)) => Some(m),
        _ => None,
    }
}

impl PayloadMapper for MessageCommandMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::MessageCommand
    }

    fn capabilities(&self) -> Capabilities {
        message_capabilities()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        classify_message(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        strategies.add(message_tag(), |adaptable: &Adaptable| {
            Ok(Signal::Command(Command::Message(MessageCommand {
                address: decode_address(adaptable)?,
                value: adaptable.payload().value.clone(),
                headers: adaptable.headers().clone(),
            })))
        });
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let message = message_command(signal).ok_or_else(|| unknown_signal(signal))?;
        message_topic(&message.address, channel)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let message = message_command(signal).ok_or_else(|| unknown_signal(signal))?;
        Ok(Payload::new(message.address.pointer()).with_optional_value(message.value.clone()))
    }
}

// ---------------------------------------------------------------------------

pub struct MessageResponseMapper;

fn message_response(signal: &Signal) -> Option<&MessageCommandResponse> {
    match signal {
        Signal::CommandResponse(CommandResponse::Message(m)) => Some(m),
        _ => None,
    }
}

impl PayloadMapper for MessageResponseMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::MessageCommandResponse
    }

    fn capabilities(&self) -> Capabilities {
        message_capabilities().for_responses()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        classify_message(payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        let tag = message_tag();
        let error_tag = tag.clone();
        strategies.add(tag, move |adaptable: &Adaptable| {
            Ok(Signal::CommandResponse(CommandResponse::Message(
                MessageCommandResponse {
                    address: decode_address(adaptable)?,
                    value: adaptable.payload().value.clone(),
                    status: require_status(&error_tag, adaptable)?,
                    headers: adaptable.headers().clone(),
                },
            )))
        });
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let response = message_response(signal).ok_or_else(|| unknown_signal(signal))?;
        message_topic(&response.address, channel)
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let response = message_response(signal).ok_or_else(|| unknown_signal(signal))?;
        Ok(Payload::new(response.address.pointer())
            .with_optional_value(response.value.clone())
            .with_status(response.status))
    }
}
