//! Mappers for single and aggregated acknowledgements

use super::strategies::{
    decode_value, encode_value, require_status, type_tag, unknown_signal, unknown_topic_path,
    MappingStrategies,
};
use super::traits::{Capabilities, PayloadMapper};
use crate::adaptable::{Adaptable, JsonPointer, Payload};
use crate::error::ProtocolResult;
use crate::signal::{
    Acknowledgement, Acknowledgements, CommandResponse, EntityId, Signal, SignalFamily,
};
use crate::topic::{Channel, Criterion, Group, TopicPath};

const ACK_CLASSIFIER: &str = "acknowledgement";
const ACKS_CLASSIFIER: &str = "acknowledgements";

fn ack_capabilities() -> Capabilities {
    Capabilities::new()
        .groups([Group::Things])
        .channels([Channel::Twin, Channel::Live])
        .criteria([Criterion::Acks])
        .for_responses()
}

fn root_classifier(payload: &Payload, classifier: &str) -> Option<String> {
    payload.path.is_empty().then(|| classifier.to_string())
}

// ---------------------------------------------------------------------------

/// A single labelled acknowledgement: `<ns>/<name>/things/<channel>/acks/<label>`.
pub struct AcknowledgementMapper;

fn acknowledgement(signal: &Signal) -> Option<&Acknowledgement> {
    match signal {
        Signal::CommandResponse(CommandResponse::Acknowledgement(a)) => Some(a),
        _ => None,
    }
}

fn decode_acknowledgement(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let topic_path = adaptable.topic_path();
    let label = topic_path
        .subject()
        .ok_or_else(|| unknown_topic_path(adaptable))?;
    Ok(Signal::CommandResponse(CommandResponse::Acknowledgement(
        Acknowledgement {
            label: label.to_string(),
            entity_id: EntityId::from_topic(topic_path),
            status: require_status(type_tag, adaptable)?,
            value: adaptable.payload().value.clone(),
            headers: adaptable.headers().clone(),
        },
    )))
}

impl PayloadMapper for AcknowledgementMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::Acknowledgement
    }

    fn capabilities(&self) -> Capabilities {
        ack_capabilities().requires_subject()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        root_classifier(payload, ACK_CLASSIFIER)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        let tag = type_tag(Group::Things, Criterion::Acks, None, ACK_CLASSIFIER);
        let error_tag = tag.clone();
        strategies.add(tag, move |adaptable: &Adaptable| {
            decode_acknowledgement(&error_tag, adaptable)
        });
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let ack = acknowledgement(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(ack.entity_id.namespace(), ack.entity_id.name())
            .things()
            .channel(channel)
            .ack(ack.label.as_str())
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let ack = acknowledgement(signal).ok_or_else(|| unknown_signal(signal))?;
        Ok(Payload::new(JsonPointer::root())
            .with_optional_value(ack.value.clone())
            .with_status(ack.status))
    }
}

// ---------------------------------------------------------------------------

/// Aggregated acknowledgements: `<ns>/<name>/things/<channel>/acks`, the
/// value maps each label to `{ status, payload?, headers? }`.
pub struct AcknowledgementsMapper;

fn acknowledgements(signal: &Signal) -> Option<&Acknowledgements> {
    match signal {
        Signal::CommandResponse(CommandResponse::Acknowledgements(a)) => Some(a),
        _ => None,
    }
}

fn decode_acknowledgements(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    Ok(Signal::CommandResponse(CommandResponse::Acknowledgements(
        Acknowledgements {
            entity_id: EntityId::from_topic(adaptable.topic_path()),
            status: require_status(type_tag, adaptable)?,
            outcomes: decode_value(type_tag, adaptable.payload().value.as_ref())?,
            headers: adaptable.headers().clone(),
        },
    )))
}

impl PayloadMapper for AcknowledgementsMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::Acknowledgements
    }

    fn capabilities(&self) -> Capabilities {
        ack_capabilities()
    }

    fn classify(&self, _topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        root_classifier(payload, ACKS_CLASSIFIER)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        let tag = type_tag(Group::Things, Criterion::Acks, None, ACKS_CLASSIFIER);
        let error_tag = tag.clone();
        strategies.add(tag, move |adaptable: &Adaptable| {
            decode_acknowledgements(&error_tag, adaptable)
        });
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let acks = acknowledgements(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(acks.entity_id.namespace(), acks.entity_id.name())
            .things()
            .channel(channel)
            .acks()
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let acks = acknowledgements(signal).ok_or_else(|| unknown_signal(signal))?;
        let tag = type_tag(Group::Things, Criterion::Acks, None, ACKS_CLASSIFIER);
        Ok(Payload::new(JsonPointer::root())
            .with_value(encode_value(&tag, &acks.outcomes)?)
            .with_status(acks.status))
    }
}
