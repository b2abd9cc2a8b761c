//! Mappers for policy and connectivity announcements
//!
//! The announcement name is the topic subject and doubles as the classifier.

use super::strategies::{
    decode_value, encode_value, type_tag, type_tag_of, unknown_signal, unknown_topic_path,
    MappingStrategies,
};
use super::traits::{Capabilities, PayloadMapper};
use crate::adaptable::{Adaptable, JsonPointer, Payload};
use crate::error::ProtocolResult;
use crate::signal::{
    Announcement, ConnectivityAnnouncement, ConnectivityAnnouncementKind, EntityId,
    PolicyAnnouncement, PolicyAnnouncementKind, Signal, SignalFamily,
};
use crate::topic::{Channel, Criterion, Group, TopicPath, WILDCARD};

fn subject_classifier(topic_path: &TopicPath, payload: &Payload) -> Option<String> {
    if !payload.path.is_empty() {
        return None;
    }
    topic_path.subject().map(str::to_string)
}

fn announcement_capabilities(group: Group) -> Capabilities {
    Capabilities::new()
        .groups([group])
        .channels([Channel::None])
        .criteria([Criterion::Announcements])
        .requires_subject()
}

// ---------------------------------------------------------------------------

pub struct PolicyAnnouncementMapper;

const POLICY_ANNOUNCEMENTS: [&str; 1] = ["subjectDeletion"];

fn policy_announcement(signal: &Signal) -> Option<&PolicyAnnouncement> {
    match signal {
        Signal::Announcement(Announcement::Policy(a)) => Some(a),
        _ => None,
    }
}

fn decode_policy_announcement(type_tag: &str, adaptable: &Adaptable) -> ProtocolResult<Signal> {
    let topic_path = adaptable.topic_path();
    let value = adaptable.payload().value.as_ref();
    let kind = match topic_path.subject() {
        Some("subjectDeletion") => {
            PolicyAnnouncementKind::SubjectDeletion(decode_value(type_tag, value)?)
        }
        _ => return Err(unknown_topic_path(adaptable)),
    };
    Ok(Signal::Announcement(Announcement::Policy(PolicyAnnouncement {
        policy_id: EntityId::from_topic(topic_path),
        kind,
        headers: adaptable.headers().clone(),
    })))
}

impl PayloadMapper for PolicyAnnouncementMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::PolicyAnnouncement
    }

    fn capabilities(&self) -> Capabilities {
        announcement_capabilities(Group::Policies)
    }

    fn classify(&self, topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        subject_classifier(topic_path, payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        for name in POLICY_ANNOUNCEMENTS {
            let tag = type_tag(Group::Policies, Criterion::Announcements, None, name);
            let error_tag = tag.clone();
            strategies.add(tag, move |adaptable: &Adaptable| {
                decode_policy_announcement(&error_tag, adaptable)
            });
        }
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let announcement = policy_announcement(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(announcement.policy_id.namespace(), announcement.policy_id.name())
            .policies()
            .channel(channel)
            .announcements(announcement.kind.name())
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let announcement = policy_announcement(signal).ok_or_else(|| unknown_signal(signal))?;
        let topic_path = self.to_topic_path(signal, Channel::None)?;
        let tag = type_tag_of(&topic_path, announcement.kind.name());
        let value = match &announcement.kind {
            PolicyAnnouncementKind::SubjectDeletion(body) => encode_value(&tag, body)?,
        };
        Ok(Payload::new(JsonPointer::root()).with_value(value))
    }
}

// ---------------------------------------------------------------------------

/// Connection opened/closed. Connections have no namespace, so these
/// topics are always wildcard topics.
pub struct ConnectivityAnnouncementMapper;

const CONNECTIVITY_ANNOUNCEMENTS: [&str; 2] = ["opened", "closed"];

fn connectivity_announcement(signal: &Signal) -> Option<&ConnectivityAnnouncement> {
    match signal {
        Signal::Announcement(Announcement::Connectivity(a)) => Some(a),
        _ => None,
    }
}

fn decode_connectivity_announcement(
    type_tag: &str,
    adaptable: &Adaptable,
) -> ProtocolResult<Signal> {
    let topic_path = adaptable.topic_path();
    let value = adaptable.payload().value.as_ref();
    let kind = match topic_path.subject() {
        Some("opened") => ConnectivityAnnouncementKind::Opened(decode_value(type_tag, value)?),
        Some("closed") => ConnectivityAnnouncementKind::Closed(decode_value(type_tag, value)?),
        _ => return Err(unknown_topic_path(adaptable)),
    };
    Ok(Signal::Announcement(Announcement::Connectivity(
        ConnectivityAnnouncement {
            connection_id: topic_path.entity_name().to_string(),
            kind,
            headers: adaptable.headers().clone(),
        },
    )))
}

impl PayloadMapper for ConnectivityAnnouncementMapper {
    fn family(&self) -> SignalFamily {
        SignalFamily::ConnectivityAnnouncement
    }

    fn capabilities(&self) -> Capabilities {
        announcement_capabilities(Group::Connections).wildcard_topics()
    }

    fn classify(&self, topic_path: &TopicPath, payload: &Payload) -> Option<String> {
        subject_classifier(topic_path, payload)
    }

    fn mapping_strategies(&self) -> MappingStrategies {
        let mut strategies = MappingStrategies::new();
        for name in CONNECTIVITY_ANNOUNCEMENTS {
            let tag = type_tag(Group::Connections, Criterion::Announcements, None, name);
            let error_tag = tag.clone();
            strategies.add(tag, move |adaptable: &Adaptable| {
                decode_connectivity_announcement(&error_tag, adaptable)
            });
        }
        strategies
    }

    fn to_topic_path(&self, signal: &Signal, channel: Channel) -> ProtocolResult<TopicPath> {
        let announcement =
            connectivity_announcement(signal).ok_or_else(|| unknown_signal(signal))?;
        TopicPath::builder(WILDCARD, announcement.connection_id.as_str())
            .connections()
            .channel(channel)
            .announcements(announcement.kind.name())
    }

    fn to_payload(&self, signal: &Signal) -> ProtocolResult<Payload> {
        let announcement =
            connectivity_announcement(signal).ok_or_else(|| unknown_signal(signal))?;
        let tag = type_tag(
            Group::Connections,
            Criterion::Announcements,
            None,
            announcement.kind.name(),
        );
        let value = match &announcement.kind {
            ConnectivityAnnouncementKind::Opened(body) => encode_value(&tag, body)?,
            ConnectivityAnnouncementKind::Closed(body) => encode_value(&tag, body)?,
        };
        Ok(Payload::new(JsonPointer::root()).with_value(value))
    }
}
