//! Shared fixtures for the integration suite
//!
//! `sample_signals` yields signals covering every signal family, with empty
//! headers so decoded signals compare after headers are cleared.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use serde_json::json;
use twin_protocol::adaptable::JsonPointer;
use twin_protocol::signal::{
    Acknowledgement, Acknowledgements, Announcement, Command, CommandResponse, ConnectionClosed,
    ConnectivityAnnouncement, ConnectivityAnnouncementKind, DemandRequest, EntityCommand,
    EntityCommandResponse, EntityId, ErrorResponse, Event, MessageAddress, MessageCommand,
    MessageCommandResponse, MessageDirection, PersistedEventsRange, PolicyAnnouncement,
    PolicyAnnouncementKind, PolicyResource, SearchCommand, SearchCommandKind, SearchItems,
    SearchSubscribe, Signal, SignalFamily, StreamedItem, StreamingCommandKind, StreamingEventKind,
    StreamingSubscriptionCommand, StreamingSubscriptionEvent, SubjectDeletion, SubscriptionEvent,
    SubscriptionEventKind, SubscriptionRef, ThingEvent, ThingResource,
};
use twin_protocol::topic::Action;
use twin_protocol::{Headers, ProtocolAdapter};

pub fn thing_id() -> EntityId {
    EntityId::new("org.eclipse.ditto", "myThing")
}

pub fn policy_id() -> EntityId {
    EntityId::new("org.eclipse.ditto", "myPolicy")
}

pub fn protocol() -> ProtocolAdapter {
    ProtocolAdapter::standard().expect("standard adapters are unambiguous")
}

/// Decoded signals carry injected headers; compare without them.
pub fn without_headers(signal: Signal) -> Signal {
    signal.with_headers(Headers::new())
}

/// At least one signal per family.
pub fn sample_signals() -> Vec<Signal> {
    let lamp = || "lamp".to_string();
    let at = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();

    vec![
        // thing commands
        Signal::Command(Command::ThingQuery(EntityCommand::new(
            Action::Retrieve,
            thing_id(),
            ThingResource::Thing,
        ))),
        Signal::Command(Command::ThingQuery(
            EntityCommand::new(Action::Retrieve, thing_id(), ThingResource::Attributes)
                .with_fields("location,color"),
        )),
        Signal::Command(Command::ThingModify(
            EntityCommand::new(
                Action::Modify,
                thing_id(),
                ThingResource::FeatureProperty(lamp(), JsonPointer::parse("/brightness")),
            )
            .with_value(json!(80)),
        )),
        Signal::Command(Command::ThingModify(
            EntityCommand::new(Action::Create, thing_id(), ThingResource::Thing)
                .with_value(json!({ "attributes": { "location": "kitchen" } })),
        )),
        Signal::Command(Command::ThingModify(EntityCommand::new(
            Action::Delete,
            thing_id(),
            ThingResource::Feature(lamp()),
        ))),
        // thing responses
        Signal::CommandResponse(CommandResponse::ThingQuery(
            EntityCommandResponse::new(Action::Retrieve, thing_id(), ThingResource::Attributes, 200)
                .with_value(json!({ "location": "kitchen" })),
        )),
        Signal::CommandResponse(CommandResponse::ThingModify(EntityCommandResponse::new(
            Action::Merge,
            thing_id(),
            ThingResource::FeatureDesiredProperties(lamp()),
            204,
        ))),
        Signal::CommandResponse(CommandResponse::ThingError(ErrorResponse::new(
            thing_id(),
            404,
            "things:thing.notfound",
            "The Thing was not found.",
        ))),
        Signal::CommandResponse(CommandResponse::ThingError(ErrorResponse::new(
            EntityId::wildcard(),
            400,
            "things:search.invalid",
            "Invalid filter.",
        ))),
        // thing events
        Signal::Event(Event::Thing(
            ThingEvent::new(
                Action::Modified,
                thing_id(),
                ThingResource::Attribute(JsonPointer::parse("/location")),
                42,
            )
            .with_value(json!("hallway"))
            .with_timestamp(at),
        )),
        Signal::Event(Event::Thing(ThingEvent::new(
            Action::Deleted,
            thing_id(),
            ThingResource::Feature(lamp()),
            43,
        ))),
        // search
        Signal::Command(Command::ThingSearch(SearchCommand::new(
            SearchCommandKind::Subscribe(SearchSubscribe {
                filter: Some("eq(attributes/location,\"kitchen\")".to_string()),
                namespaces: vec!["org.eclipse.ditto".to_string()],
                fields: Some("thingId".to_string()),
                ..Default::default()
            }),
        ))),
        Signal::Command(Command::ThingSearch(SearchCommand::new(
            SearchCommandKind::Request(DemandRequest {
                subscription_id: "sub-1".to_string(),
                demand: 25,
            }),
        ))),
        Signal::Event(Event::SearchSubscription(SubscriptionEvent::new(
            SubscriptionEventKind::Next(SearchItems {
                subscription_id: "sub-1".to_string(),
                items: vec![json!({ "thingId": "org.eclipse.ditto:myThing" })],
            }),
        ))),
        Signal::Event(Event::SearchSubscription(SubscriptionEvent::new(
            SubscriptionEventKind::Complete(SubscriptionRef {
                subscription_id: "sub-1".to_string(),
            }),
        ))),
        // history streaming
        Signal::Command(Command::StreamingSubscription(StreamingSubscriptionCommand::new(
            thing_id(),
            JsonPointer::parse("/features/lamp"),
            StreamingCommandKind::SubscribeForPersistedEvents(PersistedEventsRange {
                from_historical_revision: Some(1),
                to_historical_revision: Some(42),
                ..Default::default()
            }),
        ))),
        Signal::Event(Event::StreamingSubscription(StreamingSubscriptionEvent::new(
            thing_id(),
            JsonPointer::root(),
            StreamingEventKind::Next(StreamedItem {
                subscription_id: "stream-1".to_string(),
                item: json!({ "revision": 7 }),
            }),
        ))),
        // messages
        Signal::Command(Command::Message(
            MessageCommand::new(MessageAddress::new(thing_id(), MessageDirection::Inbox, "switch"))
                .with_value(json!({ "on": true })),
        )),
        Signal::CommandResponse(CommandResponse::Message(
            MessageCommandResponse::new(
                MessageAddress::new(thing_id(), MessageDirection::Outbox, "status/report")
                    .for_feature(lamp()),
                200,
            )
            .with_value(json!("ok")),
        )),
        // acknowledgements
        Signal::CommandResponse(CommandResponse::Acknowledgement(
            Acknowledgement::new("custom-ack", thing_id(), 200).with_value(json!({ "done": true })),
        )),
        Signal::CommandResponse(CommandResponse::Acknowledgements(
            Acknowledgements::new(thing_id(), 200)
                .with_outcome("twin-persisted", 204, None)
                .with_outcome("custom-ack", 200, Some(json!("ok"))),
        )),
        // policies
        Signal::Command(Command::PolicyQuery(EntityCommand::new(
            Action::Retrieve,
            policy_id(),
            PolicyResource::PolicyEntry("owner".to_string()),
        ))),
        Signal::Command(Command::PolicyModify(
            EntityCommand::new(
                Action::Modify,
                policy_id(),
                PolicyResource::Subject("owner".to_string(), "user:alice".to_string()),
            )
            .with_value(json!({ "type": "generated" })),
        )),
        Signal::CommandResponse(CommandResponse::PolicyQuery(
            EntityCommandResponse::new(
                Action::Retrieve,
                policy_id(),
                PolicyResource::Resources("owner".to_string()),
                200,
            )
            .with_value(json!({ "thing:/": { "grant": ["READ"], "revoke": [] } })),
        )),
        Signal::CommandResponse(CommandResponse::PolicyModify(EntityCommandResponse::new(
            Action::Delete,
            policy_id(),
            PolicyResource::PolicyEntry("guest".to_string()),
            204,
        ))),
        Signal::CommandResponse(CommandResponse::PolicyError(ErrorResponse::new(
            policy_id(),
            403,
            "policies:policy.notmodifiable",
            "Insufficient permissions.",
        ))),
        // announcements
        Signal::Announcement(Announcement::Policy(PolicyAnnouncement::new(
            policy_id(),
            PolicyAnnouncementKind::SubjectDeletion(SubjectDeletion {
                delete_at: at,
                subject_ids: vec!["user:alice".to_string()],
            }),
        ))),
        Signal::Announcement(Announcement::Connectivity(ConnectivityAnnouncement::new(
            "mqtt-broker",
            ConnectivityAnnouncementKind::Closed(ConnectionClosed { closed_at: at }),
        ))),
    ]
}

/// Families present in `sample_signals`
pub fn sampled_families() -> Vec<SignalFamily> {
    let mut families: Vec<SignalFamily> = sample_signals().iter().map(Signal::family).collect();
    families.sort();
    families.dedup();
    families
}
