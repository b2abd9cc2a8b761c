//! Resolver correctness and round-trip laws over every signal family
//!
//! For every sample signal `s` and every channel `c` its adapter declares:
//! - the envelope produced for `(s, c)` resolves back to the same adapter
//! - `resolve_by_signal(s, c)` picks that adapter
//! - decoding the envelope yields `s` again, up to injected headers
//!
//! Run with: `cargo test --test resolution`

mod common;

use common::{protocol, sample_signals, sampled_families, thing_id, without_headers};
use twin_protocol::adaptable::keys;
use twin_protocol::signal::{Command, MessageAddress, MessageCommand, MessageDirection};
use twin_protocol::topic::{Action, Criterion, Group};
use twin_protocol::{
    Adaptable, Channel, Headers, Payload, ProtocolError, Signal, SignalFamily, TopicPath,
};

// ================================================================
// Coverage
// ================================================================

// === Scenario: Fixtures cover every family the standard registry handles ===
#[test]
fn fixtures_cover_every_family() {
    assert_eq!(sampled_families(), SignalFamily::ALL.to_vec());
    let protocol = protocol();
    for family in SignalFamily::ALL {
        assert!(
            protocol.resolver().adapter_for(family).is_some(),
            "no adapter for {family}"
        );
    }
}

// ================================================================
// Round-trip laws
// ================================================================

// === Scenario: Every signal survives a round trip on every declared channel ===
#[test]
fn round_trip_on_every_declared_channel() {
    let protocol = protocol();
    for signal in sample_signals() {
        let family = signal.family();
        let adapter = protocol.resolver().adapter_for(family).unwrap();
        for &channel in &adapter.capabilities().channels {
            let by_signal = protocol.resolver().resolve_by_signal(&signal, channel).unwrap();
            assert_eq!(by_signal.id(), adapter.id());

            let adaptable = protocol.to_adaptable(&signal, channel).unwrap();
            let by_envelope = protocol.resolve(&adaptable).unwrap();
            assert_eq!(
                by_envelope.id(),
                adapter.id(),
                "{} resolved to {}",
                adaptable.topic_path(),
                by_envelope.id()
            );

            let decoded = protocol.from_adaptable(adaptable).unwrap();
            assert_eq!(
                without_headers(decoded),
                without_headers(signal.clone()),
                "{family} on {channel}"
            );
        }
    }
}

// === Scenario: Round trips also hold through the JSON wire form ===
#[test]
fn round_trip_through_json() {
    let protocol = protocol();
    for signal in sample_signals() {
        let adapter = protocol.resolver().adapter_for(signal.family()).unwrap();
        for &channel in &adapter.capabilities().channels {
            let json = protocol.to_json_string(&signal, channel).unwrap();
            let decoded = protocol.from_json_str(&json).unwrap();
            assert_eq!(without_headers(decoded), without_headers(signal.clone()), "{json}");
        }
    }
}

// === Scenario: Decoded signals carry the headers implied by their topic ===
#[test]
fn decoded_headers_follow_the_topic() {
    let protocol = protocol();
    for signal in sample_signals() {
        let adapter = protocol.resolver().adapter_for(signal.family()).unwrap();
        for &channel in &adapter.capabilities().channels {
            let adaptable = protocol.to_adaptable(&signal, channel).unwrap();
            let topic_path = adaptable.topic_path().clone();
            let decoded = protocol.from_adaptable(adaptable).unwrap();
            let headers = decoded.headers();

            assert_eq!(
                headers.get(keys::CHANNEL) == Some("live"),
                channel == Channel::Live,
                "{topic_path}"
            );
            if topic_path.is_wildcard_topic() {
                assert!(!headers.contains_key(keys::ENTITY_ID), "{topic_path}");
            } else {
                let expected = format!(
                    "{}:{}:{}",
                    topic_path.group().entity_type(),
                    topic_path.namespace(),
                    topic_path.entity_name()
                );
                assert_eq!(headers.get(keys::ENTITY_ID), Some(expected.as_str()));
            }
        }
    }
}

// ================================================================
// Concrete scenario
// ================================================================

// === Scenario: Retrieve of a whole thing on the twin channel ===
#[test]
fn retrieve_thing_on_twin() {
    let topic = "org.eclipse.ditto/myThing/things/twin/commands/retrieve";
    let topic_path = TopicPath::parse(topic).unwrap();
    assert_eq!(topic_path.namespace(), "org.eclipse.ditto");
    assert_eq!(topic_path.entity_name(), "myThing");
    assert_eq!(topic_path.group(), Group::Things);
    assert_eq!(topic_path.channel(), Channel::Twin);
    assert_eq!(topic_path.criterion(), Criterion::Commands);
    assert_eq!(topic_path.action(), Some(Action::Retrieve));

    let protocol = protocol();
    let adaptable = Adaptable::new(topic_path, Payload::new("/"), Headers::new());
    assert_eq!(protocol.resolve(&adaptable).unwrap().id(), "thing-query-command");

    let signal = protocol.from_adaptable(adaptable).unwrap();
    let headers = signal.headers();
    assert_eq!(headers.get(keys::ENTITY_ID), Some("thing:org.eclipse.ditto:myThing"));
    assert!(!headers.contains_key(keys::CHANNEL));
}

// ================================================================
// Unknown input
// ================================================================

// === Scenario: A criterion no adapter pairs with the group is unknown ===
#[test]
fn unmatched_topic_is_unknown_topic_path() {
    let protocol = protocol();
    // policies never stream history
    let adaptable = Adaptable::new(
        TopicPath::builder("org.eclipse.ditto", "myPolicy")
            .policies()
            .streaming(twin_protocol::topic::StreamingAction::Next)
            .unwrap(),
        Payload::new("/"),
        Headers::new(),
    );
    let err = protocol.from_adaptable(adaptable).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::UnknownTopicPath {
            topic_path: "org.eclipse.ditto/myPolicy/policies/streaming/next".to_string(),
            path: "/".to_string(),
        }
    );
}

// === Scenario: A payload path the adapter does not know is unknown ===
#[test]
fn unknown_payload_path_is_unknown_topic_path() {
    let protocol = protocol();
    let adaptable = Adaptable::new(
        TopicPath::parse("org.eclipse.ditto/myThing/things/twin/commands/retrieve").unwrap(),
        Payload::new("/nonsense/path"),
        Headers::new(),
    );
    let err = protocol.from_adaptable(adaptable).unwrap_err();
    assert!(matches!(err, ProtocolError::UnknownTopicPath { ref path, .. } if path == "/nonsense/path"));
}

// === Scenario: A message on the twin channel is an unknown channel ===
#[test]
fn twin_message_is_unknown_channel() {
    let protocol = protocol();
    let signal = Signal::Command(Command::Message(MessageCommand::new(MessageAddress::new(
        thing_id(),
        MessageDirection::Inbox,
        "switch",
    ))));
    let err = protocol.to_adaptable(&signal, Channel::Twin).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::UnknownChannel {
            channel: Channel::Twin,
            signal_type: "message-command".to_string(),
        }
    );
}

// === Scenario: A malformed topic string is a parse error ===
#[test]
fn malformed_topic_is_parse_error() {
    let protocol = protocol();
    let err = protocol
        .from_json_str(r#"{"topic":"org.eclipse.ditto/myThing/things/sideways/commands/retrieve","headers":{},"path":"/"}"#)
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Parse { .. }), "{err}");
}
