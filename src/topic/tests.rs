//! Parse/render tests for topic paths

use super::*;
use crate::error::ProtocolError;

fn assert_parse_error(input: &str) {
    match TopicPath::parse(input) {
        Err(ProtocolError::Parse { input: got, .. }) => assert_eq!(got, input),
        other => panic!("expected parse error for '{}', got {:?}", input, other),
    }
}

#[test]
fn parses_twin_retrieve_command() {
    let path = TopicPath::parse("org.eclipse.ditto/myThing/things/twin/commands/retrieve").unwrap();
    assert_eq!(path.namespace(), "org.eclipse.ditto");
    assert_eq!(path.entity_name(), "myThing");
    assert_eq!(path.group(), Group::Things);
    assert_eq!(path.channel(), Channel::Twin);
    assert_eq!(path.criterion(), Criterion::Commands);
    assert_eq!(path.action(), Some(Action::Retrieve));
    assert_eq!(path.search_action(), None);
    assert_eq!(path.streaming_action(), None);
    assert_eq!(path.subject(), None);
    assert!(!path.is_wildcard_topic());
}

#[test]
fn policies_omit_channel() {
    let path = TopicPath::parse("org.eclipse.ditto/myPolicy/policies/commands/modify").unwrap();
    assert_eq!(path.channel(), Channel::None);
    assert_eq!(path.render(), "org.eclipse.ditto/myPolicy/policies/commands/modify");

    assert_parse_error("org.eclipse.ditto/myPolicy/policies/twin/commands/modify");
    assert_parse_error("org.eclipse.ditto/myThing/things/commands/modify");
}

#[test]
fn message_subject_keeps_inner_slashes() {
    let path = TopicPath::parse("ns/thing/things/live/messages/ask/for/help").unwrap();
    assert_eq!(path.criterion(), Criterion::Messages);
    assert_eq!(path.subject(), Some("ask/for/help"));
    assert_eq!(path.render(), "ns/thing/things/live/messages/ask/for/help");
}

#[test]
fn acks_subject_is_optional() {
    let aggregated = TopicPath::parse("ns/thing/things/twin/acks").unwrap();
    assert_eq!(aggregated.subject(), None);

    let single = TopicPath::parse("ns/thing/things/twin/acks/twin-persisted").unwrap();
    assert_eq!(single.subject(), Some("twin-persisted"));
}

#[test]
fn search_and_streaming_fill_their_own_slot() {
    let search = TopicPath::parse("_/_/things/twin/search/subscribe").unwrap();
    assert_eq!(search.search_action(), Some(SearchAction::Subscribe));
    assert_eq!(search.action(), None);
    assert!(search.is_wildcard_topic());

    let streaming =
        TopicPath::parse("ns/thing/things/twin/streaming/subscribeForPersistedEvents").unwrap();
    assert_eq!(
        streaming.streaming_action(),
        Some(StreamingAction::SubscribeForPersistedEvents)
    );
    assert_eq!(streaming.action_token(), Some("subscribeForPersistedEvents"));
}

#[test]
fn rejects_malformed_grammar() {
    // too few segments
    assert_parse_error("ns/thing/things");
    // unknown group
    assert_parse_error("ns/thing/devices/twin/commands/modify");
    // unknown channel
    assert_parse_error("ns/thing/things/shadow/commands/modify");
    // unknown criterion
    assert_parse_error("ns/thing/things/twin/orders/modify");
    // unknown action
    assert_parse_error("ns/thing/things/twin/commands/upsert");
    // commands without action
    assert_parse_error("ns/thing/things/twin/commands");
    // search action is not a command action
    assert_parse_error("ns/thing/things/twin/commands/subscribe");
    // errors take no further segment
    assert_parse_error("ns/thing/things/twin/errors/extra");
    // trailing segment after an action
    assert_parse_error("ns/thing/things/twin/commands/modify/extra");
    // messages require a subject
    assert_parse_error("ns/thing/things/live/messages");
    assert_parse_error("ns/thing/things/live/messages/");
    // empty entity name
    assert_parse_error("ns//things/twin/commands/modify");
    // connections have no channel either
    assert_parse_error("_/conn/connections/live/announcements/opened");
}

#[test]
fn wildcard_detection_uses_either_part() {
    let ns_only = TopicPath::parse("_/thing/things/twin/errors").unwrap();
    let name_only = TopicPath::parse("ns/_/things/twin/errors").unwrap();
    let neither = TopicPath::parse("ns/thing/things/twin/errors").unwrap();
    assert!(ns_only.is_wildcard_topic());
    assert!(name_only.is_wildcard_topic());
    assert!(!neither.is_wildcard_topic());
}

#[test]
fn builder_output_round_trips() {
    let paths = vec![
        TopicPath::builder("ns", "t").things().twin().commands(Action::Modify).unwrap(),
        TopicPath::builder("ns", "t").things().live().events(Action::Merged).unwrap(),
        TopicPath::builder(WILDCARD, WILDCARD).things().search(SearchAction::Next).unwrap(),
        TopicPath::builder("ns", "t").things().streaming(StreamingAction::Cancel).unwrap(),
        TopicPath::builder("ns", "t").things().live().messages("a/b").unwrap(),
        TopicPath::builder("ns", "t").things().errors().unwrap(),
        TopicPath::builder("ns", "t").things().acks().unwrap(),
        TopicPath::builder("ns", "t").things().ack("custom").unwrap(),
        TopicPath::builder("ns", "p").policies().commands(Action::Create).unwrap(),
        TopicPath::builder("ns", "p").policies().announcements("subjectDeletion").unwrap(),
        TopicPath::builder(WILDCARD, "c").connections().announcements("opened").unwrap(),
    ];
    for path in paths {
        let rendered = path.render();
        assert_eq!(TopicPath::parse(&rendered).unwrap(), path, "{}", rendered);
    }
}

#[test]
fn builder_rejects_invalid_combinations() {
    assert!(TopicPath::builder("ns", "t").things().live().messages("").is_err());
    assert!(TopicPath::builder("ns", "p")
        .policies()
        .channel(Channel::Live)
        .commands(Action::Retrieve)
        .is_err());
    assert!(TopicPath::builder("ns/x", "t").things().errors().is_err());
}

#[test]
fn serde_uses_string_form() {
    let path = TopicPath::parse("ns/thing/things/twin/events/created").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"ns/thing/things/twin/events/created\"");

    let back: TopicPath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);

    assert!(serde_json::from_str::<TopicPath>("\"ns/thing/things\"").is_err());
}
