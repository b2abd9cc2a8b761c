//! Resolver scenarios over the standard adapter set and hand-made stubs

use super::*;
use crate::adaptable::{Headers, Payload};
use crate::adapter::{AdapterRegistry, Capabilities, EntityCommandMapper, SignalAdapter};
use crate::headers::DefinitionHeaderTranslator;
use crate::signal::{
    Command, CommandResponse, EntityCommand, EntityId, ErrorResponse, SearchCommand,
    SearchCommandKind, SearchSubscribe, ThingResource,
};
use crate::topic::{Action, Criterion, Group, TopicPath};
use serde_json::json;

fn standard() -> AdapterResolver {
    let translator = Arc::new(DefinitionHeaderTranslator::standard());
    AdapterResolver::from_registry(AdapterRegistry::standard(translator)).unwrap()
}

fn adaptable(topic: &str, payload: Payload) -> Adaptable {
    Adaptable::new(TopicPath::parse(topic).unwrap(), payload, Headers::new())
}

fn resolved_id(resolver: &AdapterResolver, topic: &str, payload: Payload) -> String {
    resolver
        .resolve_by_envelope(&adaptable(topic, payload))
        .map(|a| a.id().to_string())
        .unwrap_or_else(|e| panic!("{topic}: {e}"))
}

/// Adapter that only declares capabilities; translation is never reached.
struct StubAdapter {
    id: &'static str,
    family: SignalFamily,
    capabilities: Capabilities,
}

impl StubAdapter {
    fn new(id: &'static str, family: SignalFamily, capabilities: Capabilities) -> Arc<dyn Adapter> {
        Arc::new(Self {
            id,
            family,
            capabilities,
        })
    }
}

impl Adapter for StubAdapter {
    fn id(&self) -> &str {
        self.id
    }

    fn family(&self) -> SignalFamily {
        self.family
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn from_adaptable(&self, adaptable: Adaptable) -> ProtocolResult<Signal> {
        Err(ProtocolError::UnknownTopicPath {
            topic_path: adaptable.topic_path().render(),
            path: adaptable.payload().path.render(),
        })
    }

    fn to_adaptable(&self, signal: &Signal, _channel: Channel) -> ProtocolResult<Adaptable> {
        Err(ProtocolError::UnknownSignal {
            signal_name: signal.family().name().to_string(),
        })
    }

    fn to_topic_path(&self, signal: &Signal, _channel: Channel) -> ProtocolResult<TopicPath> {
        Err(ProtocolError::UnknownSignal {
            signal_name: signal.family().name().to_string(),
        })
    }

    fn type_tag(&self, _adaptable: &Adaptable) -> Option<String> {
        None
    }
}

fn thing_commands(actions: impl IntoIterator<Item = Action>) -> Capabilities {
    Capabilities::new()
        .groups([Group::Things])
        .channels([Channel::Twin])
        .criteria([Criterion::Commands])
        .actions(actions)
}

// ================================================================
// Envelope resolution
// ================================================================

// === Scenario: Each topic shape reaches the adapter of its family ===
#[test]
fn envelopes_resolve_to_their_family() {
    let resolver = standard();
    let cases = [
        ("org.acme/car/things/twin/commands/retrieve", Payload::new("/"), "thing-query-command"),
        (
            "org.acme/car/things/live/commands/modify",
            Payload::new("/attributes/color").with_value(json!("red")),
            "thing-modify-command",
        ),
        (
            "org.acme/car/things/twin/commands/retrieve",
            Payload::new("/").with_status(200),
            "thing-query-command-response",
        ),
        (
            "org.acme/car/things/twin/commands/delete",
            Payload::new("/features/lamp").with_status(204),
            "thing-modify-command-response",
        ),
        (
            "org.acme/car/things/twin/events/modified",
            Payload::new("/attributes/color").with_revision(3),
            "thing-event",
        ),
        ("org.acme/car/things/twin/errors", Payload::new("/").with_status(404), "thing-error-response"),
        ("_/_/things/twin/errors", Payload::new("/").with_status(400), "thing-error-response"),
        ("_/_/things/twin/search/subscribe", Payload::new("/"), "thing-search-command"),
        ("_/_/things/twin/search/next", Payload::new("/"), "search-subscription-event"),
        (
            "org.acme/car/things/twin/streaming/subscribeForPersistedEvents",
            Payload::new("/"),
            "streaming-subscription-command",
        ),
        (
            "org.acme/car/things/twin/streaming/next",
            Payload::new("/"),
            "streaming-subscription-event",
        ),
        (
            "org.acme/car/things/live/messages/honk",
            Payload::new("/inbox/messages/honk"),
            "message-command",
        ),
        (
            "org.acme/car/things/live/messages/honk",
            Payload::new("/inbox/messages/honk").with_status(200),
            "message-command-response",
        ),
        (
            "org.acme/car/things/twin/acks/custom",
            Payload::new("/").with_status(200),
            "acknowledgement",
        ),
        (
            "org.acme/car/things/twin/acks",
            Payload::new("/").with_status(200),
            "acknowledgements",
        ),
        ("org.acme/p1/policies/commands/retrieve", Payload::new("/"), "policy-query-command"),
        ("org.acme/p1/policies/commands/create", Payload::new("/"), "policy-modify-command"),
        (
            "org.acme/p1/policies/commands/retrieve",
            Payload::new("/").with_status(200),
            "policy-query-command-response",
        ),
        (
            "org.acme/p1/policies/commands/modify",
            Payload::new("/").with_status(204),
            "policy-modify-command-response",
        ),
        ("org.acme/p1/policies/errors", Payload::new("/").with_status(403), "policy-error-response"),
        (
            "org.acme/p1/policies/announcements/subjectDeletion",
            Payload::new("/"),
            "policy-announcement",
        ),
        (
            "_/conn-1/connections/announcements/opened",
            Payload::new("/"),
            "connectivity-announcement",
        ),
    ];
    for (topic, payload, expected) in cases {
        assert_eq!(resolved_id(&resolver, topic, payload), expected, "{topic}");
    }
}

// === Scenario: Topic combinations no adapter declares are unknown ===
#[test]
fn undeclared_combinations_are_unknown_topic_paths() {
    let resolver = standard();
    let misses = [
        // events never carry query actions
        ("org.acme/car/things/twin/events/retrieve", Payload::new("/")),
        // messages are live only
        ("org.acme/car/things/twin/messages/honk", Payload::new("/inbox/messages/honk")),
        // entity commands never use wildcard topics
        ("_/_/things/twin/commands/retrieve", Payload::new("/")),
        // errors always carry a status
        ("org.acme/car/things/twin/errors", Payload::new("/")),
        // search is twin only
        ("_/_/things/live/search/subscribe", Payload::new("/")),
        // policy errors never use wildcard topics
        ("_/_/policies/errors", Payload::new("/").with_status(400)),
        // history streaming is per thing
        ("_/_/things/twin/streaming/next", Payload::new("/")),
    ];
    for (topic, payload) in misses {
        let err = resolver
            .resolve_by_envelope(&adaptable(topic, payload))
            .err()
            .unwrap_or_else(|| panic!("{topic} resolved"));
        match err {
            ProtocolError::UnknownTopicPath { topic_path, .. } => assert_eq!(topic_path, topic),
            other => panic!("{topic}: unexpected {other}"),
        }
    }
}

// === Scenario: Payload status alone separates commands from responses ===
#[test]
fn status_separates_commands_from_responses() {
    let resolver = standard();
    let topic = "org.acme/car/things/twin/commands/modify";
    let body = Payload::new("/attributes").with_value(json!({}));
    assert_eq!(resolved_id(&resolver, topic, body.clone()), "thing-modify-command");
    assert_eq!(
        resolved_id(&resolver, topic, body.with_status(204)),
        "thing-modify-command-response"
    );
}

// ================================================================
// Signal resolution
// ================================================================

// === Scenario: Outbound signals resolve by family and channel ===
#[test]
fn signals_resolve_by_family() {
    let resolver = standard();
    let command = Signal::Command(Command::ThingQuery(EntityCommand::new(
        Action::Retrieve,
        EntityId::new("org.acme", "car"),
        ThingResource::Thing,
    )));
    assert_eq!(
        resolver.resolve_by_signal(&command, Channel::Live).unwrap().id(),
        "thing-query-command"
    );

    let error = Signal::CommandResponse(CommandResponse::ThingError(ErrorResponse::new(
        EntityId::wildcard(),
        400,
        "things:bad",
        "bad request",
    )));
    assert_eq!(
        resolver.resolve_by_signal(&error, Channel::Twin).unwrap().id(),
        "thing-error-response"
    );
}

// === Scenario: A channel the family does not support is rejected ===
#[test]
fn unsupported_channel_is_unknown_channel() {
    let resolver = standard();
    let search = Signal::Command(Command::ThingSearch(SearchCommand::new(
        SearchCommandKind::Subscribe(SearchSubscribe::default()),
    )));
    let err = resolver.resolve_by_signal(&search, Channel::Live).err().unwrap();
    match err {
        ProtocolError::UnknownChannel {
            channel,
            signal_type,
        } => {
            assert_eq!(channel, Channel::Live);
            assert_eq!(signal_type, "thing-search-command");
        }
        other => panic!("unexpected {other}"),
    }
}

// === Scenario: A family without an adapter is an unknown signal ===
#[test]
fn unregistered_family_is_unknown_signal() {
    let translator = Arc::new(DefinitionHeaderTranslator::standard());
    let only_queries: Arc<dyn Adapter> =
        Arc::new(SignalAdapter::new(EntityCommandMapper::thing_query(), translator));
    let resolver = AdapterResolver::new(vec![only_queries]).unwrap();

    let modify = Signal::Command(Command::ThingModify(
        EntityCommand::new(
            Action::Delete,
            EntityId::new("org.acme", "car"),
            ThingResource::Attributes,
        ),
    ));
    let err = resolver.resolve_by_signal(&modify, Channel::Twin).err().unwrap();
    assert!(matches!(
        err,
        ProtocolError::UnknownSignal { ref signal_name } if signal_name == "thing-modify-command"
    ));
    assert!(resolver.adapter_for(SignalFamily::ThingQueryCommand).is_some());
    assert!(resolver.adapter_for(SignalFamily::ThingModifyCommand).is_none());
}

// ================================================================
// Construction failures
// ================================================================

// === Scenario: Two adapters declaring the same family are rejected ===
#[test]
fn duplicate_family_is_rejected() {
    let first = StubAdapter::new("a", SignalFamily::ThingQueryCommand, thing_commands([Action::Retrieve]));
    let second = StubAdapter::new("b", SignalFamily::ThingQueryCommand, thing_commands([Action::Modify]));
    let err = AdapterResolver::new(vec![first, second]).err().unwrap();
    assert_eq!(
        err,
        ResolverError::DuplicateFamily {
            family: "thing-query-command".into(),
            first: "a".into(),
            second: "b".into(),
        }
    );
}

// === Scenario: Two adapters sharing an id are rejected ===
#[test]
fn duplicate_id_is_rejected() {
    let errors = |group: Group| {
        Capabilities::new()
            .groups([group])
            .channels([Channel::None])
            .criteria([Criterion::Errors])
            .for_responses()
    };
    let things = StubAdapter::new("errors", SignalFamily::ThingErrorResponse, errors(Group::Things));
    let policies = StubAdapter::new("errors", SignalFamily::PolicyErrorResponse, errors(Group::Policies));
    let registry = AdapterRegistry::new(vec![things, policies]);
    assert_eq!(registry.len(), 2);
    assert_eq!(
        AdapterResolver::from_registry(registry).err(),
        Some(ResolverError::DuplicateId {
            id: "errors".into()
        })
    );
}

// === Scenario: Overlapping declarations are reported with the combination ===
#[test]
fn overlapping_adapters_are_ambiguous() {
    let first = StubAdapter::new(
        "a",
        SignalFamily::ThingQueryCommand,
        thing_commands([Action::Retrieve, Action::Modify]),
    );
    let second = StubAdapter::new(
        "b",
        SignalFamily::ThingModifyCommand,
        thing_commands([Action::Modify]),
    );
    match AdapterResolver::new(vec![first, second]).err().unwrap() {
        ResolverError::Ambiguous {
            adapters,
            combination,
        } => {
            assert_eq!(adapters, vec!["a".to_string(), "b".to_string()]);
            assert!(combination.contains("action=modify"), "{combination}");
        }
        other => panic!("unexpected {other}"),
    }
}

// === Scenario: An adapter without a channel cannot be placed ===
#[test]
fn empty_mandatory_dimension_is_rejected() {
    let broken = StubAdapter::new(
        "broken",
        SignalFamily::ThingEvent,
        Capabilities::new().groups([Group::Things]).criteria([Criterion::Events]),
    );
    let err = AdapterResolver::new(vec![broken]).err().unwrap();
    assert_eq!(
        err,
        ResolverError::EmptyMandatoryDimension {
            adapter: "broken".into(),
            dimension: "channel".into(),
        }
    );
}

// === Scenario: An empty resolver matches nothing ===
#[test]
fn empty_resolver_matches_nothing() {
    let resolver = AdapterResolver::new(Vec::new()).unwrap();
    assert!(resolver.adapters().is_empty());
    let err = resolver
        .resolve_by_envelope(&adaptable("org.acme/car/things/twin/commands/retrieve", Payload::new("/")))
        .err()
        .unwrap();
    assert!(matches!(err, ProtocolError::UnknownTopicPath { .. }));
}

// ================================================================
// Introspection
// ================================================================

// === Scenario: The dispatch tree is described by adapter id ===
#[test]
fn describe_lists_every_adapter() {
    let resolver = standard();
    let text = resolver.describe();
    for family in SignalFamily::ALL {
        assert!(text.contains(family.name()), "{} missing from\n{text}", family.name());
    }
    assert!(resolver.node_count() > SignalFamily::ALL.len());
    assert!(resolver.depth() <= Dimension::ORDER.len() + 1);
}

// === Scenario: One resolver is shared by many threads ===
#[test]
fn resolver_is_shared_across_threads() {
    let resolver = standard();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(
                        resolved_id(
                            &resolver,
                            "org.acme/car/things/live/commands/retrieve",
                            Payload::new("/features"),
                        ),
                        "thing-query-command"
                    );
                }
            });
        }
    });
}
