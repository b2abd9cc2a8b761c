//! One protocol adapter shared by many threads
//!
//! Resolution and translation touch no shared mutable state, so concurrent
//! callers see exactly the results a single caller sees, and a failing call
//! leaves the shared resolver untouched.
//!
//! Run with: `cargo test --test concurrency`

mod common;

use common::{protocol, sample_signals, without_headers};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use twin_protocol::{Adaptable, Headers, Payload, ProtocolError, TopicPath};

const THREADS: usize = 8;
const ROUNDS: usize = 25;

// === Scenario: Concurrent round trips agree with sequential ones ===
#[test]
fn concurrent_round_trips() {
    let protocol = Arc::new(protocol());
    let signals = sample_signals();
    let completed = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        for worker in 0..THREADS {
            let protocol = Arc::clone(&protocol);
            let signals = &signals;
            let completed = &completed;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    // stagger so workers hit different families at once
                    let signal = &signals[(worker + round) % signals.len()];
                    let adapter = protocol.resolver().adapter_for(signal.family()).unwrap();
                    for &channel in &adapter.capabilities().channels {
                        let adaptable = protocol.to_adaptable(signal, channel).unwrap();
                        assert_eq!(protocol.resolve(&adaptable).unwrap().id(), adapter.id());
                        let decoded = protocol.from_adaptable(adaptable).unwrap();
                        assert_eq!(without_headers(decoded), without_headers(signal.clone()));
                    }
                    completed.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(completed.load(Ordering::Relaxed), THREADS * ROUNDS);
}

// === Scenario: Failing calls do not disturb concurrent successful ones ===
#[test]
fn failures_are_isolated() {
    let protocol = protocol();
    let good = || {
        Adaptable::new(
            TopicPath::parse("org.eclipse.ditto/myThing/things/live/commands/retrieve").unwrap(),
            Payload::new("/features"),
            Headers::new(),
        )
    };
    let bad = || {
        Adaptable::new(
            TopicPath::parse("org.eclipse.ditto/myThing/things/live/events/retrieve").unwrap(),
            Payload::new("/features"),
            Headers::new(),
        )
    };
    let nodes_before = protocol.resolver().node_count();

    std::thread::scope(|scope| {
        for worker in 0..THREADS {
            let protocol = &protocol;
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    if worker % 2 == 0 {
                        assert!(protocol.from_adaptable(good()).is_ok());
                    } else {
                        let err = protocol.from_adaptable(bad()).unwrap_err();
                        assert!(matches!(err, ProtocolError::UnknownTopicPath { .. }));
                    }
                }
            });
        }
    });

    assert_eq!(protocol.resolver().node_count(), nodes_before);
    assert!(protocol.from_adaptable(good()).is_ok());
}
