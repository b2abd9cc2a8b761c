//! Search and history-streaming subscriptions
//!
//! Both follow the same reactive-streams protocol: the client subscribes,
//! requests demand, and may cancel; the service answers with created,
//! next (items), complete or failed. The bodies below are the JSON values
//! carried in the payload.

use super::entity::EntityId;
use crate::adaptable::{Headers, JsonPointer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Shared bodies
// ---------------------------------------------------------------------------

/// Body naming a subscription only (cancel, created, complete)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRef {
    pub subscription_id: String,
}

/// Request for `demand` more items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandRequest {
    pub subscription_id: String,
    pub demand: u64,
}

/// Subscription terminated with an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFailure {
    pub subscription_id: String,
    pub error: Value,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Subscribe to a search over things
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSubscribe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    /// Field selector; carried in the payload's `fields`, not the value
    #[serde(skip)]
    pub fields: Option<String>,
}

/// Page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItems {
    pub subscription_id: String,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommandKind {
    Subscribe(SearchSubscribe),
    Request(DemandRequest),
    Cancel(SubscriptionRef),
}

/// Command of the search protocol. Search topics never name an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommand {
    pub kind: SearchCommandKind,
    pub headers: Headers,
}

impl SearchCommand {
    pub fn new(kind: SearchCommandKind) -> Self {
        Self {
            kind,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEventKind {
    Created(SubscriptionRef),
    Next(SearchItems),
    Complete(SubscriptionRef),
    Failed(SubscriptionFailure),
}

/// Event of the search protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEvent {
    pub kind: SubscriptionEventKind,
    pub headers: Headers,
}

impl SubscriptionEvent {
    pub fn new(kind: SubscriptionEventKind) -> Self {
        Self {
            kind,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

// ---------------------------------------------------------------------------
// Streaming of persisted events
// ---------------------------------------------------------------------------

/// Replay persisted events of an entity within a revision or time range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEventsRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_historical_revision: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_historical_revision: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_historical_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_historical_timestamp: Option<DateTime<Utc>>,
}

/// One streamed persisted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamedItem {
    pub subscription_id: String,
    pub item: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamingCommandKind {
    SubscribeForPersistedEvents(PersistedEventsRange),
    Request(DemandRequest),
    Cancel(SubscriptionRef),
}

/// Command of the history-streaming protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingSubscriptionCommand {
    pub entity_id: EntityId,
    /// Part of the entity whose history is streamed
    pub resource: JsonPointer,
    pub kind: StreamingCommandKind,
    pub headers: Headers,
}

impl StreamingSubscriptionCommand {
    pub fn new(entity_id: EntityId, resource: JsonPointer, kind: StreamingCommandKind) -> Self {
        Self {
            entity_id,
            resource,
            kind,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamingEventKind {
    Created(SubscriptionRef),
    Next(StreamedItem),
    Complete(SubscriptionRef),
    Failed(SubscriptionFailure),
}

/// Event of the history-streaming protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingSubscriptionEvent {
    pub entity_id: EntityId,
    pub resource: JsonPointer,
    pub kind: StreamingEventKind,
    pub headers: Headers,
}

impl StreamingSubscriptionEvent {
    pub fn new(entity_id: EntityId, resource: JsonPointer, kind: StreamingEventKind) -> Self {
        Self {
            entity_id,
            resource,
            kind,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}
