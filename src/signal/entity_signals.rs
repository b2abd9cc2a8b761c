//! Commands, responses, events and errors addressing one entity resource

use super::entity::EntityId;
use super::resource::{Resource, ThingResource};
use crate::adaptable::Headers;
use crate::topic::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A query or modify command on one resource of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommand<R: Resource> {
    pub action: Action,
    pub entity_id: EntityId,
    pub resource: R,
    /// New value; required by create, modify and merge
    pub value: Option<Value>,
    /// Field selector of retrieve commands
    pub fields: Option<String>,
    pub headers: Headers,
}

impl<R: Resource> EntityCommand<R> {
    pub fn new(action: Action, entity_id: EntityId, resource: R) -> Self {
        Self {
            action,
            entity_id,
            resource,
            value: None,
            fields: None,
            headers: Headers::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// Response to an `EntityCommand`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommandResponse<R: Resource> {
    pub action: Action,
    pub entity_id: EntityId,
    pub resource: R,
    pub value: Option<Value>,
    pub status: u16,
    pub headers: Headers,
}

impl<R: Resource> EntityCommandResponse<R> {
    pub fn new(action: Action, entity_id: EntityId, resource: R, status: u16) -> Self {
        Self {
            action,
            entity_id,
            resource,
            value: None,
            status,
            headers: Headers::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// Persisted change of one resource of a thing.
#[derive(Debug, Clone, PartialEq)]
pub struct ThingEvent {
    pub action: Action,
    pub thing_id: EntityId,
    pub resource: ThingResource,
    pub value: Option<Value>,
    pub revision: i64,
    pub timestamp: Option<DateTime<Utc>>,
    /// Enriched extra fields
    pub extra: Option<Value>,
    pub headers: Headers,
}

impl ThingEvent {
    pub fn new(
        action: Action,
        thing_id: EntityId,
        resource: ThingResource,
        revision: i64,
    ) -> Self {
        Self {
            action,
            thing_id,
            resource,
            value: None,
            revision,
            timestamp: None,
            extra: None,
            headers: Headers::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    /// Machine-readable error code, e.g. `things:thing.notfound`
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Error answering any signal addressed at a thing or policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    /// Wildcard when the failing request named no single entity
    pub entity_id: EntityId,
    pub error: ErrorBody,
    pub headers: Headers,
}

impl ErrorResponse {
    pub fn new(
        entity_id: EntityId,
        status: u16,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity_id,
            error: ErrorBody {
                status,
                error: error.into(),
                message: message.into(),
                description: None,
            },
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}
