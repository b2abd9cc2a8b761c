//! Announcements: notices about an entity that are neither commands nor events

use super::entity::EntityId;
use crate::adaptable::Headers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subjects of a policy are about to be deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDeletion {
    pub delete_at: DateTime<Utc>,
    pub subject_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyAnnouncementKind {
    SubjectDeletion(SubjectDeletion),
}

impl PolicyAnnouncementKind {
    /// Topic subject of the announcement
    pub fn name(&self) -> &'static str {
        match self {
            PolicyAnnouncementKind::SubjectDeletion(_) => "subjectDeletion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyAnnouncement {
    pub policy_id: EntityId,
    pub kind: PolicyAnnouncementKind,
    pub headers: Headers,
}

impl PolicyAnnouncement {
    pub fn new(policy_id: EntityId, kind: PolicyAnnouncementKind) -> Self {
        Self {
            policy_id,
            kind,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOpened {
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionClosed {
    pub closed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityAnnouncementKind {
    Opened(ConnectionOpened),
    Closed(ConnectionClosed),
}

impl ConnectivityAnnouncementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectivityAnnouncementKind::Opened(_) => "opened",
            ConnectivityAnnouncementKind::Closed(_) => "closed",
        }
    }
}

/// A connection to an external system was opened or closed.
/// Connections have no namespace; their topic is `_/<connectionId>/connections/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityAnnouncement {
    pub connection_id: String,
    pub kind: ConnectivityAnnouncementKind,
    pub headers: Headers,
}

impl ConnectivityAnnouncement {
    pub fn new(connection_id: impl Into<String>, kind: ConnectivityAnnouncementKind) -> Self {
        Self {
            connection_id: connection_id.into(),
            kind,
            headers: Headers::new(),
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}
