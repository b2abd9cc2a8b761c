//! TopicPath: the structured routing key of an adaptable

use super::kinds::{
    Action, ActionSlot, Channel, Criterion, Group, SearchAction, StreamingAction, SubjectRule,
    TopicAttribute,
};
use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for a namespace or entity name that addresses many entities
pub const WILDCARD: &str = "_";

const DELIMITER: char = '/';

/// Immutable routing key of an adaptable.
///
/// String form: `<namespace>/<entityName>/<group>[/<channel>]/<criterion>[/<action>][/<subject>]`.
/// The channel segment is present exactly for the `things` group. At most
/// one of action, search action and streaming action is set, and which one
/// is dictated by the criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicPath {
    namespace: String,
    entity_name: String,
    group: Group,
    channel: Channel,
    criterion: Criterion,
    action: Option<Action>,
    search_action: Option<SearchAction>,
    streaming_action: Option<StreamingAction>,
    subject: Option<String>,
}

impl TopicPath {
    /// Start building a topic path for the given entity
    pub fn builder(namespace: impl Into<String>, entity_name: impl Into<String>) -> TopicPathBuilder {
        TopicPathBuilder::new(namespace, entity_name)
    }

    /// Parse the slash-delimited string form.
    pub fn parse(input: &str) -> ProtocolResult<Self> {
        let segments: Vec<&str> = input.split(DELIMITER).collect();
        if segments.len() < 4 {
            return Err(ProtocolError::parse(input, "too few segments"));
        }

        let namespace = segments[0];
        let entity_name = segments[1];
        let group = parse_token::<Group>(input, segments[2])?;

        let mut idx = 3;
        let channel = if group.has_channel() {
            let channel = parse_token::<Channel>(input, segments[idx])?;
            idx += 1;
            channel
        } else {
            if Channel::from_token(segments[idx]).is_some() {
                return Err(ProtocolError::parse(
                    input,
                    format!("group '{}' does not take a channel", group),
                ));
            }
            Channel::None
        };

        let criterion_token = segments
            .get(idx)
            .ok_or_else(|| ProtocolError::parse(input, "missing criterion"))?;
        let criterion = parse_token::<Criterion>(input, criterion_token)?;
        idx += 1;

        let mut path = TopicPath {
            namespace: namespace.to_string(),
            entity_name: entity_name.to_string(),
            group,
            channel,
            criterion,
            action: None,
            search_action: None,
            streaming_action: None,
            subject: None,
        };

        let slot = criterion.action_slot();
        if slot != ActionSlot::Nothing {
            let token = segments.get(idx).ok_or_else(|| {
                ProtocolError::parse(input, format!("criterion '{}' requires an action", criterion))
            })?;
            match slot {
                ActionSlot::Action => path.action = Some(parse_token::<Action>(input, token)?),
                ActionSlot::SearchAction => {
                    path.search_action = Some(parse_token::<SearchAction>(input, token)?)
                }
                ActionSlot::StreamingAction => {
                    path.streaming_action = Some(parse_token::<StreamingAction>(input, token)?)
                }
                ActionSlot::Nothing => {}
            }
            idx += 1;
        }

        let rest = &segments[idx..];
        if !rest.is_empty() {
            path.subject = Some(rest.join("/"));
        }

        path.validate().map_err(|reason| ProtocolError::parse(input, reason))?;
        Ok(path)
    }

    /// Render the slash-delimited string form; inverse of `parse`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(64);
        out.push_str(&self.namespace);
        out.push(DELIMITER);
        out.push_str(&self.entity_name);
        out.push(DELIMITER);
        out.push_str(self.group.token());
        if self.channel != Channel::None {
            out.push(DELIMITER);
            out.push_str(self.channel.token());
        }
        out.push(DELIMITER);
        out.push_str(self.criterion.token());
        if let Some(token) = self.action_token() {
            out.push(DELIMITER);
            out.push_str(token);
        }
        if let Some(subject) = &self.subject {
            out.push(DELIMITER);
            out.push_str(subject);
        }
        out
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn search_action(&self) -> Option<SearchAction> {
        self.search_action
    }

    pub fn streaming_action(&self) -> Option<StreamingAction> {
        self.streaming_action
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Token of whichever action slot is set
    pub fn action_token(&self) -> Option<&'static str> {
        self.action
            .map(Action::token)
            .or_else(|| self.search_action.map(SearchAction::token))
            .or_else(|| self.streaming_action.map(StreamingAction::token))
    }

    /// True iff namespace or entity name is the wildcard placeholder
    pub fn is_wildcard_topic(&self) -> bool {
        self.namespace == WILDCARD || self.entity_name == WILDCARD
    }

    fn validate(&self) -> Result<(), String> {
        for (label, value) in [("namespace", &self.namespace), ("entity name", &self.entity_name)] {
            if value.is_empty() {
                return Err(format!("{} must not be empty", label));
            }
            if value.contains(DELIMITER) {
                return Err(format!("{} must not contain '/'", label));
            }
        }

        match (self.group.has_channel(), self.channel) {
            (true, Channel::None) => {
                return Err(format!("group '{}' requires channel twin or live", self.group))
            }
            (false, Channel::Twin | Channel::Live) => {
                return Err(format!("group '{}' does not take a channel", self.group))
            }
            _ => {}
        }

        let expected = self.criterion.action_slot();
        let actual = match (self.action, self.search_action, self.streaming_action) {
            (None, None, None) => ActionSlot::Nothing,
            (Some(_), None, None) => ActionSlot::Action,
            (None, Some(_), None) => ActionSlot::SearchAction,
            (None, None, Some(_)) => ActionSlot::StreamingAction,
            _ => return Err("more than one action is set".to_string()),
        };
        if expected != actual {
            return Err(format!(
                "criterion '{}' does not match the given action",
                self.criterion
            ));
        }

        match (self.criterion.subject_rule(), &self.subject) {
            (SubjectRule::Required, None) => {
                return Err(format!("criterion '{}' requires a subject", self.criterion))
            }
            (SubjectRule::Forbidden, Some(subject)) => {
                return Err(format!("unexpected trailing segments '{}'", subject))
            }
            (_, Some(subject)) if subject.split(DELIMITER).any(str::is_empty) => {
                return Err("subject must not contain empty segments".to_string())
            }
            _ => {}
        }

        Ok(())
    }
}

fn parse_token<T: TopicAttribute>(input: &str, token: &str) -> ProtocolResult<T> {
    T::from_token(token)
        .ok_or_else(|| ProtocolError::parse(input, format!("unknown {} '{}'", T::NAME, token)))
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for TopicPath {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicPath::parse(s)
    }
}

impl TryFrom<String> for TopicPath {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TopicPath::parse(&value)
    }
}

impl From<TopicPath> for String {
    fn from(path: TopicPath) -> Self {
        path.render()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for `TopicPath`.
///
/// Group and channel are chosen first; each criterion then has its own
/// terminal method so only the matching action slot can be filled.
#[derive(Debug, Clone)]
pub struct TopicPathBuilder {
    namespace: String,
    entity_name: String,
    group: Group,
    channel: Channel,
}

impl TopicPathBuilder {
    fn new(namespace: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entity_name: entity_name.into(),
            group: Group::Things,
            channel: Channel::Twin,
        }
    }

    pub fn group(mut self, group: Group) -> Self {
        self.group = group;
        if !group.has_channel() {
            self.channel = Channel::None;
        } else if self.channel == Channel::None {
            self.channel = Channel::Twin;
        }
        self
    }

    pub fn things(self) -> Self {
        self.group(Group::Things)
    }

    pub fn policies(self) -> Self {
        self.group(Group::Policies)
    }

    pub fn connections(self) -> Self {
        self.group(Group::Connections)
    }

    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn twin(self) -> Self {
        self.channel(Channel::Twin)
    }

    pub fn live(self) -> Self {
        self.channel(Channel::Live)
    }

    pub fn commands(self, action: Action) -> ProtocolResult<TopicPath> {
        self.finish(Criterion::Commands, |p| p.action = Some(action))
    }

    pub fn events(self, action: Action) -> ProtocolResult<TopicPath> {
        self.finish(Criterion::Events, |p| p.action = Some(action))
    }

    pub fn search(self, action: SearchAction) -> ProtocolResult<TopicPath> {
        self.finish(Criterion::Search, |p| p.search_action = Some(action))
    }

    pub fn streaming(self, action: StreamingAction) -> ProtocolResult<TopicPath> {
        self.finish(Criterion::Streaming, |p| p.streaming_action = Some(action))
    }

    pub fn messages(self, subject: impl Into<String>) -> ProtocolResult<TopicPath> {
        let subject = subject.into();
        self.finish(Criterion::Messages, |p| p.subject = Some(subject))
    }

    pub fn errors(self) -> ProtocolResult<TopicPath> {
        self.finish(Criterion::Errors, |_| {})
    }

    /// Topic of aggregated acknowledgements
    pub fn acks(self) -> ProtocolResult<TopicPath> {
        self.finish(Criterion::Acks, |_| {})
    }

    /// Topic of a single acknowledgement with the given label
    pub fn ack(self, label: impl Into<String>) -> ProtocolResult<TopicPath> {
        let label = label.into();
        self.finish(Criterion::Acks, |p| p.subject = Some(label))
    }

    pub fn announcements(self, subject: impl Into<String>) -> ProtocolResult<TopicPath> {
        let subject = subject.into();
        self.finish(Criterion::Announcements, |p| p.subject = Some(subject))
    }

    fn finish(
        self,
        criterion: Criterion,
        fill: impl FnOnce(&mut TopicPath),
    ) -> ProtocolResult<TopicPath> {
        let mut path = TopicPath {
            namespace: self.namespace,
            entity_name: self.entity_name,
            group: self.group,
            channel: self.channel,
            criterion,
            action: None,
            search_action: None,
            streaming_action: None,
            subject: None,
        };
        fill(&mut path);
        path.validate()
            .map_err(|reason| ProtocolError::parse(path.render(), reason))?;
        Ok(path)
    }
}
