//! Headers implicit in a topic path
//!
//! A live topic implies `channel: live`; a topic naming a single entity
//! implies `entity-id: <entityType>:<namespace>:<entityName>`. Extractors
//! are pure and write disjoint keys, so their order does not matter.

use crate::adaptable::{keys, Headers};
use crate::topic::{Channel, TopicPath, WILDCARD};

/// Derives at most one header from a topic path.
pub type HeaderExtractor = fn(&TopicPath) -> Option<(&'static str, String)>;

/// Extractors applied to every inbound adaptable
pub const DEFAULT_EXTRACTORS: [HeaderExtractor; 2] = [live_channel, entity_id];

/// `channel: live` iff the topic is on the live channel.
pub fn live_channel(topic_path: &TopicPath) -> Option<(&'static str, String)> {
    (topic_path.channel() == Channel::Live)
        .then(|| (keys::CHANNEL, Channel::Live.to_string()))
}

/// `entity-id: <entityType>:<namespace>:<entityName>` unless either part is the wildcard.
pub fn entity_id(topic_path: &TopicPath) -> Option<(&'static str, String)> {
    if topic_path.namespace() == WILDCARD || topic_path.entity_name() == WILDCARD {
        return None;
    }
    Some((
        keys::ENTITY_ID,
        format!(
            "{}:{}:{}",
            topic_path.group().entity_type(),
            topic_path.namespace(),
            topic_path.entity_name()
        ),
    ))
}

/// Merge the headers derived by `extractors` into `headers`, replacing existing keys.
pub fn inject(mut headers: Headers, topic_path: &TopicPath, extractors: &[HeaderExtractor]) -> Headers {
    for extract in extractors {
        if let Some((key, value)) = extract(topic_path) {
            headers.insert(key, value);
        }
    }
    headers
}
