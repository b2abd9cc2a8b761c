//! Topic model: enumerable attributes and the TopicPath routing key

mod kinds;
mod path;

#[cfg(test)]
mod tests;

pub use kinds::{Action, Channel, Criterion, Group, SearchAction, StreamingAction, TopicAttribute};
pub use path::{TopicPath, TopicPathBuilder, WILDCARD};
