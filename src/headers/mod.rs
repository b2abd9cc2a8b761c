//! Header translation and topic-path header injection

pub mod from_topic_path;
mod translator;

pub use from_topic_path::{HeaderExtractor, DEFAULT_EXTRACTORS};
pub use translator::{
    standard_definitions, DefinitionHeaderTranslator, HeaderDefinition, HeaderTranslator,
};
