//! Addressable resources of things and policies
//!
//! A resource is the part of an entity a command, response or event acts
//! on. It is carried in the payload path of an adaptable and classified back
//! from it; the classifier name becomes the suffix of the type tag
//! (`modify` + `FeatureProperty`).

use crate::adaptable::JsonPointer;
use crate::topic::{Action, Group};
use std::fmt;

/// A resource kind of one entity group.
pub trait Resource: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Group whose entities own these resources
    const GROUP: Group;

    /// Classifier names of every resource kind
    const NAMES: &'static [&'static str];

    /// Recognise a payload path; `None` if it addresses nothing known.
    fn classify(pointer: &JsonPointer) -> Option<Self>;

    /// Payload path addressing this resource
    fn pointer(&self) -> JsonPointer;

    /// Classifier name, one of `NAMES`
    fn name(&self) -> &'static str;

    /// Whether `action` is defined on resources of kind `name`
    fn supports(action: Action, name: &str) -> bool;
}

// ---------------------------------------------------------------------------
// Things
// ---------------------------------------------------------------------------

/// Resource of a thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingResource {
    Thing,
    PolicyId,
    Definition,
    Attributes,
    Attribute(JsonPointer),
    Features,
    Feature(String),
    FeatureDefinition(String),
    FeatureProperties(String),
    FeatureProperty(String, JsonPointer),
    FeatureDesiredProperties(String),
    FeatureDesiredProperty(String, JsonPointer),
}

impl Resource for ThingResource {
    const GROUP: Group = Group::Things;

    const NAMES: &'static [&'static str] = &[
        "thing",
        "policyId",
        "definition",
        "attributes",
        "attribute",
        "features",
        "feature",
        "featureDefinition",
        "featureProperties",
        "featureProperty",
        "featureDesiredProperties",
        "featureDesiredProperty",
    ];

    fn classify(pointer: &JsonPointer) -> Option<Self> {
        let segments: Vec<&str> = pointer.segments().iter().map(String::as_str).collect();
        let resource = match segments.as_slice() {
            [] => ThingResource::Thing,
            ["policyId"] => ThingResource::PolicyId,
            ["definition"] => ThingResource::Definition,
            ["attributes"] => ThingResource::Attributes,
            ["attributes", ..] => ThingResource::Attribute(pointer.sub_pointer(1)),
            ["features"] => ThingResource::Features,
            ["features", id] => ThingResource::Feature(id.to_string()),
            ["features", id, "definition"] => ThingResource::FeatureDefinition(id.to_string()),
            ["features", id, "properties"] => ThingResource::FeatureProperties(id.to_string()),
            ["features", id, "properties", ..] => {
                ThingResource::FeatureProperty(id.to_string(), pointer.sub_pointer(4))
            }
            ["features", id, "desiredProperties"] => {
                ThingResource::FeatureDesiredProperties(id.to_string())
            }
            ["features", id, "desiredProperties", ..] => {
                ThingResource::FeatureDesiredProperty(id.to_string(), pointer.sub_pointer(4))
            }
            _ => return None,
        };
        Some(resource)
    }

    fn pointer(&self) -> JsonPointer {
        let feature = |id: &str| JsonPointer::root().push("features").push(id);
        match self {
            ThingResource::Thing => JsonPointer::root(),
            ThingResource::PolicyId => JsonPointer::root().push("policyId"),
            ThingResource::Definition => JsonPointer::root().push("definition"),
            ThingResource::Attributes => JsonPointer::root().push("attributes"),
            ThingResource::Attribute(path) => JsonPointer::root().push("attributes").append(path),
            ThingResource::Features => JsonPointer::root().push("features"),
            ThingResource::Feature(id) => feature(id),
            ThingResource::FeatureDefinition(id) => feature(id).push("definition"),
            ThingResource::FeatureProperties(id) => feature(id).push("properties"),
            ThingResource::FeatureProperty(id, path) => feature(id).push("properties").append(path),
            ThingResource::FeatureDesiredProperties(id) => feature(id).push("desiredProperties"),
            ThingResource::FeatureDesiredProperty(id, path) => {
                feature(id).push("desiredProperties").append(path)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ThingResource::Thing => "thing",
            ThingResource::PolicyId => "policyId",
            ThingResource::Definition => "definition",
            ThingResource::Attributes => "attributes",
            ThingResource::Attribute(_) => "attribute",
            ThingResource::Features => "features",
            ThingResource::Feature(_) => "feature",
            ThingResource::FeatureDefinition(_) => "featureDefinition",
            ThingResource::FeatureProperties(_) => "featureProperties",
            ThingResource::FeatureProperty(..) => "featureProperty",
            ThingResource::FeatureDesiredProperties(_) => "featureDesiredProperties",
            ThingResource::FeatureDesiredProperty(..) => "featureDesiredProperty",
        }
    }

    fn supports(action: Action, name: &str) -> bool {
        match action {
            Action::Create => name == "thing",
            Action::Created | Action::Delete | Action::Deleted => name != "policyId",
            Action::Retrieve | Action::Modify | Action::Merge | Action::Modified | Action::Merged => {
                true
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Resource of a policy. Labels, subject ids and resource keys are single
/// path segments; resource keys such as `thing:/attributes` are escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyResource {
    Policy,
    PolicyEntries,
    PolicyEntry(String),
    Subjects(String),
    Subject(String, String),
    Resources(String),
    Resource(String, String),
}

impl Resource for PolicyResource {
    const GROUP: Group = Group::Policies;

    const NAMES: &'static [&'static str] = &[
        "policy",
        "policyEntries",
        "policyEntry",
        "subjects",
        "subject",
        "resources",
        "resource",
    ];

    fn classify(pointer: &JsonPointer) -> Option<Self> {
        let segments: Vec<&str> = pointer.segments().iter().map(String::as_str).collect();
        let resource = match segments.as_slice() {
            [] => PolicyResource::Policy,
            ["entries"] => PolicyResource::PolicyEntries,
            ["entries", label] => PolicyResource::PolicyEntry(label.to_string()),
            ["entries", label, "subjects"] => PolicyResource::Subjects(label.to_string()),
            ["entries", label, "subjects", id] => {
                PolicyResource::Subject(label.to_string(), id.to_string())
            }
            ["entries", label, "resources"] => PolicyResource::Resources(label.to_string()),
            ["entries", label, "resources", key] => {
                PolicyResource::Resource(label.to_string(), key.to_string())
            }
            _ => return None,
        };
        Some(resource)
    }

    fn pointer(&self) -> JsonPointer {
        let entry = |label: &str| JsonPointer::root().push("entries").push(label);
        match self {
            PolicyResource::Policy => JsonPointer::root(),
            PolicyResource::PolicyEntries => JsonPointer::root().push("entries"),
            PolicyResource::PolicyEntry(label) => entry(label),
            PolicyResource::Subjects(label) => entry(label).push("subjects"),
            PolicyResource::Subject(label, id) => entry(label).push("subjects").push(id.as_str()),
            PolicyResource::Resources(label) => entry(label).push("resources"),
            PolicyResource::Resource(label, key) => {
                entry(label).push("resources").push(key.as_str())
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PolicyResource::Policy => "policy",
            PolicyResource::PolicyEntries => "policyEntries",
            PolicyResource::PolicyEntry(_) => "policyEntry",
            PolicyResource::Subjects(_) => "subjects",
            PolicyResource::Subject(..) => "subject",
            PolicyResource::Resources(_) => "resources",
            PolicyResource::Resource(..) => "resource",
        }
    }

    fn supports(action: Action, name: &str) -> bool {
        match action {
            Action::Create => name == "policy",
            Action::Delete => matches!(name, "policy" | "policyEntry" | "subject" | "resource"),
            Action::Retrieve | Action::Modify => true,
            Action::Merge | Action::Created | Action::Modified | Action::Merged | Action::Deleted => {
                false
            }
        }
    }
}
