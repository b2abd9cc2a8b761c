//! Slash-delimited pointer into a signal's JSON shape

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer into the JSON shape of a signal (`/features/lamp/properties/on`).
///
/// Segments are stored unescaped. Parsing unescapes `~1` and `~0` and drops
/// empty segments; rendering escapes again, so `parse(render(p)) == p`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The root pointer `/`
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Self {
        let segments = input
            .split('/')
            .filter(|s| !s.is_empty())
            .map(unescape)
            .collect();
        Self { segments }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Append one (unescaped) segment
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        if !segment.is_empty() {
            self.segments.push(segment);
        }
        self
    }

    /// Append all segments of another pointer
    pub fn append(mut self, other: &JsonPointer) -> Self {
        self.segments.extend(other.segments.iter().cloned());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pointer made of the segments from `start` on
    pub fn sub_pointer(&self, start: usize) -> JsonPointer {
        JsonPointer {
            segments: self.segments.iter().skip(start).cloned().collect(),
        }
    }

    /// Re-parse the rendered form. Idempotent.
    pub fn normalized(&self) -> JsonPointer {
        JsonPointer::parse(&self.render())
    }

    pub fn render(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            out.push_str(&escape(segment));
        }
        out
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<String> for JsonPointer {
    fn from(value: String) -> Self {
        JsonPointer::parse(&value)
    }
}

impl From<&str> for JsonPointer {
    fn from(value: &str) -> Self {
        JsonPointer::parse(value)
    }
}

impl From<JsonPointer> for String {
    fn from(pointer: JsonPointer) -> Self {
        pointer.render()
    }
}
