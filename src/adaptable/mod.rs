//! Adaptable data model: the transport-neutral envelope and its parts

mod envelope;
mod headers;
mod payload;
mod pointer;

pub use headers::{keys, Headers};
pub use payload::{Adaptable, Payload};
pub use pointer::JsonPointer;
