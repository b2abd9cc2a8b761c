//! Twin Protocol: digital-twin protocol adaptation layer
//!
//! Translates between transport-neutral envelopes (`Adaptable`: topic path,
//! payload, headers) and typed domain signals, in both directions.
//!
//! # Core Concepts
//!
//! - **TopicPath**: the routing key naming entity, group, channel, criterion and action
//! - **Adapter**: a bidirectional mapper for one signal family
//! - **AdapterResolver**: picks the one adapter for an envelope via a decision
//!   tree built once from the adapters' declared capabilities
//!
//! # Example
//!
//! ```
//! use twin_protocol::{ProtocolAdapter, Signal};
//!
//! let protocol = ProtocolAdapter::standard().unwrap();
//! let signal = protocol
//!     .from_json_str(r#"{"topic":"org.acme/car/things/twin/commands/retrieve","headers":{},"path":"/"}"#)
//!     .unwrap();
//! assert!(matches!(signal, Signal::Command(_)));
//! ```

pub mod adaptable;
pub mod adapter;
pub mod config;
mod error;
pub mod headers;
mod protocol;
pub mod resolver;
pub mod signal;
pub mod topic;

pub use adaptable::{Adaptable, Headers, JsonPointer, Payload};
pub use adapter::{Adapter, AdapterRegistry, Capabilities};
pub use config::ProtocolConfig;
pub use error::{ConfigError, ProtocolError, ProtocolResult, ResolverError};
pub use protocol::ProtocolAdapter;
pub use resolver::{AdapterResolver, Dimension};
pub use signal::{Signal, SignalFamily};
pub use topic::{Channel, TopicPath};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
