//! Signal adapters
//!
//! One adapter per signal family. Each is a `SignalAdapter` around a
//! family-specific `PayloadMapper`; `AdapterRegistry::standard` assembles
//! the full set.

mod acks;
mod announcements;
mod entity;
mod messages;
mod registry;
mod signal_adapter;
pub mod strategies;
mod subscriptions;
mod traits;

pub use acks::{AcknowledgementMapper, AcknowledgementsMapper};
pub use announcements::{ConnectivityAnnouncementMapper, PolicyAnnouncementMapper};
pub use entity::{EntityCommandMapper, EntityResponseMapper, ErrorResponseMapper, ThingEventMapper};
pub use messages::{MessageCommandMapper, MessageResponseMapper};
pub use registry::AdapterRegistry;
pub use signal_adapter::SignalAdapter;
pub use strategies::{MappingStrategies, MappingStrategy};
pub use subscriptions::{
    SearchCommandMapper, StreamingCommandMapper, StreamingEventMapper, SubscriptionEventMapper,
};
pub use traits::{Adapter, Capabilities, PayloadMapper};
