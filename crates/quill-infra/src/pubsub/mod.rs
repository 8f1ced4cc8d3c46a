//! Pub/Sub implementations.

mod events;
mod memory;

pub use events::PubSubEventPublisher;
pub use memory::InMemoryPubSub;
