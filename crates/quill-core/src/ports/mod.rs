//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod events;
mod pubsub;
mod repository;

pub use events::EventPublisher;
pub use pubsub::{PubSub, PubSubError, PubSubMessage};
pub use repository::{BaseRepository, CategoryRepository, PostRepository};
