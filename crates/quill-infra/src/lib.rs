//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM repositories for PostgreSQL and an in-process event bus.

pub mod database;
pub mod pubsub;

pub use database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresPostRepository, connect,
};
pub use pubsub::{InMemoryPubSub, PubSubEventPublisher};
