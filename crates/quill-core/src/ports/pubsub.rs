//! Pub/Sub port - in-process or brokered fan-out of string payloads.

use std::future::Future;

use async_trait::async_trait;

/// Message received from a channel.
#[derive(Debug, Clone)]
pub struct PubSubMessage {
    pub channel: String,
    pub payload: String,
}

/// Pub/Sub trait - abstraction over pub/sub backends.
///
/// Blog events travel over this as JSON on [`crate::domain::BLOG_EVENTS_CHANNEL`].
#[async_trait]
pub trait PubSub: Send + Sync {
    /// Publish a payload, returning how many subscribers received it.
    async fn publish(&self, channel: &str, payload: &str) -> Result<usize, PubSubError>;

    /// Run `handler` for every message published on `channel` from now on.
    async fn subscribe<F, Fut>(&self, channel: &str, handler: F) -> Result<(), PubSubError>
    where
        F: Fn(PubSubMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static;

    /// Drop every subscriber of `channel`.
    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError>;
}

/// Pub/Sub errors.
#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    #[error("Failed to publish: {0}")]
    Publish(String),

    #[error("Failed to subscribe: {0}")]
    Subscribe(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
