//! In-memory pub/sub on tokio broadcast channels.
//!
//! Works within a single process only.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use quill_core::ports::{PubSub, PubSubError, PubSubMessage};

/// In-memory pub/sub system.
pub struct InMemoryPubSub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
    buffer_size: usize,
}

impl InMemoryPubSub {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size: buffer_size.max(1),
        }
    }
}

impl Default for InMemoryPubSub {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl PubSub for InMemoryPubSub {
    async fn publish(&self, channel: &str, payload: &str) -> Result<usize, PubSubError> {
        let channels = self.channels.read().await;

        let Some(sender) = channels.get(channel) else {
            tracing::debug!(channel = %channel, "No subscribers for channel");
            return Ok(0);
        };

        // A send error only means every receiver has gone away.
        let delivered = sender.send(payload.to_string()).unwrap_or(0);
        tracing::debug!(channel = %channel, delivered, "Message published");
        Ok(delivered)
    }

    async fn subscribe<F, Fut>(&self, channel: &str, handler: F) -> Result<(), PubSubError>
    where
        F: Fn(PubSubMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut channels = self.channels.write().await;

        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);

        let mut receiver = sender.subscribe();
        let channel_name = channel.to_string();

        tokio::spawn(async move {
            tracing::info!(channel = %channel_name, "Subscribed to channel");

            loop {
                match receiver.recv().await {
                    Ok(payload) => {
                        handler(PubSubMessage {
                            channel: channel_name.clone(),
                            payload,
                        })
                        .await;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!(
                            channel = %channel_name,
                            lagged = count,
                            "Subscriber lagged behind"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(channel = %channel_name, "Channel closed");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), PubSubError> {
        let mut channels = self.channels.write().await;
        channels.remove(channel);
        tracing::info!(channel = %channel, "Unsubscribed from channel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let pubsub = InMemoryPubSub::default();
        assert_eq!(pubsub.publish("blog.events", "{}").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_messages() {
        let pubsub = InMemoryPubSub::new(8);
        let (tx, mut rx) = mpsc::unbounded_channel();

        pubsub
            .subscribe("blog.events", move |msg| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(msg);
                }
            })
            .await
            .unwrap();

        assert_eq!(pubsub.publish("blog.events", "hello").await.unwrap(), 1);

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.channel, "blog.events");
        assert_eq!(msg.payload, "hello");
    }

    #[tokio::test]
    async fn test_unsubscribe_drops_channel() {
        let pubsub = InMemoryPubSub::default();
        pubsub.subscribe("blog.events", |_| async {}).await.unwrap();
        pubsub.unsubscribe("blog.events").await.unwrap();

        assert_eq!(pubsub.publish("blog.events", "late").await.unwrap(), 0);
    }
}
