//! Blog events over a pub/sub backend.

use async_trait::async_trait;

use quill_core::domain::{BLOG_EVENTS_CHANNEL, BlogEvent};
use quill_core::ports::{EventPublisher, PubSub, PubSubError};

/// Publishes every [`BlogEvent`] as JSON on [`BLOG_EVENTS_CHANNEL`].
pub struct PubSubEventPublisher<P> {
    pubsub: P,
}

impl<P: PubSub> PubSubEventPublisher<P> {
    pub fn new(pubsub: P) -> Self {
        Self { pubsub }
    }

    pub fn pubsub(&self) -> &P {
        &self.pubsub
    }
}

#[async_trait]
impl<P: PubSub> EventPublisher for PubSubEventPublisher<P> {
    async fn publish(&self, event: &BlogEvent) -> Result<(), PubSubError> {
        let payload =
            serde_json::to_string(event).map_err(|e| PubSubError::Serialization(e.to_string()))?;
        let delivered = self.pubsub.publish(BLOG_EVENTS_CHANNEL, &payload).await?;
        tracing::debug!(event = event.name(), delivered, "Blog event published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::InMemoryPubSub;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_events_are_published_as_json() {
        let publisher = PubSubEventPublisher::new(InMemoryPubSub::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        publisher
            .pubsub()
            .subscribe(BLOG_EVENTS_CHANNEL, move |msg| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(msg.payload);
                }
            })
            .await
            .unwrap();

        let post_id = Uuid::new_v4();
        publisher
            .publish(&BlogEvent::post_created(post_id))
            .await
            .unwrap();

        let payload = rx.recv().await.unwrap();
        let event: BlogEvent = serde_json::from_str(&payload).unwrap();
        assert!(matches!(event, BlogEvent::PostWasCreated { post_id: id, .. } if id == post_id));
    }
}
