use async_trait::async_trait;

use super::pubsub::PubSubError;
use crate::domain::BlogEvent;

/// Outbound port for blog lifecycle events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &BlogEvent) -> Result<(), PubSubError>;
}
