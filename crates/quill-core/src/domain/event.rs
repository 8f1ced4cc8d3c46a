use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel on which blog events are published.
pub const BLOG_EVENTS_CHANNEL: &str = "blog.events";

/// Lifecycle events emitted after a write has been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BlogEvent {
    PostWasCreated {
        post_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
    PostWasUpdated {
        post_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
    PostWasDeleted {
        post_id: Uuid,
        entity_type: String,
        occurred_at: DateTime<Utc>,
    },
    MediaWasDeleted {
        entity_id: Uuid,
        entity_type: String,
        occurred_at: DateTime<Utc>,
    },
    CategoryWasCreated {
        category_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
    CategoryWasUpdated {
        category_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
    CategoryWasDeleted {
        category_id: Uuid,
        occurred_at: DateTime<Utc>,
    },
}

impl BlogEvent {
    pub fn post_created(post_id: Uuid) -> Self {
        Self::PostWasCreated {
            post_id,
            occurred_at: Utc::now(),
        }
    }

    pub fn post_updated(post_id: Uuid) -> Self {
        Self::PostWasUpdated {
            post_id,
            occurred_at: Utc::now(),
        }
    }

    pub fn post_deleted(post_id: Uuid) -> Self {
        Self::PostWasDeleted {
            post_id,
            entity_type: "post".to_string(),
            occurred_at: Utc::now(),
        }
    }

    pub fn media_deleted(entity_id: Uuid, entity_type: &str) -> Self {
        Self::MediaWasDeleted {
            entity_id,
            entity_type: entity_type.to_string(),
            occurred_at: Utc::now(),
        }
    }

    pub fn category_created(category_id: Uuid) -> Self {
        Self::CategoryWasCreated {
            category_id,
            occurred_at: Utc::now(),
        }
    }

    pub fn category_updated(category_id: Uuid) -> Self {
        Self::CategoryWasUpdated {
            category_id,
            occurred_at: Utc::now(),
        }
    }

    pub fn category_deleted(category_id: Uuid) -> Self {
        Self::CategoryWasDeleted {
            category_id,
            occurred_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PostWasCreated { .. } => "PostWasCreated",
            Self::PostWasUpdated { .. } => "PostWasUpdated",
            Self::PostWasDeleted { .. } => "PostWasDeleted",
            Self::MediaWasDeleted { .. } => "MediaWasDeleted",
            Self::CategoryWasCreated { .. } => "CategoryWasCreated",
            Self::CategoryWasUpdated { .. } => "CategoryWasUpdated",
            Self::CategoryWasDeleted { .. } => "CategoryWasDeleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged_by_name() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(BlogEvent::post_deleted(id)).unwrap();
        assert_eq!(json["event"], "PostWasDeleted");
        assert_eq!(json["post_id"], id.to_string());
        assert_eq!(json["entity_type"], "post");
    }
}
