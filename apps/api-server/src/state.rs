//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::SiteContext;
use quill_core::ports::{CategoryRepository, EventPublisher, PostRepository};
use quill_infra::{PostgresCategoryRepository, PostgresPostRepository};
use sea_orm::DbConn;

use crate::config::BlogConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub site: SiteContext,
    pub blog: BlogConfig,
}

impl AppState {
    pub fn new(db: DbConn, events: Arc<dyn EventPublisher>, blog: BlogConfig) -> Self {
        let posts = Arc::new(PostgresPostRepository::new(db.clone(), events.clone()));
        let categories = Arc::new(PostgresCategoryRepository::new(db, events));

        tracing::info!(
            default_locale = %blog.default_locale,
            posts_per_page = blog.posts_per_page,
            "Application state initialized"
        );

        Self::from_parts(posts, categories, blog)
    }

    pub fn from_parts(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        blog: BlogConfig,
    ) -> Self {
        Self {
            posts,
            categories,
            site: blog.site(),
            blog,
        }
    }
}
