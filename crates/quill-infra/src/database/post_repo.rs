//! PostgreSQL post repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::query::{
    DeleteParams, Include, ItemParams, Lookup, PostInclude, PostListParams, TrashedScope,
};
use quill_core::domain::{
    BlogEvent, DEFAULT_PAGE_SIZE, EntityKind, Listing, NewPost, Page, Post, PostChanges,
    PostDetails, PostStatus, category_set,
};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::category_repo::descendants_and_self;
use super::entity::{post, post_category, post_translation};
use super::loaders::load_posts;
use super::post_query::{
    build_post_select, in_category_pivot, lookup_condition, public_only, tagged_with_slug,
    with_slug,
};
use super::postgres_base::{PostgresBaseRepository, db_err, fetch_page};
use super::{scopes, writes};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<post::Entity>;

impl PostgresPostRepository {
    async fn details(
        &self,
        models: Vec<post::Model>,
        includes: &[PostInclude],
    ) -> Result<Vec<PostDetails>, RepoError> {
        load_posts(&self.db, models, includes).await.map_err(db_err)
    }

    async fn one_details(
        &self,
        model: post::Model,
        includes: &[PostInclude],
    ) -> Result<PostDetails, RepoError> {
        self.details(vec![model], includes)
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }

    async fn page_of(
        &self,
        query: Select<post::Entity>,
        page: u64,
        per_page: u64,
        includes: &[PostInclude],
    ) -> Result<Page<PostDetails>, RepoError> {
        let (models, total) = fetch_page(&self.db, query, page, per_page)
            .await
            .map_err(db_err)?;
        let items = self.details(models, includes).await?;
        Ok(Page::new(items, total, per_page, page))
    }

    async fn find_model(
        &self,
        lookup: &Lookup,
        scope: TrashedScope,
    ) -> Result<Option<post::Model>, RepoError> {
        let query = post::Entity::find().filter(lookup_condition(lookup));
        scopes::trashed(query, post::Column::DeletedAt, scope)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Apply `changes` to a loaded post and commit the relation writes.
    async fn write_changes(
        &self,
        model: post::Model,
        changes: PostChanges,
        sync_categories: bool,
    ) -> Result<PostDetails, RepoError> {
        let mut post = Post::from(model);
        post.apply(&changes);
        let post_id = post.id;
        tracing::debug!(post_id = %post_id, "Updating post");

        let txn = self.db.begin().await.map_err(db_err)?;
        let model = post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(db_err)?;

        writes::upsert_post_translations(&txn, post_id, &changes.translations).await?;
        if sync_categories {
            let categories = changes.categories.as_deref().unwrap_or_default();
            writes::sync_categories(&txn, post_id, &category_set(categories, model.category_id))
                .await?;
        } else if changes.category_id.is_some() {
            writes::attach_category(&txn, post_id, model.category_id).await?;
        }
        writes::assign_tags(&txn, post_id, changes.tags.as_deref().unwrap_or_default()).await?;
        if let Some(media) = &changes.media {
            writes::sync_media(&txn, EntityKind::Post, post_id, media).await?;
        }
        txn.commit().await.map_err(db_err)?;

        self.emit(BlogEvent::post_updated(post_id)).await;
        tracing::info!(post_id = %post_id, "Post updated");

        self.one_details(model, PostInclude::ALL).await
    }

    /// Untag, then soft delete or, with `force`, remove the row and everything
    /// hanging off it.
    async fn remove(&self, model: post::Model, force: bool) -> Result<(), RepoError> {
        let post_id = model.id;
        let txn = self.db.begin().await.map_err(db_err)?;

        writes::untag(&txn, post_id).await?;
        if force {
            post_category::Entity::delete_many()
                .filter(post_category::Column::PostId.eq(post_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            post_translation::Entity::delete_many()
                .filter(post_translation::Column::PostId.eq(post_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            writes::clear_media(&txn, EntityKind::Post, post_id).await?;
            post::Entity::delete_by_id(post_id)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        } else {
            post::Entity::update_many()
                .col_expr(post::Column::DeletedAt, Expr::value(Utc::now()))
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;

        self.emit(BlogEvent::post_deleted(post_id)).await;
        tracing::info!(post_id = %post_id, force, "Post deleted");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        match self.find_model(&Lookup::Id(id), TrashedScope::Exclude).await? {
            Some(model) => Ok(Some(self.one_details(model, PostInclude::ALL).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<PostDetails, RepoError> {
        tracing::debug!(slug, "Finding post by slug");

        let model = post::Entity::find()
            .filter(with_slug(slug))
            .filter(post::Column::Status.eq(PostStatus::Published.as_i16()))
            .filter(post::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(RepoError::NotFound)?;

        self.one_details(model, PostInclude::ALL).await
    }

    async fn all(&self) -> Result<Vec<PostDetails>, RepoError> {
        let models = post::Entity::find()
            .filter(post::Column::DeletedAt.is_null())
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.details(models, &[PostInclude::Tags]).await
    }

    async fn where_category(
        &self,
        category_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostDetails>, RepoError> {
        let query = post::Entity::find()
            .filter(in_category_pivot(category_id))
            .filter(post::Column::Status.eq(PostStatus::Published.as_i16()))
            .filter(post::Column::CreatedAt.lte(Utc::now()))
            .filter(post::Column::DeletedAt.is_null())
            .order_by_desc(post::Column::CreatedAt);

        self.page_of(query, page, per_page, PostInclude::ALL).await
    }

    async fn where_tag(
        &self,
        slug: &str,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostDetails>, RepoError> {
        tracing::debug!(tag = slug, page, per_page, "Listing posts by tag");

        let query = post::Entity::find()
            .filter(tagged_with_slug(slug))
            .filter(post::Column::DeletedAt.is_null())
            .order_by_desc(post::Column::CreatedAt);

        self.page_of(query, page, per_page, PostInclude::ALL).await
    }

    async fn get_items_by(
        &self,
        params: &PostListParams,
    ) -> Result<Listing<PostDetails>, RepoError> {
        // An unknown category yields no ids and the clause is dropped.
        let category_scope = match params.filter.category {
            Some(id) => Some(descendants_and_self(&self.db, id).await.map_err(db_err)?)
                .filter(|ids| !ids.is_empty()),
            None => None,
        };
        let query = build_post_select(params, category_scope.as_deref(), Utc::now().date_naive());

        // A zero `take` counts as unset.
        let take = params.take.filter(|t| *t > 0);
        match params.page {
            Some(page) => {
                let per_page = take.unwrap_or(DEFAULT_PAGE_SIZE);
                Ok(Listing::Page(
                    self.page_of(query, page, per_page, &params.includes).await?,
                ))
            }
            None => {
                let query = match take {
                    Some(take) => query.limit(take),
                    None => query,
                };
                let models = query.all(&self.db).await.map_err(db_err)?;
                Ok(Listing::All(self.details(models, &params.includes).await?))
            }
        }
    }

    async fn get_item(
        &self,
        lookup: &Lookup,
        params: &ItemParams<PostInclude>,
    ) -> Result<Option<PostDetails>, RepoError> {
        let query = post::Entity::find().filter(lookup_condition(lookup));
        let mut query = scopes::trashed(query, post::Column::DeletedAt, params.trashed);
        if !params.from_admin {
            query = public_only(query, Utc::now().date_naive());
        }

        match query.one(&self.db).await.map_err(db_err)? {
            Some(model) => Ok(Some(self.one_details(model, &params.includes).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, data: NewPost) -> Result<PostDetails, RepoError> {
        let post = Post::from_new(&data);
        let post_id = post.id;
        tracing::debug!(post_id = %post_id, category_id = %post.category_id, "Creating post");

        let txn = self.db.begin().await.map_err(db_err)?;
        let model = post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        writes::upsert_post_translations(&txn, post_id, &data.translations).await?;
        writes::sync_categories(&txn, post_id, &category_set(&data.categories, model.category_id))
            .await?;
        writes::assign_tags(&txn, post_id, &data.tags).await?;
        if !data.media.is_empty() {
            writes::sync_media(&txn, EntityKind::Post, post_id, &data.media).await?;
        }
        txn.commit().await.map_err(db_err)?;

        self.emit(BlogEvent::post_created(post_id)).await;
        tracing::info!(post_id = %post_id, "Post created");

        self.one_details(model, PostInclude::ALL).await
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<PostDetails, RepoError> {
        let model = self
            .find_model(&Lookup::Id(id), TrashedScope::Exclude)
            .await?
            .ok_or(RepoError::NotFound)?;
        self.write_changes(model, changes, true).await
    }

    async fn update_by(
        &self,
        lookup: &Lookup,
        changes: PostChanges,
    ) -> Result<PostDetails, RepoError> {
        let model = self
            .find_model(lookup, TrashedScope::Exclude)
            .await?
            .ok_or(RepoError::NotFound)?;
        let sync_categories = changes.categories.is_some();
        self.write_changes(model, changes, sync_categories).await
    }

    async fn destroy(&self, id: Uuid) -> Result<(), RepoError> {
        let model = self
            .find_model(&Lookup::Id(id), TrashedScope::Exclude)
            .await?
            .ok_or(RepoError::NotFound)?;
        self.remove(model, false).await
    }

    async fn delete_by(&self, lookup: &Lookup, params: &DeleteParams) -> Result<(), RepoError> {
        let scope = if params.force {
            TrashedScope::With
        } else {
            TrashedScope::Exclude
        };
        let model = self
            .find_model(lookup, scope)
            .await?
            .ok_or(RepoError::NotFound)?;
        let post_id = model.id;

        self.remove(model, params.force).await?;
        self.emit(BlogEvent::media_deleted(post_id, EntityKind::Post.as_str()))
            .await;
        Ok(())
    }
}
