use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::query::{
    CategoryInclude, CategoryListParams, DeleteParams, ItemParams, Lookup, PostInclude,
    PostListParams,
};
use crate::domain::{
    Category, CategoryChanges, CategoryDetails, Listing, NewCategory, NewPost, Page, Post,
    PostChanges, PostDetails,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID, trashed rows included.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update) without touching its relations.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Permanently delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Non-trashed post by id with translations, category, categories, tags and user.
    async fn find(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError>;

    /// Published post whose slug matches in any locale.
    async fn find_by_slug(&self, slug: &str) -> Result<PostDetails, RepoError>;

    /// Every non-trashed post, newest first, with tags.
    async fn all(&self) -> Result<Vec<PostDetails>, RepoError>;

    /// Published, already created posts attached to a category, newest first.
    async fn where_category(
        &self,
        category_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostDetails>, RepoError>;

    /// Posts carrying a tag, newest first, with every relation loaded.
    async fn where_tag(
        &self,
        slug: &str,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostDetails>, RepoError>;

    /// Filtered, ordered and optionally paginated listing.
    async fn get_items_by(&self, params: &PostListParams)
    -> Result<Listing<PostDetails>, RepoError>;

    async fn get_item(
        &self,
        lookup: &Lookup,
        params: &ItemParams<PostInclude>,
    ) -> Result<Option<PostDetails>, RepoError>;

    /// Insert a post, sync its categories, tags, translations and media.
    async fn create(&self, data: NewPost) -> Result<PostDetails, RepoError>;

    /// Update a post; categories are always re-synced.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<PostDetails, RepoError>;

    /// Update a post addressed by `lookup`; categories are re-synced only
    /// when supplied.
    async fn update_by(
        &self,
        lookup: &Lookup,
        changes: PostChanges,
    ) -> Result<PostDetails, RepoError>;

    /// Untag and soft delete.
    async fn destroy(&self, id: Uuid) -> Result<(), RepoError>;

    async fn delete_by(&self, lookup: &Lookup, params: &DeleteParams) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// The category id followed by the ids of every descendant.
    /// Empty when the category does not exist.
    async fn descendants_and_self(&self, id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn get_items_by(
        &self,
        params: &CategoryListParams,
    ) -> Result<Listing<CategoryDetails>, RepoError>;

    async fn get_item(
        &self,
        lookup: &Lookup,
        params: &ItemParams<CategoryInclude>,
    ) -> Result<Option<CategoryDetails>, RepoError>;

    async fn create(&self, data: NewCategory) -> Result<CategoryDetails, RepoError>;

    async fn update_by(
        &self,
        lookup: &Lookup,
        changes: CategoryChanges,
    ) -> Result<CategoryDetails, RepoError>;

    async fn delete_by(&self, lookup: &Lookup, params: &DeleteParams) -> Result<(), RepoError>;
}
