use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::domain::query::{
    CategoryInclude, CategoryListParams, DeleteParams, ItemParams, Lookup, PostInclude,
    PostListParams,
};
use quill_core::domain::{
    Category, CategoryChanges, CategoryDetails, Listing, NewCategory, NewPost, Page, Post,
    PostChanges, PostDetails,
};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository};

use super::configure_routes;
use crate::config::BlogConfig;
use crate::state::AppState;

/// Serves one post and records the last listing request.
#[derive(Default)]
struct StubPosts {
    post: Option<PostDetails>,
    last_list: Mutex<Option<PostListParams>>,
    created: Mutex<Option<NewPost>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for StubPosts {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.post.as_ref().map(|p| p.post.clone()))
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl PostRepository for StubPosts {
    async fn find(&self, _id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        Ok(self.post.clone())
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<PostDetails, RepoError> {
        self.post.clone().ok_or(RepoError::NotFound)
    }

    async fn all(&self) -> Result<Vec<PostDetails>, RepoError> {
        Ok(self.post.clone().into_iter().collect())
    }

    async fn where_category(
        &self,
        _category_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostDetails>, RepoError> {
        let items: Vec<PostDetails> = self.post.clone().into_iter().collect();
        let total = items.len() as u64;
        Ok(Page::new(items, total, per_page, page))
    }

    async fn where_tag(
        &self,
        _slug: &str,
        page: u64,
        per_page: u64,
    ) -> Result<Page<PostDetails>, RepoError> {
        Ok(Page::new(Vec::new(), 0, per_page, page))
    }

    async fn get_items_by(
        &self,
        params: &PostListParams,
    ) -> Result<Listing<PostDetails>, RepoError> {
        *self.last_list.lock().unwrap() = Some(params.clone());
        let items: Vec<PostDetails> = self.post.clone().into_iter().collect();
        Ok(match (params.page, params.take) {
            (Some(page), Some(take)) => {
                let total = items.len() as u64;
                Listing::Page(Page::new(items, total, take, page))
            }
            _ => Listing::All(items),
        })
    }

    async fn get_item(
        &self,
        lookup: &Lookup,
        _params: &ItemParams<PostInclude>,
    ) -> Result<Option<PostDetails>, RepoError> {
        Ok(self
            .post
            .clone()
            .filter(|p| matches!(lookup, Lookup::Id(id) if *id == p.post.id)))
    }

    async fn create(&self, data: NewPost) -> Result<PostDetails, RepoError> {
        let details = PostDetails::new(Post::from_new(&data));
        *self.created.lock().unwrap() = Some(data);
        Ok(details)
    }

    async fn update(&self, _id: Uuid, _changes: PostChanges) -> Result<PostDetails, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn update_by(
        &self,
        _lookup: &Lookup,
        _changes: PostChanges,
    ) -> Result<PostDetails, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn destroy(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::NotFound)
    }

    async fn delete_by(&self, _lookup: &Lookup, _params: &DeleteParams) -> Result<(), RepoError> {
        Err(RepoError::NotFound)
    }
}

/// A category tree with nothing in it.
struct EmptyCategories;

#[async_trait]
impl BaseRepository<Category, Uuid> for EmptyCategories {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(None)
    }

    async fn save(&self, entity: Category) -> Result<Category, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for EmptyCategories {
    async fn descendants_and_self(&self, _id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(Vec::new())
    }

    async fn get_items_by(
        &self,
        _params: &CategoryListParams,
    ) -> Result<Listing<CategoryDetails>, RepoError> {
        Ok(Listing::All(Vec::new()))
    }

    async fn get_item(
        &self,
        _lookup: &Lookup,
        _params: &ItemParams<CategoryInclude>,
    ) -> Result<Option<CategoryDetails>, RepoError> {
        Ok(None)
    }

    async fn create(&self, data: NewCategory) -> Result<CategoryDetails, RepoError> {
        Ok(CategoryDetails::new(Category::from_new(&data)))
    }

    async fn update_by(
        &self,
        _lookup: &Lookup,
        _changes: CategoryChanges,
    ) -> Result<CategoryDetails, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn delete_by(&self, _lookup: &Lookup, _params: &DeleteParams) -> Result<(), RepoError> {
        Err(RepoError::NotFound)
    }
}

fn blog() -> BlogConfig {
    BlogConfig {
        app_url: "https://blog.test".to_string(),
        posts_per_page: 5,
        ..Default::default()
    }
}

async fn call(
    posts: Arc<StubPosts>,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let state = AppState::from_parts(posts, Arc::new(EmptyCategories), blog());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(blog()))
            .configure(configure_routes),
    )
    .await;

    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn stub_with_post() -> (Arc<StubPosts>, Uuid) {
    let post = Post::new(Uuid::new_v4());
    let id = post.id;
    let stub = StubPosts {
        post: Some(PostDetails::new(post)),
        ..Default::default()
    };
    (Arc::new(stub), id)
}

#[actix_rt::test]
async fn test_paginated_listing_uses_configured_size() {
    let (posts, id) = stub_with_post();

    let (status, body) = call(
        posts.clone(),
        test::TestRequest::get().uri("/api/blog/v1/posts?page=1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], json!(id));
    assert_eq!(body["meta"]["page"]["perPage"], 5);
    assert_eq!(body["meta"]["page"]["total"], 1);

    let params = posts.last_list.lock().unwrap().clone().unwrap();
    assert_eq!(params.take, Some(5));
    assert!(!params.from_admin);
}

#[actix_rt::test]
async fn test_listing_applies_sparse_fields() {
    let (posts, _) = stub_with_post();

    let (status, body) = call(
        posts,
        test::TestRequest::get().uri("/api/blog/v1/posts?fields=status"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("meta").is_none());
    let item = body["data"][0].as_object().unwrap();
    assert_eq!(item.len(), 2);
    assert!(item.contains_key("id"));
    assert!(item.contains_key("status"));
}

#[actix_rt::test]
async fn test_malformed_filter_is_bad_request() {
    let (posts, _) = stub_with_post();

    let (status, body) = call(
        posts,
        test::TestRequest::get().uri("/api/blog/v1/posts?filter=%7Bbroken"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[actix_rt::test]
async fn test_show_missing_post_is_not_found() {
    let (posts, _) = stub_with_post();

    let uri = format!("/api/blog/v1/posts/{}", Uuid::new_v4());
    let (status, body) = call(posts.clone(), test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "Not Found");

    let (status, _) = call(posts, test::TestRequest::get().uri("/api/blog/v1/posts/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_show_post() {
    let (posts, id) = stub_with_post();

    let uri = format!("/api/blog/v1/posts/{id}");
    let (status, body) = call(posts, test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(id));
    assert_eq!(body["data"]["statusName"], "draft");
}

#[actix_rt::test]
async fn test_store_post() {
    let posts = Arc::new(StubPosts::default());
    let category = Uuid::new_v4();

    let (status, body) = call(
        posts.clone(),
        test::TestRequest::post()
            .uri("/api/blog/v1/posts")
            .set_json(json!({
                "attributes": {
                    "categoryId": category,
                    "categories": [category],
                    "en": { "title": "Hello" }
                }
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["categoryId"], json!(category));
    let created = posts.created.lock().unwrap().clone().unwrap();
    assert_eq!(created.translations["en"].title.as_deref(), Some("Hello"));
}

#[actix_rt::test]
async fn test_store_post_without_category_is_unprocessable() {
    let (status, _) = call(
        Arc::new(StubPosts::default()),
        test::TestRequest::post()
            .uri("/api/blog/v1/posts")
            .set_json(json!({ "attributes": { "en": { "title": "Hello" } } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_delete_missing_category() {
    let uri = format!("/api/blog/v1/categories/{}", Uuid::new_v4());
    let (status, _) = call(
        Arc::new(StubPosts::default()),
        test::TestRequest::delete().uri(&uri),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_route_is_mounted() {
    let (status, body) = call(
        Arc::new(StubPosts::default()),
        test::TestRequest::get().uri("/api/health"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
