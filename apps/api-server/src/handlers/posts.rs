//! Post endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::EntityKind;
use quill_core::domain::query::PostInclude;
use quill_shared::ApiResponse;
use quill_shared::dto::{DataRequest, PostPayload};
use quill_shared::query::ListQuery;

use super::{item_response, listing_response, page_response, render_context};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::locale::RequestLocale;
use crate::params::{self, Presentation};
use crate::payload;
use crate::state::AppState;
use crate::transformers::post_response;

/// GET /api/blog/v1/posts
pub async fn index(
    state: web::Data<AppState>,
    locale: RequestLocale,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let (params, view) = params::post_list(&query, locale.as_str(), &state.blog)?;
    tracing::debug!(
        page = ?params.page,
        take = ?params.take,
        from_admin = params.from_admin,
        "Listing posts"
    );

    let listing = state.posts.get_items_by(&params).await?;
    let ctx = render_context(&state, &view);
    listing_response(listing.map(|p| post_response(&p, &ctx)), &view)
}

/// GET /api/blog/v1/posts/{criteria}
pub async fn show(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let criteria = path.into_inner();
    let (lookup, params, view) =
        params::item::<PostInclude>(&criteria, &query, locale.as_str(), EntityKind::Post)?;

    let post = state
        .posts
        .get_item(&lookup, &params)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post '{}' not found", criteria)))?;

    item_response(&post_response(&post, &render_context(&state, &view)), &view)
}

/// POST /api/blog/v1/posts
pub async fn store(
    state: web::Data<AppState>,
    locale: RequestLocale,
    body: web::Json<DataRequest<PostPayload>>,
) -> AppResult<HttpResponse> {
    let data = payload::new_post(body.into_inner().attributes)?;
    let post = state.posts.create(data).await?;

    let view = Presentation::new(locale.as_str());
    let response = post_response(&post, &render_context(&state, &view));
    Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}

/// PUT /api/blog/v1/posts/{criteria}
pub async fn update(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
    body: web::Json<DataRequest<PostPayload>>,
) -> AppResult<HttpResponse> {
    let (lookup, _) =
        params::write_target(&path, &query, locale.as_str(), EntityKind::Post)?;
    let changes = payload::post_changes(body.into_inner().attributes)?;
    let post = state.posts.update_by(&lookup, changes).await?;

    let view = Presentation::new(locale.as_str());
    item_response(&post_response(&post, &render_context(&state, &view)), &view)
}

/// DELETE /api/blog/v1/posts/{criteria}
pub async fn delete(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let (lookup, params) =
        params::write_target(&path, &query, locale.as_str(), EntityKind::Post)?;
    state.posts.delete_by(&lookup, &params).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/blog/v1/posts/slug/{slug}
pub async fn by_slug(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.find_by_slug(&path).await?;

    let view = Presentation::new(locale.as_str());
    item_response(&post_response(&post, &render_context(&state, &view)), &view)
}

/// GET /api/blog/v1/categories/{id}/posts
pub async fn by_category(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .where_category(
            path.into_inner(),
            query.page.unwrap_or(1),
            state.blog.posts_per_page,
        )
        .await?;

    let view = Presentation::new(locale.as_str());
    let ctx = render_context(&state, &view);
    page_response(page.map(|p| post_response(&p, &ctx)), &view)
}

/// GET /api/blog/v1/tags/{slug}/posts
pub async fn by_tag(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let per_page = query.take.unwrap_or(state.blog.posts_per_page);
    let page = state
        .posts
        .where_tag(&path, query.page.unwrap_or(1), per_page)
        .await?;

    let view = Presentation::new(locale.as_str());
    let ctx = render_context(&state, &view);
    page_response(page.map(|p| post_response(&p, &ctx)), &view)
}
