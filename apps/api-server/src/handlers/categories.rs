//! Category endpoints.

use actix_web::{HttpResponse, web};

use quill_core::domain::EntityKind;
use quill_core::domain::query::CategoryInclude;
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryPayload, DataRequest};
use quill_shared::query::ListQuery;

use super::{item_response, listing_response, render_context};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::locale::RequestLocale;
use crate::params::{self, Presentation};
use crate::payload;
use crate::state::AppState;
use crate::transformers::category_response;

/// GET /api/blog/v1/categories
pub async fn index(
    state: web::Data<AppState>,
    locale: RequestLocale,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let (params, view) = params::category_list(&query, locale.as_str(), &state.blog)?;

    let listing = state.categories.get_items_by(&params).await?;
    let ctx = render_context(&state, &view);
    listing_response(listing.map(|c| category_response(&c, &ctx)), &view)
}

/// GET /api/blog/v1/categories/{criteria}
pub async fn show(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let criteria = path.into_inner();
    let (lookup, params, view) = params::item::<CategoryInclude>(
        &criteria,
        &query,
        locale.as_str(),
        EntityKind::Category,
    )?;

    let category = state
        .categories
        .get_item(&lookup, &params)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category '{}' not found", criteria)))?;

    item_response(
        &category_response(&category, &render_context(&state, &view)),
        &view,
    )
}

/// POST /api/blog/v1/categories
pub async fn store(
    state: web::Data<AppState>,
    locale: RequestLocale,
    body: web::Json<DataRequest<CategoryPayload>>,
) -> AppResult<HttpResponse> {
    let data = payload::new_category(body.into_inner().attributes)?;
    let category = state.categories.create(data).await?;

    let view = Presentation::new(locale.as_str());
    let response = category_response(&category, &render_context(&state, &view));
    Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}

/// PUT /api/blog/v1/categories/{criteria}
pub async fn update(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
    body: web::Json<DataRequest<CategoryPayload>>,
) -> AppResult<HttpResponse> {
    let (lookup, _) =
        params::write_target(&path, &query, locale.as_str(), EntityKind::Category)?;
    let changes = payload::category_changes(body.into_inner().attributes)?;
    let category = state.categories.update_by(&lookup, changes).await?;

    let view = Presentation::new(locale.as_str());
    item_response(
        &category_response(&category, &render_context(&state, &view)),
        &view,
    )
}

/// DELETE /api/blog/v1/categories/{criteria}
pub async fn delete(
    state: web::Data<AppState>,
    locale: RequestLocale,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let (lookup, params) =
        params::write_target(&path, &query, locale.as_str(), EntityKind::Category)?;
    state.categories.delete_by(&lookup, &params).await?;

    tracing::info!(criteria = %path.as_str(), force = params.force, "Category deleted");
    Ok(HttpResponse::NoContent().finish())
}
