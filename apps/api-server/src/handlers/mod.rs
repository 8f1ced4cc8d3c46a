//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};
use quill_core::domain::{Listing, Page};
use quill_shared::{ApiResponse, PageMeta};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::error::{AppError, AppResult};
use crate::params::Presentation;
use crate::state::AppState;
use crate::transformers::{RenderContext, sparse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/blog/v1")
                    .route("/posts", web::get().to(posts::index))
                    .route("/posts", web::post().to(posts::store))
                    .route("/posts/slug/{slug}", web::get().to(posts::by_slug))
                    .route("/posts/{criteria}", web::get().to(posts::show))
                    .route("/posts/{criteria}", web::put().to(posts::update))
                    .route("/posts/{criteria}", web::delete().to(posts::delete))
                    .route("/tags/{slug}/posts", web::get().to(posts::by_tag))
                    .route("/categories", web::get().to(categories::index))
                    .route("/categories", web::post().to(categories::store))
                    .route("/categories/{id}/posts", web::get().to(posts::by_category))
                    .route("/categories/{criteria}", web::get().to(categories::show))
                    .route("/categories/{criteria}", web::put().to(categories::update))
                    .route("/categories/{criteria}", web::delete().to(categories::delete)),
            ),
    );
}

fn render_context<'a>(state: &'a AppState, view: &'a Presentation) -> RenderContext<'a> {
    RenderContext {
        site: &state.site,
        locale: &view.locale,
        locales: if view.all_translations {
            state.blog.supported_locales.as_slice()
        } else {
            &[]
        },
    }
}

fn to_json<T: Serialize>(data: &T, view: &Presentation) -> AppResult<Value> {
    let value = serde_json::to_value(data).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(sparse(value, view.fields.as_deref()))
}

fn page_meta<T>(page: &Page<T>) -> PageMeta {
    PageMeta {
        total: page.total,
        last_page: page.last_page,
        per_page: page.per_page,
        current_page: page.current_page,
    }
}

fn page_response<T: Serialize>(page: Page<T>, view: &Presentation) -> AppResult<HttpResponse> {
    let meta = page_meta(&page);
    let data = to_json(&page.items, view)?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(data, meta)))
}

fn listing_response<T: Serialize>(
    listing: Listing<T>,
    view: &Presentation,
) -> AppResult<HttpResponse> {
    match listing {
        Listing::Page(page) => page_response(page, view),
        Listing::All(items) => Ok(HttpResponse::Ok().json(ApiResponse::ok(to_json(&items, view)?))),
    }
}

fn item_response<T: Serialize>(item: &T, view: &Presentation) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_json(item, view)?)))
}
