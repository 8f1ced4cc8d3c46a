//! Request bodies into domain write requests.

use std::collections::BTreeMap;

use quill_core::domain::{
    CategoryChanges, CategoryTranslationData, MediaPayload, NewCategory, NewPost, PostChanges,
    PostStatus, PostTranslationData,
};
use quill_shared::dto::{
    CategoryPayload, CategoryTranslationPayload, MediaFilesPayload, PostPayload,
    PostTranslationPayload,
};

use crate::middleware::error::{AppError, AppResult};

/// Categories are published unless the payload says otherwise.
const DEFAULT_CATEGORY_STATUS: i16 = 1;

fn status(code: Option<i16>) -> AppResult<Option<PostStatus>> {
    code.map(|code| {
        PostStatus::from_i16(code)
            .ok_or_else(|| AppError::Validation(format!("unknown post status {code}")))
    })
    .transpose()
}

fn media(
    single: Option<BTreeMap<String, Option<uuid::Uuid>>>,
    multi: Option<BTreeMap<String, MediaFilesPayload>>,
) -> Option<MediaPayload> {
    if single.is_none() && multi.is_none() {
        return None;
    }
    Some(MediaPayload {
        single: single.unwrap_or_default(),
        multi: multi
            .unwrap_or_default()
            .into_iter()
            .map(|(zone, files)| (zone, files.files))
            .collect(),
    })
}

fn post_translation(t: PostTranslationPayload) -> PostTranslationData {
    PostTranslationData {
        title: t.title,
        slug: t.slug,
        description: t.description,
        summary: t.summary,
        meta_title: t.meta_title,
        meta_description: t.meta_description,
        meta_keywords: t.meta_keywords,
        translatable_options: t.translatable_options,
    }
}

fn category_translation(t: CategoryTranslationPayload) -> CategoryTranslationData {
    CategoryTranslationData {
        title: t.title,
        slug: t.slug,
        description: t.description,
        meta_title: t.meta_title,
        meta_description: t.meta_description,
        meta_keywords: t.meta_keywords,
    }
}

fn post_translations(payload: &PostPayload) -> AppResult<BTreeMap<String, PostTranslationData>> {
    Ok(payload
        .translations()?
        .into_iter()
        .map(|(locale, t)| (locale, post_translation(t)))
        .collect())
}

fn category_translations(
    payload: &CategoryPayload,
) -> AppResult<BTreeMap<String, CategoryTranslationData>> {
    Ok(payload
        .translations()?
        .into_iter()
        .map(|(locale, t)| (locale, category_translation(t)))
        .collect())
}

pub fn new_post(payload: PostPayload) -> AppResult<NewPost> {
    let category_id = payload
        .category_id
        .ok_or_else(|| AppError::Validation("categoryId is required".to_string()))?;
    let translations = post_translations(&payload)?;

    let mut post = NewPost::new(category_id);
    post.user_id = payload.user_id;
    post.status = status(payload.status)?.unwrap_or_default();
    post.featured = payload.featured.unwrap_or(false);
    post.sort_order = payload.sort_order.unwrap_or(0);
    post.options = payload.options;
    post.date_available = payload.date_available;
    post.created_at = payload.created_at;
    post.categories = payload.categories.unwrap_or_default();
    post.tags = payload.tags.unwrap_or_default();
    post.translations = translations;
    post.media = media(payload.medias_single, payload.medias_multi).unwrap_or_default();
    Ok(post)
}

pub fn post_changes(payload: PostPayload) -> AppResult<PostChanges> {
    Ok(PostChanges {
        translations: post_translations(&payload)?,
        category_id: payload.category_id,
        user_id: payload.user_id,
        status: status(payload.status)?,
        featured: payload.featured,
        sort_order: payload.sort_order,
        options: payload.options,
        date_available: payload.date_available,
        categories: payload.categories,
        tags: payload.tags,
        media: media(payload.medias_single, payload.medias_multi),
    })
}

pub fn new_category(payload: CategoryPayload) -> AppResult<NewCategory> {
    Ok(NewCategory {
        translations: category_translations(&payload)?,
        parent_id: payload.parent_id.flatten(),
        show_menu: payload.show_menu.unwrap_or(false),
        featured: payload.featured.unwrap_or(false),
        sort_order: payload.sort_order.unwrap_or(0),
        status: payload.status.unwrap_or(DEFAULT_CATEGORY_STATUS),
        options: payload.options,
        media: media(payload.medias_single, payload.medias_multi).unwrap_or_default(),
    })
}

pub fn category_changes(payload: CategoryPayload) -> AppResult<CategoryChanges> {
    Ok(CategoryChanges {
        translations: category_translations(&payload)?,
        parent_id: payload.parent_id,
        show_menu: payload.show_menu,
        featured: payload.featured,
        sort_order: payload.sort_order,
        status: payload.status,
        options: payload.options,
        media: media(payload.medias_single, payload.medias_multi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn post_payload(value: serde_json::Value) -> PostPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_new_post_requires_category() {
        let result = new_post(post_payload(json!({ "en": { "title": "Hi" } })));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_new_post_defaults_to_draft() {
        let category = Uuid::new_v4();
        let file = Uuid::new_v4();
        let post = new_post(post_payload(json!({
            "categoryId": category,
            "tags": ["Rust"],
            "mediasMulti": { "gallery": { "files": [file] } },
            "en": { "title": "Hello" }
        })))
        .unwrap();

        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.tags, vec!["Rust"]);
        assert_eq!(post.translations["en"].title.as_deref(), Some("Hello"));
        assert_eq!(post.media.multi["gallery"], vec![file]);
    }

    #[test]
    fn test_changes_leave_media_alone_when_absent() {
        let changes = post_changes(post_payload(json!({ "status": 2 }))).unwrap();

        assert_eq!(changes.status, Some(PostStatus::Published));
        assert!(changes.media.is_none());
        assert!(changes.tags.is_none());
        assert!(changes.categories.is_none());
    }

    #[test]
    fn test_invalid_status() {
        let result = post_changes(post_payload(json!({ "status": 7 })));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_category_payloads() {
        let payload: CategoryPayload =
            serde_json::from_value(json!({ "en": { "title": "News" } })).unwrap();
        let category = new_category(payload).unwrap();
        assert_eq!(category.status, DEFAULT_CATEGORY_STATUS);
        assert_eq!(category.parent_id, None);

        let payload: CategoryPayload =
            serde_json::from_value(json!({ "parentId": null, "mediasSingle": {} })).unwrap();
        let changes = category_changes(payload).unwrap();
        assert_eq!(changes.parent_id, Some(None));
        assert!(changes.media.is_some_and(|m| m.is_empty()));
    }
}
