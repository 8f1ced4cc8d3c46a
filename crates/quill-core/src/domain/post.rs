use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::category::CategoryDetails;
use super::media::{Image, MediaAttachment, MediaPayload, MediaSet, Zone};
use super::site::SiteContext;
use super::tag::Tag;
use super::translation::{Localized, translate};
use super::user::User;

/// Publication state of a post. Stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum PostStatus {
    #[default]
    Draft = 0,
    Pending = 1,
    Published = 2,
    Unpublished = 3,
}

impl PostStatus {
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Draft),
            1 => Some(Self::Pending),
            2 => Some(Self::Published),
            3 => Some(Self::Unpublished),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Unpublished => "unpublished",
        }
    }
}

/// Post entity - a blog post. Translated attributes live in [`PostTranslation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Primary category; always part of the synced category set.
    pub category_id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: PostStatus,
    pub featured: bool,
    pub sort_order: i32,
    pub options: Option<Value>,
    pub date_available: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new draft post in the given primary category.
    pub fn new(category_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category_id,
            user_id: None,
            status: PostStatus::Draft,
            featured: false,
            sort_order: 0,
            options: None,
            date_available: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Build the row for a create request.
    pub fn from_new(data: &NewPost) -> Self {
        let mut post = Self::new(data.category_id);
        post.user_id = data.user_id;
        post.status = data.status;
        post.featured = data.featured;
        post.sort_order = data.sort_order;
        post.options = data.options.clone();
        post.date_available = data.date_available;
        if let Some(created_at) = data.created_at {
            post.created_at = created_at;
        }
        post
    }

    /// Apply the column changes of an update request.
    pub fn apply(&mut self, changes: &PostChanges) {
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(user_id) = changes.user_id {
            self.user_id = Some(user_id);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(featured) = changes.featured {
            self.featured = featured;
        }
        if let Some(sort_order) = changes.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(options) = &changes.options {
            self.options = Some(options.clone());
        }
        if let Some(date_available) = changes.date_available {
            self.date_available = Some(date_available);
        }
        self.updated_at = Utc::now();
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Translated attributes of a post for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTranslation {
    pub id: Uuid,
    pub post_id: Uuid,
    pub locale: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub translatable_options: Option<Value>,
}

impl Localized for PostTranslation {
    fn locale(&self) -> &str {
        &self.locale
    }
}

/// Translated attributes supplied by a write request.
///
/// On insert `title` is required and a missing `slug` is derived from it;
/// on update only the supplied attributes change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTranslationData {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub translatable_options: Option<Value>,
}

/// Create request for a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub category_id: Uuid,
    pub user_id: Option<Uuid>,
    pub status: PostStatus,
    pub featured: bool,
    pub sort_order: i32,
    pub options: Option<Value>,
    pub date_available: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub categories: Vec<Uuid>,
    pub tags: Vec<String>,
    pub translations: BTreeMap<String, PostTranslationData>,
    pub media: MediaPayload,
}

impl NewPost {
    pub fn new(category_id: Uuid) -> Self {
        Self {
            category_id,
            user_id: None,
            status: PostStatus::Draft,
            featured: false,
            sort_order: 0,
            options: None,
            date_available: None,
            created_at: None,
            categories: Vec::new(),
            tags: Vec::new(),
            translations: BTreeMap::new(),
            media: MediaPayload::default(),
        }
    }
}

/// Partial update request for a post.
///
/// `tags` replaces the post's tags; an absent list clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub category_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<PostStatus>,
    pub featured: Option<bool>,
    pub sort_order: Option<i32>,
    pub options: Option<Value>,
    pub date_available: Option<NaiveDate>,
    pub categories: Option<Vec<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub translations: BTreeMap<String, PostTranslationData>,
    pub media: Option<MediaPayload>,
}

/// The category ids a post is synced to: the requested set plus its primary
/// category, without duplicates and in request order.
pub fn category_set(categories: &[Uuid], primary: Uuid) -> Vec<Uuid> {
    let mut set: Vec<Uuid> = Vec::with_capacity(categories.len() + 1);
    for id in categories.iter().copied().chain(std::iter::once(primary)) {
        if !set.contains(&id) {
            set.push(id);
        }
    }
    set
}

/// A post with its loaded relations.
///
/// `None` on an optional relation means it was not requested.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetails {
    pub post: Post,
    pub translations: Vec<PostTranslation>,
    pub media: Vec<MediaAttachment>,
    pub category: Option<CategoryDetails>,
    pub categories: Option<Vec<CategoryDetails>>,
    pub tags: Option<Vec<Tag>>,
    pub user: Option<User>,
}

impl PostDetails {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            translations: Vec::new(),
            media: Vec::new(),
            category: None,
            categories: None,
            tags: None,
            user: None,
        }
    }

    pub fn translation(&self, locale: &str, fallback: &str) -> Option<&PostTranslation> {
        translate(&self.translations, locale, fallback)
    }

    fn media_set<'a>(&'a self, site: &'a SiteContext) -> MediaSet<'a> {
        MediaSet {
            attachments: &self.media,
            base_url: &site.base_url,
            default_image: &site.default_image,
        }
    }

    /// Main image: the `mainimage` zone, then `options.mainimage`, then the default.
    pub fn main_image(&self, site: &SiteContext) -> Image {
        let legacy = self
            .post
            .options
            .as_ref()
            .and_then(|o| o.get("mainimage"))
            .and_then(Value::as_str);
        self.media_set(site).image_or_default(&Zone::MainImage, legacy)
    }

    pub fn secondary_image(&self, site: &SiteContext) -> Image {
        self.media_set(site)
            .image_or_default(&Zone::SecondaryImage, None)
    }

    pub fn gallery(&self, site: &SiteContext) -> Vec<Image> {
        self.media_set(site).all_in(&Zone::Gallery)
    }

    /// Public URL of the post, or `None` without a loaded primary category
    /// or a slug in the locale.
    pub fn url(&self, site: &SiteContext, locale: &str) -> Option<String> {
        let category = self.category.as_ref()?;
        let category_slug = category.translation(locale, &site.default_locale)?.slug.as_str();
        let slug = self.translation(locale, &site.default_locale)?.slug.as_str();

        if site.use_old_routes {
            Some(site.link(&[locale, category_slug, slug]))
        } else {
            Some(site.link(&[locale, "blog", category_slug, slug]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::{Category, CategoryTranslation};
    use crate::domain::media::MediaFile;

    fn site() -> SiteContext {
        SiteContext::new("https://blog.test", "en")
    }

    fn post_translation(post_id: Uuid, locale: &str, slug: &str) -> PostTranslation {
        PostTranslation {
            id: Uuid::new_v4(),
            post_id,
            locale: locale.to_string(),
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: None,
            summary: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            translatable_options: None,
        }
    }

    fn category_details(slug: &str) -> CategoryDetails {
        let category = Category::new(None);
        let translation = CategoryTranslation {
            id: Uuid::new_v4(),
            category_id: category.id,
            locale: "en".to_string(),
            title: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
        };
        let mut details = CategoryDetails::new(category);
        details.translations.push(translation);
        details
    }

    #[test]
    fn test_status_round_trip_through_i16() {
        for status in [
            PostStatus::Draft,
            PostStatus::Pending,
            PostStatus::Published,
            PostStatus::Unpublished,
        ] {
            assert_eq!(PostStatus::from_i16(status.as_i16()), Some(status));
        }
        assert_eq!(PostStatus::from_i16(9), None);
        assert_eq!(PostStatus::Published.as_i16(), 2);
    }

    #[test]
    fn test_category_set_contains_primary() {
        let primary = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(category_set(&[], primary), vec![primary]);
        assert_eq!(category_set(&[other], primary), vec![other, primary]);
        assert_eq!(
            category_set(&[primary, other, primary], primary),
            vec![primary, other]
        );
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut post = Post::new(Uuid::new_v4());
        post.sort_order = 4;
        let new_category = Uuid::new_v4();

        post.apply(&PostChanges {
            category_id: Some(new_category),
            status: Some(PostStatus::Published),
            ..Default::default()
        });

        assert_eq!(post.category_id, new_category);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.sort_order, 4);
        assert!(!post.featured);
    }

    #[test]
    fn test_from_new_keeps_explicit_created_at() {
        let mut data = NewPost::new(Uuid::new_v4());
        let created = "2020-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        data.created_at = Some(created);
        data.featured = true;

        let post = Post::from_new(&data);
        assert_eq!(post.created_at, created);
        assert!(post.featured);
        assert_eq!(post.category_id, data.category_id);
    }

    #[test]
    fn test_main_image_fallbacks() {
        let site = site();
        let mut details = PostDetails::new(Post::new(Uuid::new_v4()));
        assert_eq!(
            details.main_image(&site).path,
            "https://blog.test/modules/iblog/img/post/default.jpg"
        );

        details.post.options = Some(serde_json::json!({ "mainimage": "assets/legacy.jpg" }));
        assert_eq!(
            details.main_image(&site).path,
            "https://blog.test/assets/legacy.jpg"
        );

        details.media.push(MediaAttachment {
            file: MediaFile {
                id: Uuid::new_v4(),
                filename: "cover.webp".into(),
                path: "assets/media/cover.webp".into(),
                mimetype: "image/webp".into(),
                created_at: Utc::now(),
            },
            zone: Zone::MainImage,
            position: 0,
        });
        let image = details.main_image(&site);
        assert_eq!(image.path, "https://blog.test/assets/media/cover.webp");
        assert_eq!(image.mime_type, "image/webp");
    }

    #[test]
    fn test_url_requires_category() {
        let site = site();
        let post = Post::new(Uuid::new_v4());
        let mut details = PostDetails::new(post.clone());
        details
            .translations
            .push(post_translation(post.id, "en", "hello-world"));
        assert_eq!(details.url(&site, "en"), None);

        details.category = Some(category_details("news"));
        assert_eq!(
            details.url(&site, "en").as_deref(),
            Some("https://blog.test/en/blog/news/hello-world")
        );
    }

    #[test]
    fn test_url_with_old_routes_and_fallback_locale() {
        let mut site = site();
        site.use_old_routes = true;
        let post = Post::new(Uuid::new_v4());
        let mut details = PostDetails::new(post.clone());
        details
            .translations
            .push(post_translation(post.id, "en", "hello-world"));
        details.category = Some(category_details("news"));

        assert_eq!(
            details.url(&site, "es").as_deref(),
            Some("https://blog.test/es/news/hello-world")
        );
    }
}
