use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::media::{Image, MediaAttachment, MediaPayload, MediaSet, Zone};
use super::post::PostDetails;
use super::site::SiteContext;
use super::translation::{Localized, translate};

/// Category entity - hierarchical grouping of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub show_menu: bool,
    pub featured: bool,
    pub sort_order: i32,
    pub status: i16,
    pub options: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(parent_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            parent_id,
            show_menu: false,
            featured: false,
            sort_order: 0,
            status: 1,
            options: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn from_new(data: &NewCategory) -> Self {
        let mut category = Self::new(data.parent_id);
        category.show_menu = data.show_menu;
        category.featured = data.featured;
        category.sort_order = data.sort_order;
        category.status = data.status;
        category.options = data.options.clone();
        category
    }

    pub fn apply(&mut self, changes: &CategoryChanges) {
        if let Some(parent_id) = changes.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(show_menu) = changes.show_menu {
            self.show_menu = show_menu;
        }
        if let Some(featured) = changes.featured {
            self.featured = featured;
        }
        if let Some(sort_order) = changes.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(options) = &changes.options {
            self.options = Some(options.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Translated attributes of a category for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    pub id: Uuid,
    pub category_id: Uuid,
    pub locale: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

impl Localized for CategoryTranslation {
    fn locale(&self) -> &str {
        &self.locale
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTranslationData {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCategory {
    pub parent_id: Option<Uuid>,
    pub show_menu: bool,
    pub featured: bool,
    pub sort_order: i32,
    pub status: i16,
    pub options: Option<Value>,
    pub translations: BTreeMap<String, CategoryTranslationData>,
    pub media: MediaPayload,
}

/// Partial update request. `parent_id: Some(None)` moves the category to the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub parent_id: Option<Option<Uuid>>,
    pub show_menu: Option<bool>,
    pub featured: Option<bool>,
    pub sort_order: Option<i32>,
    pub status: Option<i16>,
    pub options: Option<Value>,
    pub translations: BTreeMap<String, CategoryTranslationData>,
    pub media: Option<MediaPayload>,
}

/// A category with its loaded relations.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetails {
    pub category: Category,
    pub translations: Vec<CategoryTranslation>,
    pub media: Vec<MediaAttachment>,
    pub parent: Option<Box<CategoryDetails>>,
    pub children: Option<Vec<CategoryDetails>>,
    pub posts: Option<Vec<PostDetails>>,
}

impl CategoryDetails {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            translations: Vec::new(),
            media: Vec::new(),
            parent: None,
            children: None,
            posts: None,
        }
    }

    pub fn translation(&self, locale: &str, fallback: &str) -> Option<&CategoryTranslation> {
        translate(&self.translations, locale, fallback)
    }

    fn media_set<'a>(&'a self, site: &'a SiteContext) -> MediaSet<'a> {
        MediaSet {
            attachments: &self.media,
            base_url: &site.base_url,
            default_image: &site.default_image,
        }
    }

    pub fn main_image(&self, site: &SiteContext) -> Image {
        let legacy = self
            .category
            .options
            .as_ref()
            .and_then(|o| o.get("mainimage"))
            .and_then(Value::as_str);
        self.media_set(site).image_or_default(&Zone::MainImage, legacy)
    }

    /// Unlike posts, a category without a secondary image has none.
    pub fn secondary_image(&self, site: &SiteContext) -> Option<Image> {
        self.media_set(site).first_in(&Zone::SecondaryImage)
    }

    pub fn url(&self, site: &SiteContext, locale: &str) -> Option<String> {
        let slug = self.translation(locale, &site.default_locale)?.slug.as_str();
        Some(site.link(&[locale, "blog", slug]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_moves_to_root() {
        let mut category = Category::new(Some(Uuid::new_v4()));
        category.apply(&CategoryChanges {
            parent_id: Some(None),
            ..Default::default()
        });
        assert_eq!(category.parent_id, None);
    }

    #[test]
    fn test_apply_without_parent_keeps_parent() {
        let parent = Uuid::new_v4();
        let mut category = Category::new(Some(parent));
        category.apply(&CategoryChanges {
            show_menu: Some(true),
            ..Default::default()
        });
        assert_eq!(category.parent_id, Some(parent));
        assert!(category.show_menu);
    }

    #[test]
    fn test_url_uses_translated_slug() {
        let site = SiteContext::new("https://blog.test/", "en");
        let category = Category::new(None);
        let mut details = CategoryDetails::new(category.clone());
        assert_eq!(details.url(&site, "en"), None);

        details.translations.push(CategoryTranslation {
            id: Uuid::new_v4(),
            category_id: category.id,
            locale: "en".into(),
            title: "News".into(),
            slug: "news".into(),
            description: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
        });
        assert_eq!(
            details.url(&site, "en").as_deref(),
            Some("https://blog.test/en/blog/news")
        );
        assert!(details.secondary_image(&site).is_none());
    }
}
