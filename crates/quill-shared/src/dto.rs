//! Data Transfer Objects - request/response types for the API.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::query::flexible_bool;

/// Write requests carry their payload under `attributes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRequest<T> {
    pub attributes: T,
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Object-valued keys of a flattened payload, read as per-locale attributes.
fn locale_entries<T: DeserializeOwned>(
    extra: &BTreeMap<String, Value>,
) -> Result<BTreeMap<String, T>, serde_json::Error> {
    extra
        .iter()
        .filter(|(_, value)| value.is_object())
        .map(|(locale, value)| Ok((locale.clone(), serde_json::from_value(value.clone())?)))
        .collect()
}

/// Files for a multi-file zone, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFilesPayload {
    #[serde(default)]
    pub files: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTranslationPayload {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    #[serde(alias = "meta_title")]
    pub meta_title: Option<String>,
    #[serde(alias = "meta_description")]
    pub meta_description: Option<String>,
    #[serde(alias = "meta_keywords")]
    pub meta_keywords: Option<String>,
    #[serde(alias = "translatable_options")]
    pub translatable_options: Option<Value>,
}

/// Create/update payload for a post. Locale keys (`"en": {...}`) sit next to
/// the post attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(alias = "category_id")]
    pub category_id: Option<Uuid>,
    #[serde(alias = "user_id")]
    pub user_id: Option<Uuid>,
    pub status: Option<i16>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub featured: Option<bool>,
    #[serde(alias = "sort_order")]
    pub sort_order: Option<i32>,
    pub options: Option<Value>,
    #[serde(alias = "date_available")]
    pub date_available: Option<NaiveDate>,
    #[serde(alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    pub categories: Option<Vec<Uuid>>,
    pub tags: Option<Vec<String>>,
    #[serde(alias = "medias_single")]
    pub medias_single: Option<BTreeMap<String, Option<Uuid>>>,
    #[serde(alias = "medias_multi")]
    pub medias_multi: Option<BTreeMap<String, MediaFilesPayload>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PostPayload {
    pub fn translations(
        &self,
    ) -> Result<BTreeMap<String, PostTranslationPayload>, serde_json::Error> {
        locale_entries(&self.extra)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTranslationPayload {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "meta_title")]
    pub meta_title: Option<String>,
    #[serde(alias = "meta_description")]
    pub meta_description: Option<String>,
    #[serde(alias = "meta_keywords")]
    pub meta_keywords: Option<String>,
}

/// Create/update payload for a category. `parentId: null` moves the category
/// to the root; an absent `parentId` leaves it where it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(default, alias = "parent_id", deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
    #[serde(default, alias = "show_menu", deserialize_with = "flexible_bool")]
    pub show_menu: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub featured: Option<bool>,
    #[serde(alias = "sort_order")]
    pub sort_order: Option<i32>,
    pub status: Option<i16>,
    pub options: Option<Value>,
    #[serde(alias = "medias_single")]
    pub medias_single: Option<BTreeMap<String, Option<Uuid>>>,
    #[serde(alias = "medias_multi")]
    pub medias_multi: Option<BTreeMap<String, MediaFilesPayload>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CategoryPayload {
    pub fn translations(
        &self,
    ) -> Result<BTreeMap<String, CategoryTranslationPayload>, serde_json::Error> {
        locale_entries(&self.extra)
    }
}

/// Resolved image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub mime_type: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFileResponse {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub mime_type: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

/// Translated post attributes of one locale, as emitted with `allTranslations`.
/// Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLocaleFields {
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub description: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLocaleFields {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translatable_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: i16,
    pub status_name: String,
    /// `"1"` or `"0"`.
    pub featured: String,
    pub sort_order: String,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_available: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `1` when the post is in the trash.
    pub deleted: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<ImageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_image: Option<ImageResponse>,
    pub gallery: Vec<ImageResponse>,
    pub media_files: BTreeMap<String, Vec<MediaFileResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Box<CategoryResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(flatten)]
    pub locales: BTreeMap<String, PostLocaleFields>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    /// `"#"` when the category has no slug in the locale.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub show_menu: bool,
    pub featured: String,
    pub sort_order: String,
    pub status: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<ImageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_image: Option<ImageResponse>,
    pub media_files: BTreeMap<String, Vec<MediaFileResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<CategoryResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostResponse>>,
    #[serde(flatten)]
    pub locales: BTreeMap<String, CategoryLocaleFields>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_payload_reads_locales_and_aliases() {
        let category = Uuid::new_v4();
        let payload: DataRequest<PostPayload> = serde_json::from_value(json!({
            "attributes": {
                "category_id": category,
                "featured": "1",
                "tags": ["rust", "web"],
                "mediasSingle": { "mainimage": null },
                "en": { "title": "Hello", "meta_title": "Hi" },
                "es": { "title": "Hola" }
            }
        }))
        .unwrap();
        let post = payload.attributes;

        assert_eq!(post.category_id, Some(category));
        assert_eq!(post.featured, Some(true));
        assert_eq!(post.tags.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(post.translations().unwrap().len(), 2);
        assert_eq!(post.medias_single.unwrap().get("mainimage"), Some(&None));
    }

    #[test]
    fn test_post_translations_from_locale_keys() {
        let payload: PostPayload = serde_json::from_value(json!({
            "status": 2,
            "en": { "title": "Hello", "meta_title": "Hi" },
            "es": { "title": "Hola" }
        }))
        .unwrap();

        let translations = payload.translations().unwrap();
        assert_eq!(translations.len(), 2);
        assert_eq!(translations["en"].meta_title.as_deref(), Some("Hi"));
        assert_eq!(translations["es"].title.as_deref(), Some("Hola"));
    }

    #[test]
    fn test_category_parent_null_vs_absent() {
        let moved: CategoryPayload = serde_json::from_value(json!({ "parentId": null })).unwrap();
        assert_eq!(moved.parent_id, Some(None));

        let untouched: CategoryPayload = serde_json::from_value(json!({ "showMenu": 1 })).unwrap();
        assert_eq!(untouched.parent_id, None);
        assert_eq!(untouched.show_menu, Some(true));
    }

    #[test]
    fn test_response_omits_absent_values() {
        let response = PostResponse {
            id: Uuid::nil(),
            featured: "0".into(),
            sort_order: "3".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["featured"], "0");
        assert_eq!(json["sortOrder"], "3");
        assert!(json.get("title").is_none());
        assert!(json.get("category").is_none());
    }
}
