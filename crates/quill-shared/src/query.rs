//! Query-string shapes accepted by the list and item endpoints.
//!
//! `filter`, `order` and `setting` arrive as JSON text inside the query
//! string and are parsed in a second step with [`parse_json`].

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Raw query string of `GET` endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
    pub include: Option<String>,
    pub page: Option<u64>,
    pub take: Option<u64>,
    pub fields: Option<String>,
    pub order: Option<String>,
    pub setting: Option<String>,
    pub locale: Option<String>,
}

/// Parse an optional JSON query parameter. Absent and blank values yield the
/// default.
pub fn parse_json<T: DeserializeOwned + Default>(
    raw: Option<&str>,
) -> Result<T, serde_json::Error> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => serde_json::from_str(text),
        _ => Ok(T::default()),
    }
}

/// A single value or a list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Booleans as sent by form-driven clients: `true`, `1`, `"1"`, `"true"`.
pub fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|n| n != 0.0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "0" | "false" | "no" | "off" => Some(false),
            _ => Some(true),
        },
        Some(_) => Some(true),
    })
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flexible_bool(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDto {
    pub field: Option<String>,
    pub way: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateFilterDto {
    pub field: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDto {
    #[serde(default, deserialize_with = "flag")]
    pub from_admin: bool,
}

/// `filter` of `GET /posts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilterDto {
    pub categories: Option<OneOrMany<Uuid>>,
    pub category: Option<Uuid>,
    #[serde(default, deserialize_with = "flag")]
    pub only_trashed: bool,
    #[serde(default, deserialize_with = "flag")]
    pub with_trashed: bool,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub featured: Option<bool>,
    pub tag_id: Option<Uuid>,
    pub tag_slug: Option<String>,
    pub tag: Option<String>,
    pub users: Option<OneOrMany<Uuid>>,
    pub include: Option<OneOrMany<Uuid>>,
    pub exclude: Option<OneOrMany<Uuid>>,
    #[serde(alias = "exclude_categories")]
    pub exclude_categories: Option<OneOrMany<Uuid>>,
    #[serde(alias = "exclude_users")]
    pub exclude_users: Option<OneOrMany<Uuid>>,
    pub search: Option<String>,
    pub locale: Option<String>,
    pub date: Option<DateFilterDto>,
    pub order: Option<OrderDto>,
    pub status: Option<i16>,
    #[serde(default, deserialize_with = "flag")]
    pub no_sort_order: bool,
    #[serde(default, deserialize_with = "flag")]
    pub all_translations: bool,
}

/// `filter` of `GET /categories`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilterDto {
    #[serde(alias = "parent_id")]
    pub parent_id: Option<Uuid>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub featured: Option<bool>,
    #[serde(default, alias = "show_menu", deserialize_with = "flexible_bool")]
    pub show_menu: Option<bool>,
    pub search: Option<String>,
    pub locale: Option<String>,
    pub include: Option<OneOrMany<Uuid>>,
    pub exclude: Option<OneOrMany<Uuid>>,
    #[serde(default, deserialize_with = "flag")]
    pub only_trashed: bool,
    #[serde(default, deserialize_with = "flag")]
    pub with_trashed: bool,
    pub order: Option<OrderDto>,
    #[serde(default, deserialize_with = "flag")]
    pub all_translations: bool,
}

/// `filter` of single-item reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilterDto {
    pub field: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub only_trashed: bool,
    #[serde(default, deserialize_with = "flag")]
    pub with_trashed: bool,
    #[serde(default, deserialize_with = "flag")]
    pub all_translations: bool,
}

/// `filter` of `PUT` and `DELETE`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFilterDto {
    pub field: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub force: bool,
}
