use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file registered by the host file storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub mimetype: String,
    pub created_at: DateTime<Utc>,
}

/// Named attachment slot on a post or category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Zone {
    MainImage,
    SecondaryImage,
    Gallery,
    Custom(String),
}

impl Zone {
    pub fn as_str(&self) -> &str {
        match self {
            Zone::MainImage => "mainimage",
            Zone::SecondaryImage => "secondaryimage",
            Zone::Gallery => "gallery",
            Zone::Custom(name) => name,
        }
    }
}

impl From<&str> for Zone {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "mainimage" => Zone::MainImage,
            "secondaryimage" => Zone::SecondaryImage,
            "gallery" => Zone::Gallery,
            other => Zone::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity that owns translations and media zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Post,
    Category,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Post => "post",
            EntityKind::Category => "category",
        }
    }
}

/// A file placed in a zone.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAttachment {
    pub file: MediaFile,
    pub zone: Zone,
    pub position: i32,
}

/// Resolved image reference as served to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub mime_type: String,
    pub path: String,
}

impl Image {
    fn from_file(file: &MediaFile, base_url: &str) -> Self {
        Self {
            mime_type: file.mimetype.clone(),
            path: public_url(base_url, &file.path),
        }
    }

    fn jpeg(base_url: &str, path: &str) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            path: public_url(base_url, path),
        }
    }
}

/// Join a stored path onto the public base URL. Absolute URLs pass through.
pub fn public_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Media lookups shared by posts and categories.
pub(crate) struct MediaSet<'a> {
    pub attachments: &'a [MediaAttachment],
    pub base_url: &'a str,
    pub default_image: &'a str,
}

impl MediaSet<'_> {
    pub fn first_in(&self, zone: &Zone) -> Option<Image> {
        self.attachments
            .iter()
            .filter(|a| &a.zone == zone)
            .min_by_key(|a| a.position)
            .map(|a| Image::from_file(&a.file, self.base_url))
    }

    /// `fallback_path` is consulted before the configured default image.
    pub fn image_or_default(&self, zone: &Zone, fallback_path: Option<&str>) -> Image {
        self.first_in(zone).unwrap_or_else(|| {
            Image::jpeg(self.base_url, fallback_path.unwrap_or(self.default_image))
        })
    }

    pub fn all_in(&self, zone: &Zone) -> Vec<Image> {
        let mut files: Vec<&MediaAttachment> =
            self.attachments.iter().filter(|a| &a.zone == zone).collect();
        files.sort_by_key(|a| a.position);
        files
            .into_iter()
            .map(|a| Image::from_file(&a.file, self.base_url))
            .collect()
    }
}

/// Media assignment carried by create/update payloads.
///
/// Only zones named here are rewritten; other zones keep their files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPayload {
    pub single: BTreeMap<String, Option<Uuid>>,
    pub multi: BTreeMap<String, Vec<Uuid>>,
}

impl MediaPayload {
    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.multi.is_empty()
    }

    /// Zones that will be replaced, each with its ordered file ids.
    pub fn assignments(&self) -> Vec<(Zone, Vec<Uuid>)> {
        let singles = self
            .single
            .iter()
            .map(|(zone, file)| (Zone::from(zone.as_str()), file.iter().copied().collect()));
        let multis = self
            .multi
            .iter()
            .map(|(zone, files)| (Zone::from(zone.as_str()), files.clone()));
        singles.chain(multis).collect()
    }
}
