use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - free-form taxonomy attached to posts by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new tag; the slug is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            created_at: Utc::now(),
        }
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed into one `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   &  SQL  "), "rust-sql");
        assert_eq!(slugify("Año Nuevo"), "año-nuevo");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_new_tag_trims_name() {
        let tag = Tag::new("  Release Notes ");
        assert_eq!(tag.name, "Release Notes");
        assert_eq!(tag.slug, "release-notes");
    }
}
