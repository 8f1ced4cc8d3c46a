//! Relation writes run inside the create/update/delete transactions.

use std::collections::BTreeMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use uuid::Uuid;

use quill_core::domain::{
    CategoryTranslationData, EntityKind, MediaPayload, PostTranslationData, Tag, slugify,
};
use quill_core::error::RepoError;

use super::entity::{
    category_translation, media_zone, post_category, post_tag, post_translation, tag,
};
use super::postgres_base::db_err;

/// Title and slug for a new translation row.
fn title_and_slug(
    locale: &str,
    title: Option<&String>,
    slug: Option<&String>,
) -> Result<(String, String), RepoError> {
    let title = title
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RepoError::Validation(format!("title is required for locale '{locale}'")))?
        .to_string();
    let slug = slug
        .map(|s| slugify(s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&title));
    Ok((title, slug))
}

/// Insert or update one translation row per supplied locale.
pub(crate) async fn upsert_post_translations<C>(
    db: &C,
    post_id: Uuid,
    translations: &BTreeMap<String, PostTranslationData>,
) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    for (locale, data) in translations {
        let existing = post_translation::Entity::find()
            .filter(post_translation::Column::PostId.eq(post_id))
            .filter(post_translation::Column::Locale.eq(locale.as_str()))
            .one(db)
            .await
            .map_err(db_err)?;

        match existing {
            Some(row) => {
                let mut active = row.into_active_model();
                if let Some(title) = &data.title {
                    active.title = Set(title.clone());
                }
                if let Some(slug) = &data.slug {
                    active.slug = Set(slugify(slug));
                }
                if data.description.is_some() {
                    active.description = Set(data.description.clone());
                }
                if data.summary.is_some() {
                    active.summary = Set(data.summary.clone());
                }
                if data.meta_title.is_some() {
                    active.meta_title = Set(data.meta_title.clone());
                }
                if data.meta_description.is_some() {
                    active.meta_description = Set(data.meta_description.clone());
                }
                if data.meta_keywords.is_some() {
                    active.meta_keywords = Set(data.meta_keywords.clone());
                }
                if data.translatable_options.is_some() {
                    active.translatable_options = Set(data.translatable_options.clone());
                }
                if active.is_changed() {
                    active.update(db).await.map_err(db_err)?;
                }
            }
            None => {
                let (title, slug) =
                    title_and_slug(locale, data.title.as_ref(), data.slug.as_ref())?;
                post_translation::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    post_id: Set(post_id),
                    locale: Set(locale.clone()),
                    title: Set(title),
                    slug: Set(slug),
                    description: Set(data.description.clone()),
                    summary: Set(data.summary.clone()),
                    meta_title: Set(data.meta_title.clone()),
                    meta_description: Set(data.meta_description.clone()),
                    meta_keywords: Set(data.meta_keywords.clone()),
                    translatable_options: Set(data.translatable_options.clone()),
                }
                .insert(db)
                .await
                .map_err(db_err)?;
            }
        }
    }
    Ok(())
}

pub(crate) async fn upsert_category_translations<C>(
    db: &C,
    category_id: Uuid,
    translations: &BTreeMap<String, CategoryTranslationData>,
) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    for (locale, data) in translations {
        let existing = category_translation::Entity::find()
            .filter(category_translation::Column::CategoryId.eq(category_id))
            .filter(category_translation::Column::Locale.eq(locale.as_str()))
            .one(db)
            .await
            .map_err(db_err)?;

        match existing {
            Some(row) => {
                let mut active = row.into_active_model();
                if let Some(title) = &data.title {
                    active.title = Set(title.clone());
                }
                if let Some(slug) = &data.slug {
                    active.slug = Set(slugify(slug));
                }
                if data.description.is_some() {
                    active.description = Set(data.description.clone());
                }
                if data.meta_title.is_some() {
                    active.meta_title = Set(data.meta_title.clone());
                }
                if data.meta_description.is_some() {
                    active.meta_description = Set(data.meta_description.clone());
                }
                if data.meta_keywords.is_some() {
                    active.meta_keywords = Set(data.meta_keywords.clone());
                }
                if active.is_changed() {
                    active.update(db).await.map_err(db_err)?;
                }
            }
            None => {
                let (title, slug) =
                    title_and_slug(locale, data.title.as_ref(), data.slug.as_ref())?;
                category_translation::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    category_id: Set(category_id),
                    locale: Set(locale.clone()),
                    title: Set(title),
                    slug: Set(slug),
                    description: Set(data.description.clone()),
                    meta_title: Set(data.meta_title.clone()),
                    meta_description: Set(data.meta_description.clone()),
                    meta_keywords: Set(data.meta_keywords.clone()),
                }
                .insert(db)
                .await
                .map_err(db_err)?;
            }
        }
    }
    Ok(())
}

/// Replace the pivot rows of a post with exactly `categories`.
pub(crate) async fn sync_categories<C>(
    db: &C,
    post_id: Uuid,
    categories: &[Uuid],
) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    post_category::Entity::delete_many()
        .filter(post_category::Column::PostId.eq(post_id))
        .exec(db)
        .await
        .map_err(db_err)?;

    if categories.is_empty() {
        return Ok(());
    }
    post_category::Entity::insert_many(categories.iter().map(|&category_id| {
        post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
        }
    }))
    .exec_without_returning(db)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Add one pivot row unless it already exists.
pub(crate) async fn attach_category<C>(
    db: &C,
    post_id: Uuid,
    category_id: Uuid,
) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    let existing = post_category::Entity::find_by_id((post_id, category_id))
        .one(db)
        .await
        .map_err(db_err)?;
    if existing.is_none() {
        post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
        }
        .insert(db)
        .await
        .map_err(db_err)?;
    }
    Ok(())
}

/// Make `names` the tags of a post, creating unknown tags by slug.
pub(crate) async fn assign_tags<C>(
    db: &C,
    post_id: Uuid,
    names: &[String],
) -> Result<Vec<Uuid>, RepoError>
where
    C: ConnectionTrait,
{
    let mut tag_ids: Vec<Uuid> = Vec::with_capacity(names.len());
    for name in names {
        let slug = slugify(name);
        if slug.is_empty() {
            continue;
        }
        let existing = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug.as_str()))
            .one(db)
            .await
            .map_err(db_err)?;
        let id = match existing {
            Some(row) => row.id,
            None => {
                tracing::debug!(tag = %slug, "Creating tag");
                tag::ActiveModel::from(Tag::new(name.as_str()))
                    .insert(db)
                    .await
                    .map_err(db_err)?
                    .id
            }
        };
        if !tag_ids.contains(&id) {
            tag_ids.push(id);
        }
    }

    untag(db, post_id).await?;
    if !tag_ids.is_empty() {
        post_tag::Entity::insert_many(tag_ids.iter().map(|&tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
        }))
        .exec_without_returning(db)
        .await
        .map_err(db_err)?;
    }
    Ok(tag_ids)
}

/// Remove every tag from a post. Tags themselves are kept.
pub(crate) async fn untag<C>(db: &C, post_id: Uuid) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Rewrite the zones named in `payload`; other zones are left alone.
pub(crate) async fn sync_media<C>(
    db: &C,
    kind: EntityKind,
    entity_id: Uuid,
    payload: &MediaPayload,
) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    for (zone, files) in payload.assignments() {
        media_zone::Entity::delete_many()
            .filter(media_zone::Column::EntityType.eq(kind.as_str()))
            .filter(media_zone::Column::EntityId.eq(entity_id))
            .filter(media_zone::Column::Zone.eq(zone.as_str()))
            .exec(db)
            .await
            .map_err(db_err)?;

        if files.is_empty() {
            continue;
        }
        let rows = files
            .iter()
            .enumerate()
            .map(|(position, &file_id)| media_zone::ActiveModel {
                id: Set(Uuid::new_v4()),
                file_id: Set(file_id),
                entity_type: Set(kind.as_str().to_string()),
                entity_id: Set(entity_id),
                zone: Set(zone.as_str().to_string()),
                position: Set(position as i32),
            });
        media_zone::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await
            .map_err(db_err)?;
    }
    Ok(())
}

/// Detach every file from an entity.
pub(crate) async fn clear_media<C>(db: &C, kind: EntityKind, entity_id: Uuid) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    media_zone::Entity::delete_many()
        .filter(media_zone::Column::EntityType.eq(kind.as_str()))
        .filter(media_zone::Column::EntityId.eq(entity_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_translation_derives_slug() {
        let title = "Hello, World".to_string();
        assert_eq!(
            title_and_slug("en", Some(&title), None).unwrap(),
            ("Hello, World".to_string(), "hello-world".to_string())
        );

        let slug = "Custom Slug".to_string();
        assert_eq!(
            title_and_slug("en", Some(&title), Some(&slug)).unwrap().1,
            "custom-slug"
        );
    }

    #[test]
    fn test_new_translation_requires_title() {
        let blank = "  ".to_string();
        assert!(matches!(
            title_and_slug("es", Some(&blank), None),
            Err(RepoError::Validation(msg)) if msg.contains("'es'")
        ));
        assert!(title_and_slug("es", None, None).is_err());
    }
}
