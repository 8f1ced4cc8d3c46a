//! Batched relation loading.
//!
//! Each relation is fetched with one query for the whole page of rows, then
//! stitched onto the domain details in memory.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::query::{CategoryInclude, PostInclude};
use quill_core::domain::{
    Category, CategoryDetails, EntityKind, MediaAttachment, MediaFile, Post, PostDetails, Tag,
    User, Zone,
};

use super::entity::{
    category, category_translation, media_file, media_zone, post, post_category, post_tag,
    post_translation, tag, user,
};

fn group_by<T, K, F>(rows: Vec<T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// Distinct ids in first-seen order.
fn unique(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Media attachments of `ids`, grouped by owner and ordered by position.
pub(crate) async fn load_media<C>(
    db: &C,
    kind: EntityKind,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<MediaAttachment>>, DbErr>
where
    C: ConnectionTrait,
{
    let zones = media_zone::Entity::find()
        .filter(media_zone::Column::EntityType.eq(kind.as_str()))
        .filter(media_zone::Column::EntityId.is_in(ids.iter().copied()))
        .order_by_asc(media_zone::Column::Position)
        .all(db)
        .await?;
    if zones.is_empty() {
        return Ok(HashMap::new());
    }

    let files: HashMap<Uuid, MediaFile> = media_file::Entity::find()
        .filter(media_file::Column::Id.is_in(unique(zones.iter().map(|z| z.file_id))))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, MediaFile::from(m)))
        .collect();

    let mut media: HashMap<Uuid, Vec<MediaAttachment>> = HashMap::new();
    for zone in zones {
        if let Some(file) = files.get(&zone.file_id) {
            media.entry(zone.entity_id).or_default().push(MediaAttachment {
                file: file.clone(),
                zone: Zone::from(zone.zone.as_str()),
                position: zone.position,
            });
        }
    }
    Ok(media)
}

/// Categories with their translations and media, nothing else.
pub(crate) async fn load_category_basics<C>(
    db: &C,
    models: Vec<category::Model>,
) -> Result<Vec<CategoryDetails>, DbErr>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let translations = category_translation::Entity::find()
        .filter(category_translation::Column::CategoryId.is_in(ids.clone()))
        .order_by_asc(category_translation::Column::Locale)
        .all(db)
        .await?;
    let mut translations = group_by(translations, |t| t.category_id);
    let mut media = load_media(db, EntityKind::Category, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut details = CategoryDetails::new(Category::from(model));
            details.translations = translations
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect();
            details.media = media.remove(&id).unwrap_or_default();
            details
        })
        .collect())
}

async fn load_category_map<C>(db: &C, ids: &[Uuid]) -> Result<HashMap<Uuid, CategoryDetails>, DbErr>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = category::Entity::find()
        .filter(category::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(load_category_basics(db, models)
        .await?
        .into_iter()
        .map(|details| (details.category.id, details))
        .collect())
}

/// Posts with translations, media and primary category, plus the requested
/// relations.
pub(crate) async fn load_posts<C>(
    db: &C,
    models: Vec<post::Model>,
    includes: &[PostInclude],
) -> Result<Vec<PostDetails>, DbErr>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let translations = post_translation::Entity::find()
        .filter(post_translation::Column::PostId.is_in(ids.clone()))
        .order_by_asc(post_translation::Column::Locale)
        .all(db)
        .await?;
    let mut translations = group_by(translations, |t| t.post_id);
    let mut media = load_media(db, EntityKind::Post, &ids).await?;

    let pivots = if includes.contains(&PostInclude::Categories) {
        post_category::Entity::find()
            .filter(post_category::Column::PostId.is_in(ids.clone()))
            .all(db)
            .await?
    } else {
        Vec::new()
    };
    let categories = load_category_map(
        db,
        &unique(
            models
                .iter()
                .map(|m| m.category_id)
                .chain(pivots.iter().map(|p| p.category_id)),
        ),
    )
    .await?;
    let pivots = group_by(pivots, |p| p.post_id);

    let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    if includes.contains(&PostInclude::Tags) {
        let tag_pivots = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(ids.clone()))
            .all(db)
            .await?;
        let tag_ids = unique(tag_pivots.iter().map(|p| p.tag_id));
        let tags: HashMap<Uuid, Tag> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            tag::Entity::find()
                .filter(tag::Column::Id.is_in(tag_ids))
                .order_by_asc(tag::Column::Name)
                .all(db)
                .await?
                .into_iter()
                .map(|m| (m.id, Tag::from(m)))
                .collect()
        };
        for pivot in tag_pivots {
            if let Some(tag) = tags.get(&pivot.tag_id) {
                tags_by_post.entry(pivot.post_id).or_default().push(tag.clone());
            }
        }
        for tags in tags_by_post.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }

    let users: HashMap<Uuid, User> = if includes.contains(&PostInclude::User) {
        let user_ids = unique(models.iter().filter_map(|m| m.user_id));
        if user_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::Id.is_in(user_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|m| (m.id, User::from(m)))
                .collect()
        }
    } else {
        HashMap::new()
    };

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let primary = model.category_id;
            let user_id = model.user_id;
            let mut details = PostDetails::new(Post::from(model));

            details.translations = translations
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect();
            details.media = media.remove(&id).unwrap_or_default();
            details.category = categories.get(&primary).cloned();

            if includes.contains(&PostInclude::Categories) {
                details.categories = Some(
                    pivots
                        .get(&id)
                        .map(|rows| {
                            rows.iter()
                                .filter_map(|p| categories.get(&p.category_id).cloned())
                                .collect()
                        })
                        .unwrap_or_default(),
                );
            }
            if includes.contains(&PostInclude::Tags) {
                details.tags = Some(tags_by_post.remove(&id).unwrap_or_default());
            }
            if includes.contains(&PostInclude::User) {
                details.user = user_id.and_then(|uid| users.get(&uid).cloned());
            }
            details
        })
        .collect())
}

/// Categories with translations and media, plus the requested relations.
pub(crate) async fn load_categories<C>(
    db: &C,
    models: Vec<category::Model>,
    includes: &[CategoryInclude],
) -> Result<Vec<CategoryDetails>, DbErr>
where
    C: ConnectionTrait,
{
    let mut details = load_category_basics(db, models).await?;
    if details.is_empty() {
        return Ok(details);
    }
    let ids: Vec<Uuid> = details.iter().map(|d| d.category.id).collect();

    if includes.contains(&CategoryInclude::Parent) {
        let parent_ids = unique(details.iter().filter_map(|d| d.category.parent_id));
        let parents = load_category_map(db, &parent_ids).await?;
        for item in &mut details {
            item.parent = item
                .category
                .parent_id
                .and_then(|pid| parents.get(&pid).cloned())
                .map(Box::new);
        }
    }

    if includes.contains(&CategoryInclude::Children) {
        let children = category::Entity::find()
            .filter(category::Column::ParentId.is_in(ids.clone()))
            .filter(category::Column::DeletedAt.is_null())
            .order_by_desc(category::Column::SortOrder)
            .all(db)
            .await?;
        let mut children = group_by(load_category_basics(db, children).await?, |c| {
            c.category.parent_id
        });
        for item in &mut details {
            item.children = Some(children.remove(&Some(item.category.id)).unwrap_or_default());
        }
    }

    if includes.contains(&CategoryInclude::Posts) {
        let pivots = post_category::Entity::find()
            .filter(post_category::Column::CategoryId.is_in(ids.clone()))
            .all(db)
            .await?;
        let post_ids = unique(pivots.iter().map(|p| p.post_id));
        let posts: HashMap<Uuid, PostDetails> = if post_ids.is_empty() {
            HashMap::new()
        } else {
            let models = post::Entity::find()
                .filter(post::Column::Id.is_in(post_ids))
                .filter(post::Column::DeletedAt.is_null())
                .order_by_desc(post::Column::CreatedAt)
                .all(db)
                .await?;
            load_posts(db, models, &[])
                .await?
                .into_iter()
                .map(|p| (p.post.id, p))
                .collect()
        };
        let pivots = group_by(pivots, |p| p.category_id);
        for item in &mut details {
            let mut list: Vec<PostDetails> = pivots
                .get(&item.category.id)
                .map(|rows| {
                    rows.iter()
                        .filter_map(|p| posts.get(&p.post_id).cloned())
                        .collect()
                })
                .unwrap_or_default();
            list.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
            item.posts = Some(list);
        }
    }

    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_keeps_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert_eq!(unique([b, a, b, c, a]), vec![b, a, c]);
        assert!(unique(Vec::new()).is_empty());
    }
}
