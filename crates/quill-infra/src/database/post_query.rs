//! Post listing query.
//!
//! [`build_post_select`] turns typed listing parameters into a single
//! [`Select`]. Clauses are added in a fixed order:
//!
//! 1. `categories` (pivot or primary category)
//! 2. trashed scope
//! 3. `featured`
//! 4. `category` with its descendants
//! 5. tag id and tag slugs
//! 6. users and excluded users
//! 7. included and excluded ids
//! 8. excluded categories
//! 9. search on the translated title
//! 10. date range
//! 11. filter order (ignored while searching)
//! 12. status
//! 13. `sort_order` descending unless disabled
//! 14. public availability, unless listing for the admin
//! 15. explicit orders
//!
//! Building is free of I/O so the generated SQL can be asserted directly.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, IntoCondition, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use uuid::Uuid;

use quill_core::domain::PostStatus;
use quill_core::domain::query::{
    DateRange, Lookup, PostColumn, PostDateField, PostListParams, PostSortField, SortField,
    SortSpec, TranslatedField, normalize_search,
};

use super::entity::{post, post_category, post_tag, post_translation, tag};
use super::scopes;

pub(crate) fn post_column(column: PostColumn) -> post::Column {
    match column {
        PostColumn::Id => post::Column::Id,
        PostColumn::CategoryId => post::Column::CategoryId,
        PostColumn::UserId => post::Column::UserId,
        PostColumn::Status => post::Column::Status,
        PostColumn::Featured => post::Column::Featured,
        PostColumn::SortOrder => post::Column::SortOrder,
        PostColumn::DateAvailable => post::Column::DateAvailable,
        PostColumn::CreatedAt => post::Column::CreatedAt,
        PostColumn::UpdatedAt => post::Column::UpdatedAt,
    }
}

pub(crate) fn translation_column(field: TranslatedField) -> post_translation::Column {
    match field {
        TranslatedField::Title => post_translation::Column::Title,
        TranslatedField::Slug => post_translation::Column::Slug,
        TranslatedField::Description => post_translation::Column::Description,
        TranslatedField::Summary => post_translation::Column::Summary,
        TranslatedField::MetaTitle => post_translation::Column::MetaTitle,
        TranslatedField::MetaDescription => post_translation::Column::MetaDescription,
        TranslatedField::MetaKeywords => post_translation::Column::MetaKeywords,
    }
}

fn pivot_posts(categories: &[Uuid]) -> SelectStatement {
    Query::select()
        .column(post_category::Column::PostId)
        .from(post_category::Entity)
        .and_where(post_category::Column::CategoryId.is_in(categories.iter().copied()))
        .to_owned()
}

/// Posts in any of `categories`, through the pivot or as primary category.
pub(crate) fn in_categories(categories: &[Uuid]) -> Condition {
    Condition::any()
        .add(post::Column::Id.in_subquery(pivot_posts(categories)))
        .add(post::Column::CategoryId.is_in(categories.iter().copied()))
}

/// Posts attached to `category_id` through the pivot.
pub(crate) fn in_category_pivot(category_id: Uuid) -> SimpleExpr {
    post::Column::Id.in_subquery(pivot_posts(&[category_id]))
}

fn tagged_with_id(tag_id: Uuid) -> SelectStatement {
    Query::select()
        .column(post_tag::Column::PostId)
        .from(post_tag::Entity)
        .and_where(post_tag::Column::TagId.eq(tag_id))
        .to_owned()
}

/// Posts carrying the tag with `slug`.
pub(crate) fn tagged_with_slug(slug: &str) -> SimpleExpr {
    let tagged = Query::select()
        .column((post_tag::Entity, post_tag::Column::PostId))
        .from(post_tag::Entity)
        .inner_join(
            tag::Entity,
            Expr::col((tag::Entity, tag::Column::Id))
                .equals((post_tag::Entity, post_tag::Column::TagId)),
        )
        .and_where(tag::Column::Slug.eq(slug))
        .to_owned();
    post::Column::Id.in_subquery(tagged)
}

fn translations_where(condition: Condition) -> SelectStatement {
    Query::select()
        .column(post_translation::Column::PostId)
        .from(post_translation::Entity)
        .cond_where(condition)
        .to_owned()
}

/// Posts having a translation with this slug, in any locale.
pub(crate) fn with_slug(slug: &str) -> SimpleExpr {
    post::Column::Id.in_subquery(translations_where(
        Condition::all().add(post_translation::Column::Slug.eq(slug)),
    ))
}

/// Condition addressing a single post.
pub(crate) fn lookup_condition(lookup: &Lookup) -> SimpleExpr {
    match lookup {
        Lookup::Id(id) => post::Column::Id.eq(*id),
        Lookup::Translated {
            field,
            value,
            locale,
        } => post::Column::Id.in_subquery(translations_where(
            Condition::all()
                .add(translation_column(*field).eq(value.as_str()))
                .add(post_translation::Column::Locale.eq(locale.as_str())),
        )),
    }
}

/// Title search: every pattern must occur in the title of the `locale` translation.
fn title_matches(locale: &str, patterns: &[String]) -> SimpleExpr {
    let mut condition = Condition::all().add(post_translation::Column::Locale.eq(locale));
    for pattern in patterns {
        condition = condition.add(scopes::contains_lower(
            post_translation::Entity,
            post_translation::Column::Title,
            pattern,
        ));
    }
    post::Column::Id.in_subquery(translations_where(condition))
}

/// Published posts that are already available.
pub(crate) fn public_only(query: Select<post::Entity>, today: NaiveDate) -> Select<post::Entity> {
    query
        .filter(
            Condition::any()
                .add(post::Column::DateAvailable.lte(today))
                .add(post::Column::DateAvailable.is_null()),
        )
        .filter(post::Column::Status.eq(PostStatus::Published.as_i16()))
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Both bounds are inclusive. Timestamps are compared against whole days.
fn date_range(query: Select<post::Entity>, range: &DateRange) -> Select<post::Entity> {
    let column = match range.field {
        PostDateField::DateAvailable => {
            let mut query = query;
            if let Some(from) = range.from {
                query = query.filter(post::Column::DateAvailable.gte(from));
            }
            if let Some(to) = range.to {
                query = query.filter(post::Column::DateAvailable.lte(to));
            }
            return query;
        }
        PostDateField::CreatedAt => post::Column::CreatedAt,
        PostDateField::UpdatedAt => post::Column::UpdatedAt,
    };

    let mut query = query;
    if let Some(from) = range.from {
        query = query.filter(column.gte(start_of(from)));
    }
    if let Some(to) = range.to {
        match to.checked_add_days(Days::new(1)) {
            Some(next) => query = query.filter(column.lt(start_of(next))),
            None => query = query.filter(column.lte(start_of(to))),
        }
    }
    query
}

/// Join the translation of `locale` so translated attributes can be sorted on.
fn join_translation(query: Select<post::Entity>, locale: &str) -> Select<post::Entity> {
    let locale = locale.to_string();
    query.join(
        JoinType::LeftJoin,
        post::Relation::Translations
            .def()
            .on_condition(move |_left, right| {
                Expr::col((right, post_translation::Column::Locale))
                    .eq(locale.clone())
                    .into_condition()
            }),
    )
}

fn sort(
    query: Select<post::Entity>,
    spec: &SortSpec<PostSortField>,
    locale: &str,
    joined: &mut bool,
) -> Select<post::Entity> {
    let order = scopes::order(spec.way);
    match spec.field {
        SortField::Column(column) => query.order_by(post_column(column), order),
        SortField::Translated(field) => {
            let query = if *joined {
                query
            } else {
                *joined = true;
                join_translation(query, locale)
            };
            query.order_by(translation_column(field), order)
        }
    }
}

/// Build the listing query.
///
/// `category_scope` holds the requested category and its descendants when the
/// listing filters by `category`; `today` is the reference date for
/// availability.
pub(crate) fn build_post_select(
    params: &PostListParams,
    category_scope: Option<&[Uuid]>,
    today: NaiveDate,
) -> Select<post::Entity> {
    let filter = &params.filter;
    let mut query = post::Entity::find();
    let mut joined = false;

    if !filter.categories.is_empty() {
        query = query.filter(in_categories(&filter.categories));
    }

    query = scopes::trashed(query, post::Column::DeletedAt, filter.trashed_scope());

    if let Some(featured) = filter.featured {
        query = query.filter(post::Column::Featured.eq(featured));
    }

    if let Some(scope) = category_scope {
        query = query.filter(in_categories(scope));
    }

    if let Some(tag_id) = filter.tag_id {
        query = query.filter(post::Column::Id.in_subquery(tagged_with_id(tag_id)));
    }
    for slug in &filter.tag_slugs {
        query = query.filter(tagged_with_slug(slug));
    }

    if !filter.users.is_empty() {
        query = query.filter(post::Column::UserId.is_in(filter.users.iter().copied()));
    }
    if !filter.exclude_users.is_empty() {
        query = query.filter(
            Condition::any()
                .add(post::Column::UserId.is_null())
                .add(post::Column::UserId.is_not_in(filter.exclude_users.iter().copied())),
        );
    }

    if !filter.include.is_empty() {
        query = query.filter(post::Column::Id.is_in(filter.include.iter().copied()));
    }
    if !filter.exclude.is_empty() {
        query = query.filter(post::Column::Id.is_not_in(filter.exclude.iter().copied()));
    }

    if !filter.exclude_categories.is_empty() {
        query = query
            .filter(post::Column::Id.not_in_subquery(pivot_posts(&filter.exclude_categories)))
            .filter(post::Column::CategoryId.is_not_in(filter.exclude_categories.iter().copied()));
    }

    let terms = filter.search.as_deref().and_then(normalize_search);
    if let Some(terms) = &terms {
        query = query.filter(title_matches(params.search_locale(), &terms.patterns()));
    }

    if let Some(range) = &filter.date {
        query = date_range(query, range);
    }

    if terms.is_none() {
        if let Some(spec) = &filter.order {
            query = sort(query, spec, &params.locale, &mut joined);
        }
    }

    if let Some(status) = filter.status {
        query = query.filter(post::Column::Status.eq(status.as_i16()));
    }

    if !filter.no_sort_order {
        query = query.order_by_desc(post::Column::SortOrder);
    }

    if !params.from_admin {
        query = public_only(query, today);
    }

    for spec in &params.order {
        query = sort(query, spec, &params.locale, &mut joined);
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::query::{SortWay, TrashedScope};
    use sea_orm::{DbBackend, QueryTrait};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn sql(params: &PostListParams, scope: Option<&[Uuid]>) -> String {
        build_post_select(params, scope, today())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_default_listing_is_public_and_live() {
        let sql = sql(&PostListParams::new("en"), None);

        assert!(sql.contains(r#""posts"."deleted_at" IS NULL"#));
        assert!(sql.contains(r#""posts"."date_available" <= '2024-05-10'"#));
        assert!(sql.contains(r#""posts"."date_available" IS NULL"#));
        assert!(sql.contains(r#""posts"."status" = 2"#));
        assert!(sql.contains(r#"ORDER BY "posts"."sort_order" DESC"#));
    }

    #[test]
    fn test_admin_listing_skips_public_filters() {
        let mut params = PostListParams::new("en");
        params.from_admin = true;
        params.filter.no_sort_order = true;
        let sql = sql(&params, None);

        assert!(!sql.contains(r#""posts"."date_available" <="#));
        assert!(!sql.contains(r#""posts"."status" ="#));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn test_trashed_flags() {
        let mut params = PostListParams::new("en");
        params.filter.only_trashed = true;
        params.filter.with_trashed = true;
        assert_eq!(params.filter.trashed_scope(), TrashedScope::Only);
        assert!(sql(&params, None).contains(r#""posts"."deleted_at" IS NOT NULL"#));

        params.filter.only_trashed = false;
        assert!(!sql(&params, None).contains(r#""posts"."deleted_at" IS"#));
    }

    #[test]
    fn test_category_scope_matches_pivot_and_primary() {
        let root = Uuid::new_v4();
        let child = Uuid::new_v4();
        let sql = sql(&PostListParams::new("en"), Some(&[root, child]));

        assert!(sql.contains(r#""posts"."id" IN (SELECT "post_id" FROM "post_category""#));
        assert!(sql.contains(&format!(
            r#""posts"."category_id" IN ('{root}', '{child}')"#
        )));
    }

    #[test]
    fn test_search_uses_locale_and_suppresses_filter_order() {
        let mut params = PostListParams::new("en");
        params.filter.search = Some("Rust, in production!".to_string());
        params.filter.locale = Some("es".to_string());
        params.filter.order = Some(SortSpec::new(
            SortField::Column(PostColumn::CreatedAt),
            SortWay::Asc,
        ));
        let sql = sql(&params, None);

        assert!(sql.contains(r#""post_translations"."locale" = 'es'"#));
        assert!(sql.contains(r#"LOWER("post_translations"."title") LIKE '%rust%'"#));
        assert!(sql.contains(r#"LOWER("post_translations"."title") LIKE '%production%'"#));
        assert!(!sql.contains("'%in%'"));
        assert!(!sql.contains(r#""posts"."created_at" ASC"#));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let mut params = PostListParams::new("en");
        params.filter.date = Some(DateRange {
            field: PostDateField::CreatedAt,
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 31),
        });
        let sql = sql(&params, None);

        assert!(sql.contains(r#""posts"."created_at" >= '2024-01-01 00:00:00.000000 +00:00'"#));
        assert!(sql.contains(r#""posts"."created_at" < '2024-02-01 00:00:00.000000 +00:00'"#));
    }

    #[test]
    fn test_translated_order_joins_request_locale() {
        let mut params = PostListParams::new("fr");
        params.from_admin = true;
        params.filter.no_sort_order = true;
        params.order = vec![
            SortSpec::new(SortField::Translated(TranslatedField::Title), SortWay::Asc),
            SortSpec::new(SortField::Translated(TranslatedField::Slug), SortWay::Desc),
        ];
        let sql = sql(&params, None);

        assert_eq!(sql.matches("LEFT JOIN").count(), 1);
        assert!(sql.contains(r#""post_translations"."locale" = 'fr'"#));
        assert!(sql.contains(
            r#"ORDER BY "post_translations"."title" ASC, "post_translations"."slug" DESC"#
        ));
    }

    #[test]
    fn test_excluded_categories_and_users() {
        let mut params = PostListParams::new("en");
        let category = Uuid::new_v4();
        let user = Uuid::new_v4();
        params.filter.exclude_categories = vec![category];
        params.filter.exclude_users = vec![user];
        let sql = sql(&params, None);

        assert!(sql.contains(r#""posts"."id" NOT IN (SELECT "post_id" FROM "post_category""#));
        assert!(sql.contains(&format!(r#""posts"."category_id" NOT IN ('{category}')"#)));
        assert!(sql.contains(r#""posts"."user_id" IS NULL"#));
    }

    #[test]
    fn test_tag_slugs_must_all_match() {
        let mut params = PostListParams::new("en");
        params.filter.tag_slugs = vec!["rust".into(), "web".into()];
        let sql = sql(&params, None);

        assert_eq!(sql.matches(r#"INNER JOIN "tags""#).count(), 2);
        assert!(sql.contains(r#""tags"."slug" = 'rust'"#));
        assert!(sql.contains(r#""tags"."slug" = 'web'"#));
    }
}
