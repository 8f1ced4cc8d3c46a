//! Query-string parsing into typed listing and lookup parameters.

use quill_core::domain::query::{
    CategoryFilter, CategoryListParams, CategorySortField, DateRange, DeleteParams, Include,
    ItemParams, Lookup, PostDateField, PostFilter, PostListParams, PostSortField, SortSpec,
    SortWay, TrashedScope,
};
use quill_core::domain::{EntityKind, PostStatus};
use quill_core::error::DomainError;
use quill_shared::query::{
    CategoryFilterDto, ItemFilterDto, ListQuery, OneOrMany, OrderDto, PostFilterDto, SettingDto,
    WriteFilterDto, parse_json,
};

use crate::config::BlogConfig;
use crate::middleware::error::AppResult;

/// How results are rendered, independent of how they are fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    pub locale: String,
    /// Sparse fieldset; `None` keeps every field.
    pub fields: Option<Vec<String>>,
    /// Emit every supported locale as its own key.
    pub all_translations: bool,
}

impl Presentation {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Default::default()
        }
    }
}

fn csv(raw: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn ids<T>(value: Option<OneOrMany<T>>) -> Vec<T> {
    value.map(OneOrMany::into_vec).unwrap_or_default()
}

fn sort_spec<F>(
    order: &OrderDto,
    parse: impl Fn(&str) -> Result<F, DomainError>,
) -> Result<SortSpec<F>, DomainError> {
    let field = parse(order.field.as_deref().unwrap_or("created_at"))?;
    let way = match order.way.as_deref() {
        Some(way) => SortWay::parse(way)?,
        None => SortWay::Desc,
    };
    Ok(SortSpec::new(field, way))
}

fn order_list<F>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<F, DomainError> + Copy,
) -> AppResult<Vec<SortSpec<F>>> {
    let orders: Option<OneOrMany<OrderDto>> = parse_json(raw)?;
    Ok(ids(orders)
        .iter()
        .map(|order| sort_spec(order, parse))
        .collect::<Result<_, _>>()?)
}

fn page_and_take(query: &ListQuery, blog: &BlogConfig) -> (Option<u64>, Option<u64>) {
    match query.page {
        Some(page) => (
            Some(page.max(1)),
            Some(query.take.unwrap_or(blog.posts_per_page)),
        ),
        None => (None, query.take),
    }
}

fn includes<I: Include>(raw: Option<&str>) -> Result<Vec<I>, DomainError> {
    I::parse_list(raw.unwrap_or_default())
}

/// `GET /posts`.
pub fn post_list(
    query: &ListQuery,
    locale: &str,
    blog: &BlogConfig,
) -> AppResult<(PostListParams, Presentation)> {
    let dto: PostFilterDto = parse_json(query.filter.as_deref())?;
    let setting: SettingDto = parse_json(query.setting.as_deref())?;

    let status = match dto.status {
        Some(code) => Some(PostStatus::from_i16(code).ok_or_else(|| {
            DomainError::validation(format!("unknown post status {code}"))
        })?),
        None => None,
    };
    let date = match &dto.date {
        Some(date) => Some(DateRange {
            field: match date.field.as_deref() {
                Some(field) => PostDateField::parse(field)?,
                None => PostDateField::CreatedAt,
            },
            from: date.from,
            to: date.to,
        }),
        None => None,
    };
    let order = match &dto.order {
        Some(order) => Some(sort_spec(order, PostSortField::parse)?),
        None => None,
    };

    let filter = PostFilter {
        categories: ids(dto.categories),
        category: dto.category,
        only_trashed: dto.only_trashed,
        with_trashed: dto.with_trashed,
        featured: dto.featured,
        tag_id: dto.tag_id,
        tag_slugs: dto.tag_slug.into_iter().chain(dto.tag).collect(),
        users: ids(dto.users),
        include: ids(dto.include),
        exclude: ids(dto.exclude),
        exclude_categories: ids(dto.exclude_categories),
        exclude_users: ids(dto.exclude_users),
        search: dto.search,
        locale: dto.locale,
        date,
        order,
        status,
        no_sort_order: dto.no_sort_order,
    };

    let (page, take) = page_and_take(query, blog);
    let params = PostListParams {
        includes: includes(query.include.as_deref())?,
        filter,
        order: order_list(query.order.as_deref(), PostSortField::parse)?,
        page,
        take,
        from_admin: setting.from_admin,
        locale: locale.to_string(),
    };

    Ok((
        params,
        Presentation {
            locale: locale.to_string(),
            fields: csv(query.fields.as_deref()),
            all_translations: dto.all_translations,
        },
    ))
}

/// `GET /categories`.
pub fn category_list(
    query: &ListQuery,
    locale: &str,
    blog: &BlogConfig,
) -> AppResult<(CategoryListParams, Presentation)> {
    let dto: CategoryFilterDto = parse_json(query.filter.as_deref())?;
    let order = match &dto.order {
        Some(order) => Some(sort_spec(order, CategorySortField::parse)?),
        None => None,
    };

    let filter = CategoryFilter {
        parent_id: dto.parent_id,
        featured: dto.featured,
        show_menu: dto.show_menu,
        search: dto.search,
        locale: dto.locale,
        include: ids(dto.include),
        exclude: ids(dto.exclude),
        only_trashed: dto.only_trashed,
        with_trashed: dto.with_trashed,
        order,
    };

    let (page, take) = page_and_take(query, blog);
    let params = CategoryListParams {
        includes: includes(query.include.as_deref())?,
        filter,
        order: order_list(query.order.as_deref(), CategorySortField::parse)?,
        page,
        take,
        locale: locale.to_string(),
    };

    Ok((
        params,
        Presentation {
            locale: locale.to_string(),
            fields: csv(query.fields.as_deref()),
            all_translations: dto.all_translations,
        },
    ))
}

/// `GET /{entity}/{criteria}`.
pub fn item<I: Include>(
    criteria: &str,
    query: &ListQuery,
    locale: &str,
    kind: EntityKind,
) -> AppResult<(Lookup, ItemParams<I>, Presentation)> {
    let dto: ItemFilterDto = parse_json(query.filter.as_deref())?;
    let setting: SettingDto = parse_json(query.setting.as_deref())?;

    let lookup = Lookup::parse(criteria, dto.field.as_deref(), locale, kind)?;
    let params = ItemParams {
        includes: includes(query.include.as_deref())?,
        trashed: TrashedScope::from_flags(dto.only_trashed, dto.with_trashed),
        from_admin: setting.from_admin,
    };

    Ok((
        lookup,
        params,
        Presentation {
            locale: locale.to_string(),
            fields: csv(query.fields.as_deref()),
            all_translations: dto.all_translations,
        },
    ))
}

/// `PUT` and `DELETE` on `/{entity}/{criteria}`.
pub fn write_target(
    criteria: &str,
    query: &ListQuery,
    locale: &str,
    kind: EntityKind,
) -> AppResult<(Lookup, DeleteParams)> {
    let dto: WriteFilterDto = parse_json(query.filter.as_deref())?;
    let lookup = Lookup::parse(criteria, dto.field.as_deref(), locale, kind)?;
    Ok((lookup, DeleteParams { force: dto.force }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::query::{PostColumn, PostInclude, SortField, TranslatedField};
    use uuid::Uuid;

    fn query(filter: &str) -> ListQuery {
        ListQuery {
            filter: Some(filter.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_query_is_public_unpaginated() {
        let (params, view) = post_list(&ListQuery::default(), "en", &BlogConfig::default()).unwrap();

        assert!(!params.from_admin);
        assert_eq!(params.page, None);
        assert_eq!(params.take, None);
        assert!(params.filter.order.is_none());
        assert_eq!(view.fields, None);
        assert_eq!(params.locale, "en");
    }

    #[test]
    fn test_page_uses_configured_size() {
        let blog = BlogConfig {
            posts_per_page: 7,
            ..Default::default()
        };
        let list = ListQuery {
            page: Some(2),
            ..Default::default()
        };
        let (params, _) = post_list(&list, "en", &blog).unwrap();

        assert_eq!(params.page, Some(2));
        assert_eq!(params.take, Some(7));
    }

    #[test]
    fn test_filter_order_defaults() {
        let (params, _) =
            post_list(&query(r#"{"order":{}}"#), "en", &BlogConfig::default()).unwrap();

        assert_eq!(
            params.filter.order,
            Some(SortSpec::new(SortField::Column(PostColumn::CreatedAt), SortWay::Desc))
        );
    }

    #[test]
    fn test_tag_filters_merge() {
        let (params, _) = post_list(
            &query(r#"{"tagSlug":"rust","tag":"web"}"#),
            "en",
            &BlogConfig::default(),
        )
        .unwrap();

        assert_eq!(params.filter.tag_slugs, vec!["rust", "web"]);
    }

    #[test]
    fn test_top_level_order_and_includes() {
        let list = ListQuery {
            include: Some("tags,translations,user".to_string()),
            order: Some(r#"{"field":"title","way":"asc"}"#.to_string()),
            setting: Some(r#"{"fromAdmin":true}"#.to_string()),
            fields: Some("title, slug".to_string()),
            ..Default::default()
        };
        let (params, view) = post_list(&list, "es", &BlogConfig::default()).unwrap();

        assert_eq!(params.includes, vec![PostInclude::Tags, PostInclude::User]);
        assert_eq!(
            params.order,
            vec![SortSpec::new(
                SortField::Translated(TranslatedField::Title),
                SortWay::Asc
            )]
        );
        assert!(params.from_admin);
        assert_eq!(view.fields, Some(vec!["title".to_string(), "slug".to_string()]));
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let blog = BlogConfig::default();
        assert!(post_list(&query(r#"{"status":9}"#), "en", &blog).is_err());
        assert!(post_list(&query(r#"{"order":{"field":"nope"}}"#), "en", &blog).is_err());
        assert!(post_list(&query("{broken"), "en", &blog).is_err());

        let list = ListQuery {
            include: Some("comments".to_string()),
            ..Default::default()
        };
        assert!(post_list(&list, "en", &blog).is_err());
    }

    #[test]
    fn test_item_lookup_by_slug() {
        let (lookup, params, _) = item::<PostInclude>(
            "hello-world",
            &query(r#"{"field":"slug","withTrashed":true}"#),
            "es",
            EntityKind::Post,
        )
        .unwrap();

        assert_eq!(
            lookup,
            Lookup::Translated {
                field: TranslatedField::Slug,
                value: "hello-world".to_string(),
                locale: "es".to_string(),
            }
        );
        assert_eq!(params.trashed, TrashedScope::With);
    }

    #[test]
    fn test_write_target_force() {
        let id = Uuid::new_v4();
        let (lookup, params) = write_target(
            &id.to_string(),
            &query(r#"{"force":"1"}"#),
            "en",
            EntityKind::Category,
        )
        .unwrap();

        assert_eq!(lookup, Lookup::Id(id));
        assert!(params.force);
    }
}
