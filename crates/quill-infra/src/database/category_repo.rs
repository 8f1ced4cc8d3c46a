//! PostgreSQL category repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, IntoCondition, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::query::{
    CategoryColumn, CategoryInclude, CategoryListParams, CategorySortField, DeleteParams, Include,
    ItemParams, Lookup, SortField, SortSpec, TranslatedField, TrashedScope, normalize_search,
};
use quill_core::domain::{
    BlogEvent, Category, CategoryChanges, CategoryDetails, DEFAULT_PAGE_SIZE, EntityKind, Listing,
    NewCategory, Page,
};
use quill_core::error::RepoError;
use quill_core::ports::CategoryRepository;

use super::entity::{category, category_translation, post_category};
use super::loaders::load_categories;
use super::postgres_base::{PostgresBaseRepository, db_err, fetch_page};
use super::{scopes, writes};

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<category::Entity>;

/// Breadth-first walk down `parent_id`. Each id is visited once, so a
/// corrupted cyclic hierarchy still terminates.
pub(crate) async fn descendants_and_self<C>(db: &C, id: Uuid) -> Result<Vec<Uuid>, DbErr>
where
    C: ConnectionTrait,
{
    if category::Entity::find_by_id(id).one(db).await?.is_none() {
        return Ok(Vec::new());
    }

    let mut found = vec![id];
    let mut frontier = vec![id];
    while !frontier.is_empty() {
        let children = category::Entity::find()
            .filter(category::Column::ParentId.is_in(frontier))
            .all(db)
            .await?;
        frontier = children
            .into_iter()
            .map(|c| c.id)
            .filter(|child| !found.contains(child))
            .collect();
        found.extend(frontier.iter().copied());
    }
    Ok(found)
}

fn category_column(column: CategoryColumn) -> category::Column {
    match column {
        CategoryColumn::Id => category::Column::Id,
        CategoryColumn::ParentId => category::Column::ParentId,
        CategoryColumn::ShowMenu => category::Column::ShowMenu,
        CategoryColumn::Featured => category::Column::Featured,
        CategoryColumn::SortOrder => category::Column::SortOrder,
        CategoryColumn::Status => category::Column::Status,
        CategoryColumn::CreatedAt => category::Column::CreatedAt,
        CategoryColumn::UpdatedAt => category::Column::UpdatedAt,
    }
}

/// Summary has no category counterpart; it is never parsed for categories.
fn translation_column(field: TranslatedField) -> category_translation::Column {
    match field {
        TranslatedField::Title | TranslatedField::Summary => category_translation::Column::Title,
        TranslatedField::Slug => category_translation::Column::Slug,
        TranslatedField::Description => category_translation::Column::Description,
        TranslatedField::MetaTitle => category_translation::Column::MetaTitle,
        TranslatedField::MetaDescription => category_translation::Column::MetaDescription,
        TranslatedField::MetaKeywords => category_translation::Column::MetaKeywords,
    }
}

fn translations_where(condition: Condition) -> SelectStatement {
    Query::select()
        .column(category_translation::Column::CategoryId)
        .from(category_translation::Entity)
        .cond_where(condition)
        .to_owned()
}

fn lookup_condition(lookup: &Lookup) -> SimpleExpr {
    match lookup {
        Lookup::Id(id) => category::Column::Id.eq(*id),
        Lookup::Translated {
            field,
            value,
            locale,
        } => category::Column::Id.in_subquery(translations_where(
            Condition::all()
                .add(translation_column(*field).eq(value.as_str()))
                .add(category_translation::Column::Locale.eq(locale.as_str())),
        )),
    }
}

fn sort(
    query: Select<category::Entity>,
    spec: &SortSpec<CategorySortField>,
    locale: &str,
    joined: &mut bool,
) -> Select<category::Entity> {
    let order = scopes::order(spec.way);
    match spec.field {
        SortField::Column(column) => query.order_by(category_column(column), order),
        SortField::Translated(field) => {
            let query = if *joined {
                query
            } else {
                *joined = true;
                let locale = locale.to_string();
                query.join(
                    JoinType::LeftJoin,
                    category::Relation::Translations
                        .def()
                        .on_condition(move |_left, right| {
                            Expr::col((right, category_translation::Column::Locale))
                                .eq(locale.clone())
                                .into_condition()
                        }),
                )
            };
            query.order_by(translation_column(field), order)
        }
    }
}

/// Build the category listing query.
pub(crate) fn build_category_select(params: &CategoryListParams) -> Select<category::Entity> {
    let filter = &params.filter;
    let mut query = category::Entity::find();
    let mut joined = false;

    if let Some(parent_id) = filter.parent_id {
        query = query.filter(category::Column::ParentId.eq(parent_id));
    }
    if let Some(featured) = filter.featured {
        query = query.filter(category::Column::Featured.eq(featured));
    }
    if let Some(show_menu) = filter.show_menu {
        query = query.filter(category::Column::ShowMenu.eq(show_menu));
    }
    if !filter.include.is_empty() {
        query = query.filter(category::Column::Id.is_in(filter.include.iter().copied()));
    }
    if !filter.exclude.is_empty() {
        query = query.filter(category::Column::Id.is_not_in(filter.exclude.iter().copied()));
    }

    query = scopes::trashed(query, category::Column::DeletedAt, filter.trashed_scope());

    let terms = filter.search.as_deref().and_then(normalize_search);
    if let Some(terms) = &terms {
        let mut condition = Condition::all()
            .add(category_translation::Column::Locale.eq(params.search_locale()));
        for pattern in terms.patterns() {
            condition = condition.add(scopes::contains_lower(
                category_translation::Entity,
                category_translation::Column::Title,
                &pattern,
            ));
        }
        query = query.filter(category::Column::Id.in_subquery(translations_where(condition)));
    } else if let Some(spec) = &filter.order {
        query = sort(query, spec, &params.locale, &mut joined);
    }

    for spec in &params.order {
        query = sort(query, spec, &params.locale, &mut joined);
    }
    if filter.order.is_none() && params.order.is_empty() {
        query = query.order_by_desc(category::Column::SortOrder);
    }

    query
}

impl PostgresCategoryRepository {
    async fn details(
        &self,
        models: Vec<category::Model>,
        includes: &[CategoryInclude],
    ) -> Result<Vec<CategoryDetails>, RepoError> {
        load_categories(&self.db, models, includes)
            .await
            .map_err(db_err)
    }

    async fn one_details(
        &self,
        model: category::Model,
        includes: &[CategoryInclude],
    ) -> Result<CategoryDetails, RepoError> {
        self.details(vec![model], includes)
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }

    async fn find_model(
        &self,
        lookup: &Lookup,
        scope: TrashedScope,
    ) -> Result<Option<category::Model>, RepoError> {
        let query = category::Entity::find().filter(lookup_condition(lookup));
        scopes::trashed(query, category::Column::DeletedAt, scope)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Reject a parent that would make the category its own ancestor.
    async fn check_parent(&self, id: Uuid, parent_id: Uuid) -> Result<(), RepoError> {
        let subtree = descendants_and_self(&self.db, id).await.map_err(db_err)?;
        if subtree.contains(&parent_id) {
            return Err(RepoError::Validation(
                "a category cannot be moved under itself or one of its descendants".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn descendants_and_self(&self, id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        descendants_and_self(&self.db, id).await.map_err(db_err)
    }

    async fn get_items_by(
        &self,
        params: &CategoryListParams,
    ) -> Result<Listing<CategoryDetails>, RepoError> {
        let query = build_category_select(params);

        // A zero `take` counts as unset.
        let take = params.take.filter(|t| *t > 0);
        match params.page {
            Some(page) => {
                let per_page = take.unwrap_or(DEFAULT_PAGE_SIZE);
                let (models, total) = fetch_page(&self.db, query, page, per_page)
                    .await
                    .map_err(db_err)?;
                let items = self.details(models, &params.includes).await?;
                Ok(Listing::Page(Page::new(items, total, per_page, page)))
            }
            None => {
                let query = match take {
                    Some(take) => query.limit(take),
                    None => query,
                };
                let models = query.all(&self.db).await.map_err(db_err)?;
                Ok(Listing::All(self.details(models, &params.includes).await?))
            }
        }
    }

    async fn get_item(
        &self,
        lookup: &Lookup,
        params: &ItemParams<CategoryInclude>,
    ) -> Result<Option<CategoryDetails>, RepoError> {
        match self.find_model(lookup, params.trashed).await? {
            Some(model) => Ok(Some(self.one_details(model, &params.includes).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, data: NewCategory) -> Result<CategoryDetails, RepoError> {
        let category = Category::from_new(&data);
        let category_id = category.id;
        tracing::debug!(category_id = %category_id, parent_id = ?category.parent_id, "Creating category");

        let txn = self.db.begin().await.map_err(db_err)?;
        let model = category::ActiveModel::from(category)
            .insert(&txn)
            .await
            .map_err(db_err)?;
        writes::upsert_category_translations(&txn, category_id, &data.translations).await?;
        if !data.media.is_empty() {
            writes::sync_media(&txn, EntityKind::Category, category_id, &data.media).await?;
        }
        txn.commit().await.map_err(db_err)?;

        self.emit(BlogEvent::category_created(category_id)).await;
        tracing::info!(category_id = %category_id, "Category created");

        self.one_details(model, CategoryInclude::ALL).await
    }

    async fn update_by(
        &self,
        lookup: &Lookup,
        changes: CategoryChanges,
    ) -> Result<CategoryDetails, RepoError> {
        let model = self
            .find_model(lookup, TrashedScope::Exclude)
            .await?
            .ok_or(RepoError::NotFound)?;
        if let Some(Some(parent_id)) = changes.parent_id {
            self.check_parent(model.id, parent_id).await?;
        }

        let mut category = Category::from(model);
        category.apply(&changes);
        let category_id = category.id;

        let txn = self.db.begin().await.map_err(db_err)?;
        let model = category::ActiveModel::from(category)
            .update(&txn)
            .await
            .map_err(db_err)?;
        writes::upsert_category_translations(&txn, category_id, &changes.translations).await?;
        if let Some(media) = &changes.media {
            writes::sync_media(&txn, EntityKind::Category, category_id, media).await?;
        }
        txn.commit().await.map_err(db_err)?;

        self.emit(BlogEvent::category_updated(category_id)).await;
        tracing::info!(category_id = %category_id, "Category updated");

        self.one_details(model, CategoryInclude::ALL).await
    }

    async fn delete_by(&self, lookup: &Lookup, params: &DeleteParams) -> Result<(), RepoError> {
        let scope = if params.force {
            TrashedScope::With
        } else {
            TrashedScope::Exclude
        };
        let model = self
            .find_model(lookup, scope)
            .await?
            .ok_or(RepoError::NotFound)?;
        let category_id = model.id;

        let txn = self.db.begin().await.map_err(db_err)?;
        if params.force {
            category::Entity::update_many()
                .col_expr(category::Column::ParentId, Expr::value(Option::<Uuid>::None))
                .filter(category::Column::ParentId.eq(category_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            post_category::Entity::delete_many()
                .filter(post_category::Column::CategoryId.eq(category_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            category_translation::Entity::delete_many()
                .filter(category_translation::Column::CategoryId.eq(category_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            writes::clear_media(&txn, EntityKind::Category, category_id).await?;
            category::Entity::delete_by_id(category_id)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        } else {
            category::Entity::update_many()
                .col_expr(category::Column::DeletedAt, Expr::value(Utc::now()))
                .filter(category::Column::Id.eq(category_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;

        self.emit(BlogEvent::category_deleted(category_id)).await;
        self.emit(BlogEvent::media_deleted(category_id, EntityKind::Category.as_str()))
            .await;
        tracing::info!(category_id = %category_id, force = params.force, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::query::SortWay;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_default_listing_orders_by_sort_order() {
        let sql = build_category_select(&CategoryListParams::new("en"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""categories"."deleted_at" IS NULL"#));
        assert!(sql.ends_with(r#"ORDER BY "categories"."sort_order" DESC"#));
    }

    #[test]
    fn test_parent_and_search_filters() {
        let parent = Uuid::new_v4();
        let mut params = CategoryListParams::new("en");
        params.filter.parent_id = Some(parent);
        params.filter.search = Some("Travel".into());
        params.filter.order = Some(SortSpec::new(
            SortField::Column(CategoryColumn::CreatedAt),
            SortWay::Asc,
        ));
        let sql = build_category_select(&params)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(&format!(r#""categories"."parent_id" = '{parent}'"#)));
        assert!(sql.contains(r#"LOWER("category_translations"."title") LIKE '%travel%'"#));
        assert!(!sql.contains(r#""categories"."created_at" ASC"#));
    }

    #[test]
    fn test_translated_order_joins_locale() {
        let mut params = CategoryListParams::new("es");
        params.order = vec![SortSpec::new(
            SortField::Translated(TranslatedField::Title),
            SortWay::Asc,
        )];
        let sql = build_category_select(&params)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "category_translations""#));
        assert!(sql.contains(r#""category_translations"."locale" = 'es'"#));
        assert!(sql.ends_with(r#"ORDER BY "category_translations"."title" ASC"#));
    }
}
