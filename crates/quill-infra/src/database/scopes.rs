//! Query fragments shared by the post and category listings.

use sea_orm::sea_query::{Expr, Func, IntoIden, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, Select};

use quill_core::domain::query::{SortWay, TrashedScope};

/// Restrict a query to live rows, trashed rows, or both.
pub(crate) fn trashed<E, C>(query: Select<E>, deleted_at: C, scope: TrashedScope) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    match scope {
        TrashedScope::Exclude => query.filter(deleted_at.is_null()),
        TrashedScope::Only => query.filter(deleted_at.is_not_null()),
        TrashedScope::With => query,
    }
}

pub(crate) fn order(way: SortWay) -> Order {
    match way {
        SortWay::Asc => Order::Asc,
        SortWay::Desc => Order::Desc,
    }
}

/// Case-insensitive substring match: `LOWER(table.column) LIKE '%term%'`.
///
/// `term` must already be lowercase and free of LIKE wildcards.
pub(crate) fn contains_lower<T, C>(table: T, column: C, term: &str) -> SimpleExpr
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Expr::expr(Func::lower(Expr::col((table, column)))).like(format!("%{term}%"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entity::post;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_trashed_scopes() {
        let sql = |scope| {
            trashed(post::Entity::find(), post::Column::DeletedAt, scope)
                .build(DbBackend::Postgres)
                .to_string()
        };

        assert!(sql(TrashedScope::Exclude).contains(r#""posts"."deleted_at" IS NULL"#));
        assert!(sql(TrashedScope::Only).contains(r#""posts"."deleted_at" IS NOT NULL"#));
        assert!(!sql(TrashedScope::With).contains("deleted_at\" IS"));
    }

    #[test]
    fn test_contains_lower() {
        let sql = post::Entity::find()
            .filter(contains_lower(post::Entity, post::Column::Id, "rust"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("posts"."id") LIKE '%rust%'"#));
    }
}
