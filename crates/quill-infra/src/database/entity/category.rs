//! Category entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub show_menu: bool,
    pub featured: bool,
    pub sort_order: i32,
    pub status: i16,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub options: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Parent,
    #[sea_orm(has_many = "super::category_translation::Entity")]
    Translations,
    #[sea_orm(has_many = "super::post_category::Entity")]
    PostCategories,
}

impl Related<super::category_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Translations.def()
    }
}

impl Related<super::post_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            parent_id: model.parent_id,
            show_menu: model.show_menu,
            featured: model.featured,
            sort_order: model.sort_order,
            status: model.status,
            options: model.options,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
        }
    }
}

impl From<quill_core::domain::Category> for ActiveModel {
    fn from(category: quill_core::domain::Category) -> Self {
        Self {
            id: Set(category.id),
            parent_id: Set(category.parent_id),
            show_menu: Set(category.show_menu),
            featured: Set(category.featured),
            sort_order: Set(category.sort_order),
            status: Set(category.status),
            options: Set(category.options),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
            deleted_at: Set(category.deleted_at.map(Into::into)),
        }
    }
}
