//! Files registered by the host file storage.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "media_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub mimetype: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::media_zone::Entity")]
    Zones,
}

impl Related<super::media_zone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Zones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::MediaFile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            filename: model.filename,
            path: model.path,
            mimetype: model.mimetype,
            created_at: model.created_at.into(),
        }
    }
}
