use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    ParentId,
    ShowMenu,
    Featured,
    SortOrder,
    Status,
    Options,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum CategoryTranslations {
    Table,
    Id,
    CategoryId,
    Locale,
    Title,
    Slug,
    Description,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    CategoryId,
    UserId,
    Status,
    Featured,
    SortOrder,
    Options,
    DateAvailable,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum PostTranslations {
    Table,
    Id,
    PostId,
    Locale,
    Title,
    Slug,
    Description,
    Summary,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    TranslatableOptions,
}

#[derive(DeriveIden)]
enum PostCategory {
    Table,
    PostId,
    CategoryId,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    Slug,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PostTags {
    Table,
    PostId,
    TagId,
}

#[derive(DeriveIden)]
enum MediaFiles {
    Table,
    Id,
    Filename,
    Path,
    Mimetype,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MediaZones {
    Table,
    Id,
    FileId,
    EntityType,
    EntityId,
    Zone,
    Position,
}

fn uuid_pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().primary_key().to_owned()
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid_pk(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(uuid_pk(Categories::Id))
                    .col(ColumnDef::new(Categories::ParentId).uuid().null())
                    .col(ColumnDef::new(Categories::ShowMenu).boolean().not_null().default(false))
                    .col(ColumnDef::new(Categories::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Categories::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Categories::Status).small_integer().not_null().default(1))
                    .col(ColumnDef::new(Categories::Options).json_binary().null())
                    .col(timestamp(Categories::CreatedAt))
                    .col(timestamp(Categories::UpdatedAt))
                    .col(ColumnDef::new(Categories::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryTranslations::Table)
                    .if_not_exists()
                    .col(uuid_pk(CategoryTranslations::Id))
                    .col(ColumnDef::new(CategoryTranslations::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(CategoryTranslations::Locale).string_len(10).not_null())
                    .col(ColumnDef::new(CategoryTranslations::Title).string().not_null())
                    .col(ColumnDef::new(CategoryTranslations::Slug).string().not_null())
                    .col(ColumnDef::new(CategoryTranslations::Description).text().null())
                    .col(ColumnDef::new(CategoryTranslations::MetaTitle).string().null())
                    .col(ColumnDef::new(CategoryTranslations::MetaDescription).text().null())
                    .col(ColumnDef::new(CategoryTranslations::MetaKeywords).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_translations_category")
                            .from(CategoryTranslations::Table, CategoryTranslations::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_category_translations_locale")
                    .table(CategoryTranslations::Table)
                    .col(CategoryTranslations::CategoryId)
                    .col(CategoryTranslations::Locale)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(uuid_pk(Posts::Id))
                    .col(ColumnDef::new(Posts::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Posts::UserId).uuid().null())
                    .col(ColumnDef::new(Posts::Status).small_integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Posts::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::Options).json_binary().null())
                    .col(ColumnDef::new(Posts::DateAvailable).date().null())
                    .col(timestamp(Posts::CreatedAt))
                    .col(timestamp(Posts::UpdatedAt))
                    .col(ColumnDef::new(Posts::DeletedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_category")
                            .from(Posts::Table, Posts::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_listing")
                    .table(Posts::Table)
                    .col(Posts::Status)
                    .col(Posts::DeletedAt)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostTranslations::Table)
                    .if_not_exists()
                    .col(uuid_pk(PostTranslations::Id))
                    .col(ColumnDef::new(PostTranslations::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostTranslations::Locale).string_len(10).not_null())
                    .col(ColumnDef::new(PostTranslations::Title).string().not_null())
                    .col(ColumnDef::new(PostTranslations::Slug).string().not_null())
                    .col(ColumnDef::new(PostTranslations::Description).text().null())
                    .col(ColumnDef::new(PostTranslations::Summary).text().null())
                    .col(ColumnDef::new(PostTranslations::MetaTitle).string().null())
                    .col(ColumnDef::new(PostTranslations::MetaDescription).text().null())
                    .col(ColumnDef::new(PostTranslations::MetaKeywords).text().null())
                    .col(ColumnDef::new(PostTranslations::TranslatableOptions).json_binary().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_translations_post")
                            .from(PostTranslations::Table, PostTranslations::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_post_translations_locale")
                    .table(PostTranslations::Table)
                    .col(PostTranslations::PostId)
                    .col(PostTranslations::Locale)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_translations_slug")
                    .table(PostTranslations::Table)
                    .col(PostTranslations::Slug)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostCategory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostCategory::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostCategory::CategoryId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostCategory::PostId)
                            .col(PostCategory::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_category_post")
                            .from(PostCategory::Table, PostCategory::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_category_category")
                            .from(PostCategory::Table, PostCategory::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(uuid_pk(Tags::Id))
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::Slug).string().not_null().unique_key())
                    .col(timestamp(Tags::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostTags::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostTags::TagId).uuid().not_null())
                    .primary_key(Index::create().col(PostTags::PostId).col(PostTags::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tags_post")
                            .from(PostTags::Table, PostTags::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tags_tag")
                            .from(PostTags::Table, PostTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaFiles::Table)
                    .if_not_exists()
                    .col(uuid_pk(MediaFiles::Id))
                    .col(ColumnDef::new(MediaFiles::Filename).string().not_null())
                    .col(ColumnDef::new(MediaFiles::Path).string().not_null())
                    .col(ColumnDef::new(MediaFiles::Mimetype).string().not_null())
                    .col(timestamp(MediaFiles::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaZones::Table)
                    .if_not_exists()
                    .col(uuid_pk(MediaZones::Id))
                    .col(ColumnDef::new(MediaZones::FileId).uuid().not_null())
                    .col(ColumnDef::new(MediaZones::EntityType).string_len(20).not_null())
                    .col(ColumnDef::new(MediaZones::EntityId).uuid().not_null())
                    .col(ColumnDef::new(MediaZones::Zone).string().not_null())
                    .col(ColumnDef::new(MediaZones::Position).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_zones_file")
                            .from(MediaZones::Table, MediaZones::FileId)
                            .to(MediaFiles::Table, MediaFiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_media_zones_entity")
                    .table(MediaZones::Table)
                    .col(MediaZones::EntityType)
                    .col(MediaZones::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaZones::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MediaFiles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostTags::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostCategory::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostTranslations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CategoryTranslations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}
