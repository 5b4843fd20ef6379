//! Create tourism, tourism lookup and per-user tourism tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TourismLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TourismLocations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TourismLocations::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourismCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TourismCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TourismCategories::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TourismCategories::ImageUrl).string_len(150).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tourisms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tourisms::Id).string_len(30).not_null().primary_key())
                    .col(ColumnDef::new(Tourisms::Name).string().not_null())
                    .col(ColumnDef::new(Tourisms::ImageUrl).string())
                    .col(ColumnDef::new(Tourisms::LocationId).integer().not_null())
                    .col(ColumnDef::new(Tourisms::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tourisms_location")
                            .from(Tourisms::Table, Tourisms::LocationId)
                            .to(TourismLocations::Table, TourismLocations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tourisms_category")
                            .from(Tourisms::Table, Tourisms::CategoryId)
                            .to(TourismCategories::Table, TourismCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: name (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_tourisms_name")
                    .table(Tourisms::Table)
                    .col(Tourisms::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourismDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TourismDetails::TourismId)
                            .string_len(30)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TourismDetails::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tourism_details_tourism")
                            .from(TourismDetails::Table, TourismDetails::TourismId)
                            .to(Tourisms::Table, Tourisms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourismFavorites::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TourismFavorites::TourismId).string_len(30).not_null())
                    .col(ColumnDef::new(TourismFavorites::UserId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(TourismFavorites::TourismId)
                            .col(TourismFavorites::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tourism_favorites_tourism")
                            .from(TourismFavorites::Table, TourismFavorites::TourismId)
                            .to(Tourisms::Table, Tourisms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (favorite lookups per user)
        manager
            .create_index(
                Index::create()
                    .name("idx_tourism_favorites_user_id")
                    .table(TourismFavorites::Table)
                    .col(TourismFavorites::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TourismUserClicks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TourismUserClicks::TourismId).string_len(30).not_null())
                    .col(ColumnDef::new(TourismUserClicks::UserId).string().not_null())
                    .col(
                        ColumnDef::new(TourismUserClicks::TotalClick)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(TourismUserClicks::TourismId)
                            .col(TourismUserClicks::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tourism_user_clicks_tourism")
                            .from(TourismUserClicks::Table, TourismUserClicks::TourismId)
                            .to(Tourisms::Table, Tourisms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TourismUserClicks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourismFavorites::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourismDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tourisms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourismCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourismLocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tourisms {
    Table,
    Id,
    Name,
    ImageUrl,
    LocationId,
    CategoryId,
}

#[derive(Iden)]
enum TourismLocations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum TourismCategories {
    Table,
    Id,
    Name,
    ImageUrl,
}

#[derive(Iden)]
enum TourismDetails {
    Table,
    TourismId,
    Description,
}

#[derive(Iden)]
enum TourismFavorites {
    Table,
    TourismId,
    UserId,
}

#[derive(Iden)]
enum TourismUserClicks {
    Table,
    TourismId,
    UserId,
    TotalClick,
}
