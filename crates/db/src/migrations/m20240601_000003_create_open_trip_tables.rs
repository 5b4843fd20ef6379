//! Create open trip and trip destination tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OpenTrips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpenTrips::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OpenTrips::Title).string_len(100).not_null())
                    .col(ColumnDef::new(OpenTrips::Description).string().not_null())
                    .col(ColumnDef::new(OpenTrips::Price).string_len(20).not_null())
                    .col(ColumnDef::new(OpenTrips::Organizer).string_len(50).not_null())
                    .col(ColumnDef::new(OpenTrips::TripStart).date_time().not_null())
                    .col(ColumnDef::new(OpenTrips::TripEnd).date_time().not_null())
                    .col(ColumnDef::new(OpenTrips::RegisDeadline).date_time().not_null())
                    .col(ColumnDef::new(OpenTrips::PhoneNumber).string_len(15).not_null())
                    .to_owned(),
            )
            .await?;

        // Index: regis_deadline (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_open_trips_regis_deadline")
                    .table(OpenTrips::Table)
                    .col(OpenTrips::RegisDeadline)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripDestinations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TripDestinations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TripDestinations::Name).string_len(50).not_null())
                    .col(ColumnDef::new(TripDestinations::LocationName).string_len(100))
                    .col(ColumnDef::new(TripDestinations::ImageUrl).string())
                    .col(ColumnDef::new(TripDestinations::Category).string_len(20))
                    .col(ColumnDef::new(TripDestinations::TripId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_destinations_trip")
                            .from(TripDestinations::Table, TripDestinations::TripId)
                            .to(OpenTrips::Table, OpenTrips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_destinations_trip_id")
                    .table(TripDestinations::Table)
                    .col(TripDestinations::TripId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TripDestinations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OpenTrips::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OpenTrips {
    Table,
    Id,
    Title,
    Description,
    Price,
    Organizer,
    TripStart,
    TripEnd,
    RegisDeadline,
    PhoneNumber,
}

#[derive(Iden)]
enum TripDestinations {
    Table,
    Id,
    Name,
    LocationName,
    ImageUrl,
    Category,
    TripId,
}
