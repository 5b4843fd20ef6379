//! Create campaign, campaign lookup and participation tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignLocations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CampaignLocations::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CampaignCategories::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CampaignCategories::ImageUrl).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Campaigns::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Campaigns::LocationId).integer().not_null())
                    .col(ColumnDef::new(Campaigns::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Campaigns::StartDate).date().not_null())
                    .col(ColumnDef::new(Campaigns::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaigns_location")
                            .from(Campaigns::Table, Campaigns::LocationId)
                            .to(CampaignLocations::Table, CampaignLocations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaigns_category")
                            .from(Campaigns::Table, Campaigns::CategoryId)
                            .to(CampaignCategories::Table, CampaignCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: end_date, start_date (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_campaigns_dates")
                    .table(Campaigns::Table)
                    .col(Campaigns::EndDate)
                    .col(Campaigns::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CampaignDetails::InitiatorId).string().not_null())
                    .col(ColumnDef::new(CampaignDetails::Description).text().not_null())
                    .col(ColumnDef::new(CampaignDetails::Terms).text().not_null())
                    .col(ColumnDef::new(CampaignDetails::Mission).text().not_null())
                    .col(
                        ColumnDef::new(CampaignDetails::CampaignId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_details_campaign")
                            .from(CampaignDetails::Table, CampaignDetails::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignParticipants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CampaignParticipants::UserId).string().not_null())
                    .col(ColumnDef::new(CampaignParticipants::CampaignId).integer().not_null())
                    .col(ColumnDef::new(CampaignParticipants::SubmissionUrl).string())
                    .col(
                        ColumnDef::new(CampaignParticipants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(CampaignParticipants::UserId)
                            .col(CampaignParticipants::CampaignId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_participants_campaign")
                            .from(CampaignParticipants::Table, CampaignParticipants::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: campaign_id (participant counts and listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_participants_campaign_id")
                    .table(CampaignParticipants::Table)
                    .col(CampaignParticipants::CampaignId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignWinners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CampaignWinners::UserId).string().not_null())
                    .col(ColumnDef::new(CampaignWinners::CampaignId).integer().not_null())
                    .col(ColumnDef::new(CampaignWinners::Position).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(CampaignWinners::UserId)
                            .col(CampaignWinners::CampaignId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_winners_campaign")
                            .from(CampaignWinners::Table, CampaignWinners::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignWinners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CampaignParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CampaignDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CampaignCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CampaignLocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Campaigns {
    Table,
    Id,
    Name,
    ImageUrl,
    LocationId,
    CategoryId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CampaignLocations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum CampaignCategories {
    Table,
    Id,
    Name,
    ImageUrl,
}

#[derive(Iden)]
enum CampaignDetails {
    Table,
    Id,
    InitiatorId,
    Description,
    Terms,
    Mission,
    CampaignId,
}

#[derive(Iden)]
enum CampaignParticipants {
    Table,
    UserId,
    CampaignId,
    SubmissionUrl,
    CreatedAt,
}

#[derive(Iden)]
enum CampaignWinners {
    Table,
    UserId,
    CampaignId,
    Position,
}
