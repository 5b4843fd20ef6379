//! Create forum, comment, like and forum-campaign link tables.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_campaign_tables::Campaigns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Forums::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Forums::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Forums::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Forums::Text).string_len(500).not_null())
                    .col(ColumnDef::new(Forums::AuthorId).string().not_null())
                    .col(ColumnDef::new(Forums::ImageUrl).string())
                    .col(
                        ColumnDef::new(Forums::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: author_id (forums by user)
        manager
            .create_index(
                Index::create()
                    .name("idx_forums_author_id")
                    .table(Forums::Table)
                    .col(Forums::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ForumLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ForumLikes::ForumId).integer().not_null())
                    .col(ColumnDef::new(ForumLikes::UserId).string().not_null())
                    .primary_key(Index::create().col(ForumLikes::ForumId).col(ForumLikes::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_likes_forum")
                            .from(ForumLikes::Table, ForumLikes::ForumId)
                            .to(Forums::Table, Forums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ForumCampaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumCampaigns::ForumId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumCampaigns::CampaignId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_campaigns_forum")
                            .from(ForumCampaigns::Table, ForumCampaigns::ForumId)
                            .to(Forums::Table, Forums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_campaigns_campaign")
                            .from(ForumCampaigns::Table, ForumCampaigns::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::Text).string_len(300).not_null())
                    .col(ColumnDef::new(Comments::AuthorId).string().not_null())
                    .col(ColumnDef::new(Comments::ForumId).integer().not_null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_forum")
                            .from(Comments::Table, Comments::ForumId)
                            .to(Forums::Table, Forums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: forum_id (comment listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_forum_id")
                    .table(Comments::Table)
                    .col(Comments::ForumId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumCampaigns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forums::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Forums {
    Table,
    Id,
    Title,
    Text,
    AuthorId,
    ImageUrl,
    CreatedAt,
}

#[derive(Iden)]
enum ForumLikes {
    Table,
    ForumId,
    UserId,
}

#[derive(Iden)]
enum ForumCampaigns {
    Table,
    ForumId,
    CampaignId,
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
    Text,
    AuthorId,
    ForumId,
    CreatedAt,
}
