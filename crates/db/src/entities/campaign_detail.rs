//! Campaign detail entity.

use sea_orm::entity::prelude::*;

/// Long-form description of a campaign (one per campaign).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Identity-provider user id of the initiator.
    pub initiator_id: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Text")]
    pub terms: String,

    #[sea_orm(column_type = "Text")]
    pub mission: String,

    #[sea_orm(unique)]
    pub campaign_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::Id",
        on_delete = "Cascade"
    )]
    Campaign,
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
