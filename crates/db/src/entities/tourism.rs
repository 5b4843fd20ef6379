//! Tourism spot entity.

use sea_orm::entity::prelude::*;

/// A tourism spot. Ids come from the upstream dataset and are strings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tourisms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    pub location_id: i32,

    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tourism_location::Entity",
        from = "Column::LocationId",
        to = "super::tourism_location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::tourism_category::Entity",
        from = "Column::CategoryId",
        to = "super::tourism_category::Column::Id"
    )]
    Category,
    #[sea_orm(has_one = "super::tourism_detail::Entity")]
    Detail,
    #[sea_orm(has_many = "super::tourism_favorite::Entity")]
    Favorites,
    #[sea_orm(has_many = "super::tourism_user_click::Entity")]
    Clicks,
}

impl Related<super::tourism_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::tourism_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::tourism_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detail.def()
    }
}

impl Related<super::tourism_favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::tourism_user_click::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clicks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
