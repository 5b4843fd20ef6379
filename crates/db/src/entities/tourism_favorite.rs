//! Tourism favorite entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tourism_favorites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tourism_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tourism::Entity",
        from = "Column::TourismId",
        to = "super::tourism::Column::Id",
        on_delete = "Cascade"
    )]
    Tourism,
}

impl Related<super::tourism::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tourism.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
