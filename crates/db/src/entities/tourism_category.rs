//! Tourism category entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tourism_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tourism::Entity")]
    Tourisms,
}

impl Related<super::tourism::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tourisms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
