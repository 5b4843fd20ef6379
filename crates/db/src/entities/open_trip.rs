//! Open trip entity.

use sea_orm::entity::prelude::*;

/// A scheduled group trip anyone can join before the registration deadline.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "open_trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: String,

    /// Free-form price label, e.g. "Rp 1.500.000".
    pub price: String,

    pub organizer: String,

    pub trip_start: DateTime,

    pub trip_end: DateTime,

    pub regis_deadline: DateTime,

    pub phone_number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip_destination::Entity")]
    Destinations,
}

impl Related<super::trip_destination::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Destinations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whole days between the start and the end of the trip.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.trip_end - self.trip_start).num_days()
    }
}
