//! Campaign entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A volunteering campaign.
///
/// The lifecycle status is not stored; it is derived from the two dates.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub image_url: String,

    pub location_id: i32,

    pub category_id: i32,

    /// First day of the campaign.
    pub start_date: Date,

    /// Last day of the campaign (inclusive).
    pub end_date: Date,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign_location::Entity",
        from = "Column::LocationId",
        to = "super::campaign_location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::campaign_category::Entity",
        from = "Column::CategoryId",
        to = "super::campaign_category::Column::Id"
    )]
    Category,
    #[sea_orm(has_one = "super::campaign_detail::Entity")]
    Detail,
    #[sea_orm(has_many = "super::campaign_participant::Entity")]
    Participants,
    #[sea_orm(has_many = "super::campaign_winner::Entity")]
    Winners,
}

impl Related<super::campaign_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::campaign_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::campaign_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detail.def()
    }
}

impl Related<super::campaign_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::campaign_winner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Winners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle status of a campaign relative to a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CampaignStatus {
    #[serde(rename = "Coming Soon")]
    ComingSoon,
    Ongoing,
    Completed,
}

impl CampaignStatus {
    /// Display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ComingSoon => "Coming Soon",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }
}

impl Model {
    /// Status on `today`. The end date counts as a running day.
    #[must_use]
    pub fn status_on(&self, today: Date) -> CampaignStatus {
        if self.start_date > today {
            CampaignStatus::ComingSoon
        } else if self.end_date >= today {
            CampaignStatus::Ongoing
        } else {
            CampaignStatus::Completed
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn campaign_between(start: Date, end: Date) -> Model {
        Model {
            id: 1,
            name: "Tree planting".to_string(),
            image_url: "https://img/tree.png".to_string(),
            location_id: 1,
            category_id: 1,
            start_date: start,
            end_date: end,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_coming_soon() {
        let campaign = campaign_between(day(2099, 1, 1), day(2099, 2, 1));
        assert_eq!(campaign.status_on(day(2024, 6, 1)), CampaignStatus::ComingSoon);
    }

    #[test]
    fn test_status_completed() {
        let campaign = campaign_between(day(2000, 1, 1), day(2000, 2, 1));
        assert_eq!(campaign.status_on(day(2024, 6, 1)), CampaignStatus::Completed);
    }

    #[test]
    fn test_status_ongoing_includes_bounds() {
        let today = day(2024, 6, 10);
        let around = campaign_between(day(2024, 6, 9), day(2024, 6, 11));
        assert_eq!(around.status_on(today), CampaignStatus::Ongoing);

        let starts_today = campaign_between(today, day(2024, 6, 20));
        assert_eq!(starts_today.status_on(today), CampaignStatus::Ongoing);

        let ends_today = campaign_between(day(2024, 6, 1), today);
        assert_eq!(ends_today.status_on(today), CampaignStatus::Ongoing);
    }

    #[test]
    fn test_status_label() {
        assert_eq!(CampaignStatus::ComingSoon.as_str(), "Coming Soon");
        assert_eq!(
            serde_json::to_value(CampaignStatus::ComingSoon).unwrap(),
            serde_json::json!("Coming Soon")
        );
    }
}
