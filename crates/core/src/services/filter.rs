//! Listing filters for campaigns and tourism spots.
//!
//! Query parameters arrive as optional strings. They are parsed leniently:
//! a malformed value never produces an error, it either drops the filter or
//! narrows the listing to nothing.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};
use serde::Deserialize;
use traversee_db::entities::{campaign, tourism};

/// Raw query parameters of a campaign listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CampaignQuery {
    pub page: Option<String>,
    pub status: Option<String>,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
    pub is_registered: Option<String>,
    pub search: Option<String>,
}

/// Raw query parameters of a tourism listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TourismQuery {
    pub page: Option<String>,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
    pub is_favorite: Option<String>,
    pub search: Option<String>,
}

/// Date window selected by the `status` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusWindow {
    Ongoing,
    ComingSoon,
    Completed,
}

impl StatusWindow {
    /// Unknown values select no window.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "ongoing" => Some(Self::Ongoing),
            "coming-soon" => Some(Self::ComingSoon),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Predicates on the campaign dates for `today`.
    #[must_use]
    pub fn condition(self, today: chrono::NaiveDate) -> Condition {
        use campaign::Column::{EndDate, StartDate};

        match self {
            Self::Ongoing => Condition::all()
                .add(StartDate.lte(today))
                .add(EndDate.gte(today)),
            Self::ComingSoon => Condition::all()
                .add(StartDate.gt(today))
                .add(EndDate.gt(today)),
            Self::Completed => Condition::all()
                .add(StartDate.lt(today))
                .add(EndDate.lt(today)),
        }
    }
}

/// An integer id parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdParam {
    /// Not given, or empty.
    Absent,
    Exact(i32),
    /// Given but not a non-negative integer.
    Malformed,
}

impl IdParam {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Absent,
            Some(s) if s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().map_or(Self::Malformed, Self::Exact)
            }
            Some(_) => Self::Malformed,
        }
    }

    /// Equality predicate on `column`.
    ///
    /// A malformed id compares the non-nullable column against NULL, which
    /// matches no row.
    fn predicate<C: ColumnTrait>(self, column: C) -> Option<SimpleExpr> {
        match self {
            Self::Absent => None,
            Self::Exact(id) => Some(column.eq(id)),
            Self::Malformed => Some(column.is_null()),
        }
    }
}

/// Membership selector of `is_registered` / `is_favorite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Included,
    Excluded,
}

impl Membership {
    /// Only `"true"` and `"false"` select anything.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "true" => Some(Self::Included),
            "false" => Some(Self::Excluded),
            _ => None,
        }
    }

    fn predicate<C, V, I>(self, column: C, ids: I) -> SimpleExpr
    where
        C: ColumnTrait,
        V: Into<sea_orm::Value>,
        I: IntoIterator<Item = V>,
    {
        match self {
            Self::Included => column.is_in(ids),
            Self::Excluded => column.is_not_in(ids),
        }
    }
}

/// Whitespace separated search keywords.
#[must_use]
pub fn keywords(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default()
}

/// Case-insensitive substring match of every keyword on `column`.
fn keyword_predicates<C: ColumnTrait>(column: C, keywords: &[String]) -> Vec<SimpleExpr> {
    keywords
        .iter()
        .map(|kw| Expr::expr(Func::lower(Expr::col(column.as_column_ref()))).like(format!("%{kw}%")))
        .collect()
}

/// Parsed campaign listing filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignFilter {
    pub status: Option<StatusWindow>,
    pub location: IdParam,
    pub category: IdParam,
    pub registration: Option<Membership>,
    pub keywords: Vec<String>,
}

impl CampaignFilter {
    #[must_use]
    pub fn from_query(query: &CampaignQuery) -> Self {
        Self {
            status: StatusWindow::parse(query.status.as_deref()),
            location: IdParam::parse(query.location_id.as_deref()),
            category: IdParam::parse(query.category_id.as_deref()),
            registration: Membership::parse(query.is_registered.as_deref()),
            keywords: keywords(query.search.as_deref()),
        }
    }

    /// Whether the requester's registrations must be looked up.
    #[must_use]
    pub const fn needs_registrations(&self) -> bool {
        self.registration.is_some()
    }

    /// AND of every predicate. `registered` holds the requester's campaign
    /// ids and is only read when a membership filter is set.
    #[must_use]
    pub fn condition(&self, today: chrono::NaiveDate, registered: &[i32]) -> Condition {
        let mut condition = Condition::all();

        for predicate in keyword_predicates(campaign::Column::Name, &self.keywords) {
            condition = condition.add(predicate);
        }
        if let Some(window) = self.status {
            condition = condition.add(window.condition(today));
        }
        if let Some(p) = self.location.predicate(campaign::Column::LocationId) {
            condition = condition.add(p);
        }
        if let Some(p) = self.category.predicate(campaign::Column::CategoryId) {
            condition = condition.add(p);
        }
        if let Some(membership) = self.registration {
            condition = condition.add(
                membership.predicate(campaign::Column::Id, registered.iter().copied()),
            );
        }

        condition
    }
}

/// Parsed tourism listing filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourismFilter {
    pub location: IdParam,
    pub category: IdParam,
    pub favorite: Option<Membership>,
    pub keywords: Vec<String>,
}

impl TourismFilter {
    #[must_use]
    pub fn from_query(query: &TourismQuery) -> Self {
        Self {
            location: IdParam::parse(query.location_id.as_deref()),
            category: IdParam::parse(query.category_id.as_deref()),
            favorite: Membership::parse(query.is_favorite.as_deref()),
            keywords: keywords(query.search.as_deref()),
        }
    }

    /// Whether the requester's favorites must be looked up.
    #[must_use]
    pub const fn needs_favorites(&self) -> bool {
        self.favorite.is_some()
    }

    #[must_use]
    pub fn condition(&self, favorites: &[String]) -> Condition {
        let mut condition = Condition::all();

        for predicate in keyword_predicates(tourism::Column::Name, &self.keywords) {
            condition = condition.add(predicate);
        }
        if let Some(p) = self.location.predicate(tourism::Column::LocationId) {
            condition = condition.add(p);
        }
        if let Some(p) = self.category.predicate(tourism::Column::CategoryId) {
            condition = condition.add(p);
        }
        if let Some(membership) = self.favorite {
            condition = condition
                .add(membership.predicate(tourism::Column::Id, favorites.iter().cloned()));
        }

        condition
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};
    use traversee_db::entities::{Campaign, Tourism};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn campaign_sql(condition: Condition) -> String {
        Campaign::find()
            .filter(condition)
            .build(DbBackend::Postgres)
            .to_string()
    }

    fn tourism_sql(condition: Condition) -> String {
        Tourism::find()
            .filter(condition)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_id_param_parse() {
        assert_eq!(IdParam::parse(None), IdParam::Absent);
        assert_eq!(IdParam::parse(Some("")), IdParam::Absent);
        assert_eq!(IdParam::parse(Some("12")), IdParam::Exact(12));
        assert_eq!(IdParam::parse(Some("abc")), IdParam::Malformed);
        assert_eq!(IdParam::parse(Some("-3")), IdParam::Malformed);
        assert_eq!(IdParam::parse(Some("99999999999")), IdParam::Malformed);
    }

    #[test]
    fn test_membership_parse() {
        assert_eq!(Membership::parse(Some("true")), Some(Membership::Included));
        assert_eq!(Membership::parse(Some("false")), Some(Membership::Excluded));
        assert_eq!(Membership::parse(Some("yes")), None);
        assert_eq!(Membership::parse(None), None);
    }

    #[test]
    fn test_keywords_split_on_whitespace() {
        assert_eq!(keywords(Some("  Beach   CLEANUP ")), vec!["beach", "cleanup"]);
        assert!(keywords(Some("   ")).is_empty());
        assert!(keywords(None).is_empty());
    }

    #[test]
    fn test_empty_query_has_no_predicates() {
        let filter = CampaignFilter::from_query(&CampaignQuery::default());
        assert!(!filter.needs_registrations());

        let condition = filter.condition(today(), &[]);
        assert!(condition.is_empty());
        let sql = campaign_sql(condition);
        assert!(!sql.contains("LIKE"));
        assert!(!sql.contains(r#""campaigns"."location_id""#));
        assert!(!sql.contains(r#""campaigns"."start_date" <"#));

        let filter = TourismFilter::from_query(&TourismQuery::default());
        assert!(!filter.needs_favorites());
        assert!(filter.condition(&[]).is_empty());
    }

    #[test]
    fn test_ongoing_window() {
        let query = CampaignQuery {
            status: Some("ongoing".to_string()),
            ..Default::default()
        };
        let sql = campaign_sql(CampaignFilter::from_query(&query).condition(today(), &[]));
        assert!(sql.contains(r#""campaigns"."start_date" <= '2024-06-10'"#));
        assert!(sql.contains(r#""campaigns"."end_date" >= '2024-06-10'"#));
    }

    #[test]
    fn test_coming_soon_and_completed_windows() {
        let sql = campaign_sql(StatusWindow::ComingSoon.condition(today()));
        assert!(sql.contains(r#""campaigns"."start_date" > '2024-06-10'"#));
        assert!(sql.contains(r#""campaigns"."end_date" > '2024-06-10'"#));

        let sql = campaign_sql(StatusWindow::Completed.condition(today()));
        assert!(sql.contains(r#""campaigns"."start_date" < '2024-06-10'"#));
        assert!(sql.contains(r#""campaigns"."end_date" < '2024-06-10'"#));
    }

    #[test]
    fn test_unknown_status_is_ignored() {
        let query = CampaignQuery {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(CampaignFilter::from_query(&query).status.is_none());
    }

    #[test]
    fn test_malformed_location_matches_nothing() {
        let query = CampaignQuery {
            location_id: Some("abc".to_string()),
            ..Default::default()
        };
        let sql = campaign_sql(CampaignFilter::from_query(&query).condition(today(), &[]));
        assert!(sql.contains(r#""campaigns"."location_id" IS NULL"#));
    }

    #[test]
    fn test_location_and_category_equality() {
        let query = CampaignQuery {
            location_id: Some("3".to_string()),
            category_id: Some("4".to_string()),
            ..Default::default()
        };
        let sql = campaign_sql(CampaignFilter::from_query(&query).condition(today(), &[]));
        assert!(sql.contains(r#""campaigns"."location_id" = 3"#));
        assert!(sql.contains(r#""campaigns"."category_id" = 4"#));
    }

    #[test]
    fn test_registration_membership() {
        let mut query = CampaignQuery {
            is_registered: Some("true".to_string()),
            ..Default::default()
        };
        let filter = CampaignFilter::from_query(&query);
        assert!(filter.needs_registrations());
        let sql = campaign_sql(filter.condition(today(), &[1, 2]));
        assert!(sql.contains(r#""campaigns"."id" IN (1, 2)"#));

        query.is_registered = Some("false".to_string());
        let sql = campaign_sql(CampaignFilter::from_query(&query).condition(today(), &[1, 2]));
        assert!(sql.contains(r#""campaigns"."id" NOT IN (1, 2)"#));
    }

    #[test]
    fn test_keyword_search_per_word() {
        let query = CampaignQuery {
            search: Some("Beach Cleanup".to_string()),
            ..Default::default()
        };
        let sql = campaign_sql(CampaignFilter::from_query(&query).condition(today(), &[]));
        assert!(sql.contains(r#"LOWER("campaigns"."name") LIKE '%beach%'"#));
        assert!(sql.contains(r#"LOWER("campaigns"."name") LIKE '%cleanup%'"#));
    }

    #[test]
    fn test_tourism_favorites() {
        let query = TourismQuery {
            is_favorite: Some("true".to_string()),
            category_id: Some("x1".to_string()),
            ..Default::default()
        };
        let filter = TourismFilter::from_query(&query);
        assert!(filter.needs_favorites());
        let sql = tourism_sql(filter.condition(&["TRS-001".to_string()]));
        assert!(sql.contains(r#""tourisms"."id" IN ('TRS-001')"#));
        assert!(sql.contains(r#""tourisms"."category_id" IS NULL"#));
    }

    #[test]
    fn test_tourism_keyword_search_per_word() {
        let query = TourismQuery {
            search: Some("  Kawah PUTIH ".to_string()),
            ..Default::default()
        };
        let filter = TourismFilter::from_query(&query);
        assert_eq!(filter.keywords, vec!["kawah", "putih"]);
        assert!(!filter.needs_favorites());

        let sql = tourism_sql(filter.condition(&[]));
        assert!(sql.contains(r#"LOWER("tourisms"."name") LIKE '%kawah%'"#));
        assert!(sql.contains(r#"LOWER("tourisms"."name") LIKE '%putih%'"#));
        assert!(sql.contains(" AND "));
        assert!(!sql.contains(r#""tourisms"."id" IN"#));
    }
}
