//! Campaign repository.

use std::sync::Arc;

use crate::entities::{
    Campaign, CampaignCategory, CampaignDetail, CampaignLocation, campaign, campaign_category,
    campaign_detail, campaign_location,
};
use crate::listing::{self, PageRequest};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use traversee_common::{AppError, AppResult};

/// Campaign repository for database operations.
#[derive(Clone)]
pub struct CampaignRepository {
    db: Arc<DatabaseConnection>,
}

impl CampaignRepository {
    /// Create a new campaign repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<campaign::Model>> {
        Campaign::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List campaigns matching `filter`, latest ending first.
    ///
    /// Ties on the end date are broken by the earliest start date.
    pub async fn list(
        &self,
        filter: Condition,
        page: PageRequest,
    ) -> AppResult<Vec<campaign::Model>> {
        let query = Campaign::find()
            .filter(filter)
            .order_by_desc(campaign::Column::EndDate)
            .order_by_asc(campaign::Column::StartDate);

        listing::fetch(query, page, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the detail row of a campaign.
    pub async fn find_detail(&self, campaign_id: i32) -> AppResult<Option<campaign_detail::Model>> {
        CampaignDetail::find()
            .filter(campaign_detail::Column::CampaignId.eq(campaign_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a category by ID.
    pub async fn find_category(&self, id: i32) -> AppResult<Option<campaign_category::Model>> {
        CampaignCategory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All categories by name.
    pub async fn list_categories(&self) -> AppResult<Vec<campaign_category::Model>> {
        CampaignCategory::find()
            .order_by_asc(campaign_category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a location by ID.
    pub async fn find_location(&self, id: i32) -> AppResult<Option<campaign_location::Model>> {
        CampaignLocation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All locations by name.
    pub async fn list_locations(&self) -> AppResult<Vec<campaign_location::Model>> {
        CampaignLocation::find()
            .order_by_asc(campaign_location::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
