//! Tourism repository.

use std::sync::Arc;

use crate::entities::{
    Tourism, TourismCategory, TourismDetail, TourismLocation, tourism, tourism_category,
    tourism_detail, tourism_location,
};
use crate::listing::{self, PageRequest};
use sea_orm::{Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use traversee_common::{AppError, AppResult};

/// Tourism repository for database operations.
#[derive(Clone)]
pub struct TourismRepository {
    db: Arc<DatabaseConnection>,
}

impl TourismRepository {
    /// Create a new tourism repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tourism spot by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tourism::Model>> {
        Tourism::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List tourism spots matching `filter`, by name.
    pub async fn list(
        &self,
        filter: Condition,
        page: PageRequest,
    ) -> AppResult<Vec<tourism::Model>> {
        let query = Tourism::find()
            .filter(filter)
            .order_by_asc(tourism::Column::Name);

        listing::fetch(query, page, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the detail row of a tourism spot.
    pub async fn find_detail(&self, tourism_id: &str) -> AppResult<Option<tourism_detail::Model>> {
        TourismDetail::find_by_id(tourism_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a category by ID.
    pub async fn find_category(&self, id: i32) -> AppResult<Option<tourism_category::Model>> {
        TourismCategory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All categories by name.
    pub async fn list_categories(&self) -> AppResult<Vec<tourism_category::Model>> {
        TourismCategory::find()
            .order_by_asc(tourism_category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a location by ID.
    pub async fn find_location(&self, id: i32) -> AppResult<Option<tourism_location::Model>> {
        TourismLocation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All locations by name.
    pub async fn list_locations(&self) -> AppResult<Vec<tourism_location::Model>> {
        TourismLocation::find()
            .order_by_asc(tourism_location::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
