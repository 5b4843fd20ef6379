//! Tourism favorite repository.

use std::sync::Arc;

use crate::entities::{TourismFavorite, tourism_favorite};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use traversee_common::{AppError, AppResult};

/// Tourism favorite repository for database operations.
#[derive(Clone)]
pub struct TourismFavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl TourismFavoriteRepository {
    /// Create a new tourism favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a tourism spot is among the user's favorites.
    pub async fn is_favorite(&self, tourism_id: &str, user_id: &str) -> AppResult<bool> {
        let favorite = TourismFavorite::find_by_id((tourism_id.to_string(), user_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(favorite.is_some())
    }

    /// Ids of every tourism spot the user marked as favorite.
    pub async fn tourism_ids_by_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        let rows = TourismFavorite::find()
            .filter(tourism_favorite::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|f| f.tourism_id).collect())
    }

    /// Insert a favorite.
    pub async fn create(
        &self,
        model: tourism_favorite::ActiveModel,
    ) -> AppResult<tourism_favorite::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::from)
    }

    /// Remove a favorite.
    pub async fn delete(&self, tourism_id: &str, user_id: &str) -> AppResult<()> {
        TourismFavorite::delete_by_id((tourism_id.to_string(), user_id.to_string()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
