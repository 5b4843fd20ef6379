//! Tourism click counter repository.

use std::sync::Arc;

use crate::entities::{TourismUserClick, tourism_user_click};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use traversee_common::{AppError, AppResult};

/// Per-user detail view counters.
#[derive(Clone)]
pub struct TourismClickRepository {
    db: Arc<DatabaseConnection>,
}

impl TourismClickRepository {
    /// Create a new click repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the counter of a user for a tourism spot.
    pub async fn find(
        &self,
        tourism_id: &str,
        user_id: &str,
    ) -> AppResult<Option<tourism_user_click::Model>> {
        TourismUserClick::find_by_id((tourism_id.to_string(), user_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a counter.
    pub async fn create(
        &self,
        model: tourism_user_click::ActiveModel,
    ) -> AppResult<tourism_user_click::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::from)
    }

    /// Update a counter.
    pub async fn update(
        &self,
        model: tourism_user_click::ActiveModel,
    ) -> AppResult<tourism_user_click::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_counter() {
        let click = tourism_user_click::Model {
            tourism_id: "TRS-001".to_string(),
            user_id: "user1".to_string(),
            total_click: 3,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[click]])
                .append_query_results([Vec::<tourism_user_click::Model>::new()])
                .into_connection(),
        );

        let repo = TourismClickRepository::new(db);
        assert_eq!(
            repo.find("TRS-001", "user1").await.unwrap().unwrap().total_click,
            3
        );
        assert!(repo.find("TRS-002", "user1").await.unwrap().is_none());
    }
}
