//! Forum like repository.

use std::sync::Arc;

use crate::entities::{ForumLike, forum_like};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use traversee_common::{AppError, AppResult};

/// Forum like repository for database operations.
#[derive(Clone)]
pub struct ForumLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ForumLikeRepository {
    /// Create a new forum like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user liked a forum.
    pub async fn is_liked(&self, forum_id: i32, user_id: &str) -> AppResult<bool> {
        let like = ForumLike::find_by_id((forum_id, user_id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(like.is_some())
    }

    /// Insert a like.
    pub async fn create(&self, model: forum_like::ActiveModel) -> AppResult<forum_like::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::from)
    }

    /// Remove a like.
    pub async fn delete(&self, forum_id: i32, user_id: &str) -> AppResult<()> {
        ForumLike::delete_by_id((forum_id, user_id.to_string()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes of a forum.
    pub async fn count_by_forum(&self, forum_id: i32) -> AppResult<u64> {
        ForumLike::find()
            .filter(forum_like::Column::ForumId.eq(forum_id))
            .count(self.db.as_ref())
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
    async fn test_is_liked() {
        let like = forum_like::Model {
            forum_id: 1,
            user_id: "user1".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .append_query_results([Vec::<forum_like::Model>::new()])
                .into_connection(),
        );

        let repo = ForumLikeRepository::new(db);
        assert!(repo.is_liked(1, "user1").await.unwrap());
        assert!(!repo.is_liked(1, "user2").await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_forum() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(12))
                }]])
                .into_connection(),
        );

        let repo = ForumLikeRepository::new(db);
        assert_eq!(repo.count_by_forum(1).await.unwrap(), 12);
    }
}
