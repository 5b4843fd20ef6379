//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::listing::{self, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use traversee_common::{AppError, AppResult};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments of a forum, newest first.
    pub async fn list_by_forum(
        &self,
        forum_id: i32,
        page: PageRequest,
    ) -> AppResult<Vec<comment::Model>> {
        let query = Comment::find()
            .filter(comment::Column::ForumId.eq(forum_id))
            .order_by_desc(comment::Column::CreatedAt);

        listing::fetch(query, page, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment by ID.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count comments of a forum.
    pub async fn count_by_forum(&self, forum_id: i32) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::ForumId.eq(forum_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: i32, forum_id: i32) -> comment::Model {
        comment::Model {
            id,
            text: "Count me in".to_string(),
            author_id: "user1".to_string(),
            forum_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_by_forum_paginated() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(11, 1)]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo
            .list_by_forum(1, PageRequest::parse(Some("2"), 10))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].forum_id, 1);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(3, 1)]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert_eq!(repo.find_by_id(3).await.unwrap().unwrap().id, 3);
    }
}
