//! Forum repository.

use std::sync::Arc;

use crate::entities::{Forum, ForumCampaign, forum, forum_campaign};
use crate::listing::{self, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use traversee_common::{AppError, AppResult};

/// Forum repository for database operations.
#[derive(Clone)]
pub struct ForumRepository {
    db: Arc<DatabaseConnection>,
}

impl ForumRepository {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a forum by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<forum::Model>> {
        Forum::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All forums, newest first.
    pub async fn list(&self, page: PageRequest) -> AppResult<Vec<forum::Model>> {
        let query = Forum::find().order_by_desc(forum::Column::CreatedAt);

        listing::fetch(query, page, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Forums written by a user, newest first.
    pub async fn list_by_author(
        &self,
        author_id: &str,
        page: PageRequest,
    ) -> AppResult<Vec<forum::Model>> {
        let query = Forum::find()
            .filter(forum::Column::AuthorId.eq(author_id))
            .order_by_desc(forum::Column::CreatedAt);

        listing::fetch(query, page, self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a forum.
    pub async fn create(&self, model: forum::ActiveModel) -> AppResult<forum::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a forum. Comments, likes and the campaign link go with it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Forum::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Campaign linked to a forum, if any.
    pub async fn find_campaign_link(
        &self,
        forum_id: i32,
    ) -> AppResult<Option<forum_campaign::Model>> {
        ForumCampaign::find_by_id(forum_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Link a forum to a campaign.
    pub async fn link_campaign(
        &self,
        model: forum_campaign::ActiveModel,
    ) -> AppResult<forum_campaign::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_forum(id: i32, author_id: &str) -> forum::Model {
        forum::Model {
            id,
            title: format!("Forum {id}"),
            text: "Who is joining the cleanup?".to_string(),
            author_id: author_id.to_string(),
            image_url: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_by_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_forum(2, "user1"), create_test_forum(1, "user1")]])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        let result = repo.list_by_author("user1", PageRequest::All).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|f| f.author_id == "user1"));
    }

    #[tokio::test]
    async fn test_find_campaign_link() {
        let link = forum_campaign::Model {
            forum_id: 1,
            campaign_id: 7,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link]])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        let result = repo.find_campaign_link(1).await.unwrap();
        assert_eq!(result.unwrap().campaign_id, 7);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ForumRepository::new(db);
        assert!(repo.delete(1).await.is_ok());
    }
}
