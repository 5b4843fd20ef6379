//! Campaign participant and winner repository.

use std::sync::Arc;

use crate::entities::{
    CampaignParticipant, CampaignWinner, campaign_participant, campaign_winner,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use traversee_common::{AppError, AppResult};

/// Repository for campaign registrations and rankings.
#[derive(Clone)]
pub struct CampaignParticipantRepository {
    db: Arc<DatabaseConnection>,
}

impl CampaignParticipantRepository {
    /// Create a new participant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the registration of a user for a campaign.
    pub async fn find(
        &self,
        user_id: &str,
        campaign_id: i32,
    ) -> AppResult<Option<campaign_participant::Model>> {
        CampaignParticipant::find_by_id((user_id.to_string(), campaign_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is registered for a campaign.
    pub async fn is_registered(&self, user_id: &str, campaign_id: i32) -> AppResult<bool> {
        Ok(self.find(user_id, campaign_id).await?.is_some())
    }

    /// Ids of every campaign the user registered for.
    pub async fn campaign_ids_by_user(&self, user_id: &str) -> AppResult<Vec<i32>> {
        let rows = CampaignParticipant::find()
            .filter(campaign_participant::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|p| p.campaign_id).collect())
    }

    /// Insert a registration.
    ///
    /// A concurrent duplicate surfaces as [`AppError::Conflict`].
    pub async fn create(
        &self,
        model: campaign_participant::ActiveModel,
    ) -> AppResult<campaign_participant::Model> {
        model.insert(self.db.as_ref()).await.map_err(AppError::from)
    }

    /// Update a registration (submission link).
    pub async fn update(
        &self,
        model: campaign_participant::ActiveModel,
    ) -> AppResult<campaign_participant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Registrations of a campaign, oldest first.
    pub async fn list_by_campaign(
        &self,
        campaign_id: i32,
    ) -> AppResult<Vec<campaign_participant::Model>> {
        CampaignParticipant::find()
            .filter(campaign_participant::Column::CampaignId.eq(campaign_id))
            .order_by_asc(campaign_participant::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count registrations of a campaign.
    pub async fn count_by_campaign(&self, campaign_id: i32) -> AppResult<u64> {
        CampaignParticipant::find()
            .filter(campaign_participant::Column::CampaignId.eq(campaign_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Winners of a campaign by ranking.
    pub async fn list_winners(&self, campaign_id: i32) -> AppResult<Vec<campaign_winner::Model>> {
        CampaignWinner::find()
            .filter(campaign_winner::Column::CampaignId.eq(campaign_id))
            .order_by_asc(campaign_winner::Column::Position)
            .all(self.db.as_ref())
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

    fn create_test_participant(user_id: &str, campaign_id: i32) -> campaign_participant::Model {
        campaign_participant::Model {
            user_id: user_id.to_string(),
            campaign_id,
            submission_url: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_registered() {
        let participant = create_test_participant("user1", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[participant]])
                .append_query_results([Vec::<campaign_participant::Model>::new()])
                .into_connection(),
        );

        let repo = CampaignParticipantRepository::new(db);
        assert!(repo.is_registered("user1", 1).await.unwrap());
        assert!(!repo.is_registered("user1", 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_campaign_ids_by_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_participant("user1", 3),
                    create_test_participant("user1", 8),
                ]])
                .into_connection(),
        );

        let repo = CampaignParticipantRepository::new(db);
        assert_eq!(repo.campaign_ids_by_user("user1").await.unwrap(), vec![3, 8]);
    }

    #[tokio::test]
    async fn test_count_by_campaign() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = CampaignParticipantRepository::new(db);
        assert_eq!(repo.count_by_campaign(1).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_winners() {
        let winners = vec![
            campaign_winner::Model {
                user_id: "user2".to_string(),
                campaign_id: 1,
                position: 1,
            },
            campaign_winner::Model {
                user_id: "user1".to_string(),
                campaign_id: 1,
                position: 2,
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([winners])
                .into_connection(),
        );

        let repo = CampaignParticipantRepository::new(db);
        let result = repo.list_winners(1).await.unwrap();
        assert_eq!(result[0].user_id, "user2");
        assert_eq!(result[1].position, 2);
    }
}
