//! Campaign service.

use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, Set};
use serde::Serialize;

use traversee_common::{AppError, AppResult};
use traversee_db::entities::{
    campaign, campaign_category, campaign_location, campaign_participant,
    campaign_participant::Model as Participant,
};
use traversee_db::listing::CAMPAIGN_PAGE_SIZE;
use traversee_db::repositories::{CampaignParticipantRepository, CampaignRepository};
use traversee_db::PageRequest;

use super::enrichment::{format_date, user_profile};
use super::filter::{CampaignFilter, CampaignQuery};
use super::identity::IdentityService;

/// Serialized campaign.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub category_id: i32,
    pub location_id: i32,
    pub status: campaign::CampaignStatus,
    pub start_date: String,
    pub end_date: String,
    pub category_name: String,
    pub location_name: String,
    pub total_participants: u64,
}

/// A campaign together with the requester's registration state.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignItem {
    pub campaign: CampaignView,
    pub is_registered: bool,
}

/// A registered user of a campaign.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub user_id: String,
    pub user_display_name: Option<String>,
    pub user_profile_image: Option<String>,
    pub submission_url: Option<String>,
}

/// A ranked user of a campaign.
#[derive(Debug, Clone, Serialize)]
pub struct WinnerView {
    pub user_id: String,
    pub user_display_name: Option<String>,
    pub user_profile_image: Option<String>,
    pub submission_url: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WinnerGroup {
    pub winners: Vec<WinnerView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtherParticipantGroup {
    pub other_participants: Vec<ParticipantView>,
}

/// Participants of a campaign, serialized as a two element array.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignParticipants(pub WinnerGroup, pub OtherParticipantGroup);

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetailBody {
    pub initiator_name: Option<String>,
    pub description: String,
    pub terms: String,
    pub mission: String,
}

/// Long-form description of a campaign with the requester's submission.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetailView {
    pub campaign_detail: CampaignDetailBody,
    pub submission_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignCategoryView {
    pub id: i32,
    pub name: String,
    pub image_url: String,
}

impl From<campaign_category::Model> for CampaignCategoryView {
    fn from(model: campaign_category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image_url: model.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignLocationView {
    pub id: i32,
    pub name: String,
}

impl From<campaign_location::Model> for CampaignLocationView {
    fn from(model: campaign_location::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Campaign service for listings, registrations and submissions.
#[derive(Clone)]
pub struct CampaignService {
    campaign_repo: CampaignRepository,
    participant_repo: CampaignParticipantRepository,
    identity: IdentityService,
}

impl CampaignService {
    /// Create a new campaign service.
    #[must_use]
    pub const fn new(
        campaign_repo: CampaignRepository,
        participant_repo: CampaignParticipantRepository,
        identity: IdentityService,
    ) -> Self {
        Self {
            campaign_repo,
            participant_repo,
            identity,
        }
    }

    fn not_found(id: i32) -> AppError {
        AppError::NotFound(format!("Campaign with id {id} doesn't exist"))
    }

    async fn get_campaign(&self, id: i32) -> AppResult<campaign::Model> {
        self.campaign_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Campaigns visible to `requester` matching the query.
    pub async fn list(&self, requester: &str, query: &CampaignQuery) -> AppResult<Vec<CampaignItem>> {
        self.list_where(requester, query, Condition::all()).await
    }

    /// Campaigns of one category, with the regular filters on top.
    pub async fn list_by_category(
        &self,
        requester: &str,
        category_id: i32,
        query: &CampaignQuery,
    ) -> AppResult<Vec<CampaignItem>> {
        self.category(category_id).await?;

        let scope = Condition::all().add(campaign::Column::CategoryId.eq(category_id));
        self.list_where(requester, query, scope).await
    }

    /// Campaigns `user_id` registered for.
    pub async fn list_registered_by(
        &self,
        requester: &str,
        user_id: &str,
        query: &CampaignQuery,
    ) -> AppResult<Vec<CampaignItem>> {
        if self.identity.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User with id {user_id} doesn't exist"
            )));
        }

        let ids = self.participant_repo.campaign_ids_by_user(user_id).await?;
        let scope = Condition::all().add(campaign::Column::Id.is_in(ids));
        self.list_where(requester, query, scope).await
    }

    async fn list_where(
        &self,
        requester: &str,
        query: &CampaignQuery,
        scope: Condition,
    ) -> AppResult<Vec<CampaignItem>> {
        let filter = CampaignFilter::from_query(query);
        let registered = if filter.needs_registrations() {
            self.participant_repo.campaign_ids_by_user(requester).await?
        } else {
            Vec::new()
        };

        let today = Utc::now().date_naive();
        let condition = filter.condition(today, &registered).add(scope);
        let page = PageRequest::parse(query.page.as_deref(), CAMPAIGN_PAGE_SIZE);

        let campaigns = self.campaign_repo.list(condition, page).await?;
        let mut items = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            items.push(self.serialize(requester, campaign).await?);
        }
        Ok(items)
    }

    /// A single campaign.
    pub async fn get(&self, requester: &str, id: i32) -> AppResult<CampaignItem> {
        let campaign = self.get_campaign(id).await?;
        self.serialize(requester, campaign).await
    }

    /// Campaign with derived fields and the requester's registration flag.
    pub async fn serialize(
        &self,
        requester: &str,
        campaign: campaign::Model,
    ) -> AppResult<CampaignItem> {
        let view = self.campaign_view(campaign).await?;
        let is_registered = self
            .participant_repo
            .is_registered(requester, view.id)
            .await?;
        Ok(CampaignItem {
            campaign: view,
            is_registered,
        })
    }

    async fn campaign_view(&self, campaign: campaign::Model) -> AppResult<CampaignView> {
        let category = self
            .campaign_repo
            .find_category(campaign.category_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Campaign {} references missing category {}",
                    campaign.id, campaign.category_id
                ))
            })?;
        let location = self
            .campaign_repo
            .find_location(campaign.location_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Campaign {} references missing location {}",
                    campaign.id, campaign.location_id
                ))
            })?;
        let total_participants = self.participant_repo.count_by_campaign(campaign.id).await?;

        Ok(CampaignView {
            status: campaign.status_on(Utc::now().date_naive()),
            start_date: format_date(campaign.start_date),
            end_date: format_date(campaign.end_date),
            id: campaign.id,
            name: campaign.name,
            image_url: campaign.image_url,
            category_id: campaign.category_id,
            location_id: campaign.location_id,
            category_name: category.name,
            location_name: location.name,
            total_participants,
        })
    }

    /// Register `user_id` for a campaign.
    pub async fn register(&self, user_id: &str, campaign_id: i32) -> AppResult<ParticipantView> {
        let campaign = self.get_campaign(campaign_id).await?;
        let already_registered =
            || AppError::Conflict(format!("User {user_id} is already registered"));

        if self.participant_repo.is_registered(user_id, campaign.id).await? {
            return Err(already_registered());
        }

        let model = campaign_participant::ActiveModel {
            user_id: Set(user_id.to_string()),
            campaign_id: Set(campaign.id),
            submission_url: Set(None),
            created_at: Set(Utc::now().into()),
        };
        let participant = self
            .participant_repo
            .create(model)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => already_registered(),
                other => other,
            })?;

        tracing::info!(user_id = %user_id, campaign_id = campaign.id, "Registered for campaign");
        Ok(self.participant_view(participant).await)
    }

    /// Record the submission link of `user_id`, registering them if needed.
    pub async fn submit(
        &self,
        user_id: &str,
        campaign_id: i32,
        submission_url: Option<&str>,
    ) -> AppResult<ParticipantView> {
        let campaign = self.get_campaign(campaign_id).await?;

        let submission_url = submission_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::BadRequest("Submission url are required".to_string()))?;

        let participant = match self.participant_repo.find(user_id, campaign.id).await? {
            Some(existing) => {
                let mut active: campaign_participant::ActiveModel = existing.into();
                active.submission_url = Set(Some(submission_url.to_string()));
                self.participant_repo.update(active).await?
            }
            None => {
                let model = campaign_participant::ActiveModel {
                    user_id: Set(user_id.to_string()),
                    campaign_id: Set(campaign.id),
                    submission_url: Set(Some(submission_url.to_string())),
                    created_at: Set(Utc::now().into()),
                };
                self.participant_repo.create(model).await?
            }
        };

        tracing::info!(user_id = %user_id, campaign_id = campaign.id, "Submitted campaign task");
        Ok(self.participant_view(participant).await)
    }

    async fn participant_view(&self, participant: Participant) -> ParticipantView {
        let profile = user_profile(&self.identity, &participant.user_id).await;
        ParticipantView {
            user_id: participant.user_id,
            user_display_name: profile.display_name,
            user_profile_image: profile.profile_image,
            submission_url: participant.submission_url,
        }
    }

    /// Description, terms and mission of a campaign.
    pub async fn details(&self, requester: &str, campaign_id: i32) -> AppResult<CampaignDetailView> {
        let detail = self
            .campaign_repo
            .find_detail(campaign_id)
            .await?
            .ok_or_else(|| Self::not_found(campaign_id))?;

        let initiator = user_profile(&self.identity, &detail.initiator_id).await;
        let submission_url = self
            .participant_repo
            .find(requester, campaign_id)
            .await?
            .and_then(|p| p.submission_url);

        Ok(CampaignDetailView {
            campaign_detail: CampaignDetailBody {
                initiator_name: initiator.display_name,
                description: detail.description,
                terms: detail.terms,
                mission: detail.mission,
            },
            submission_url,
        })
    }

    /// Winners by position, then every other participant by registration time.
    pub async fn participants(&self, campaign_id: i32) -> AppResult<CampaignParticipants> {
        let campaign = self.get_campaign(campaign_id).await?;

        let winners = self.participant_repo.list_winners(campaign.id).await?;
        let participants = self.participant_repo.list_by_campaign(campaign.id).await?;

        let mut winner_views = Vec::with_capacity(winners.len());
        for winner in &winners {
            let submission_url = participants
                .iter()
                .find(|p| p.user_id == winner.user_id)
                .and_then(|p| p.submission_url.clone());
            let profile = user_profile(&self.identity, &winner.user_id).await;
            winner_views.push(WinnerView {
                user_id: winner.user_id.clone(),
                user_display_name: profile.display_name,
                user_profile_image: profile.profile_image,
                submission_url,
                position: winner.position,
            });
        }

        let mut others = Vec::new();
        for participant in participants {
            if winners.iter().any(|w| w.user_id == participant.user_id) {
                continue;
            }
            others.push(self.participant_view(participant).await);
        }

        Ok(CampaignParticipants(
            WinnerGroup {
                winners: winner_views,
            },
            OtherParticipantGroup {
                other_participants: others,
            },
        ))
    }

    /// All campaign categories.
    pub async fn categories(&self) -> AppResult<Vec<CampaignCategoryView>> {
        let categories = self.campaign_repo.list_categories().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// A single campaign category.
    pub async fn category(&self, id: i32) -> AppResult<CampaignCategoryView> {
        self.campaign_repo
            .find_category(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Category with id {id} doesn't exist")))
    }

    /// All campaign locations.
    pub async fn locations(&self) -> AppResult<Vec<CampaignLocationView>> {
        let locations = self.campaign_repo.list_locations().await?;
        Ok(locations.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::identity::StaticIdentityProvider;
    use chrono::{Duration, NaiveDate};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;
    use traversee_db::entities::{campaign_detail, campaign_winner};

    fn identity() -> IdentityService {
        Arc::new(
            StaticIdentityProvider::new()
                .with_user("user1", "Sari", Some("https://p/user1.png"))
                .with_user("user2", "Budi", None),
        )
    }

    fn service(db: DatabaseConnection) -> CampaignService {
        let db = Arc::new(db);
        CampaignService::new(
            CampaignRepository::new(Arc::clone(&db)),
            CampaignParticipantRepository::new(db),
            identity(),
        )
    }

    fn campaign(id: i32, start: NaiveDate, end: NaiveDate) -> campaign::Model {
        campaign::Model {
            id,
            name: "River cleanup".to_string(),
            image_url: "https://img/river.png".to_string(),
            location_id: 1,
            category_id: 2,
            start_date: start,
            end_date: end,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn participant(user_id: &str, url: Option<&str>) -> campaign_participant::Model {
        campaign_participant::Model {
            user_id: user_id.to_string(),
            campaign_id: 1,
            submission_url: url.map(ToString::to_string),
            created_at: Utc::now().into(),
        }
    }

    fn count(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
    }

    #[tokio::test]
    async fn test_get_serializes_campaign() {
        let today = Utc::now().date_naive();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[campaign(1, today - Duration::days(1), today)]])
            .append_query_results([[campaign_category::Model {
                id: 2,
                name: "Environment".to_string(),
                image_url: "https://img/env.png".to_string(),
            }]])
            .append_query_results([[campaign_location::Model {
                id: 1,
                name: "Bandung".to_string(),
            }]])
            .append_query_results([[count(3)]])
            .append_query_results([[participant("user1", None)]])
            .into_connection();

        let item = service(db).get("user1", 1).await.unwrap();

        assert!(item.is_registered);
        assert_eq!(item.campaign.status, campaign::CampaignStatus::Ongoing);
        assert_eq!(item.campaign.category_name, "Environment");
        assert_eq!(item.campaign.location_name, "Bandung");
        assert_eq!(item.campaign.total_participants, 3);
        assert_eq!(item.campaign.end_date, format_date(today));
    }

    #[tokio::test]
    async fn test_get_missing_campaign() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<campaign::Model>::new()])
            .into_connection();

        let result = service(db).get("user1", 9).await;
        match result {
            Err(AppError::NotFound(message)) => {
                assert_eq!(message, "Campaign with id 9 doesn't exist");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dangling_category_is_internal_error() {
        let today = Utc::now().date_naive();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[campaign(1, today, today)]])
            .append_query_results([Vec::<campaign_category::Model>::new()])
            .into_connection();

        let result = service(db).get("user1", 1).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let today = Utc::now().date_naive();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[campaign(1, today, today)]])
            .append_query_results([[participant("user1", None)]])
            .into_connection();

        let result = service(db).register("user1", 1).await;
        match result {
            Err(AppError::Conflict(message)) => {
                assert_eq!(message, "User user1 is already registered");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_creates_participant() {
        let today = Utc::now().date_naive();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[campaign(1, today, today)]])
            .append_query_results([Vec::<campaign_participant::Model>::new()])
            .append_query_results([[participant("user1", None)]])
            .into_connection();

        let view = service(db).register("user1", 1).await.unwrap();
        assert_eq!(view.user_id, "user1");
        assert_eq!(view.user_display_name.as_deref(), Some("Sari"));
        assert_eq!(view.submission_url, None);
    }

    #[tokio::test]
    async fn test_submit_requires_url() {
        let today = Utc::now().date_naive();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[campaign(1, today, today)]])
            .into_connection();

        let result = service(db).submit("user1", 1, Some("")).await;
        match result {
            Err(AppError::BadRequest(message)) => {
                assert_eq!(message, "Submission url are required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_details_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<campaign_detail::Model>::new()])
            .into_connection();

        let result = service(db).details("user1", 4).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_participants_excludes_winners() {
        let today = Utc::now().date_naive();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[campaign(1, today, today)]])
            .append_query_results([[campaign_winner::Model {
                user_id: "user2".to_string(),
                campaign_id: 1,
                position: 1,
            }]])
            .append_query_results([[
                participant("user1", None),
                participant("user2", Some("https://drive/work")),
            ]])
            .into_connection();

        let CampaignParticipants(winners, others) = service(db).participants(1).await.unwrap();

        assert_eq!(winners.winners.len(), 1);
        assert_eq!(winners.winners[0].user_id, "user2");
        assert_eq!(
            winners.winners[0].submission_url.as_deref(),
            Some("https://drive/work")
        );
        assert_eq!(others.other_participants.len(), 1);
        assert_eq!(others.other_participants[0].user_id, "user1");

        let json = serde_json::to_value(CampaignParticipants(winners, others)).unwrap();
        assert!(json[0]["winners"].is_array());
        assert!(json[1]["other_participants"].is_array());
    }

    #[tokio::test]
    async fn test_registered_by_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .list_registered_by("user1", "ghost", &CampaignQuery::default())
            .await;
        match result {
            Err(AppError::NotFound(message)) => {
                assert_eq!(message, "User with id ghost doesn't exist");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
