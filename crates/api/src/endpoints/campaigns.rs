//! Campaign endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use traversee_common::AppResult;
use traversee_core::{
    CampaignCategoryView, CampaignDetailView, CampaignItem, CampaignLocationView,
    CampaignParticipants, CampaignQuery, ParticipantView,
};

use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Submission request.
#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    pub submission_url: Option<String>,
}

/// List campaigns.
async fn list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CampaignQuery>,
) -> AppResult<ApiResponse<Vec<CampaignItem>>> {
    let campaigns = state.campaign_service.list(&user_id, &query).await?;
    Ok(ApiResponse::ok(campaigns))
}

/// Get a campaign.
async fn show(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<CampaignItem>> {
    let campaign = state.campaign_service.get(&user_id, id).await?;
    Ok(ApiResponse::ok(campaign))
}

/// Register for a campaign.
async fn register(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<ParticipantView>> {
    let participant = state.campaign_service.register(&user_id, id).await?;
    Ok(ApiResponse::created(participant))
}

/// Submit the task of a campaign.
async fn submit(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<SubmissionRequest>,
) -> AppResult<ApiResponse<ParticipantView>> {
    let participant = state
        .campaign_service
        .submit(&user_id, id, req.submission_url.as_deref())
        .await?;
    Ok(ApiResponse::created(participant))
}

/// Get the long description of a campaign.
async fn details(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<CampaignDetailView>> {
    let detail = state.campaign_service.details(&user_id, id).await?;
    Ok(ApiResponse::ok(detail))
}

/// List winners and participants of a campaign.
async fn participants(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<CampaignParticipants>> {
    let participants = state.campaign_service.participants(id).await?;
    Ok(ApiResponse::ok(participants))
}

async fn locations(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CampaignLocationView>>> {
    Ok(ApiResponse::ok(state.campaign_service.locations().await?))
}

async fn categories(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CampaignCategoryView>>> {
    Ok(ApiResponse::ok(state.campaign_service.categories().await?))
}

async fn category(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<CampaignCategoryView>> {
    Ok(ApiResponse::ok(state.campaign_service.category(id).await?))
}

/// List campaigns of a category.
async fn category_campaigns(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<CampaignQuery>,
) -> AppResult<ApiResponse<Vec<CampaignItem>>> {
    let campaigns = state
        .campaign_service
        .list_by_category(&user_id, id, &query)
        .await?;
    Ok(ApiResponse::ok(campaigns))
}

/// List campaigns a user registered for.
async fn user_campaigns(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(target): ApiPath<String>,
    ApiQuery(query): ApiQuery<CampaignQuery>,
) -> AppResult<ApiResponse<Vec<CampaignItem>>> {
    let campaigns = state
        .campaign_service
        .list_registered_by(&user_id, &target, &query)
        .await?;
    Ok(ApiResponse::ok(campaigns))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list))
        .route("/campaigns/{id}", get(show))
        .route("/campaigns/{id}/registrations", post(register))
        .route("/campaigns/{id}/submissions", post(submit))
        .route("/campaigns/{id}/details", get(details))
        .route("/campaigns/{id}/participants", get(participants))
        .route("/campaign-locations", get(locations))
        .route("/campaign-categories", get(categories))
        .route("/campaign-categories/{id}", get(category))
        .route("/campaign-categories/{id}/campaigns", get(category_campaigns))
        .route("/users/{id}/campaigns", get(user_campaigns))
}
