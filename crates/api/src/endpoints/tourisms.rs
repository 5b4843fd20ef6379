//! Tourism endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde_json::Value;
use traversee_common::AppResult;
use traversee_core::{
    TourismCategoryView, TourismDetailView, TourismItem, TourismLocationView, TourismQuery,
};

use super::forums::PageQuery;
use crate::{
    extractors::{ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// List tourism spots.
async fn list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TourismQuery>,
) -> AppResult<ApiResponse<Vec<TourismItem>>> {
    let tourisms = state.tourism_service.list(&user_id, &query).await?;
    Ok(ApiResponse::ok(tourisms))
}

async fn show(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<TourismItem>> {
    Ok(ApiResponse::ok(state.tourism_service.get(&user_id, &id).await?))
}

/// Mark a spot as favorite.
async fn add_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<TourismItem>> {
    let tourism = state.tourism_service.add_favorite(&user_id, &id).await?;
    Ok(ApiResponse::ok(tourism))
}

/// Drop a spot from favorites.
async fn remove_favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<TourismItem>> {
    let tourism = state.tourism_service.remove_favorite(&user_id, &id).await?;
    Ok(ApiResponse::ok(tourism))
}

/// Spot description. Counts as a view.
async fn details(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<Option<TourismDetailView>>> {
    let detail = state.tourism_service.details(&user_id, &id).await?;
    Ok(ApiResponse::ok(detail))
}

async fn categories(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TourismCategoryView>>> {
    Ok(ApiResponse::ok(state.tourism_service.categories().await?))
}

async fn locations(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TourismLocationView>>> {
    Ok(ApiResponse::ok(state.tourism_service.locations().await?))
}

/// Recommendations for the requester, proxied from the recommendation service.
async fn recommendations(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Value>> {
    let data = state
        .remote_services
        .tourism_recommendations(&user_id, query.page.as_deref())
        .await?;
    Ok(ApiResponse::ok(data))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tourisms", get(list))
        .route("/tourisms/{id}", get(show))
        .route(
            "/tourisms/{id}/favorites",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/tourisms/{id}/details", get(details))
        .route("/tourism-categories", get(categories))
        .route("/tourism-locations", get(locations))
        .route("/tourism-recommendations", get(recommendations))
}
