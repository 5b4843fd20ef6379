//! Open trip endpoints.

use axum::{
    Router,
    extract::State,
    routing::{delete, get},
};
use traversee_common::AppResult;
use traversee_core::{CreateDestinationInput, CreateOpenTripInput, DestinationView, OpenTripView};

use super::forums::PageQuery;
use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::{ApiResponse, MessageResponse},
};

/// List open trips.
async fn list(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<OpenTripView>>> {
    let trips = state.open_trip_service.list(query.page.as_deref()).await?;
    Ok(ApiResponse::ok(trips))
}

/// Publish an open trip.
async fn create(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateOpenTripInput>,
) -> AppResult<ApiResponse<OpenTripView>> {
    let trip = state.open_trip_service.create(input).await?;
    Ok(ApiResponse::ok(trip))
}

async fn show(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<OpenTripView>> {
    Ok(ApiResponse::ok(state.open_trip_service.get(id).await?))
}

async fn destroy(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<MessageResponse> {
    state.open_trip_service.delete(id).await?;
    Ok(MessageResponse::new(format!("Open trip with id {id} deleted")))
}

/// List destinations of a trip.
async fn destinations(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<Vec<DestinationView>>> {
    let destinations = state.open_trip_service.destinations(id).await?;
    Ok(ApiResponse::ok(destinations))
}

/// Add a destination to a trip.
async fn create_destination(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<CreateDestinationInput>,
) -> AppResult<ApiResponse<DestinationView>> {
    let destination = state.open_trip_service.add_destination(id, input).await?;
    Ok(ApiResponse::ok(destination))
}

async fn destroy_destination(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath((id, destination_id)): ApiPath<(i32, i32)>,
) -> AppResult<MessageResponse> {
    state
        .open_trip_service
        .delete_destination(id, destination_id)
        .await?;
    Ok(MessageResponse::new(format!(
        "Destination with id {destination_id} deleted"
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/open-trips", get(list).post(create))
        .route("/open-trips/{id}", get(show).delete(destroy))
        .route(
            "/open-trips/{id}/destinations",
            get(destinations).post(create_destination),
        )
        .route(
            "/open-trips/{id}/destinations/{destination_id}",
            delete(destroy_destination),
        )
}
