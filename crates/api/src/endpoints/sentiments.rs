//! Sentiment analysis proxy.

use axum::{Router, extract::State, routing::get};
use serde::Deserialize;
use serde_json::Value;
use traversee_common::AppResult;

use crate::{
    extractors::{ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
pub struct SentimentQuery {
    pub words: Option<String>,
}

async fn analyze(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SentimentQuery>,
) -> AppResult<ApiResponse<Value>> {
    let data = state
        .remote_services
        .analyze_sentiment(query.words.as_deref())
        .await?;
    Ok(ApiResponse::ok(data))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze_sentiment", get(analyze))
}
