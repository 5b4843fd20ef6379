//! Proxies to the sentiment analysis and tourism recommendation services.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use traversee_common::config::ServicesConfig;
use traversee_common::{AppError, AppResult};

/// Envelope returned by both remote services.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
    message: Option<String>,
}

/// Client for the remote machine-learning services.
#[derive(Clone)]
pub struct RemoteServices {
    http_client: reqwest::Client,
    sentiment_url: String,
    recommendation_url: String,
}

impl RemoteServices {
    /// Build a client with the configured timeout.
    pub fn new(config: &ServicesConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            sentiment_url: config.sentiment_url.trim_end_matches('/').to_string(),
            recommendation_url: config.recommendation_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sentiment of `words`.
    pub async fn analyze_sentiment(&self, words: Option<&str>) -> AppResult<Value> {
        let url = format!("{}/analyze_sentiment", self.sentiment_url);
        let request = self
            .http_client
            .get(url)
            .query(&[("words", words.unwrap_or_default())]);

        self.forward("Sentiment", request).await
    }

    /// Tourism spots recommended for `user_id`.
    pub async fn tourism_recommendations(
        &self,
        user_id: &str,
        page: Option<&str>,
    ) -> AppResult<Value> {
        let url = format!("{}/tourism-recommendations", self.recommendation_url);
        let mut request = self.http_client.get(url).query(&[("user_id", user_id)]);
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        self.forward("Recommendation", request).await
    }

    async fn forward(&self, service: &str, request: reqwest::RequestBuilder) -> AppResult<Value> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(service, error = %e, "Remote service unreachable");
            AppError::ExternalService(format!("{service} service is unavailable"))
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        interpret(service, status, &body)
    }
}

/// Map an upstream reply onto the `data` payload or an error.
fn interpret(service: &str, status: StatusCode, body: &str) -> AppResult<Value> {
    let envelope: Envelope = serde_json::from_str(body).unwrap_or_default();

    if status.is_success() {
        return Ok(envelope.data);
    }

    tracing::debug!(service, status = %status, "Remote service returned an error");
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::Upstream {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_else(|| "Not found".to_string()),
        });
    }

    Err(AppError::ExternalService(envelope.message.unwrap_or_else(|| {
        format!("{service} service returned {status}")
    })))
}
