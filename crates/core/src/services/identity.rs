//! Identity provider client.
//!
//! Users live in an external identity provider. This service verifies the
//! bearer ID tokens it issues and reads or updates user profiles through its
//! account REST API, authenticated as a service account.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use traversee_common::config::IdentityConfig;
use traversee_common::{AppError, AppResult};

const SCOPES: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";
const JWKS_TTL: Duration = Duration::from_secs(3600);
/// Minimum age of the cached key set before an unknown `kid` may refetch it.
const MIN_FORCED_REFRESH: Duration = Duration::from_secs(60);
const ACCESS_TOKEN_MARGIN: Duration = Duration::from_secs(60);

/// Public profile of an identity-provider user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Observable contract of the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an ID token and return the user id it was issued for.
    async fn verify_token(&self, token: &str) -> AppResult<String>;

    /// Look up a user. Unknown users resolve to `None`.
    async fn get_user(&self, uid: &str) -> AppResult<Option<IdentityUser>>;

    /// Replace the user's photo URL.
    async fn update_photo_url(&self, uid: &str, photo_url: &str) -> AppResult<IdentityUser>;
}

/// Shared identity provider handle.
pub type IdentityService = Arc<dyn IdentityProvider>;

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountRecord {
    local_id: String,
    display_name: Option<String>,
    photo_url: Option<String>,
}

impl From<AccountRecord> for IdentityUser {
    fn from(record: AccountRecord) -> Self {
        Self {
            uid: record.local_id,
            display_name: record.display_name,
            photo_url: record.photo_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

impl CachedKeys {
    /// Whether an unknown `kid` justifies fetching the key set again.
    fn allows_forced_refresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) >= MIN_FORCED_REFRESH
    }
}

struct CachedAccessToken {
    token: String,
    expires_at: Instant,
}

/// Identity provider reached over HTTP.
pub struct HttpIdentityProvider {
    config: IdentityConfig,
    http_client: reqwest::Client,
    encoding_key: EncodingKey,
    keys: RwLock<Option<CachedKeys>>,
    access_token: RwLock<Option<CachedAccessToken>>,
}

impl HttpIdentityProvider {
    /// Create a client from the service account configuration.
    pub fn new(config: IdentityConfig, http_client: reqwest::Client) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key_pem().as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid identity private key: {e}")))?;

        Ok(Self {
            config,
            http_client,
            encoding_key,
            keys: RwLock::new(None),
            access_token: RwLock::new(None),
        })
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.config.project_id)
    }

    /// Signing keys of ID tokens, refreshed hourly.
    async fn signing_keys(&self, force_refresh: bool) -> AppResult<JwkSet> {
        if !force_refresh {
            let cache = self.keys.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.fetched_at.elapsed() < JWKS_TTL
            {
                return Ok(cached.keys.clone());
            }
        }

        let response = self
            .http_client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("JWKS request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Identity(format!(
                "JWKS request failed: {}",
                response.status()
            )));
        }

        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Invalid JWKS document: {e}")))?;

        tracing::debug!(count = keys.keys.len(), "Refreshed identity signing keys");

        *self.keys.write().await = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }

    /// OAuth access token of the service account.
    async fn service_token(&self) -> AppResult<String> {
        {
            let cache = self.access_token.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.expires_at > Instant::now()
            {
                return Ok(cached.token.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.config.client_email,
            scope: SCOPES,
            aud: &self.config.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.config.private_key_id);

        let assertion = jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::Identity(format!("Failed to sign assertion: {e}")))?;

        let response = self
            .http_client
            .post(&self.config.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!(
                "Token request failed: {status} - {body}"
            )));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(ACCESS_TOKEN_MARGIN);
        *self.access_token.write().await = Some(CachedAccessToken {
            token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    async fn call_accounts_api<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> AppResult<reqwest::Response> {
        let token = self.service_token().await?;
        let url = format!(
            "{}/projects/{}/accounts:{method}",
            self.config.api_base.trim_end_matches('/'),
            self.config.project_id
        );

        self.http_client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("accounts:{method} request failed: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<String> {
        let invalid = || AppError::Unauthorized("Invalid token provided.".to_string());

        let header = jsonwebtoken::decode_header(token).map_err(|_| invalid())?;
        let kid = header.kid.ok_or_else(invalid)?;

        let mut keys = self.signing_keys(false).await?;
        if keys.find(&kid).is_none() {
            // Keys rotate; refetch at most once per MIN_FORCED_REFRESH.
            let stale = self
                .keys
                .read()
                .await
                .as_ref()
                .is_none_or(|cached| cached.allows_forced_refresh(Instant::now()));
            if !stale {
                tracing::debug!(kid = %kid, "Unknown signing key; refresh suppressed");
                return Err(invalid());
            }
            keys = self.signing_keys(true).await?;
        }
        let jwk = keys.find(&kid).ok_or_else(invalid)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|_| invalid())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_issuer(&[self.issuer()]);

        let data = jsonwebtoken::decode::<IdTokenClaims>(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected ID token");
            invalid()
        })?;

        if data.claims.sub.is_empty() {
            return Err(invalid());
        }
        Ok(data.claims.sub)
    }

    async fn get_user(&self, uid: &str) -> AppResult<Option<IdentityUser>> {
        let response = self
            .call_accounts_api("lookup", &serde_json::json!({ "localId": [uid] }))
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!(
                "accounts:lookup failed: {status} - {body}"
            )));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Invalid lookup response: {e}")))?;

        Ok(lookup.users.into_iter().next().map(IdentityUser::from))
    }

    async fn update_photo_url(&self, uid: &str, photo_url: &str) -> AppResult<IdentityUser> {
        let response = self
            .call_accounts_api(
                "update",
                &serde_json::json!({ "localId": uid, "photoUrl": photo_url }),
            )
            .await?;

        if !response.status().is_success() {
            let body: Option<ApiErrorBody> = response.json().await.ok();
            let message = body.map(|b| b.error.message).unwrap_or_default();
            if message.starts_with("USER_NOT_FOUND") {
                return Err(AppError::NotFound(format!("User with id {uid} doesn't exist")));
            }
            return Err(AppError::Identity(format!("accounts:update failed: {message}")));
        }

        let record: AccountRecord = response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Invalid update response: {e}")))?;

        Ok(record.into())
    }
}

/// In-memory identity provider keyed by token.
///
/// Used for local development and tests; tokens map directly to user ids.
#[derive(Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, String>,
    users: RwLock<HashMap<String, IdentityUser>>,
}

impl StaticIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as a credential of `uid`.
    #[must_use]
    pub fn with_token(mut self, token: &str, uid: &str) -> Self {
        self.tokens.insert(token.to_string(), uid.to_string());
        self
    }

    /// Register a user profile.
    #[must_use]
    pub fn with_user(mut self, uid: &str, display_name: &str, photo_url: Option<&str>) -> Self {
        self.users.get_mut().insert(
            uid.to_string(),
            IdentityUser {
                uid: uid.to_string(),
                display_name: Some(display_name.to_string()),
                photo_url: photo_url.map(ToString::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<String> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Invalid token provided.".to_string()))
    }

    async fn get_user(&self, uid: &str) -> AppResult<Option<IdentityUser>> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn update_photo_url(&self, uid: &str, photo_url: &str) -> AppResult<IdentityUser> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(uid)
            .ok_or_else(|| AppError::NotFound(format!("User with id {uid} doesn't exist")))?;
        user.photo_url = Some(photo_url.to_string());
        Ok(user.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_without_users() {
        let lookup: LookupResponse = serde_json::from_str(r#"{"kind": "x"}"#).unwrap();
        assert!(lookup.users.is_empty());
    }

    #[test]
    fn test_account_record_mapping() {
        let lookup: LookupResponse = serde_json::from_str(
            r#"{"users": [{"localId": "u1", "displayName": "Sari", "photoUrl": "https://p/u1.png"}]}"#,
        )
        .unwrap();
        let user: IdentityUser = lookup.users.into_iter().next().unwrap().into();
        assert_eq!(user.uid, "u1");
        assert_eq!(user.display_name.as_deref(), Some("Sari"));
        assert_eq!(user.photo_url.as_deref(), Some("https://p/u1.png"));
    }

    #[test]
    fn test_forced_key_refresh_is_rate_limited() {
        let now = Instant::now();
        let fresh = CachedKeys {
            keys: JwkSet { keys: Vec::new() },
            fetched_at: now,
        };
        assert!(!fresh.allows_forced_refresh(now));
        assert!(!fresh.allows_forced_refresh(now + Duration::from_secs(59)));
        assert!(fresh.allows_forced_refresh(now + MIN_FORCED_REFRESH));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticIdentityProvider::new()
            .with_token("tok", "u1")
            .with_user("u1", "Sari", None);

        assert_eq!(provider.verify_token("tok").await.unwrap(), "u1");
        assert!(matches!(
            provider.verify_token("nope").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(provider.get_user("u2").await.unwrap().is_none());

        let updated = provider.update_photo_url("u1", "https://p/new.png").await.unwrap();
        assert_eq!(updated.photo_url.as_deref(), Some("https://p/new.png"));
    }
}
