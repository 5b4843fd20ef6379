//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use traversee_common::SharedStorage;
use traversee_core::{
    CampaignService, ForumService, IdentityService, OpenTripService, ProfileService,
    RemoteServices, TourismService,
};
use traversee_db::repositories::{
    CampaignParticipantRepository, CampaignRepository, CommentRepository, ForumLikeRepository,
    ForumRepository, OpenTripRepository, TourismClickRepository, TourismFavoriteRepository,
    TourismRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub campaign_service: CampaignService,
    pub forum_service: ForumService,
    pub open_trip_service: OpenTripService,
    pub tourism_service: TourismService,
    pub profile_service: ProfileService,
    pub remote_services: RemoteServices,
    pub identity: IdentityService,
}

impl AppState {
    /// Wire every service on top of the shared handles.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        identity: IdentityService,
        storage: SharedStorage,
        remote_services: RemoteServices,
    ) -> Self {
        let campaign_repo = CampaignRepository::new(Arc::clone(&db));
        let participant_repo = CampaignParticipantRepository::new(Arc::clone(&db));
        let forum_repo = ForumRepository::new(Arc::clone(&db));
        let like_repo = ForumLikeRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let trip_repo = OpenTripRepository::new(Arc::clone(&db));
        let tourism_repo = TourismRepository::new(Arc::clone(&db));
        let favorite_repo = TourismFavoriteRepository::new(Arc::clone(&db));
        let click_repo = TourismClickRepository::new(db);

        Self {
            campaign_service: CampaignService::new(
                campaign_repo.clone(),
                participant_repo,
                Arc::clone(&identity),
            ),
            forum_service: ForumService::new(
                forum_repo,
                like_repo,
                comment_repo,
                campaign_repo,
                Arc::clone(&identity),
                Arc::clone(&storage),
            ),
            open_trip_service: OpenTripService::new(trip_repo),
            tourism_service: TourismService::new(tourism_repo, favorite_repo, click_repo),
            profile_service: ProfileService::new(Arc::clone(&identity), storage),
            remote_services,
            identity,
        }
    }
}

/// Outcome of reading the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// No header at all.
    Missing,
    /// Header present but malformed or the token failed verification.
    Invalid,
    /// Verified user id.
    Verified(String),
}

/// Split `<scheme> <token>`; anything but exactly two parts is rejected.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Credentials carried by the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credentials<'a> {
    /// Header absent or blank.
    None,
    Malformed,
    Bearer(&'a str),
}

fn credentials(value: Option<&HeaderValue>) -> Credentials<'_> {
    let Some(value) = value else {
        return Credentials::None;
    };
    if value.as_bytes().iter().all(u8::is_ascii_whitespace) {
        return Credentials::None;
    }
    value
        .to_str()
        .ok()
        .and_then(bearer_token)
        .map_or(Credentials::Malformed, Credentials::Bearer)
}

/// Authentication middleware.
///
/// Never rejects on its own; handlers that require a user read the outcome
/// through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let authentication = match credentials(req.headers().get(header::AUTHORIZATION)) {
        Credentials::None => Authentication::Missing,
        Credentials::Malformed => Authentication::Invalid,
        Credentials::Bearer(token) => match state.identity.verify_token(token).await {
            Ok(uid) => Authentication::Verified(uid),
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                Authentication::Invalid
            }
        },
    };

    req.extensions_mut().insert(authentication);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_requires_two_parts() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Token  abc "), Some("abc"));
        assert_eq!(bearer_token("abc"), None);
        assert_eq!(bearer_token("Bearer abc def"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_blank_header_is_no_credentials() {
        assert_eq!(credentials(None), Credentials::None);
        assert_eq!(
            credentials(Some(&HeaderValue::from_static(""))),
            Credentials::None
        );
        assert_eq!(
            credentials(Some(&HeaderValue::from_static("   "))),
            Credentials::None
        );
        assert_eq!(
            credentials(Some(&HeaderValue::from_static("abc"))),
            Credentials::Malformed
        );
        assert_eq!(
            credentials(Some(&HeaderValue::from_static("Bearer abc"))),
            Credentials::Bearer("abc")
        );
    }
}
