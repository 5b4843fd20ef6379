//! Request extractors.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use traversee_common::AppError;

use crate::middleware::Authentication;

/// Authenticated user id extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        match parts.extensions.get::<Authentication>() {
            Some(Authentication::Verified(uid)) => Ok(Self(uid.clone())),
            Some(Authentication::Invalid) => {
                Err(AppError::Unauthorized("Invalid token provided.".to_string()))
            }
            Some(Authentication::Missing) | None => {
                Err(AppError::Unauthorized("No credentials provided.".to_string()))
            }
        }
    }
}

/// JSON body whose rejections use the API error format.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections use the API error format.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string whose rejections use the API error format.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
