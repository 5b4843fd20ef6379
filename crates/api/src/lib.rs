//! HTTP API layer for Traversee.
//!
//! - **Endpoints**: campaigns, forums, open trips, tourisms, profiles and
//!   the sentiment / recommendation proxies
//! - **Extractors**: authenticated user, JSON / path / query with API errors
//! - **Middleware**: bearer token verification against the identity provider
//!
//! Built on Axum 0.8. Every route is mounted under `/api/v1`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, middleware::from_fn_with_state};
use traversee_common::AppError;

pub use endpoints::router;
pub use middleware::AppState;

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/api/v1";

async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

/// Full application: the API router under [`API_PREFIX`] behind the auth middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, router())
        .fallback(not_found)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state)
}
