//! API endpoints.

#![allow(missing_docs)]

mod campaigns;
mod forums;
mod health;
mod open_trips;
mod profiles;
mod sentiments;
mod tourisms;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(campaigns::router())
        .merge(forums::router())
        .merge(open_trips::router())
        .merge(tourisms::router())
        .merge(profiles::router())
        .merge(sentiments::router())
}
