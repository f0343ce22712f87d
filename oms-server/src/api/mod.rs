//! HTTP API handlers

pub mod accounts;
pub mod health;
pub mod movies;
pub mod watchlist;

pub use accounts::account_routes;
pub use health::health_routes;
pub use movies::movie_routes;
pub use watchlist::watchlist_routes;

use crate::error::ApiError;

/// Title routes hit with an empty title segment
pub async fn missing_title() -> ApiError {
    ApiError::BadRequest("Movie title is required.".to_string())
}

/// Fallback for paths no route matches
pub async fn unknown_route() -> ApiError {
    ApiError::UnknownRoute("No such endpoint.".to_string())
}
