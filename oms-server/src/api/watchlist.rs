//! Watchlist endpoints (session required)

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use oms_common::db;
use serde_json::Value;

use super::missing_title;
use crate::error::{success_with, ApiResult};
use crate::session::Session;
use crate::AppState;

/// GET /towatchlist/:name
pub async fn to_watchlist(
    State(state): State<AppState>,
    session: Session,
    title: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(title) = title?;

    let movie = db::add_to_watchlist(&state.db, session.watchlist_id, &title).await?;
    success_with(
        &format!("{} has been added to your watchlist.", movie.title),
        "movie",
        &movie,
    )
}

/// GET /watchlist
pub async fn my_watchlist(State(state): State<AppState>, session: Session) -> ApiResult<Json<Value>> {
    let movies = db::list_watchlist(&state.db, session.watchlist_id).await?;
    success_with("Your watchlist: ", "list", &movies)
}

/// Build watchlist routes
pub fn watchlist_routes() -> Router<AppState> {
    Router::new()
        .route("/towatchlist/:name", get(to_watchlist))
        .route("/towatchlist/", get(missing_title))
        .route("/watchlist", get(my_watchlist))
}
