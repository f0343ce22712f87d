//! Movie catalog endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use oms_common::db::{self, MovieInput};
use serde_json::Value;

use super::missing_title;
use crate::error::{success_with, ApiError, ApiResult};
use crate::session::Session;
use crate::AppState;

/// Gate movie writes when the server runs with `require_admin_for_writes`
fn require_writer(state: &AppState, session: Option<&Session>) -> ApiResult<()> {
    if !state.require_admin_for_writes {
        return Ok(());
    }

    match session {
        None => Err(ApiError::Unauthorized("Please log in first.".to_string())),
        Some(session) if !session.is_admin => {
            Err(ApiError::Forbidden("Unauthorized action.".to_string()))
        }
        Some(_) => Ok(()),
    }
}

/// GET /movies
pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let movies = db::list_movies(&state.db).await?;
    success_with("Movie list: ", "list", &movies)
}

/// POST /addmovie
pub async fn add_movie(
    State(state): State<AppState>,
    session: Option<Session>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    require_writer(&state, session.as_ref())?;
    let Json(body) = payload?;

    let input = MovieInput::from_json(&body)?;
    let movie = db::create_movie(&state.db, &input).await?;

    success_with("Movie added successfully.", "movie", &movie)
}

/// GET /readmovie/:name
pub async fn read_movie(
    State(state): State<AppState>,
    title: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(title) = title?;

    let movies = db::read_movies(&state.db, &title).await?;
    success_with("We found the movie you wanted: ", "movie", &movies)
}

/// POST /updatemovie
pub async fn update_movie(
    State(state): State<AppState>,
    session: Option<Session>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    require_writer(&state, session.as_ref())?;
    let Json(body) = payload?;

    let input = MovieInput::from_json(&body)?;
    let movie = db::update_movie(&state.db, &input).await?;

    success_with("Movie successfully updated.", "movie", &movie)
}

/// GET or DELETE /deletemovie/:name
pub async fn delete_movie(
    State(state): State<AppState>,
    session: Option<Session>,
    title: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    require_writer(&state, session.as_ref())?;
    let Path(title) = title?;

    let movie = db::delete_movie(&state.db, &title).await?;
    success_with("Movie successfully deleted.", "movie", &movie)
}

/// Build movie catalog routes
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/addmovie", post(add_movie))
        .route("/readmovie/:name", get(read_movie))
        .route("/readmovie/", get(missing_title))
        .route("/updatemovie", post(update_movie))
        .route("/deletemovie/:name", get(delete_movie).delete(delete_movie))
        .route("/deletemovie/", get(missing_title).delete(missing_title))
}
