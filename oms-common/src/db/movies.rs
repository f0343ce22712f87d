//! Movie catalog queries
//!
//! Titles are matched through `movie.title_key`, the lower-cased canonical
//! title. Matching is therefore case-insensitive but accent-sensitive:
//! "AMÉLIE" finds "Amélie", "amelie" does not.

use super::models::{Movie, MovieInput};
use crate::canonical::title_case;
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

const NOT_IN_STORE: &str = "Sorry, this movie is not in store at the moment.";

/// Normalized lookup key for a title
///
/// Built from the canonical form so that a raw title and its stored,
/// title-cased version always produce the same key ("ΟΔΟΣ" and "Οδοσ" both
/// give "οδοσ").
pub fn title_key(title: &str) -> String {
    title_case(title.trim()).to_lowercase()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

fn require_title(title: &str) -> Result<String> {
    let key = title_key(title);
    if key.is_empty() {
        return Err(Error::InvalidInput("Movie title is required.".to_string()));
    }
    Ok(key)
}

/// Insert a movie unless one with the same title already exists
pub async fn create_movie(pool: &SqlitePool, input: &MovieInput) -> Result<Movie> {
    let key = require_title(&input.title)?;

    let movie = sqlx::query_as::<_, Movie>(
        r#"
        INSERT INTO movie (title, title_key, "cast", category)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(title_key) DO NOTHING
        RETURNING movie_id, title, "cast", category
        "#,
    )
    .bind(&input.title)
    .bind(&key)
    .bind(&input.cast)
    .bind(&input.category)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        Error::Duplicate("This movie already exists. Please try a different title.".to_string())
    })?;

    info!("Movie added to DB: {:?}", movie);
    Ok(movie)
}

/// Find a movie by exact (case-insensitive) title
pub async fn find_movie(pool: &SqlitePool, title: &str) -> Result<Option<Movie>> {
    let key = require_title(title)?;

    let movie = sqlx::query_as::<_, Movie>(
        r#"SELECT movie_id, title, "cast", category FROM movie WHERE title_key = ?"#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(movie)
}

/// Search movies by title pattern
///
/// The pattern goes through SQL `LIKE`, so `%` and `_` are wildcards; a plain
/// title only matches itself.
pub async fn read_movies(pool: &SqlitePool, pattern: &str) -> Result<Vec<Movie>> {
    let key = require_title(pattern)?;

    let movies = sqlx::query_as::<_, Movie>(
        r#"
        SELECT movie_id, title, "cast", category
        FROM movie
        WHERE title_key LIKE ?
        ORDER BY title_key
        "#,
    )
    .bind(key)
    .fetch_all(pool)
    .await?;

    if movies.is_empty() {
        return Err(Error::NotFound(NOT_IN_STORE.to_string()));
    }

    debug!("Movie found: {:?}", movies);
    Ok(movies)
}

/// Every movie in the catalog, ordered by title
pub async fn list_movies(pool: &SqlitePool) -> Result<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(
        r#"SELECT movie_id, title, "cast", category FROM movie ORDER BY title_key"#,
    )
    .fetch_all(pool)
    .await?;

    if movies.is_empty() {
        return Err(Error::NotFound(
            "Sorry, we've no movies available at the moment.".to_string(),
        ));
    }

    Ok(movies)
}

/// Overwrite an existing movie's attributes
///
/// The movie is located by `input.title`. Its title is rewritten to
/// `input.new_title` when given (a clash with another movie is a
/// [`Error::Duplicate`]), otherwise to the canonical form of `input.title`.
pub async fn update_movie(pool: &SqlitePool, input: &MovieInput) -> Result<Movie> {
    let key = require_title(&input.title)?;
    let title = input.new_title.as_deref().unwrap_or(&input.title);
    let new_key = require_title(title)?;

    let updated = sqlx::query_as::<_, Movie>(
        r#"
        UPDATE movie
        SET title = ?, title_key = ?, "cast" = ?, category = ?
        WHERE title_key = ?
        RETURNING movie_id, title, "cast", category
        "#,
    )
    .bind(title)
    .bind(&new_key)
    .bind(&input.cast)
    .bind(&input.category)
    .bind(&key)
    .fetch_optional(pool)
    .await;

    let movie = match updated {
        Ok(Some(movie)) => movie,
        Ok(None) => return Err(Error::NotFound(NOT_IN_STORE.to_string())),
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Duplicate(format!(
                "Cannot rename: a movie titled {} already exists.",
                title
            )))
        }
        Err(e) => return Err(e.into()),
    };

    info!("Movie updated in DB: {:?}", movie);
    Ok(movie)
}

/// Delete a movie by exact (case-insensitive) title and return it
pub async fn delete_movie(pool: &SqlitePool, title: &str) -> Result<Movie> {
    let key = require_title(title)?;

    let movie = sqlx::query_as::<_, Movie>(
        r#"
        DELETE FROM movie
        WHERE title_key = ?
        RETURNING movie_id, title, "cast", category
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(NOT_IN_STORE.to_string()))?;

    info!("Movie deleted in DB: {:?}", movie);
    Ok(movie)
}
