//! Watchlist bootstrap and watchlist items

use super::models::Movie;
use super::movies::find_movie;
use crate::{Error, Result};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

/// Return the user's watchlist id, creating the watchlist if absent
///
/// A single upsert against the UNIQUE `watchlist.user_id` column: no matter
/// how many logins race here, at most one row exists per user and every
/// caller gets its id back.
pub async fn ensure_watchlist<'e, E>(executor: E, user_id: i64) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let watchlist_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO watchlist (user_id)
        VALUES (?)
        ON CONFLICT(user_id) DO UPDATE SET user_id = excluded.user_id
        RETURNING watchlist_id
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(watchlist_id)
}

/// Add a movie, looked up by title, to a watchlist
///
/// Unknown titles are [`Error::NotFound`]; a movie already on this watchlist
/// is [`Error::Duplicate`].
pub async fn add_to_watchlist(pool: &SqlitePool, watchlist_id: i64, title: &str) -> Result<Movie> {
    let movie = find_movie(pool, title).await?.ok_or_else(|| {
        Error::NotFound("Sorry, this movie is not in store at the moment.".to_string())
    })?;

    let result = sqlx::query(
        "INSERT OR IGNORE INTO watchlist_item (watchlist_id, movie_id) VALUES (?, ?)",
    )
    .bind(watchlist_id)
    .bind(movie.movie_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::Duplicate(format!(
            "{} is already on your watchlist.",
            movie.title
        )));
    }

    info!("Movie added to watchlist {}: {}", watchlist_id, movie.title);
    Ok(movie)
}

/// Movies on a watchlist, in the order they were added
pub async fn list_watchlist(pool: &SqlitePool, watchlist_id: i64) -> Result<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(
        r#"
        SELECT m.movie_id, m.title, m."cast", m.category
        FROM watchlist_item wi
        JOIN movie m ON m.movie_id = wi.movie_id
        WHERE wi.watchlist_id = ?
        ORDER BY wi.rowid
        "#,
    )
    .bind(watchlist_id)
    .fetch_all(pool)
    .await?;

    if movies.is_empty() {
        return Err(Error::NotFound("Your watchlist is empty.".to_string()));
    }

    Ok(movies)
}
