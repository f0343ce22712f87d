//! Integration tests for database initialization and the catalog lifecycle

use oms_common::db::{
    add_to_watchlist, authenticate, create_account, create_movie, delete_movie, ensure_watchlist,
    init_database, read_movies, Credentials, MovieInput, Watchlist, WatchlistItem, SCHEMA_VERSION,
};
use oms_common::Error;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("store.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.db");

    let pool1 = init_database(&db_path).await.unwrap();
    create_account(&pool1, &Credentials::new("kate", "h"))
        .await
        .unwrap();
    pool1.close().await;

    // Schema creation is idempotent and data survives a reopen
    let pool2 = init_database(&db_path).await.unwrap();
    let account = authenticate(&pool2, &Credentials::new("kate", "h"))
        .await
        .unwrap();
    assert_eq!(account.user_name, "kate");

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[tokio::test]
async fn test_tables_created() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("store.db")).await.unwrap();

    for table in ["account", "watchlist", "movie", "watchlist_item"] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_watchlist_user_id_is_unique() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("store.db")).await.unwrap();
    let (account, _) = create_account(&pool, &Credentials::new("liam", "h"))
        .await
        .unwrap();

    // The UNIQUE constraint backs up the upsert even for raw inserts
    let raw = sqlx::query("INSERT INTO watchlist (user_id) VALUES (?)")
        .bind(account.user_id)
        .execute(&pool)
        .await;
    assert!(raw.is_err());

    let watchlists = sqlx::query_as::<_, Watchlist>(
        "SELECT watchlist_id, user_id FROM watchlist WHERE user_id = ?",
    )
    .bind(account.user_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(watchlists.len(), 1);
    assert_eq!(
        ensure_watchlist(&pool, account.user_id).await.unwrap(),
        watchlists[0].watchlist_id
    );
}

#[tokio::test]
async fn test_full_catalog_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("store.db")).await.unwrap();
    let (_, watchlist_id) = create_account(&pool, &Credentials::new("mia", "h"))
        .await
        .unwrap();

    let movie = create_movie(
        &pool,
        &MovieInput::from_json(&json!({
            "title": "inception",
            "cast": "leonardo dicaprio",
            "category": "sci-fi",
        }))
        .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(movie.category.as_deref(), Some("Sci-Fi"));

    add_to_watchlist(&pool, watchlist_id, "Inception").await.unwrap();
    let items = sqlx::query_as::<_, WatchlistItem>(
        "SELECT watchlist_id, movie_id FROM watchlist_item",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        items,
        vec![WatchlistItem {
            watchlist_id,
            movie_id: movie.movie_id
        }]
    );

    delete_movie(&pool, "inception").await.unwrap();
    assert!(matches!(
        read_movies(&pool, "inception").await,
        Err(Error::NotFound(_))
    ));

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watchlist_item")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
