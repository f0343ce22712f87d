//! Account queries: signup, credential check and admin seeding

use super::models::{Account, Credentials};
use super::watchlists::ensure_watchlist;
use crate::config::AdminSeed;
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Create an account together with its watchlist
///
/// Returns the new account and its watchlist id. A taken `user_name` is a
/// [`Error::Duplicate`]; the insert is conditional on the UNIQUE constraint so
/// two concurrent signups cannot both succeed.
pub async fn create_account(pool: &SqlitePool, credentials: &Credentials) -> Result<(Account, i64)> {
    let (user_name, password_hash) = credentials.validate()?;

    let mut tx = pool.begin().await?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO account (user_name, password_hash)
        VALUES (?, ?)
        ON CONFLICT(user_name) DO NOTHING
        RETURNING user_id, user_name, password_hash, is_admin
        "#,
    )
    .bind(user_name)
    .bind(password_hash)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| Error::Duplicate("This username is already taken.".to_string()))?;

    let watchlist_id = ensure_watchlist(&mut *tx, account.user_id).await?;

    tx.commit().await?;

    info!("Added account: {} (user_id={})", account.user_name, account.user_id);
    Ok((account, watchlist_id))
}

/// Check credentials against the account table
///
/// `password_hash` is compared as an opaque string; hashing is the caller's
/// responsibility.
pub async fn authenticate(pool: &SqlitePool, credentials: &Credentials) -> Result<Account> {
    let (user_name, password_hash) = credentials.validate()?;

    sqlx::query_as::<_, Account>(
        r#"
        SELECT user_id, user_name, password_hash, is_admin
        FROM account
        WHERE user_name = ? AND password_hash = ?
        "#,
    )
    .bind(user_name)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::Auth("Invalid credentials. Please try again.".to_string()))
}

/// Look up an account by user name
pub async fn find_account(pool: &SqlitePool, user_name: &str) -> Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT user_id, user_name, password_hash, is_admin FROM account WHERE user_name = ?",
    )
    .bind(user_name)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

/// Make sure the seeded admin account exists and has admin rights
///
/// An existing account with that name is promoted; its password is left
/// untouched.
pub async fn ensure_admin(pool: &SqlitePool, seed: &AdminSeed) -> Result<Account> {
    let credentials = Credentials::new(seed.user_name.as_str(), seed.password_hash.as_str());
    let (user_name, password_hash) = credentials.validate()?;

    let mut tx = pool.begin().await?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO account (user_name, password_hash, is_admin)
        VALUES (?, ?, 1)
        ON CONFLICT(user_name) DO UPDATE SET is_admin = 1
        RETURNING user_id, user_name, password_hash, is_admin
        "#,
    )
    .bind(user_name)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    ensure_watchlist(&mut *tx, account.user_id).await?;

    tx.commit().await?;

    info!("Admin account ready: {}", account.user_name);
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_database;
    use tempfile::TempDir;

    async fn setup_test_db() -> (TempDir, SqlitePool) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("accounts.db"))
            .await
            .unwrap();
        (temp_dir, pool)
    }

    #[tokio::test]
    async fn test_signup_then_duplicate() {
        let (_dir, pool) = setup_test_db().await;
        let creds = Credentials::new("alice", "hash-a");

        let (account, watchlist_id) = create_account(&pool, &creds).await.unwrap();
        assert_eq!(account.user_name, "alice");
        assert!(!account.is_admin);
        assert!(watchlist_id > 0);

        let err = create_account(&pool, &Credentials::new("alice", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account WHERE user_name = 'alice'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (_dir, pool) = setup_test_db().await;
        create_account(&pool, &Credentials::new("bob", "hash-b"))
            .await
            .unwrap();

        let account = authenticate(&pool, &Credentials::new("bob", "hash-b"))
            .await
            .unwrap();
        assert_eq!(account.user_name, "bob");

        let err = authenticate(&pool, &Credentials::new("bob", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let err = authenticate(&pool, &Credentials::new("nobody", "hash-b"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let err = authenticate(&pool, &Credentials::default()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_ensure_admin_creates_and_promotes() {
        let (_dir, pool) = setup_test_db().await;

        let seed = AdminSeed {
            user_name: "root".to_string(),
            password_hash: "hash-r".to_string(),
        };
        let admin = ensure_admin(&pool, &seed).await.unwrap();
        assert!(admin.is_admin);

        create_account(&pool, &Credentials::new("carol", "hash-c"))
            .await
            .unwrap();
        let promoted = ensure_admin(
            &pool,
            &AdminSeed {
                user_name: "carol".to_string(),
                password_hash: "ignored".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(promoted.is_admin);
        assert_eq!(promoted.password_hash, "hash-c");

        let found = find_account(&pool, "carol").await.unwrap().unwrap();
        assert!(found.is_admin);
    }
}
