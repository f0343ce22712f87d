//! Login sessions
//!
//! A successful login or signup opens a session and hands the client an
//! opaque token. Requests that act on behalf of a user (watchlist access,
//! admin-only writes) present it as `Authorization: Bearer <token>`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use oms_common::db::Account;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Authenticated user context
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: Uuid,
    pub user_id: i64,
    pub user_name: String,
    pub watchlist_id: i64,
    pub is_admin: bool,
}

/// Sessions idle longer than this are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Open sessions keyed by token
///
/// Expired sessions are evicted lazily: a lookup of an idle token removes it,
/// and every new session sweeps the whole table.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) >= self.idle_timeout
    }

    /// Open a session for an authenticated account
    pub async fn open(&self, account: &Account, watchlist_id: i64) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            user_id: account.user_id,
            user_name: account.user_name.clone(),
            watchlist_id,
            is_admin: account.is_admin,
        };

        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        if sessions.len() < before {
            debug!("Evicted {} idle sessions", before - sessions.len());
        }

        sessions.insert(
            session.token,
            Entry {
                session: session.clone(),
                last_seen: now,
            },
        );
        session
    }

    /// Look up a live session and mark it as used
    pub async fn get(&self, token: &Uuid) -> Option<Session> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = self.is_expired(sessions.get(token)?, now);
        if expired {
            sessions.remove(token);
            return None;
        }

        let entry = sessions.get_mut(token)?;
        entry.last_seen = now;
        Some(entry.session.clone())
    }

    /// Close a session, returning whether it was open
    pub async fn close(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of sessions in the table, including not yet evicted idle ones
    pub async fn open_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Extract the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Please log in first.".to_string()))?;

        state.sessions.get(&token).await.ok_or_else(|| {
            ApiError::Unauthorized("Session expired. Please log in again.".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn account(is_admin: bool) -> Account {
        Account {
            user_id: 7,
            user_name: "nina".to_string(),
            password_hash: "h".to_string(),
            is_admin,
        }
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let store = SessionStore::new();
        let session = store.open(&account(true), 3).await;
        assert_eq!(session.watchlist_id, 3);
        assert!(session.is_admin);

        let found = store.get(&session.token).await.unwrap();
        assert_eq!(found.user_id, 7);
        assert_eq!(store.open_count().await, 1);

        assert!(store.close(&session.token).await);
        assert!(!store.close(&session.token).await);
        assert!(store.get(&session.token).await.is_none());
        assert_eq!(store.open_count().await, 0);
    }

    #[tokio::test]
    async fn test_idle_session_is_evicted_on_lookup() {
        let store = SessionStore::with_idle_timeout(Duration::ZERO);
        let session = store.open(&account(false), 1).await;

        assert!(store.get(&session.token).await.is_none());
        assert_eq!(store.open_count().await, 0);
    }

    #[tokio::test]
    async fn test_repeated_logins_do_not_accumulate_idle_sessions() {
        let store = SessionStore::with_idle_timeout(Duration::ZERO);
        for _ in 0..10 {
            store.open(&account(false), 1).await;
        }
        assert_eq!(store.open_count().await, 1);
    }

    #[tokio::test]
    async fn test_active_session_survives_sweep() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(3600));
        let first = store.open(&account(false), 1).await;
        store.open(&account(false), 1).await;

        assert!(store.get(&first.token).await.is_some());
        assert_eq!(store.open_count().await, 2);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let first = store.open(&account(false), 1).await;
        let second = store.open(&account(false), 1).await;
        assert_ne!(first.token, second.token);

        store.close(&first.token).await;
        assert!(store.get(&second.token).await.is_some());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(bearer_token(&headers), Some(token));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-uuid"));
        assert!(bearer_token(&headers).is_none());
    }
}
