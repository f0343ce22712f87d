//! oms-server library - Online Movie Store HTTP back-end
//!
//! Exposes the router and application state so integration tests can drive
//! the API without binding a socket.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod session;

pub use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Open login sessions
    pub sessions: SessionStore,
    /// Movie create/update/delete require an admin session
    pub require_admin_for_writes: bool,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, require_admin_for_writes: bool) -> Self {
        Self {
            db,
            sessions: SessionStore::new(),
            require_admin_for_writes,
            startup_time: Utc::now(),
        }
    }

    /// Replace the session store with one that drops sessions idle for `timeout`
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.sessions = SessionStore::with_idle_timeout(timeout);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::account_routes())
        .merge(api::movie_routes())
        .merge(api::watchlist_routes())
        .merge(api::health_routes())
        .fallback(api::unknown_route)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
