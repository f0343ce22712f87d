//! Login, signup and logout
//!
//! Both login and signup end in the same place: the account's watchlist is
//! guaranteed to exist and a session is opened for it.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use oms_common::db::{self, Account, Credentials};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{success, ApiResult};
use crate::session::Session;
use crate::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(credentials) = payload?;

    let account = db::authenticate(&state.db, &credentials).await?;
    let watchlist_id = db::ensure_watchlist(&state.db, account.user_id).await?;
    info!("Credentials validated: {}", account.user_name);

    Ok(Json(grant(&state, &account, watchlist_id, "User authenticated.").await))
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(credentials) = payload?;

    let (account, watchlist_id) = db::create_account(&state.db, &credentials).await?;

    Ok((
        StatusCode::CREATED,
        Json(grant(&state, &account, watchlist_id, "User created successfully.").await),
    ))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, session: Session) -> Json<Value> {
    state.sessions.close(&session.token).await;
    info!(
        "Logged out: {} ({} sessions open)",
        session.user_name,
        state.sessions.open_count().await
    );
    success("Logout successful!")
}

async fn grant(state: &AppState, account: &Account, watchlist_id: i64, message: &str) -> Value {
    let session = state.sessions.open(account, watchlist_id).await;
    json!({
        "success": message,
        "is_admin": session.is_admin,
        "token": session.token,
        "watchlist_id": session.watchlist_id,
    })
}

/// Build account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}
