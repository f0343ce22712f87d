//! HTTP error type and the response envelope
//!
//! Every response body carries exactly one of three keys:
//! - `success`: the operation completed (plus an optional payload key)
//! - `conflict`: the request was well formed but the target already exists,
//!   does not exist, or the collection is empty
//! - `error`: validation, authentication, permission or server failure

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Bad credentials or missing session (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Session lacks admin rights (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found or empty collection (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// No route for the requested path (404)
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// Resource already exists (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500); detail is logged, never returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<oms_common::Error> for ApiError {
    fn from(err: oms_common::Error) -> Self {
        use oms_common::Error;

        let message = err.public_message();
        match err {
            Error::InvalidInput(_) | Error::TypeMismatch { .. } => ApiError::BadRequest(message),
            Error::Auth(_) => ApiError::Unauthorized(message),
            Error::Duplicate(_) => ApiError::Conflict(message),
            Error::NotFound(_) => ApiError::NotFound(message),
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, key, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "error", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "error", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "error", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "conflict", msg),
            ApiError::UnknownRoute(msg) => (StatusCode::NOT_FOUND, "error", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "error",
                    "Internal server error.".to_string(),
                )
            }
        };

        let mut body = Map::new();
        body.insert(key.to_string(), Value::String(message));
        (status, Json(Value::Object(body))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// `{"success": message}`
pub fn success(message: &str) -> Json<Value> {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::String(message.to_string()));
    Json(Value::Object(body))
}

/// `{"success": message, key: payload}`
pub fn success_with<T: Serialize>(message: &str, key: &str, payload: &T) -> ApiResult<Json<Value>> {
    let payload = serde_json::to_value(payload)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize {}: {}", key, e)))?;

    let mut body = Map::new();
    body.insert("success".to_string(), Value::String(message.to_string()));
    body.insert(key.to_string(), payload);
    Ok(Json(Value::Object(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_is_generic() {
        let response = ApiError::Internal("no such column: title_key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Internal server error." }));
    }

    #[tokio::test]
    async fn test_conflict_kinds_share_envelope_key() {
        let not_found = ApiError::NotFound("missing".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(not_found).await, json!({ "conflict": "missing" }));

        let duplicate = ApiError::Conflict("exists".to_string()).into_response();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(duplicate).await, json!({ "conflict": "exists" }));
    }

    #[test]
    fn test_common_error_mapping() {
        let err: ApiError = oms_common::Error::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, ApiError::Internal(_)));

        let err: ApiError = oms_common::Error::TypeMismatch {
            field: "title".to_string(),
            found: "boolean",
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = oms_common::Error::Auth("bad".to_string()).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_success_with_payload() {
        let Json(body) = success_with("Movie list: ", "list", &vec!["Heat"]).unwrap();
        assert_eq!(body, json!({ "success": "Movie list: ", "list": ["Heat"] }));
    }
}
