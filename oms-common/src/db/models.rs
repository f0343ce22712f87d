//! Database models

use crate::canonical::canonicalize_fields;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub user_id: i64,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Watchlist {
    pub watchlist_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub cast: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistItem {
    pub watchlist_id: i64,
    pub movie_id: i64,
}

/// Login / signup request body
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            password_hash: Some(password_hash.into()),
        }
    }

    /// Return `(user_name, password_hash)`, rejecting missing or empty values
    pub fn validate(&self) -> Result<(&str, &str)> {
        match (non_empty(&self.user_name), non_empty(&self.password_hash)) {
            (Some(user_name), Some(password_hash)) => Ok((user_name, password_hash)),
            _ => Err(Error::InvalidInput(
                "Username and password are required.".to_string(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Text fields accepted by the movie create/update endpoints
const MOVIE_TEXT_FIELDS: [&str; 4] = ["title", "cast", "category", "new_title"];

/// Canonicalized movie attributes from a create or update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieInput {
    pub title: String,
    pub cast: Option<String>,
    pub category: Option<String>,
    /// Replacement title for updates; ignored on create
    pub new_title: Option<String>,
}

impl MovieInput {
    /// Build from a JSON request body
    ///
    /// Only the known text fields are read; each must be a string or null.
    /// Values are title-cased and trimmed, blank optional fields become
    /// `None`, and a blank title is rejected.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            Error::InvalidInput("Request body must be a JSON object.".to_string())
        })?;

        let fields: Map<String, Value> = MOVIE_TEXT_FIELDS
            .iter()
            .filter_map(|name| object.get(*name).map(|v| (name.to_string(), v.clone())))
            .collect();
        let canonical = canonicalize_fields(&fields)?;

        let text = |name: &str| {
            canonical
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let title = text("title")
            .ok_or_else(|| Error::InvalidInput("Movie title is required.".to_string()))?;

        Ok(Self {
            title,
            cast: text("cast"),
            category: text("category"),
            new_title: text("new_title"),
        })
    }
}
