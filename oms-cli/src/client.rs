//! HTTP client for the movie store server
//!
//! Every server response is a one-key envelope (`success`, `conflict` or
//! `error`), optionally with a payload next to `success`. [`Reply`] is the
//! client-side view of that envelope.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const USER_AGENT: &str = concat!("oms-cli/", env!("CARGO_PKG_VERSION"));

/// Parsed response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Operation completed; `body` is the whole response object
    Success { message: String, body: Value },
    /// Target missing, already present, or collection empty
    Conflict(String),
    /// Validation, authentication or server failure
    Error(String),
}

impl Reply {
    pub fn from_body(body: Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        if let Some(message) = text("success") {
            Reply::Success { message, body }
        } else if let Some(message) = text("conflict") {
            Reply::Conflict(message)
        } else if let Some(message) = text("error") {
            Reply::Error(message)
        } else {
            Reply::Error(format!("Unexpected response: {}", body))
        }
    }
}

/// SHA-256 hex digest sent as `password_hash`
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Movie store API client
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(server: &str) -> Result<Self> {
        let base = Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("Invalid server URL: {}", server));
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    /// Endpoint URL; each segment is percent-encoded, so titles may contain
    /// spaces or slashes
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid server URL: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str], token: Option<Uuid>) -> Result<Reply> {
        self.send(Method::GET, segments, None, token).await
    }

    pub async fn post(&self, segments: &[&str], body: &Value, token: Option<Uuid>) -> Result<Reply> {
        self.send(Method::POST, segments, Some(body), token).await
    }

    pub async fn delete(&self, segments: &[&str], token: Option<Uuid>) -> Result<Reply> {
        self.send(Method::DELETE, segments, None, token).await
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
        token: Option<Uuid>,
    ) -> Result<Reply> {
        let url = self.url(segments)?;
        debug!(method = %method, url = %url, "Sending request");

        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Could not reach server at {}", self.base))?;
        let status = response.status();

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Malformed response from {} ({})", url, status))?;
        debug!(status = %status, "Received response");

        Ok(Reply::from_body(body))
    }
}
