//! Posting client for the social platform.
//!
//! Sends one `{ "text": ... }` post with a bearer token supplied by the caller.
//! The credential is checked before any request goes out.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::{Headers, HttpClient, HttpError};

/// Default posting endpoint.
pub const DEFAULT_POST_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

/// Failure to publish a post.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("No bearer token configured for posting")]
    MissingCredential,

    #[error("Posting API rejected the request (HTTP {status}): {body}")]
    UpstreamRejection { status: u16, body: String },

    #[error("Posting request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Could not encode post payload: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct PostRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(default)]
    data: Option<PostResponseData>,
}

#[derive(Debug, Deserialize)]
struct PostResponseData {
    #[serde(default)]
    id: Option<String>,
}

/// Result of an accepted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    /// Identifier assigned by the platform, when the response carries one.
    pub id: Option<String>,
    /// Raw response body.
    pub body: String,
}

/// Publishes text posts with an injected bearer token.
#[derive(Clone)]
pub struct Publisher {
    client: Arc<dyn HttpClient>,
    endpoint: String,
    bearer_token: Option<String>,
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("endpoint", &self.endpoint)
            .field("has_token", &self.bearer_token.is_some())
            .finish_non_exhaustive()
    }
}

impl Publisher {
    pub fn new(
        client: Arc<dyn HttpClient>,
        endpoint: impl Into<String>,
        bearer_token: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            bearer_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn token(&self) -> Result<&str, PublishError> {
        self.bearer_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PublishError::MissingCredential)
    }

    /// Publish a single text post.
    ///
    /// Only HTTP 200 counts as accepted; any other status is an
    /// [`PublishError::UpstreamRejection`] carrying the raw body.
    pub async fn post_text(&self, text: &str) -> Result<PostReceipt, PublishError> {
        let token = self.token()?;

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let body = serde_json::to_string(&PostRequest { text })?;
        let response = self.client.post(&self.endpoint, &body, &headers).await?;
        let raw = response.text_lossy();

        if response.status != 200 {
            tracing::warn!(status = response.status, "post rejected");
            return Err(PublishError::UpstreamRejection {
                status: response.status,
                body: raw,
            });
        }

        let id = serde_json::from_str::<PostResponse>(&raw)
            .ok()
            .and_then(|r| r.data)
            .and_then(|d| d.id);
        tracing::info!(id = id.as_deref().unwrap_or("-"), "post published");

        Ok(PostReceipt { id, body: raw })
    }
}
