//! Day-entry service client.
//!
//! Fetches the entry scheduled for a calendar day from
//! `GET <entryApiBase>?<day>`. Any failure here is reported to the user as a
//! single message in place of the preview.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::models::DayEntry;
use crate::traits::{Headers, HttpClient, HttpError};

/// First valid day of the month.
pub const MIN_DAY: u32 = 1;
/// Last valid day of the month.
pub const MAX_DAY: u32 = 31;

/// Failure to obtain a day-entry.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Day must be between 1 and 31, got {0}")]
    InvalidDay(u32),

    #[error("Failed to fetch entry: {0}")]
    Http(#[from] HttpError),

    #[error("Entry service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Entry service returned an unreadable payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the day-entry service.
#[derive(Clone)]
pub struct EntryClient {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl fmt::Debug for EntryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl EntryClient {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `<base>?<day>`; the day is a bare query literal, not a named parameter.
    pub fn entry_url(&self, day: u32) -> String {
        format!("{}?{}", self.base_url, day)
    }

    /// Fetch and normalize the entry for `day`.
    ///
    /// Out-of-range days are rejected before any request is made.
    pub async fn fetch(&self, day: u32) -> Result<DayEntry, EntryError> {
        if !(MIN_DAY..=MAX_DAY).contains(&day) {
            return Err(EntryError::InvalidDay(day));
        }

        let url = self.entry_url(day);
        tracing::debug!(day, url = %url, "fetching day entry");

        let response = self.client.get(&url, &Headers::new()).await?;
        if !response.is_success() {
            tracing::warn!(day, status = response.status, "entry service rejected request");
            return Err(EntryError::Status {
                status: response.status,
                body: response.text_lossy(),
            });
        }

        let entry = DayEntry::from_response_body(&response.body)?;
        tracing::info!(day, images = entry.images.len(), "day entry loaded");
        Ok(entry)
    }
}
