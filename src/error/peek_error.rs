//! Unified error type for the CLI layer.

use std::path::PathBuf;

use thiserror::Error;

use super::category::ErrorCategory;
use crate::config::ConfigError;
use crate::entry::EntryError;
use crate::publish::PublishError;
use crate::traits::HttpError;

/// Every failure a command can end with.
///
/// Component errors keep their own messages; this type adds categorization
/// and stable error codes on top.
#[derive(Debug, Error)]
pub enum PeekError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("{0}")]
    Usage(String),

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid entry file {}: {source}", .path.display())]
    InvalidEntryFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for command-level operations.
pub type PeekResult<T> = Result<T, PeekError>;

fn status_category(status: u16) -> ErrorCategory {
    match status {
        401 | 403 => ErrorCategory::Auth,
        500..=599 => ErrorCategory::Server,
        _ => ErrorCategory::Client,
    }
}

/// Transport failures are worth retrying; a malformed endpoint is not.
fn http_category(err: &HttpError) -> ErrorCategory {
    if err.is_transient() {
        ErrorCategory::Network
    } else if matches!(err, HttpError::InvalidUrl(_)) {
        ErrorCategory::Configuration
    } else {
        ErrorCategory::Client
    }
}

impl PeekError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PeekError::Entry(err) => match err {
                EntryError::InvalidDay(_) => ErrorCategory::User,
                EntryError::Http(err) => http_category(err),
                EntryError::Status { status, .. } => match status_category(*status) {
                    ErrorCategory::Auth => ErrorCategory::Client,
                    other => other,
                },
                EntryError::Decode(_) => ErrorCategory::Client,
            },
            PeekError::Publish(err) => match err {
                PublishError::MissingCredential => ErrorCategory::Configuration,
                PublishError::UpstreamRejection { status, .. } => status_category(*status),
                PublishError::Http(err) => http_category(err),
                PublishError::Encode(_) => ErrorCategory::Client,
            },
            PeekError::Config(_) => ErrorCategory::Configuration,
            PeekError::Http(err) => http_category(err),
            PeekError::Usage(_) => ErrorCategory::User,
            PeekError::Io { .. } => ErrorCategory::System,
            PeekError::InvalidEntryFile { .. } => ErrorCategory::User,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PeekError::Entry(EntryError::InvalidDay(_)) => "E_ENTRY_DAY",
            PeekError::Entry(EntryError::Http(_)) => "E_ENTRY_NET",
            PeekError::Entry(EntryError::Status { .. }) => "E_ENTRY_HTTP",
            PeekError::Entry(EntryError::Decode(_)) => "E_ENTRY_DECODE",
            PeekError::Publish(PublishError::MissingCredential) => "E_POST_CREDENTIAL",
            PeekError::Publish(PublishError::UpstreamRejection { .. }) => "E_POST_REJECTED",
            PeekError::Publish(PublishError::Http(_)) => "E_POST_NET",
            PeekError::Publish(PublishError::Encode(_)) => "E_POST_ENCODE",
            PeekError::Config(_) => "E_CONFIG",
            PeekError::Http(_) => "E_HTTP",
            PeekError::Usage(_) => "E_USAGE",
            PeekError::Io { .. } => "E_IO",
            PeekError::InvalidEntryFile { .. } => "E_ENTRY_FILE",
        }
    }

    /// Message shown to the user: the error itself plus a recovery hint.
    pub fn user_message(&self) -> String {
        format!("{}\n{}", self, self.category().recovery_hint())
    }
}
