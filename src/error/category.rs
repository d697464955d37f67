//! Error category classification.
//!
//! Categories drive the CLI's exit hint and whether a failure is worth
//! retrying by hand.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout. Generally transient.
    Network,

    /// The posting API refused the credential.
    Auth,

    /// Upstream service failure (HTTP 5xx). Generally transient.
    Server,

    /// Upstream rejected the request or returned something unreadable.
    Client,

    /// Invalid input from the user, such as an out-of-range day.
    User,

    /// Local filesystem errors.
    System,

    /// Missing endpoints or credentials.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Suggested next step for the user.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Check that the bearer token is valid and has write access",
            ErrorCategory::Server => "The service may be having issues. Please try again later",
            ErrorCategory::Client => "The service rejected the request; check the endpoint URLs",
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::System => "Check the file path and its permissions",
            ErrorCategory::Configuration => {
                "Set the THREADPEEK_* environment variables and try again"
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
