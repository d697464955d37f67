//! Error handling for threadpeek.
//!
//! Each component owns its error type (`EntryError`, `ResolveError`,
//! `PublishError`, `ConfigError`). Commands return [`PeekResult`], whose
//! [`PeekError`] wraps them and adds an [`ErrorCategory`] and error code.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Server | Upstream 5xx | Yes |
//! | Auth | Posting credential refused | No |
//! | Client | Upstream 4xx, unreadable payload | No |
//! | User | Invalid day, bad entry file | No |
//! | System | Filesystem errors | No |
//! | Configuration | Missing endpoint or credential | No |
//!
//! Image resolution failures never appear here: they end as a failed slot.

mod category;
mod peek_error;

pub use category::ErrorCategory;
pub use peek_error::{PeekError, PeekResult};
