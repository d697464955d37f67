//! threadpeek - compose a day's images and caption into a posting thread
//! and preview it with every image resolved through a proxy.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod compose;
pub mod config;
pub mod entry;
pub mod error;
pub mod models;
pub mod preview;
pub mod publish;
pub mod resolver;
pub mod session;
pub mod traits;
