//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable, optionally gated responses

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
