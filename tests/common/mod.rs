//! Common test utilities for integration tests.
//!
//! Fixtures for day-entry and proxy payloads, plus helpers that point the
//! production reqwest client at a wiremock server.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::{entry_body, png_base64};
//!
//! let body = entry_body(&["a.png", "b.png"], "caption");
//! ```

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use threadpeek::adapters::ReqwestHttpClient;
use threadpeek::traits::HttpClient;
use wiremock::Request;

/// Path the wiremock server exposes for each upstream.
pub const ENTRY_PATH: &str = "/entries/exec";
pub const PROXY_PATH: &str = "/proxy/exec";
pub const POST_PATH: &str = "/2/tweets";

/// Production HTTP client as a trait object.
pub fn http_client() -> Arc<dyn HttpClient> {
    Arc::new(ReqwestHttpClient::new())
}

/// Encode a solid PNG of the given size as standard base64.
pub fn png_base64(width: u32, height: u32) -> String {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    BASE64.encode(buf.into_inner())
}

/// Proxy payload for a generated PNG.
pub fn png_payload(width: u32, height: u32) -> serde_json::Value {
    serde_json::json!({
        "mimeType": "image/png",
        "base64": png_base64(width, height),
    })
}

/// A day-entry body in the top-level shape.
pub fn entry_body(images: &[&str], trailing_text: &str) -> serde_json::Value {
    serde_json::json!({
        "images": images,
        "trailingText": trailing_text,
    })
}

/// Numbered image references `img-1 .. img-n`.
pub fn image_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("img-{}", i)).collect()
}

/// Matcher for the raw query string, which carries the day or image reference.
pub fn raw_query(expected: &str) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    let expected = expected.to_string();
    move |req: &Request| req.url.query() == Some(expected.as_str())
}
