//! Image resolution through the authenticated proxy.
//!
//! Every image reference is fetched independently: no caching, no
//! deduplication, no retry. Each call to [`ImageResolver::resolve`] issues its
//! own request and returns a [`Resolution`] handle whose lifetime bounds the
//! request. Failures are logged and surface as [`ResolvedImage::Failed`]; they
//! never reach the composer or the entry path.
//!
//! [`ResolvedImage::Failed`]: crate::models::ResolvedImage::Failed

mod resolution;

pub use resolution::{RequestId, Resolution};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::compose::thread_images;
use crate::models::{ImageContent, ImageRef, PostUnit, ProxyImagePayload};
use crate::traits::{Headers, HttpClient, HttpError};

/// Why a single image could not be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("image proxy request failed: {0}")]
    Http(#[from] HttpError),

    #[error("image proxy returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid image proxy payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Fetches image content through the proxy.
#[derive(Clone)]
pub struct ImageResolver {
    client: Arc<dyn HttpClient>,
    proxy_base: String,
}

impl fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResolver")
            .field("proxy_base", &self.proxy_base)
            .finish_non_exhaustive()
    }
}

impl ImageResolver {
    pub fn new(client: Arc<dyn HttpClient>, proxy_base: impl Into<String>) -> Self {
        Self {
            client,
            proxy_base: proxy_base.into(),
        }
    }

    pub fn proxy_base(&self) -> &str {
        &self.proxy_base
    }

    /// `<proxyBase>?<imageRef>`, with the reference appended verbatim.
    pub fn proxy_url(&self, image_ref: &ImageRef) -> String {
        format!("{}?{}", self.proxy_base, image_ref)
    }

    /// Fetch and decode one image. Issues exactly one request.
    pub async fn fetch(&self, image_ref: &ImageRef) -> Result<ImageContent, ResolveError> {
        fetch_content(self.client.as_ref(), &self.proxy_url(image_ref)).await
    }

    /// Start resolving one image slot in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn resolve(&self, image_ref: ImageRef) -> Resolution {
        let client = Arc::clone(&self.client);
        let url = self.proxy_url(&image_ref);
        Resolution::spawn(image_ref, async move {
            fetch_content(client.as_ref(), &url).await
        })
    }

    /// One independent resolution per image slot of a thread, in posting
    /// order. Repeated references get separate requests.
    pub fn resolve_thread(&self, units: &[PostUnit]) -> Vec<Resolution> {
        thread_images(units)
            .map(|image_ref| self.resolve(image_ref.clone()))
            .collect()
    }
}

async fn fetch_content(client: &dyn HttpClient, url: &str) -> Result<ImageContent, ResolveError> {
    let response = client.get(url, &Headers::new()).await?;

    if !response.is_success() {
        return Err(ResolveError::Status {
            status: response.status,
            body: response.text_lossy(),
        });
    }

    let payload: ProxyImagePayload = response.json()?;
    Ok(ImageContent::from_payload(payload)?)
}
