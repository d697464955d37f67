//! Runtime configuration.
//!
//! Endpoints and the posting credential are collected here once and passed
//! explicitly to the components that need them.

use std::time::Duration;

use thiserror::Error;

use crate::publish::DEFAULT_POST_ENDPOINT;

pub const ENV_ENTRY_API: &str = "THREADPEEK_ENTRY_API";
pub const ENV_IMAGE_PROXY: &str = "THREADPEEK_IMAGE_PROXY";
pub const ENV_POST_ENDPOINT: &str = "THREADPEEK_POST_ENDPOINT";
pub const ENV_BEARER_TOKEN: &str = "THREADPEEK_BEARER_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "THREADPEEK_TIMEOUT_SECS";

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Configuration for previewing and publishing.
///
/// # Example
///
/// ```ignore
/// use threadpeek::config::PeekConfig;
///
/// let config = PeekConfig::new()
///     .with_entry_api_base("https://entries.example.com/exec")
///     .with_image_proxy_base("https://proxy.example.com/exec");
/// config.validate()?;
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PeekConfig {
    /// Base URL of the day-entry service
    pub entry_api_base: String,
    /// Base URL of the image proxy
    pub image_proxy_base: String,
    /// Posting endpoint (defaults to the platform's tweets endpoint)
    pub posting_endpoint: String,
    /// Bearer token for posting; only the publisher needs it
    pub bearer_token: Option<String>,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for PeekConfig {
    fn default() -> Self {
        Self {
            entry_api_base: String::new(),
            image_proxy_base: String::new(),
            posting_endpoint: DEFAULT_POST_ENDPOINT.to_string(),
            bearer_token: None,
            request_timeout: None,
        }
    }
}

impl std::fmt::Debug for PeekConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeekConfig")
            .field("entry_api_base", &self.entry_api_base)
            .field("image_proxy_base", &self.image_proxy_base)
            .field("posting_endpoint", &self.posting_endpoint)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl PeekConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_api_base(mut self, url: impl Into<String>) -> Self {
        self.entry_api_base = url.into();
        self
    }

    pub fn with_image_proxy_base(mut self, url: impl Into<String>) -> Self {
        self.image_proxy_base = url.into();
        self
    }

    pub fn with_posting_endpoint(mut self, url: impl Into<String>) -> Self {
        self.posting_endpoint = url.into();
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build a config from `THREADPEEK_*` environment variables.
    ///
    /// Unset variables keep their defaults; blank values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = env_value(ENV_ENTRY_API) {
            config.entry_api_base = url;
        }
        if let Some(url) = env_value(ENV_IMAGE_PROXY) {
            config.image_proxy_base = url;
        }
        if let Some(url) = env_value(ENV_POST_ENDPOINT) {
            config.posting_endpoint = url;
        }
        config.bearer_token = env_value(ENV_BEARER_TOKEN);

        if let Some(raw) = env_value(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    name: ENV_TIMEOUT_SECS,
                    value: raw,
                });
            }
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Check the endpoints needed to preview a thread.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_api_base.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_ENTRY_API));
        }
        if self.image_proxy_base.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_IMAGE_PROXY));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            ENV_ENTRY_API,
            ENV_IMAGE_PROXY,
            ENV_POST_ENDPOINT,
            ENV_BEARER_TOKEN,
            ENV_TIMEOUT_SECS,
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_defaults() {
        let config = PeekConfig::default();
        assert_eq!(config.posting_endpoint, DEFAULT_POST_ENDPOINT);
        assert!(config.bearer_token.is_none());
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = PeekConfig::new()
            .with_entry_api_base("https://e")
            .with_image_proxy_base("https://p")
            .with_posting_endpoint("https://post")
            .with_bearer_token("tok")
            .with_request_timeout(Duration::from_secs(9));
        assert_eq!(config.entry_api_base, "https://e");
        assert_eq!(config.image_proxy_base, "https://p");
        assert_eq!(config.posting_endpoint, "https://post");
        assert_eq!(config.bearer_token.as_deref(), Some("tok"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(9)));
    }

    #[test]
    fn test_validate_requires_endpoints() {
        assert_eq!(
            PeekConfig::new().validate(),
            Err(ConfigError::Missing(ENV_ENTRY_API))
        );
        assert_eq!(
            PeekConfig::new().with_entry_api_base("https://e").validate(),
            Err(ConfigError::Missing(ENV_IMAGE_PROXY))
        );
        assert!(PeekConfig::new()
            .with_entry_api_base("https://e")
            .with_image_proxy_base("https://p")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", PeekConfig::new().with_bearer_token("secret"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_values() {
        clear_env();
        std::env::set_var(ENV_ENTRY_API, "https://entries.example.com/exec");
        std::env::set_var(ENV_IMAGE_PROXY, " https://proxy.example.com/exec ");
        std::env::set_var(ENV_BEARER_TOKEN, "tok");
        std::env::set_var(ENV_TIMEOUT_SECS, "15");

        let config = PeekConfig::from_env().unwrap();
        assert_eq!(config.entry_api_base, "https://entries.example.com/exec");
        assert_eq!(config.image_proxy_base, "https://proxy.example.com/exec");
        assert_eq!(config.posting_endpoint, DEFAULT_POST_ENDPOINT);
        assert_eq!(config.bearer_token.as_deref(), Some("tok"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_blank_token_is_none() {
        clear_env();
        std::env::set_var(ENV_BEARER_TOKEN, "  ");
        let config = PeekConfig::from_env().unwrap();
        assert!(config.bearer_token.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");
        assert!(matches!(
            PeekConfig::from_env(),
            Err(ConfigError::Invalid { name: ENV_TIMEOUT_SECS, .. })
        ));
        std::env::set_var(ENV_TIMEOUT_SECS, "0");
        assert!(PeekConfig::from_env().is_err());
        clear_env();
    }
}
