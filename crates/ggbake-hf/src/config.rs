//! Public configuration for the Hugging Face client.

use std::time::Duration;

/// Configuration for the Hugging Face registry client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use ggbake_hf::HfClientConfig;
/// use std::time::Duration;
///
/// let config = HfClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct HfClientConfig {
    /// Base URL for the Hub model API
    pub(crate) api_base_url: String,
    /// Base URL for raw file resolution
    pub(crate) resolve_base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Optional authentication token for private repositories
    pub(crate) token: Option<String>,
}

impl Default for HfClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://huggingface.co/api/models".to_string(),
            resolve_base_url: "https://huggingface.co".to_string(),
            user_agent: concat!("ggbake-hf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

impl HfClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the Hub model API.
    ///
    /// Defaults to `https://huggingface.co/api/models`.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the base URL for raw file resolution.
    ///
    /// Defaults to `https://huggingface.co`.
    #[must_use]
    pub fn with_resolve_base_url(mut self, url: impl Into<String>) -> Self {
        self.resolve_base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds. Bounds connection establishment everywhere
    /// and the full round trip for API calls; streamed downloads are only
    /// connect-bounded.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an authentication token for accessing private repositories.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional authentication token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}
