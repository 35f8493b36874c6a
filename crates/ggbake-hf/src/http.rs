//! HTTP backend abstraction for the Hugging Face Hub.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation is
//! a single-attempt reqwest client with an explicit timeout: recovery from
//! transient failures is always a caller re-invocation, never an automatic
//! retry.

use crate::config::HfClientConfig;
use crate::error::{HfError, HfResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use std::pin::Pin;
use url::Url;

/// A response body streamed in chunks, with the reported length when the
/// server sent one.
pub struct HttpBody {
    /// Value of the `content-length` header, if present.
    pub total: Option<u64>,
    /// The body chunks as they arrive.
    pub stream: Pin<Box<dyn Stream<Item = HfResult<Bytes>> + Send>>,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends serving the Hub endpoints.
///
/// This is an implementation detail - external code should use the client
/// through the core `RegistryClientPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch a URL and parse the response as JSON.
    async fn get_json(&self, url: &Url) -> HfResult<serde_json::Value>;

    /// Fetch a URL as UTF-8 text.
    async fn get_text(&self, url: &Url) -> HfResult<String>;

    /// Fetch a URL as a streamed body.
    async fn get_body(&self, url: &Url) -> HfResult<HttpBody>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest (rustls, explicit timeouts).
///
/// The configured timeout bounds connection establishment on every request
/// and the whole round trip for the short API calls; streamed downloads are
/// only connect-bounded so large artifacts are never cut off mid-stream.
pub struct ReqwestBackend {
    client: reqwest::Client,
    auth_token: Option<String>,
    request_timeout: std::time::Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend from the client configuration.
    pub fn new(config: &HfClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            auth_token: config.token.clone(),
            request_timeout: config.timeout,
        }
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &Url, bounded: bool) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if bounded {
            request = request.timeout(self.request_timeout);
        }
        if let Some(ref token) = self.auth_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }

    /// Send a request and turn error statuses into typed errors.
    async fn send_checked(&self, url: &Url, bounded: bool) -> HfResult<reqwest::Response> {
        let response = self.build_request(url, bounded).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(HfError::RequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url) -> HfResult<serde_json::Value> {
        let response = self.send_checked(url, true).await?;
        let data = response.json().await?;
        Ok(data)
    }

    async fn get_text(&self, url: &Url) -> HfResult<String> {
        let response = self.send_checked(url, true).await?;
        let text = response.text().await?;
        Ok(text)
    }

    async fn get_body(&self, url: &Url) -> HfResult<HttpBody> {
        let response = self.send_checked(url, false).await?;
        let total = response.content_length();
        let stream = response.bytes_stream().map_err(HfError::from);
        Ok(HttpBody {
            total,
            stream: Box::pin(stream),
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use futures_util::stream;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub enum Canned {
        Json(serde_json::Value),
        Text(String),
        Body {
            bytes: Vec<u8>,
            chunk_size: usize,
            report_length: bool,
        },
        Status(u16),
    }

    /// A fake HTTP backend that returns canned responses keyed by URL
    /// substring.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Mutex<HashMap<String, Canned>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for a URL pattern.
        pub fn with_response(self, url_contains: &str, response: Canned) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(url_contains.to_string(), response);
            self
        }

        fn find_response(&self, url: &str) -> Option<Canned> {
            let responses = self.responses.lock().unwrap();
            responses
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
        }

        fn lookup(&self, url: &Url) -> HfResult<Canned> {
            match self.find_response(url.as_str()) {
                Some(Canned::Status(status)) => Err(HfError::RequestFailed {
                    status,
                    url: url.to_string(),
                }),
                Some(other) => Ok(other),
                None => Err(HfError::RequestFailed {
                    status: 404,
                    url: url.to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json(&self, url: &Url) -> HfResult<serde_json::Value> {
            match self.lookup(url)? {
                Canned::Json(json) => Ok(json),
                _ => Err(HfError::InvalidResponse {
                    message: format!("no JSON canned for {url}"),
                }),
            }
        }

        async fn get_text(&self, url: &Url) -> HfResult<String> {
            match self.lookup(url)? {
                Canned::Text(text) => Ok(text),
                _ => Err(HfError::InvalidResponse {
                    message: format!("no text canned for {url}"),
                }),
            }
        }

        async fn get_body(&self, url: &Url) -> HfResult<HttpBody> {
            match self.lookup(url)? {
                Canned::Body {
                    bytes,
                    chunk_size,
                    report_length,
                } => {
                    let total = report_length.then(|| bytes.len() as u64);
                    let chunks: Vec<HfResult<Bytes>> = bytes
                        .chunks(chunk_size.max(1))
                        .map(|c| Ok(Bytes::copy_from_slice(c)))
                        .collect();
                    Ok(HttpBody {
                        total,
                        stream: Box::pin(stream::iter(chunks)),
                    })
                }
                _ => Err(HfError::InvalidResponse {
                    message: format!("no body canned for {url}"),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Canned, FakeBackend};
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;

    #[test]
    fn test_reqwest_backend_creation() {
        let config = HfClientConfig::new();
        let backend = ReqwestBackend::new(&config);
        assert!(backend.auth_token.is_none());
    }

    #[test]
    fn test_reqwest_backend_with_token() {
        let config = HfClientConfig::new().with_token("test_token");
        let backend = ReqwestBackend::new(&config);
        assert_eq!(backend.auth_token, Some("test_token".to_string()));
    }

    #[tokio::test]
    async fn test_fake_backend_returns_canned_json() {
        let backend = FakeBackend::new()
            .with_response("tree/main", Canned::Json(json!([{"path": "a.gguf"}])));

        let url = Url::parse("https://example.com/api/models/o/n/tree/main").unwrap();
        let value = backend.get_json(&url).await.unwrap();
        assert_eq!(value[0]["path"], "a.gguf");
    }

    #[tokio::test]
    async fn test_fake_backend_404_for_unknown_url() {
        let backend = FakeBackend::new();
        let url = Url::parse("https://example.com/unknown").unwrap();

        let result = backend.get_json(&url).await;
        assert!(matches!(
            result,
            Err(HfError::RequestFailed { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_fake_backend_streams_in_chunks() {
        let backend = FakeBackend::new().with_response(
            "resolve/main/model.gguf",
            Canned::Body {
                bytes: vec![7u8; 1000],
                chunk_size: 100,
                report_length: true,
            },
        );

        let url = Url::parse("https://example.com/o/n/resolve/main/model.gguf").unwrap();
        let body = backend.get_body(&url).await.unwrap();
        assert_eq!(body.total, Some(1000));

        let chunks: Vec<_> = body.stream.collect().await;
        assert_eq!(chunks.len(), 10);
        assert!(chunks.iter().all(|c| c.as_ref().unwrap().len() == 100));
    }
}
