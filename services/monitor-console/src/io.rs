//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::ConsoleError;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with the given query parameters
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        // The query carries the credential; it never reaches logs or error text.
        tracing::debug!("GET {}", url);
        let full_url = Url::parse_with_params(url, query)
            .map_err(|e| ConsoleError::Http(format!("Invalid URL {}: {}", url, e)))?;

        let response = self.client.get(full_url).send().await.map_err(|e| {
            let e = e.without_url();
            if e.is_timeout() {
                ConsoleError::Timeout(format!("GET {}", url))
            } else {
                ConsoleError::Http(format!("GET {} failed: {}", url, e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            if e.is_timeout() {
                ConsoleError::Timeout(format!("Reading response body of {}", url))
            } else {
                ConsoleError::Http(format!("Reading response body: {}", e))
            }
        })?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
