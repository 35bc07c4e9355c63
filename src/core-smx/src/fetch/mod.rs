//! HTTP fetching for robots files and sitemap documents.

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::HarvestOptions;
use crate::errors::FetchError;

/// What the harvester needs to know about a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// Response body decoded as text.
    pub body: String,
}

impl FetchResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status code followed by its canonical reason phrase, e.g. `404 Not Found`.
    pub fn status_line(&self) -> String {
        let reason = StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason());
        match reason {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }
}

/// Interface to the network: GET a URL and hand back its status, content type and body.
///
/// Non-success statuses are *not* errors at this level; callers decide what a 404 means.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client. Redirects follow reqwest's default policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds the underlying client from the harvest options (user agent, optional timeout).
    pub fn new(options: &HarvestOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps an already-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.text().await?;
        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> FetchResponse {
        FetchResponse {
            status,
            content_type: None,
            body: String::new(),
        }
    }

    #[test]
    fn test_is_success() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
        assert!(!response(500).is_success());
    }

    #[test]
    fn test_status_line() {
        assert_eq!(response(404).status_line(), "404 Not Found");
        assert_eq!(response(503).status_line(), "503 Service Unavailable");
        assert_eq!(response(599).status_line(), "599");
    }
}
