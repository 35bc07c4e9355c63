//! In-memory fetcher for testing
//!
//! This module provides a mock implementation of the `Fetcher` trait that serves
//! canned responses keyed by URL, without touching the network. Every request is
//! recorded so tests can assert on what was (or was not) fetched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::errors::FetchError;
use crate::fetch::{FetchResponse, Fetcher};

/// A canned reply for one URL.
#[derive(Debug, Clone)]
enum MockReply {
    Respond(FetchResponse),
    Fail(String),
}

/// Mock fetcher for testing
///
/// Can be configured to:
/// - Return a specific status, content type and body for a URL
/// - Simulate transport failures for a URL
/// - Delay a URL's response to simulate a slow server
///
/// Any URL without a configured reply gets a `404 Not Found`.
#[derive(Debug, Default)]
pub struct MockFetcher {
    replies: HashMap<String, MockReply>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with a 200 status and an XML content type.
    pub fn with_xml(mut self, url: &str, body: &str) -> Self {
        self.add_response(url, 200, Some("application/xml"), body);
        self
    }

    /// Serve `body` with a 200 status and a plain-text content type.
    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.add_response(url, 200, Some("text/plain"), body);
        self
    }

    /// Serve an arbitrary status, content type and body.
    pub fn with_response(mut self, url: &str, status: u16, content_type: Option<&str>, body: &str) -> Self {
        self.add_response(url, status, content_type, body);
        self
    }

    /// Fail the request for `url` as if the connection broke.
    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.replies
            .insert(url.to_string(), MockReply::Fail(message.to_string()));
        self
    }

    /// Wait `delay` before answering requests for `url`.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Add a response mapping to this fetcher
    pub fn add_response(&mut self, url: &str, status: u16, content_type: Option<&str>, body: &str) {
        self.replies.insert(
            url.to_string(),
            MockReply::Respond(FetchResponse {
                status,
                content_type: content_type.map(|c| c.to_string()),
                body: body.to_string(),
            }),
        );
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// True if `url` was requested at least once.
    pub fn was_requested(&self, url: &str) -> bool {
        self.requests().iter().any(|r| r == url)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let key = url.as_str().to_string();
        match self.requests.lock() {
            Ok(mut requests) => requests.push(key.clone()),
            Err(poisoned) => poisoned.into_inner().push(key.clone()),
        }

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.replies.get(&key) {
            Some(MockReply::Respond(response)) => Ok(response.clone()),
            Some(MockReply::Fail(message)) => Err(FetchError::Other(message.clone())),
            None => Ok(FetchResponse {
                status: 404,
                content_type: Some("text/html".to_string()),
                body: "not found".to_string(),
            }),
        }
    }
}

/// A leaf sitemap (`<urlset>`) listing the given page URLs.
pub fn sample_urlset(locations: &[&str]) -> String {
    let entries: String = locations
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

/// A sitemap index (`<sitemapindex>`) referencing the given child sitemaps.
pub fn sample_sitemap_index(locations: &[&str]) -> String {
    let entries: String = locations
        .iter()
        .map(|loc| format!("  <sitemap><loc>{}</loc></sitemap>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>",
        entries
    )
}
