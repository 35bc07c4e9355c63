//! Error types for sitemap harvesting.
//!
//! Only failures that halt a whole run live here. Failures local to a single
//! sitemap node are recorded as text in an [`ErrorLog`](crate::ErrorLog) instead.

use thiserror::Error;

/// Errors that stop a harvest before any sitemap is traversed.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Neither a website nor a direct sitemap URL was supplied.
    #[error("Please provide either a Website URL or a Direct Sitemap URL.")]
    MissingInput,

    /// The website URL cannot be turned into an absolute base URL.
    #[error("Invalid Website URL: {url}. Please enter a valid URL starting with http:// or https://")]
    InvalidWebsiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The sitemap URL (supplied or discovered) is not an absolute URL.
    #[error("Invalid Sitemap URL: {url}. Please enter a valid URL starting with http:// or https://")]
    InvalidSitemapUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    ClientError(#[from] FetchError),
}

/// Errors raised by a [`Fetcher`](crate::fetch::Fetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection, TLS, body decoding, ...
    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    /// Failure produced by a non-network fetcher.
    #[error("{0}")]
    Other(String),
}

/// Type alias for Result with HarvestError
pub type Result<T> = std::result::Result<T, HarvestError>;
