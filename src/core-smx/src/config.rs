//! Configuration options for sitemap harvesting.

use std::time::Duration;

use crate::categorize::CategoryRules;
use crate::common::fetch_timeout::{FetchTimeoutError, fetch_timeout};

/// Where the robots declaration file lives, relative to the website root.
pub const DEFAULT_ROBOTS_PATH: &str = "robots.txt";

/// Conventional sitemap locations, tried in this order when robots.txt declares nothing.
pub const DEFAULT_SITEMAP_CANDIDATES: [&str; 9] = [
    "sitemap.xml",
    "sitemap_index.xml",
    "sitemap.php",
    "sitemap.xml.gz",
    "sitemap-index.xml",
    "sitemapindex.xml",
    "sitemap.txt",
    "google-sitemap.xml",
    "sitemap/",
];

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("sitemap-links/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the user agent.
pub const USER_AGENT_ENV_VAR: &str = "SITEMAP_USER_AGENT";

/// Configuration options for a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Path of the robots declaration file, relative to the website root
    pub robots_path: String,
    /// Ordered conventional sitemap paths probed during discovery
    pub sitemap_candidates: Vec<String>,
    /// Ordered keyword rules used to categorize page URLs
    pub categories: CategoryRules,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout; `None` leaves reqwest's default (no timeout)
    pub fetch_timeout: Option<Duration>,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            robots_path: DEFAULT_ROBOTS_PATH.to_string(),
            sitemap_candidates: DEFAULT_SITEMAP_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            categories: CategoryRules::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: None,
        }
    }
}

impl HarvestOptions {
    /// Creates a new builder for HarvestOptions.
    pub fn builder() -> HarvestOptionsBuilder {
        HarvestOptionsBuilder::default()
    }

    /// Default options, with the user agent and fetch timeout taken from the environment when set.
    pub fn from_env() -> Result<Self, FetchTimeoutError> {
        let mut builder = Self::builder();
        if let Some(timeout) = fetch_timeout()? {
            builder = builder.fetch_timeout(timeout);
        }
        if let Ok(user_agent) = std::env::var(USER_AGENT_ENV_VAR)
            && !user_agent.trim().is_empty()
        {
            builder = builder.user_agent(user_agent.trim().to_string());
        }
        Ok(builder.build())
    }
}

/// Builder for HarvestOptions.
#[derive(Debug, Clone, Default)]
pub struct HarvestOptionsBuilder {
    robots_path: Option<String>,
    sitemap_candidates: Option<Vec<String>>,
    categories: Option<CategoryRules>,
    user_agent: Option<String>,
    fetch_timeout: Option<Duration>,
}

impl HarvestOptionsBuilder {
    /// Sets the robots declaration file path.
    pub fn robots_path(mut self, path: String) -> Self {
        self.robots_path = Some(path);
        self
    }

    /// Replaces the conventional sitemap paths. Order is the probe order.
    pub fn sitemap_candidates(mut self, candidates: Vec<String>) -> Self {
        self.sitemap_candidates = Some(candidates);
        self
    }

    /// Replaces the category rules.
    pub fn categories(mut self, categories: CategoryRules) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Sets a per-request timeout.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Builds the HarvestOptions.
    pub fn build(self) -> HarvestOptions {
        let defaults = HarvestOptions::default();
        HarvestOptions {
            robots_path: self.robots_path.unwrap_or(defaults.robots_path),
            sitemap_candidates: self.sitemap_candidates.unwrap_or(defaults.sitemap_candidates),
            categories: self.categories.unwrap_or(defaults.categories),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            fetch_timeout: self.fetch_timeout,
        }
    }
}
