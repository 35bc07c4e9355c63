//! One end-to-end harvest run: input validation, discovery, traversal and categorization.

use crate::config::HarvestOptions;
use crate::discover::discover;
use crate::error_log::ErrorLog;
use crate::errors::{HarvestError, Result};
use crate::fetch::Fetcher;
use crate::report::HarvestReport;
use crate::traverse::{ResultSet, traverse};
use crate::url_utils::{parse_absolute, with_trailing_slash};

/// Recorded when neither robots.txt nor any conventional path yields a sitemap.
pub const SITEMAP_NOT_FOUND_MESSAGE: &str =
    "Could not automatically find a sitemap URL from the website. Please provide a direct sitemap URL if you know it.";

/// What the user asked to harvest. At least one of the two must be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestRequest {
    /// Website root, used to discover a sitemap when no direct sitemap URL is given
    pub website_url: Option<String>,
    /// Sitemap to traverse directly; skips discovery entirely
    pub sitemap_url: Option<String>,
}

impl HarvestRequest {
    /// Trims both inputs; blank values count as absent.
    pub fn new(website_url: Option<&str>, sitemap_url: Option<&str>) -> Self {
        let clean = |value: Option<&str>| value.map(str::trim).filter(|v| !v.is_empty()).map(|v| v.to_string());
        Self {
            website_url: clean(website_url),
            sitemap_url: clean(sitemap_url),
        }
    }

    pub fn website(url: &str) -> Self {
        Self::new(Some(url), None)
    }

    pub fn sitemap(url: &str) -> Self {
        Self::new(None, Some(url))
    }
}

/// Runs harvests against one fetcher, owning the result set and error log of the current run.
#[derive(Debug)]
pub struct Harvester<F> {
    fetcher: F,
    options: HarvestOptions,
    results: ResultSet,
    errors: ErrorLog,
}

impl<F: Fetcher> Harvester<F> {
    pub fn new(fetcher: F, options: HarvestOptions) -> Self {
        Self {
            fetcher,
            options,
            results: ResultSet::new(),
            errors: ErrorLog::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn options(&self) -> &HarvestOptions {
        &self.options
    }

    /// Harvests every page URL reachable from the request's sitemap.
    ///
    /// A direct sitemap URL always wins; discovery only happens for website-only requests.
    ///
    /// # Errors
    ///
    /// Only for unusable input, and always before any request is made:
    /// - both inputs are blank
    /// - the website URL is not an absolute URL
    /// - the sitemap URL is not an absolute URL
    ///
    /// Everything that goes wrong once traversal starts ends up in the report's errors.
    pub async fn run(&mut self, request: &HarvestRequest) -> Result<HarvestReport> {
        self.results.clear();
        self.errors.reset();

        let sitemap_url = match (&request.sitemap_url, &request.website_url) {
            (Some(direct), _) => direct.clone(),
            (None, Some(website)) => {
                parse_absolute(&with_trailing_slash(website)).map_err(|source| HarvestError::InvalidWebsiteUrl {
                    url: website.clone(),
                    source,
                })?;

                tracing::info!("Searching for sitemap of {}", website);
                match discover(&self.fetcher, website, &self.options).await {
                    Some(found) => {
                        tracing::info!("Discovered sitemap URL: {}", found);
                        found.to_string()
                    }
                    None => {
                        self.errors.record(SITEMAP_NOT_FOUND_MESSAGE);
                        return Ok(HarvestReport::sitemap_not_found(std::mem::take(&mut self.errors)));
                    }
                }
            }
            (None, None) => return Err(HarvestError::MissingInput),
        };

        let root = parse_absolute(&sitemap_url).map_err(|source| HarvestError::InvalidSitemapUrl {
            url: sitemap_url.clone(),
            source,
        })?;

        traverse(&self.fetcher, root.as_str(), &mut self.results, &mut self.errors).await;

        let urls = std::mem::take(&mut self.results);
        let categories = self.options.categories.categorize_all(&urls);
        tracing::info!(
            "Harvest of {} finished: {} URLs, {} errors",
            root,
            urls.len(),
            self.errors.len()
        );

        Ok(HarvestReport {
            sitemap_url: Some(root.to_string()),
            sitemap_not_found: false,
            urls,
            categories,
            errors: std::mem::take(&mut self.errors),
        })
    }
}

/// Convenience wrapper for a single run.
pub async fn harvest<F: Fetcher>(fetcher: F, request: &HarvestRequest, options: HarvestOptions) -> Result<HarvestReport> {
    Harvester::new(fetcher, options).run(request).await
}
