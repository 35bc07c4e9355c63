//! # Sitemap link harvesting
//!
//! Finds every page URL a website publishes through its XML sitemap(s) and sorts them into
//! content categories.
//!
//! ## Features
//!
//! - Discover a sitemap from a bare website URL (robots.txt, then conventional paths)
//! - Walk sitemap indexes recursively, depth-first and in document order
//! - Keep going when individual sitemaps fail, collecting one message per failure
//! - Categorize URLs with ordered, data-driven keyword rules
//!
//! ## Examples
//!
//! ```no_run
//! use core_smx::{HarvestOptions, HarvestRequest, HttpFetcher, harvest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = HarvestOptions::default();
//!     let fetcher = HttpFetcher::new(&options)?;
//!
//!     let report = harvest(fetcher, &HarvestRequest::website("https://example.com"), options).await?;
//!     println!("{}", report.render_text());
//!     Ok(())
//! }
//! ```

pub mod categorize;
pub mod common;
pub mod config;
pub mod discover;
mod error_log;
mod errors;
pub mod fetch;
mod harvest;
mod report;
pub mod sitemap;
pub mod traverse;
pub mod url_utils;

// Public API re-exports
pub use categorize::{CategorizedResult, CategoryGroup, CategoryRule, CategoryRules, OTHER_CATEGORY};
pub use config::{HarvestOptions, HarvestOptionsBuilder};
pub use error_log::ErrorLog;
pub use errors::{FetchError, HarvestError, Result};
pub use fetch::{FetchResponse, Fetcher, HttpFetcher};
pub use harvest::{HarvestRequest, Harvester, SITEMAP_NOT_FOUND_MESSAGE, harvest};
pub use report::HarvestReport;

// Additional exports for advanced usage
pub use discover::discover;
pub use sitemap::{SitemapDocument, parse_sitemap};
pub use traverse::{ResultSet, traverse};
