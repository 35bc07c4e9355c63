//! The outcome of a harvest run and its renderings.

use serde::Serialize;

use crate::categorize::CategorizedResult;
use crate::error_log::ErrorLog;

/// Everything a front end needs to present a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestReport {
    /// Root sitemap that was traversed, if one was supplied or discovered
    pub sitemap_url: Option<String>,
    /// True when discovery found no sitemap at all (as opposed to an empty one)
    pub sitemap_not_found: bool,
    /// Every page URL, in discovery order
    pub urls: Vec<String>,
    /// The same URLs grouped by category
    pub categories: CategorizedResult,
    /// Failures accumulated during the run
    pub errors: ErrorLog,
}

impl HarvestReport {
    /// Report for a run where discovery came up empty.
    pub fn sitemap_not_found(errors: ErrorLog) -> Self {
        Self {
            sitemap_not_found: true,
            errors,
            ..Self::default()
        }
    }

    pub fn no_urls_found(&self) -> bool {
        self.urls.is_empty()
    }

    /// Human-readable summary: total, one section per category, then the errors.
    pub fn render_text(&self) -> String {
        let mut output = String::new();

        if let Some(sitemap_url) = &self.sitemap_url {
            output.push_str(&format!("Sitemap: {}\n\n", sitemap_url));
        }

        if self.no_urls_found() {
            output.push_str("No URLs found. Check error messages below (if any).\n");
        } else {
            output.push_str(&format!("Total Links Found: {}\n", self.urls.len()));
            for group in self.categories.groups() {
                output.push_str(&format!("\n## {} ({})\n", group.name, group.urls.len()));
                for url in &group.urls {
                    output.push_str(url);
                    output.push('\n');
                }
            }
        }

        if !self.errors.is_empty() {
            output.push_str(&format!("\nErrors ({}):\n", self.errors.len()));
            for message in self.errors.all() {
                output.push_str(&format!("- {}\n", message));
            }
        }

        output
    }

    /// Newline-separated URLs, ready to paste elsewhere: all of them, or one category's.
    /// `None` when there is nothing to copy.
    pub fn render_plain(&self, category: Option<&str>) -> Option<String> {
        let urls: &[String] = match category {
            Some(name) => self.categories.get(name)?,
            None => &self.urls,
        };
        if urls.is_empty() {
            None
        } else {
            Some(urls.join("\n"))
        }
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
