//! Locating a website's sitemap from its root URL.
//!
//! Two heuristics, tried in order:
//! 1. the first `Sitemap:` declaration in the site's robots.txt;
//! 2. a fixed list of conventional sitemap paths, probed with full GET requests.
//!
//! Finding nothing is a normal outcome, not an error.

use url::Url;

use crate::config::HarvestOptions;
use crate::fetch::Fetcher;
use crate::url_utils::{parse_absolute, resolve, resolve_absolute_or_relative, with_trailing_slash};

const SITEMAP_DIRECTIVE: &str = "sitemap:";

/// Content types that plausibly carry a sitemap.
const ACCEPTED_CONTENT_TYPES: [&str; 3] = ["xml", "text/plain", "application/gzip"];

/// Finds the sitemap URL for a website, or `None` when no heuristic turns one up.
///
/// `website_url` should already be validated by the caller; an unparseable value simply
/// yields `None`.
pub async fn discover<F: Fetcher + ?Sized>(fetcher: &F, website_url: &str, options: &HarvestOptions) -> Option<Url> {
    let base = match parse_absolute(&with_trailing_slash(website_url)) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Cannot discover a sitemap for invalid website URL {}: {}", website_url, e);
            return None;
        }
    };
    // robots.txt declarations resolve against the website URL exactly as given
    let website = parse_absolute(website_url).unwrap_or_else(|_| base.clone());

    if let Some(found) = sitemap_from_robots(fetcher, &base, &website, options).await {
        return Some(found);
    }

    tracing::info!("robots.txt did not yield a sitemap. Trying common paths...");
    if let Some(found) = sitemap_from_candidates(fetcher, &base, options).await {
        return Some(found);
    }

    tracing::info!("Could not find a sitemap URL through robots.txt or common paths for {}", website_url);
    None
}

async fn sitemap_from_robots<F: Fetcher + ?Sized>(
    fetcher: &F,
    base: &Url,
    website: &Url,
    options: &HarvestOptions,
) -> Option<Url> {
    let robots_url = match resolve(base, &options.robots_path) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL from {}: {}", base, e);
            return None;
        }
    };

    tracing::debug!("Attempting to fetch robots.txt from: {}", robots_url);
    match fetcher.get(&robots_url).await {
        Ok(response) if response.is_success() => {
            let found = find_sitemap_declaration(&response.body, website);
            if let Some(url) = &found {
                tracing::info!("Found sitemap in robots.txt: {}", url);
            }
            found
        }
        Ok(response) => {
            tracing::warn!("Failed to fetch robots.txt: {}", response.status_line());
            None
        }
        Err(e) => {
            tracing::warn!("Error fetching robots.txt from {}: {}", robots_url, e);
            None
        }
    }
}

async fn sitemap_from_candidates<F: Fetcher + ?Sized>(fetcher: &F, base: &Url, options: &HarvestOptions) -> Option<Url> {
    for path in &options.sitemap_candidates {
        let candidate = match resolve(base, path) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping unusable sitemap path {:?}: {}", path, e);
                continue;
            }
        };

        tracing::debug!("Trying common path: {}", candidate);
        // full GET: HEAD responses are too unreliable across servers
        match fetcher.get(&candidate).await {
            Ok(response) if response.is_success() && accepts_content_type(response.content_type.as_deref()) => {
                tracing::info!(
                    "Found sitemap at common path: {} (Content-Type: {})",
                    candidate,
                    response.content_type.as_deref().unwrap_or("<none>")
                );
                return Some(candidate);
            }
            Ok(response) => {
                tracing::debug!(
                    "Rejected {}: {} with Content-Type {:?}",
                    candidate,
                    response.status_line(),
                    response.content_type
                );
            }
            Err(e) => {
                tracing::warn!("Error trying common path {}: {}", candidate, e);
            }
        }
    }
    None
}

/// Returns the first non-empty `Sitemap:` declaration in a robots.txt body.
///
/// The directive is matched case-insensitively at the start of a trimmed line. Absolute
/// declarations are taken as-is; relative ones are resolved against `website`. Later
/// declarations are never consulted: an unresolvable first one yields `None`.
///
/// ```
/// # use core_smx::discover::find_sitemap_declaration;
/// # use url::Url;
/// let site = Url::parse("https://example.com/").unwrap();
/// let found = find_sitemap_declaration("User-agent: *\nSitemap: /s.xml\n", &site);
/// assert_eq!(found.unwrap().as_str(), "https://example.com/s.xml");
/// ```
pub fn find_sitemap_declaration(robots_txt: &str, website: &Url) -> Option<Url> {
    let declared = robots_txt
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let directive = line.get(..SITEMAP_DIRECTIVE.len())?;
            if directive.eq_ignore_ascii_case(SITEMAP_DIRECTIVE) {
                Some(line[SITEMAP_DIRECTIVE.len()..].trim())
            } else {
                None
            }
        })
        .find(|declared| !declared.is_empty())?;

    // only the first declaration counts, even when it cannot be resolved
    match resolve_absolute_or_relative(website, declared) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("Ignoring unresolvable sitemap declaration {:?}: {}", declared, e);
            None
        }
    }
}

/// True when a response's content type could be a sitemap. A missing or blank header is accepted.
pub fn accepts_content_type(content_type: Option<&str>) -> bool {
    match content_type.map(str::trim) {
        None | Some("") => true,
        Some(content_type) => {
            let content_type = content_type.to_lowercase();
            ACCEPTED_CONTENT_TYPES.iter().any(|accepted| content_type.contains(accepted))
        }
    }
}
