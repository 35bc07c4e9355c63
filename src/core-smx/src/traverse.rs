//! Recursive, depth-first walk over a sitemap tree.
//!
//! Every node is fetched and parsed in turn. Index nodes recurse into their children one at a
//! time, in document order; leaf nodes append their page URLs to the shared result set. A
//! failing node records one message in the shared [`ErrorLog`] and the walk carries on with
//! its siblings, so a single broken branch never aborts the run.

use futures::future::BoxFuture;
use url::Url;

use crate::error_log::ErrorLog;
use crate::fetch::Fetcher;
use crate::sitemap::{SitemapDocument, parse_sitemap};
use crate::url_utils::{is_compressed_path, parse_absolute, resolve};

/// Page URLs in discovery order. Duplicates are kept.
pub type ResultSet = Vec<String>;

/// Walks the sitemap tree rooted at `sitemap_url`, appending page URLs to `results` and
/// per-node failures to `errors`.
///
/// Never fails as a whole. A sitemap that lists one of its own ancestors is reported and
/// skipped instead of being followed forever.
pub async fn traverse<F: Fetcher + ?Sized>(
    fetcher: &F,
    sitemap_url: &str,
    results: &mut ResultSet,
    errors: &mut ErrorLog,
) {
    let url = match parse_absolute(sitemap_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot parse sitemap URL {}: {}", sitemap_url, e);
            errors.record(format!(
                "Invalid sitemap URL encountered during processing: {}",
                sitemap_url
            ));
            return;
        }
    };

    let mut walk = Traversal {
        fetcher,
        results,
        errors,
        ancestors: Vec::new(),
    };
    walk.visit(url).await;
}

struct Traversal<'a, F: ?Sized> {
    fetcher: &'a F,
    results: &'a mut ResultSet,
    errors: &'a mut ErrorLog,
    /// Index sitemaps on the path from the root to the node being visited.
    ancestors: Vec<Url>,
}

impl<'a, F: Fetcher + ?Sized> Traversal<'a, F> {
    fn visit(&mut self, url: Url) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if self.ancestors.contains(&url) {
                self.errors.record(format!(
                    "Sitemap {} references one of its own ancestors; skipping it to avoid an endless loop.",
                    url
                ));
                return;
            }

            tracing::info!("Processing sitemap: {}", url);
            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(message) => {
                    self.record_failure(&url, &message);
                    return;
                }
            };

            match parse_sitemap(&body) {
                SitemapDocument::Index(locations) => {
                    tracing::info!("{} is a sitemap index. Processing {} sub-sitemaps...", url, locations.len());
                    let children = self.resolve_children(&url, &locations);

                    self.ancestors.push(url);
                    for child in children {
                        self.visit(child).await;
                    }
                    self.ancestors.pop();
                }
                SitemapDocument::Leaf(locations) => {
                    tracing::info!("Found {} URLs in {}", locations.len(), url);
                    self.results.extend(locations);
                }
                SitemapDocument::Invalid(reason) => {
                    tracing::debug!("XML parsing error for {}: {}", url, reason);
                    let message = if is_compressed_path(&url) {
                        format!(
                            "Failed to parse XML for {}. Compressed sitemaps (.gz) need to be uncompressed first. \
                             Please provide a URL to an uncompressed XML sitemap.",
                            url
                        )
                    } else {
                        format!("Failed to parse XML for {}. Ensure it's a valid XML sitemap.", url)
                    };
                    self.record_failure(&url, &message);
                }
            }
        })
    }

    /// Body of a successful response, or a description of why there is none.
    async fn fetch(&self, url: &Url) -> Result<String, String> {
        match self.fetcher.get(url).await {
            Ok(response) if response.is_success() => Ok(response.body),
            Ok(response) => Err(format!("Failed to fetch: {}", response.status_line())),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Resolves each child location against the index it was listed in.
    /// Unresolvable locations are recorded and left out.
    fn resolve_children(&mut self, index: &Url, locations: &[String]) -> Vec<Url> {
        let mut children = Vec::with_capacity(locations.len());
        for location in locations {
            match resolve(index, location) {
                Ok(child) => children.push(child),
                Err(e) => {
                    tracing::debug!("Cannot resolve '{}' against '{}': {}", location, index, e);
                    self.errors.record(format!(
                        "Invalid sub-sitemap URL '{}' found in index '{}'.",
                        location, index
                    ));
                }
            }
        }
        children
    }

    fn record_failure(&mut self, url: &Url, message: &str) {
        self.errors.record(format!(
            "Error with sitemap {}: {}. Some links might be missing.",
            url,
            message.trim_end_matches('.')
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::{MockFetcher, sample_sitemap_index, sample_urlset};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    async fn run(fetcher: &MockFetcher, root: &str) -> (ResultSet, ErrorLog) {
        let mut results = ResultSet::new();
        let mut errors = ErrorLog::new();
        traverse(fetcher, root, &mut results, &mut errors).await;
        (results, errors)
    }

    #[tokio::test]
    async fn test_single_leaf() {
        let fetcher = MockFetcher::new().with_xml(
            "https://example.com/sitemap.xml",
            &sample_urlset(&["https://example.com/a", "https://example.com/b"]),
        );

        let (results, errors) = run(&fetcher, "https://example.com/sitemap.xml").await;

        assert_eq!(results, vec!["https://example.com/a", "https://example.com/b"]);
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_depth_first_order_regardless_of_latency() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&["https://example.com/a.xml", "https://example.com/b.xml"]),
            )
            .with_xml(
                "https://example.com/a.xml",
                &sample_sitemap_index(&["https://example.com/a1.xml"]),
            )
            .with_xml("https://example.com/a1.xml", &sample_urlset(&["https://example.com/from-a1"]))
            .with_delay("https://example.com/a1.xml", Duration::from_millis(50))
            .with_xml("https://example.com/b.xml", &sample_urlset(&["https://example.com/from-b"]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(results, vec!["https://example.com/from-a1", "https://example.com/from-b"]);
        assert!(errors.is_empty());
        // b.xml is not requested until a.xml's whole subtree is done
        assert_eq!(
            fetcher.requests(),
            vec![
                "https://example.com/index.xml",
                "https://example.com/a.xml",
                "https://example.com/a1.xml",
                "https://example.com/b.xml",
            ]
        );
    }

    #[tokio::test]
    async fn test_children_resolve_against_their_own_index() {
        let fetcher = MockFetcher::new()
            .with_xml("https://example.com/index.xml", &sample_sitemap_index(&["nested/index.xml"]))
            .with_xml("https://example.com/nested/index.xml", &sample_sitemap_index(&["leaf.xml"]))
            .with_xml("https://example.com/nested/leaf.xml", &sample_urlset(&["https://example.com/deep"]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(results, vec!["https://example.com/deep"]);
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_child_does_not_block_siblings() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&["http://example.com:99999/bad.xml", "https://example.com/good.xml"]),
            )
            .with_xml("https://example.com/good.xml", &sample_urlset(&["https://example.com/page"]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(results, vec!["https://example.com/page"]);
        assert_eq!(
            errors.all(),
            &["Invalid sub-sitemap URL 'http://example.com:99999/bad.xml' found in index 'https://example.com/index.xml'."]
        );
    }

    #[tokio::test]
    async fn test_failed_children_are_recorded_and_siblings_continue() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&[
                    "https://example.com/missing.xml",
                    "https://example.com/down.xml",
                    "https://example.com/ok.xml",
                ]),
            )
            .with_failure("https://example.com/down.xml", "connection refused")
            .with_xml("https://example.com/ok.xml", &sample_urlset(&["https://example.com/page"]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(results, vec!["https://example.com/page"]);
        assert_eq!(
            errors.all(),
            &[
                "Error with sitemap https://example.com/missing.xml: Failed to fetch: 404 Not Found. Some links might be missing.",
                "Error with sitemap https://example.com/down.xml: connection refused. Some links might be missing.",
            ]
        );
    }

    #[tokio::test]
    async fn test_parse_failure_messages() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&["https://example.com/broken.xml", "https://example.com/sitemap.xml.gz"]),
            )
            .with_xml("https://example.com/broken.xml", "<urlset><url>")
            .with_response(
                "https://example.com/sitemap.xml.gz",
                200,
                Some("application/gzip"),
                "\u{1f}\u{fffd}\u{8}\u{0}garbage",
            );

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert!(results.is_empty());
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.all()[0],
            "Error with sitemap https://example.com/broken.xml: Failed to parse XML for https://example.com/broken.xml. \
             Ensure it's a valid XML sitemap. Some links might be missing."
        );
        assert!(errors.all()[1].contains("Compressed sitemaps (.gz) need to be uncompressed first"));
        assert!(!errors.all()[1].contains("Ensure it's a valid XML sitemap"));
    }

    #[tokio::test]
    async fn test_empty_index_and_empty_leaf_are_not_failures() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&["https://example.com/empty-index.xml", "https://example.com/empty-leaf.xml"]),
            )
            .with_xml("https://example.com/empty-index.xml", &sample_sitemap_index(&[]))
            .with_xml("https://example.com/empty-leaf.xml", &sample_urlset(&[]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert!(results.is_empty());
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_root_url() {
        let fetcher = MockFetcher::new();

        let (results, errors) = run(&fetcher, "sitemap.xml").await;

        assert!(results.is_empty());
        assert_eq!(errors.all(), &["Invalid sitemap URL encountered during processing: sitemap.xml"]);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_self_reference_terminates() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&["https://example.com/child.xml"]),
            )
            .with_xml(
                "https://example.com/child.xml",
                &sample_sitemap_index(&["https://example.com/index.xml", "https://example.com/leaf.xml"]),
            )
            .with_xml("https://example.com/leaf.xml", &sample_urlset(&["https://example.com/page"]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(results, vec!["https://example.com/page"]);
        assert_eq!(errors.len(), 1);
        assert!(errors.all()[0].contains("https://example.com/index.xml references one of its own ancestors"));
    }

    #[tokio::test]
    async fn test_repeated_siblings_are_not_cycles() {
        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&["https://example.com/leaf.xml", "https://example.com/leaf.xml"]),
            )
            .with_xml("https://example.com/leaf.xml", &sample_urlset(&["https://example.com/page"]));

        let (results, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(results, vec!["https://example.com/page", "https://example.com/page"]);
        assert!(errors.is_empty());
    }

    /// Counts events at WARN or more severe.
    struct WarningCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarningCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_each_failure_is_logged_once() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarningCounter(warnings.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let fetcher = MockFetcher::new()
            .with_xml(
                "https://example.com/index.xml",
                &sample_sitemap_index(&[
                    "https://example.com/missing.xml",
                    "https://example.com/broken.xml",
                    "http://[::1",
                ]),
            )
            .with_text("https://example.com/broken.xml", "not xml");

        let (_, errors) = run(&fetcher, "https://example.com/index.xml").await;

        assert_eq!(errors.len(), 3);
        assert_eq!(warnings.load(Ordering::SeqCst), errors.len());
    }
}
