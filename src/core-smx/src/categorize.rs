//! Keyword-based categorization of harvested page URLs.
//!
//! Rules are plain ordered data: categories are checked in declaration order, and within a
//! category its keywords are checked in declaration order. The first keyword found in the
//! lower-cased URL path wins. URLs matching no keyword fall back to the "Pages" category when
//! their path looks like a home page, and to the catch-all category otherwise.

use serde::Serialize;
use url::Url;

/// Bucket for URLs that match no rule and no fallback path.
pub const OTHER_CATEGORY: &str = "Other Links";

/// Category assigned to home-page-like paths that matched no keyword.
pub const FALLBACK_CATEGORY: &str = "Pages";

/// Paths treated as home pages when no keyword matched. Compared against the raw path.
pub const FALLBACK_PATHS: [&str; 5] = ["", "/", "/index.html", "/index.htm", "/home/"];

/// A named category and the path substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Keywords are lower-cased, since they are matched against a lower-cased path.
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Ordered category rules plus the fallback and catch-all names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    fallback_category: String,
    fallback_paths: Vec<String>,
    catch_all: String,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::new("Products", &["/product", "/products/", "/item/", "/detail/"]),
            CategoryRule::new("Posts", &["/post/", "/posts/", "/article/", "/articles/"]),
            CategoryRule::new("Blogs", &["/blog/", "/blogs/"]),
            CategoryRule::new("Pages", &["/page/", "/pages/"]),
        ])
    }
}

impl CategoryRules {
    /// Custom rules with the default fallback ("Pages") and catch-all ("Other Links").
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self {
            rules,
            fallback_category: FALLBACK_CATEGORY.to_string(),
            fallback_paths: FALLBACK_PATHS.iter().map(|p| p.to_string()).collect(),
            catch_all: OTHER_CATEGORY.to_string(),
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn catch_all(&self) -> &str {
        &self.catch_all
    }

    /// Category names in display order: declared rules, then the fallback category if it is
    /// not already a rule, then the catch-all last.
    pub fn display_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();
        if !order.contains(&self.fallback_category.as_str()) {
            order.push(&self.fallback_category);
        }
        order.push(&self.catch_all);
        order
    }

    /// Classifies a single URL. Total: unparseable input lands in the catch-all.
    ///
    /// ```
    /// # use core_smx::CategoryRules;
    /// let rules = CategoryRules::default();
    /// assert_eq!(rules.categorize("https://shop.example/product/123"), "Products");
    /// assert_eq!(rules.categorize("https://shop.example/"), "Pages");
    /// assert_eq!(rules.categorize("https://shop.example/unknown-thing"), "Other Links");
    /// assert_eq!(rules.categorize("not a url"), "Other Links");
    /// ```
    pub fn categorize(&self, url: &str) -> &str {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Could not parse URL for categorization: {} ({})", url, e);
                return &self.catch_all;
            }
        };

        let path = parsed.path().to_lowercase();
        let keyword_match = self
            .rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| path.contains(keyword.as_str())));
        if let Some(rule) = keyword_match {
            return &rule.name;
        }

        if self.fallback_paths.iter().any(|p| p == parsed.path()) {
            return &self.fallback_category;
        }

        &self.catch_all
    }

    /// Groups URLs by category, keeping each group's input order.
    /// Groups come out in [`display_order`](Self::display_order); empty groups are omitted.
    pub fn categorize_all(&self, urls: &[String]) -> CategorizedResult {
        let order = self.display_order();
        let mut buckets: Vec<Vec<String>> = vec![Vec::new(); order.len()];

        for url in urls {
            let category = self.categorize(url);
            // every name categorize() returns is part of display_order()
            if let Some(index) = order.iter().position(|name| *name == category) {
                buckets[index].push(url.clone());
            }
        }

        let groups = order
            .into_iter()
            .zip(buckets)
            .filter(|(_, urls)| !urls.is_empty())
            .map(|(name, urls)| CategoryGroup {
                name: name.to_string(),
                urls,
            })
            .collect();

        CategorizedResult { groups }
    }
}

/// One category and the URLs assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub urls: Vec<String>,
}

/// Non-empty category groups in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorizedResult {
    groups: Vec<CategoryGroup>,
}

impl CategorizedResult {
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// URLs of the named category (case-insensitive), if that category has any.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .map(|g| g.urls.as_slice())
    }

    /// Names of the non-empty categories, in display order.
    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
