//! URL parsing and resolution utilities.

use url::Url;

/// Parses a string as an absolute URL.
///
/// # Examples
///
/// ```
/// # use core_smx::url_utils::parse_absolute;
/// assert!(parse_absolute("https://example.com/sitemap.xml").is_ok());
/// assert!(parse_absolute("/sitemap.xml").is_err());
/// ```
pub fn parse_absolute(uri: &str) -> Result<Url, url::ParseError> {
    Url::parse(uri)
}

/// Resolves a possibly-relative reference against a base URL.
/// Absolute references are returned as-is.
pub fn resolve(base: &Url, reference: &str) -> Result<Url, url::ParseError> {
    base.join(reference)
}

/// Tries the reference as an absolute URL first and, failing that, resolves it against the base.
pub fn resolve_absolute_or_relative(base: &Url, reference: &str) -> Result<Url, url::ParseError> {
    parse_absolute(reference).or_else(|_| resolve(base, reference))
}

/// Appends a trailing `/` when missing so that relative joins land beneath the given path.
///
/// ```
/// # use core_smx::url_utils::with_trailing_slash;
/// assert_eq!(with_trailing_slash("https://example.com/blog"), "https://example.com/blog/");
/// assert_eq!(with_trailing_slash("https://example.com/"), "https://example.com/");
/// ```
pub fn with_trailing_slash(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{}/", uri)
    }
}

/// Path component of a URL string, or `None` if the string is not an absolute URL.
pub fn url_path(uri: &str) -> Option<String> {
    Url::parse(uri).ok().map(|url| url.path().to_string())
}

/// True if the URL's path ends with the `.gz` suffix of a compressed sitemap.
pub fn is_compressed_path(url: &Url) -> bool {
    url.path().to_lowercase().ends_with(".gz")
}
