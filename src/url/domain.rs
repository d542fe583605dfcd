use url::{Origin, Url};

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_gleaner::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// The origin (scheme, host, port) a site crawl is confined to
///
/// The scheme is part of the origin: `http://` and `https://` links on the
/// same host are different origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOrigin(Origin);

impl SiteOrigin {
    /// Computes the origin of a seed URL
    ///
    /// Returns None for strings that do not parse or whose origin is opaque
    /// (`data:`, `mailto:` and the like). A crawl without an origin follows no
    /// links.
    pub fn of(seed: &str) -> Option<Self> {
        let url = Url::parse(seed).ok()?;
        let origin = url.origin();
        origin.is_tuple().then_some(Self(origin))
    }

    /// Returns true if `link` is an absolute URL on this origin
    pub fn contains(&self, link: &str) -> bool {
        Url::parse(link)
            .map(|url| url.origin() == self.0)
            .unwrap_or(false)
    }

    /// Serialized form, e.g. `https://example.com:8080`
    pub fn as_string(&self) -> String {
        self.0.ascii_serialization()
    }
}

/// Returns true if both URLs parse and share scheme, host and port
///
/// # Examples
///
/// ```
/// use site_gleaner::url::is_same_origin;
///
/// assert!(is_same_origin("https://example.com/", "https://example.com/a/b"));
/// assert!(!is_same_origin("https://example.com/", "http://example.com/"));
/// assert!(!is_same_origin("https://example.com/", "https://blog.example.com/"));
/// ```
pub fn is_same_origin(a: &str, b: &str) -> bool {
    SiteOrigin::of(a).is_some_and(|origin| origin.contains(b))
}
