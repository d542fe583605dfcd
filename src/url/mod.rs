//! URL handling module for Site-Gleaner
//!
//! Crawled URLs travel through the crawler as plain strings and are never
//! normalized: a fragment or trailing-slash variant of a page is a distinct
//! page. This module only parses URLs where a decision has to be made on them
//! (seed validation and the same-origin check).

mod domain;

pub use domain::{extract_domain, is_same_origin, SiteOrigin};

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute `http`/`https` URL with a host
///
/// # Examples
///
/// ```
/// use site_gleaner::url::parse_http_url;
///
/// assert!(parse_http_url("https://example.com/page").is_ok());
/// assert!(parse_http_url("mailto:someone@example.com").is_err());
/// assert!(parse_http_url("/relative").is_err());
/// ```
pub fn parse_http_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
