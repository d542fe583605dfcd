//! HTML extractor for visible text, image descriptions and links
//!
//! This module handles parsing HTML content to extract:
//! - Visible text, with `<script>` and `<style>` contents removed
//! - `alt` text of images
//! - Links to follow (from `<a href>` tags), resolved to absolute URLs

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style"];

/// Why a payload could not be turned into page content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("invalid base URL {0}")]
    BaseUrl(String),
}

/// Content extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Visible text, one space between lines
    pub text: String,

    /// Absolute `http`/`https` links in document order (not deduplicated)
    pub links: Vec<String>,

    /// Non-empty `alt` attributes of images in document order
    pub alt_texts: Vec<String>,
}

impl Extraction {
    /// The text recorded for the page: visible text followed by one
    /// `Image description: ...` entry per alt text
    pub fn page_text(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.alt_texts.len());
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        parts.extend(
            self.alt_texts
                .iter()
                .map(|alt| format!("Image description: {}", alt)),
        );
        parts.join(" ")
    }
}

/// Turns a fetched body into text and links
///
/// Link origin filtering is the controller's job, not the extractor's.
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &str, base_url: &Url) -> Result<Extraction, ExtractError>;
}

/// `Extractor` backed by the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, body: &str, base_url: &Url) -> Result<Extraction, ExtractError> {
        parse_html(body, base_url)
    }
}

/// Parses HTML content and extracts text, alt texts and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
/// - Fragment and query variants as they appear (no normalization)
///
/// **Exclude:**
/// - Empty hrefs
/// - `javascript:`, `mailto:`, `tel:`, `data:` and any other non-HTTP(S) scheme
/// - Hrefs that fail to resolve against the base URL
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Example
///
/// ```
/// use site_gleaner::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><p>Hi</p><script>x()</script><a href="/page">there</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &base_url).unwrap();
/// assert_eq!(page.text, "Hi there");
/// assert_eq!(page.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> Result<Extraction, ExtractError> {
    let document = Html::parse_document(html);

    Ok(Extraction {
        text: extract_visible_text(&document),
        links: extract_links(&document, base_url)?,
        alt_texts: extract_alt_texts(&document)?,
    })
}

/// Collects visible text, trimming each line and dropping blank ones
fn extract_visible_text(document: &Html) -> String {
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        lines.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    lines.join(" ")
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Malformed(format!("{css}: {e:?}")))
}

/// Extracts the non-empty `alt` attribute of every image
fn extract_alt_texts(document: &Html) -> Result<Vec<String>, ExtractError> {
    let img_selector = selector("img[alt]")?;

    Ok(document
        .select(&img_selector)
        .filter_map(|element| element.value().attr("alt"))
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
        .collect())
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Result<Vec<String>, ExtractError> {
    let a_selector = selector("a[href]")?;

    Ok(document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None for empty hrefs, unresolvable hrefs and non-HTTP(S) results.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
