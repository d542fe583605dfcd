//! Per-site page aggregation
//!
//! `SitePages` is the only place crawl results accumulate. Keys are the URLs
//! exactly as they were enqueued, and the map is ordered by URL so that the
//! serialized document does not depend on which worker finished first.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// What was recorded for one crawled URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Extracted text (visible text plus image descriptions)
    Text(String),

    /// The page could not be fetched or parsed
    Unavailable {
        /// The URL that failed
        url: String,
        /// Human-readable cause, kept for logs and reports
        reason: String,
    },
}

impl PageContent {
    /// Builds the failure variant for `url`
    pub fn unavailable(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Unavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if text was extracted
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// The failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Unavailable { reason, .. } => Some(reason),
        }
    }
}

/// Renders the text, or the error placeholder for failed pages
impl fmt::Display for PageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Unavailable { url, .. } => {
                write!(f, "[Error: Could not retrieve content from {}]", url)
            }
        }
    }
}

/// Serialized as a plain string, so failures keep the document shape
impl Serialize for PageContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Unavailable { .. } => serializer.collect_str(self),
        }
    }
}

/// A recorded page together with the depth it was enqueued at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub depth: u32,
    pub content: PageContent,
}

/// Mapping of crawled URL to recorded content for one site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitePages {
    pages: BTreeMap<String, PageRecord>,
}

impl SitePages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result for `url`
    ///
    /// Returns false and leaves the existing entry untouched if `url` was
    /// already recorded.
    pub fn record(&mut self, url: impl Into<String>, depth: u32, content: PageContent) -> bool {
        use std::collections::btree_map::Entry;

        match self.pages.entry(url.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(PageRecord { depth, content });
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    /// The serialized text for `url` (placeholder included)
    pub fn text(&self, url: &str) -> Option<String> {
        self.pages.get(url).map(|record| record.content.to_string())
    }

    /// Iterates records in URL order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageRecord)> {
        self.pages.iter().map(|(url, record)| (url.as_str(), record))
    }

    /// Number of pages with extracted text
    pub fn ok_count(&self) -> usize {
        self.pages.values().filter(|r| r.content.is_ok()).count()
    }

    /// Number of pages recorded as unavailable
    pub fn failed_count(&self) -> usize {
        self.len() - self.ok_count()
    }

    /// URL → serialized text, the shape written to the output document
    pub fn to_text_map(&self) -> BTreeMap<String, String> {
        self.pages
            .iter()
            .map(|(url, record)| (url.clone(), record.content.to_string()))
            .collect()
    }
}

impl Serialize for SitePages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.pages.iter().map(|(url, record)| (url, &record.content)))
    }
}

/// The full run result: configured site → its pages
///
/// Sites keep the order they were configured in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutput {
    sites: Vec<(String, SitePages)>,
}

impl CrawlOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the pages of `site`
    pub fn insert(&mut self, site: impl Into<String>, pages: SitePages) {
        let site = site.into();
        match self.sites.iter_mut().find(|(s, _)| *s == site) {
            Some((_, existing)) => *existing = pages,
            None => self.sites.push((site, pages)),
        }
    }

    pub fn get(&self, site: &str) -> Option<&SitePages> {
        self.sites
            .iter()
            .find(|(s, _)| s == site)
            .map(|(_, pages)| pages)
    }

    /// Iterates sites in configuration order
    pub fn sites(&self) -> impl Iterator<Item = (&str, &SitePages)> {
        self.sites.iter().map(|(site, pages)| (site.as_str(), pages))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Total pages recorded across all sites
    pub fn total_pages(&self) -> usize {
        self.sites.iter().map(|(_, pages)| pages.len()).sum()
    }
}

struct WebsiteInfo<'a>(&'a [(String, SitePages)]);

impl Serialize for WebsiteInfo<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(site, pages)| (site, pages)))
    }
}

/// Serialized as `{"website_info": {site: {url: text}}}`
impl Serialize for CrawlOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("website_info", &WebsiteInfo(&self.sites))?;
        map.end()
    }
}
