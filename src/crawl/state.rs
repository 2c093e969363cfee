//! Crawl state machine types.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::config::ListFilters;
use crate::models::ProductRecord;

/// Where the crawler is in its page loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// Waiting for page `n` to be fetched
    AwaitingPage(u32),
    /// Page `n` is loaded and being parsed
    FetchedPage(u32),
    /// The current page links to a further page
    HasNext(Url),
    /// The current page has no next control; the crawl is over
    NoNext,
}

impl fmt::Display for PageStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageStep::AwaitingPage(n) => write!(f, "awaiting page {}", n),
            PageStep::FetchedPage(n) => write!(f, "parsing page {}", n),
            PageStep::HasNext(url) => write!(f, "next page at {}", url),
            PageStep::NoNext => f.write_str("last page reached"),
        }
    }
}

/// A loaded document: where it came from and its markup.
///
/// "Next page" discovery always queries the most recently loaded document,
/// never the page the crawl started from.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Address the document was fetched from
    pub url: Url,
    /// Raw HTML
    pub html: String,
}

/// Mutable state of one pagination crawl.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Pages loaded so far (1-based page number of the current document)
    pub current_page: u32,
    /// Upper bound on pages to load
    pub total_pages_requested: u32,
    /// Records from every page, before filtering
    pub records: Vec<ProductRecord>,
    /// Result cards seen across all pages
    pub total_found: usize,
    /// The page currently queried for its next link
    pub document: DocumentContext,
    /// Loop position
    pub step: PageStep,
    /// Set when the crawl ended on a failure or the time budget
    pub stopped_early: bool,
}

impl CrawlState {
    /// Starts a crawl at an already loaded first page.
    pub fn new(first_page: DocumentContext, total_pages_requested: u32) -> Self {
        Self {
            current_page: 1,
            total_pages_requested,
            records: Vec::new(),
            total_found: 0,
            document: first_page,
            step: PageStep::FetchedPage(1),
            stopped_early: false,
        }
    }

    /// True when the page bound allows loading another page.
    pub fn can_advance(&self) -> bool {
        self.current_page < self.total_pages_requested
    }
}

/// Pacing and bounds of a crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOptions {
    /// Maximum pages to load, including the first
    pub max_pages: u32,
    /// Delay before every subsequent page fetch
    pub page_delay: Duration,
    /// Overall time allowed for the crawl
    pub budget: Duration,
}

impl CrawlOptions {
    /// Options from list filters, with the given overall budget.
    pub fn from_filters(filters: &ListFilters, budget: Duration) -> Self {
        Self {
            max_pages: filters.max_pages,
            page_delay: Duration::from_secs(filters.page_delay_seconds),
            budget,
        }
    }
}
