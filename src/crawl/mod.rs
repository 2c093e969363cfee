//! Pagination crawler.
//!
//! Walks a search or category listing page by page. The first page is
//! supplied (or fetched) by the caller; every further page is fetched over
//! HTTP and parsed offline, and "next page" discovery always queries the
//! document just loaded. The crawl ends at the page bound, at the last page,
//! on the first failed fetch, or when the time budget runs out. Records
//! gathered before a failure are kept.

mod state;

pub use state::{CrawlOptions, CrawlState, DocumentContext, PageStep};

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::time::Instant;
use url::Url;

use crate::assemble::assemble_listing_blocking;
use crate::config::ListFilters;
use crate::error_handling::{
    update_error_stats, ExtractionError, InfoType, ProcessingStats, WarningType,
};
use crate::extract::ExtractionRules;
use crate::fetch::PageFetcher;
use crate::filter::refine;
use crate::models::ListExtraction;

/// Crawls listing pages with a shared fetcher and rule set.
pub struct PaginationCrawler<F> {
    fetcher: Arc<F>,
    rules: Arc<ExtractionRules>,
    stats: Arc<ProcessingStats>,
    options: CrawlOptions,
}

impl<F: PageFetcher> PaginationCrawler<F> {
    /// Creates a crawler.
    pub fn new(
        fetcher: Arc<F>,
        rules: Arc<ExtractionRules>,
        stats: Arc<ProcessingStats>,
        options: CrawlOptions,
    ) -> Self {
        Self {
            fetcher,
            rules,
            stats,
            options,
        }
    }

    /// Fetches the first page at `url`, then crawls from it.
    ///
    /// # Errors
    ///
    /// Fails if the first page cannot be fetched within the budget or is not
    /// a listing; see [`PaginationCrawler::crawl`].
    pub async fn crawl_url(
        &self,
        url: Url,
        filters: &ListFilters,
    ) -> Result<ListExtraction, ExtractionError> {
        let deadline = Instant::now() + self.options.budget;
        let html = tokio::time::timeout_at(deadline, self.fetcher.fetch(&url, None))
            .await
            .map_err(|_| ExtractionError::PageLoadTimeout(self.options.budget))??;
        self.stats.increment_info(InfoType::PageFetched);
        self.crawl_until(DocumentContext { url, html }, filters, deadline)
            .await
    }

    /// Crawls from an already loaded first page and returns the refined records.
    ///
    /// # Errors
    ///
    /// Returns `NotApplicablePage` when the first page is not a listing,
    /// `PageLoadTimeout` when the budget runs out while parsing it, or
    /// `Task` if a parse task dies. Failures on later pages end the crawl
    /// early instead of failing it.
    pub async fn crawl(
        &self,
        first_page: DocumentContext,
        filters: &ListFilters,
    ) -> Result<ListExtraction, ExtractionError> {
        let deadline = Instant::now() + self.options.budget;
        self.crawl_until(first_page, filters, deadline).await
    }

    /// Fetches and parsing both count against `deadline`.
    async fn crawl_until(
        &self,
        first_page: DocumentContext,
        filters: &ListFilters,
        deadline: Instant,
    ) -> Result<ListExtraction, ExtractionError> {
        let mut state = CrawlState::new(first_page, self.options.max_pages.max(1));

        loop {
            let html = std::mem::take(&mut state.document.html);
            let assembled = tokio::time::timeout_at(
                deadline,
                assemble_listing_blocking(
                    html,
                    state.document.url.clone(),
                    Arc::clone(&self.rules),
                    Arc::clone(&self.stats),
                    state.total_found,
                ),
            )
            .await;
            let page = match assembled {
                Ok(page) => page?,
                Err(_) => {
                    let error = ExtractionError::PageLoadTimeout(self.options.budget);
                    if state.current_page == 1 {
                        return Err(error);
                    }
                    warn!("Stopping crawl at page {}: {}", state.current_page, error);
                    update_error_stats(&self.stats, &error);
                    state.current_page -= 1;
                    state.stopped_early = true;
                    break;
                }
            };

            if state.current_page == 1 && !page.is_listing {
                return Err(ExtractionError::NotApplicablePage {
                    expected: "listing",
                    url: state.document.url.to_string(),
                });
            }
            if page.records.is_empty() {
                warn!("No products on page {} ({})", state.current_page, state.document.url);
                self.stats.increment_warning(WarningType::EmptyResultPage);
            }
            info!(
                "Page {}/{}: {} products",
                state.current_page,
                state.total_pages_requested,
                page.records.len()
            );
            state.total_found += page.records.len();
            state.records.extend(page.records);

            let Some(next) = page.next_url else {
                state.step = PageStep::NoNext;
                self.stats.increment_info(InfoType::LastPageReached);
                debug!("{}", state.step);
                break;
            };
            if !state.can_advance() {
                debug!("Page bound {} reached", state.total_pages_requested);
                break;
            }
            state.step = PageStep::HasNext(next.clone());
            debug!("{}", state.step);

            if Instant::now() + self.options.page_delay >= deadline {
                warn!("Time budget exhausted before page {}", state.current_page + 1);
                state.stopped_early = true;
                break;
            }
            tokio::time::sleep(self.options.page_delay).await;

            state.step = PageStep::AwaitingPage(state.current_page + 1);
            let fetched =
                tokio::time::timeout_at(deadline, self.fetcher.fetch(&next, Some(&state.document.url)))
                    .await;
            match fetched {
                Ok(Ok(html)) => {
                    self.stats.increment_info(InfoType::PageFetched);
                    state.current_page += 1;
                    state.document = DocumentContext { url: next, html };
                    state.step = PageStep::FetchedPage(state.current_page);
                }
                Ok(Err(e)) => {
                    let error = ExtractionError::from(e);
                    warn!("Stopping crawl at page {}: {}", state.current_page + 1, error);
                    update_error_stats(&self.stats, &error);
                    state.stopped_early = true;
                    break;
                }
                Err(_) => {
                    let error = ExtractionError::PageLoadTimeout(self.options.budget);
                    warn!("Stopping crawl at page {}: {}", state.current_page + 1, error);
                    update_error_stats(&self.stats, &error);
                    state.stopped_early = true;
                    break;
                }
            }
        }

        Ok(finish(state, filters))
    }
}

fn finish(state: CrawlState, filters: &ListFilters) -> ListExtraction {
    let products = refine(state.records, filters);
    info!(
        "Crawled {} page(s): {} found, {} after filters",
        state.current_page,
        state.total_found,
        products.len()
    );
    ListExtraction {
        total_filtered: products.len(),
        products,
        total_found: state.total_found,
        pages_crawled: state.current_page,
        filters: filters.clone(),
        extracted_at: Utc::now(),
        stopped_early: state.stopped_early,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::error_handling::FetchError;

    const BASE: &str = "https://www.amazon.com/s?k=lamp";

    fn page_url(n: u32) -> String {
        if n == 1 {
            BASE.to_string()
        } else {
            format!("{}&page={}", BASE, n)
        }
    }

    fn listing_html(asins: &[&str], next_page: Option<u32>) -> String {
        let cards: String = asins
            .iter()
            .map(|asin| {
                format!(
                    r#"<div data-component-type="s-search-result" data-asin="{asin}">
                        <h2><a class="a-link-normal" href="/x/dp/{asin}"><span>Lamp {asin}</span></a></h2>
                        <span class="a-size-base s-underline-text">120</span>
                    </div>"#
                )
            })
            .collect();
        let next = next_page
            .map(|n| format!(r#"<a class="s-pagination-next" href="/s?k=lamp&amp;page={}">Next</a>"#, n))
            .unwrap_or_default();
        format!("<html><body>{}{}</body></html>", cards, next)
    }

    /// Serves canned pages and records every request with its referer.
    #[derive(Default)]
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<(String, Option<String>)>>,
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &Url, referer: Option<&Url>) -> Result<String, FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), referer.map(Url::to_string)));
            self.pages.get(url.as_str()).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    fn crawler(fetcher: Arc<ScriptedFetcher>, max_pages: u32) -> PaginationCrawler<ScriptedFetcher> {
        PaginationCrawler::new(
            fetcher,
            Arc::new(ExtractionRules::default()),
            Arc::new(ProcessingStats::new()),
            CrawlOptions {
                max_pages,
                page_delay: Duration::from_millis(1),
                budget: Duration::from_secs(10),
            },
        )
    }

    fn first_page(html: String) -> DocumentContext {
        DocumentContext {
            url: Url::parse(BASE).unwrap(),
            html,
        }
    }

    #[tokio::test]
    async fn test_stops_when_next_control_absent() {
        let mut fetcher = ScriptedFetcher::default();
        fetcher.pages.insert(page_url(2), listing_html(&["B0LAMP0002"], Some(3)));
        fetcher.pages.insert(page_url(3), listing_html(&["B0LAMP0003"], None));
        let fetcher = Arc::new(fetcher);

        let result = crawler(Arc::clone(&fetcher), 3)
            .crawl(first_page(listing_html(&["B0LAMP0001"], Some(2))), &ListFilters::default())
            .await
            .unwrap();

        assert_eq!(result.pages_crawled, 3);
        assert_eq!(result.total_found, 3);
        assert!(!result.stopped_early);
        assert_eq!(fetcher.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_page_bound_respected() {
        let mut fetcher = ScriptedFetcher::default();
        for n in 2..=5 {
            fetcher.pages.insert(page_url(n), listing_html(&["B0LAMP0009"], Some(n + 1)));
        }
        let fetcher = Arc::new(fetcher);

        let result = crawler(Arc::clone(&fetcher), 2)
            .crawl(first_page(listing_html(&["B0LAMP0001"], Some(2))), &ListFilters::default())
            .await
            .unwrap();

        assert_eq!(result.pages_crawled, 2);
        assert!(!result.stopped_early);
        assert_eq!(fetcher.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_budget_bounds_first_page_parse() {
        let asins: Vec<String> = (0..5000).map(|i| format!("B0BIG{:05}", i)).collect();
        let asins: Vec<&str> = asins.iter().map(String::as_str).collect();
        let fetcher = Arc::new(ScriptedFetcher::default());
        let crawler = PaginationCrawler::new(
            Arc::clone(&fetcher),
            Arc::new(ExtractionRules::default()),
            Arc::new(ProcessingStats::new()),
            CrawlOptions {
                max_pages: 2,
                page_delay: Duration::from_millis(1),
                budget: Duration::ZERO,
            },
        );

        let result = crawler
            .crawl(first_page(listing_html(&asins, Some(2))), &ListFilters::default())
            .await;

        assert!(matches!(result, Err(ExtractionError::PageLoadTimeout(_))));
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_partial_results() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let result = crawler(Arc::clone(&fetcher), 5)
            .crawl(
                first_page(listing_html(&["B0LAMP0001", "B0LAMP0002"], Some(2))),
                &ListFilters::default(),
            )
            .await
            .unwrap();

        assert!(result.stopped_early);
        assert_eq!(result.pages_crawled, 1);
        assert_eq!(result.total_filtered, 2);
        let indices: Vec<_> = result.products.iter().map(|p| p.source_index).collect();
        assert_eq!(indices, vec![Some(0), Some(1)]);
    }

    #[tokio::test]
    async fn test_pagination_sends_previous_page_as_referer() {
        let mut fetcher = ScriptedFetcher::default();
        fetcher.pages.insert(page_url(2), listing_html(&["B0LAMP0002"], None));
        let fetcher = Arc::new(fetcher);

        crawler(Arc::clone(&fetcher), 3)
            .crawl(first_page(listing_html(&["B0LAMP0001"], Some(2))), &ListFilters::default())
            .await
            .unwrap();

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests[0].0, page_url(2));
        assert_eq!(requests[0].1.as_deref(), Some(BASE));
    }

    #[tokio::test]
    async fn test_duplicate_cards_across_pages_deduplicated() {
        let mut fetcher = ScriptedFetcher::default();
        fetcher.pages.insert(page_url(2), listing_html(&["B0LAMP0001"], None));
        let fetcher = Arc::new(fetcher);

        let result = crawler(fetcher, 3)
            .crawl(first_page(listing_html(&["B0LAMP0001"], Some(2))), &ListFilters::default())
            .await
            .unwrap();

        assert_eq!(result.total_found, 2);
        assert_eq!(result.total_filtered, 1);
        assert_eq!(result.products[0].source_index, Some(1));
    }

    #[tokio::test]
    async fn test_non_listing_first_page_rejected() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let result = PaginationCrawler::new(
            fetcher,
            Arc::new(ExtractionRules::default()),
            Arc::new(ProcessingStats::new()),
            CrawlOptions {
                max_pages: 2,
                page_delay: Duration::from_millis(1),
                budget: Duration::from_secs(10),
            },
        )
        .crawl(
            DocumentContext {
                url: Url::parse("http://127.0.0.1/about").unwrap(),
                html: "<p>About us</p>".to_string(),
            },
            &ListFilters::default(),
        )
        .await;
        assert!(matches!(
            result,
            Err(ExtractionError::NotApplicablePage { expected: "listing", .. })
        ));
    }
}
