//! High-level entry points: one product, one listing crawl, one batch.

use std::sync::Arc;

use log::info;
use url::Url;

use crate::assemble::fetch_product;
use crate::batch::{BatchCollector, BatchControl, BatchJob, ProgressCallback};
use crate::config::Config;
use crate::crawl::{CrawlOptions, PaginationCrawler};
use crate::error_handling::{ExtractionError, InitializationError, ProcessingStats};
use crate::extract::ExtractionRules;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::initialization::init_client;
use crate::models::{ListExtraction, ProductRecord};

fn parse_target(url: &str) -> Result<Url, ExtractionError> {
    Url::parse(url).map_err(|source| ExtractionError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Runs extractions with one configuration, fetcher and statistics sink.
///
/// # Example
///
/// ```no_run
/// use listing_harvest::{Config, Harvester};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let harvester = Harvester::new(Config::default())?;
/// let record = harvester
///     .extract_product("https://www.amazon.com/dp/B08N5WRWNW")
///     .await?;
/// println!("{} {}", record.asin, record.title);
/// # Ok(())
/// # }
/// ```
pub struct Harvester<F = HttpFetcher> {
    config: Config,
    fetcher: Arc<F>,
    rules: Arc<ExtractionRules>,
    stats: Arc<ProcessingStats>,
}

impl Harvester<HttpFetcher> {
    /// Creates a harvester that fetches pages over HTTP.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or the rule tables are invalid.
    pub fn new(config: Config) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        Self::with_fetcher(config, Arc::new(HttpFetcher::new(client)))
    }
}

impl<F: PageFetcher> Harvester<F> {
    /// Creates a harvester around any document source.
    ///
    /// # Errors
    ///
    /// Fails if the selector or pattern tables are invalid.
    pub fn with_fetcher(config: Config, fetcher: Arc<F>) -> Result<Self, InitializationError> {
        let rules = ExtractionRules::from_config(&config)?;
        Ok(Self {
            config,
            fetcher,
            rules: Arc::new(rules),
            stats: Arc::new(ProcessingStats::new()),
        })
    }

    /// The configuration this harvester runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counters accumulated across every run of this harvester.
    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }

    /// Fetches and extracts one product detail page.
    ///
    /// # Errors
    ///
    /// Returns the fetch, timeout, page-type or identifier failure; a single
    /// attempt is made.
    pub async fn extract_product(&self, url: &str) -> Result<ProductRecord, ExtractionError> {
        let target = parse_target(url)?;
        info!("Extracting product page {}", target);
        fetch_product(
            self.fetcher.as_ref(),
            &target,
            Arc::clone(&self.rules),
            Arc::clone(&self.stats),
            self.config.detail_timeout,
        )
        .await
    }

    /// Crawls a search or category listing starting at `url`.
    ///
    /// Filters, page bound and page delay come from the configured settings;
    /// the whole crawl is bounded by the list timeout.
    ///
    /// # Errors
    ///
    /// Fails only when the first page cannot be loaded or is not a listing.
    pub async fn extract_list(&self, url: &str) -> Result<ListExtraction, ExtractionError> {
        let target = parse_target(url)?;
        let filters = self.config.settings.list_filters();
        let options = CrawlOptions::from_filters(&filters, self.config.list_timeout);
        info!(
            "Crawling listing {} (up to {} page(s))",
            target, options.max_pages
        );
        PaginationCrawler::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.rules),
            Arc::clone(&self.stats),
            options,
        )
        .crawl_url(target, &filters)
        .await
    }

    /// Collects every URL in `urls`, paced and retried per the settings.
    ///
    /// `control` can pause, resume or stop the run from another task. The
    /// returned job holds everything collected, including after a stop.
    pub async fn run_batch(
        &self,
        urls: Vec<String>,
        control: BatchControl,
        on_progress: Option<ProgressCallback>,
    ) -> BatchJob {
        let mut job = BatchJob::from_settings(urls, &self.config.settings);
        BatchCollector::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.rules),
            Arc::clone(&self.stats),
            self.config.detail_timeout,
        )
        .with_control(control)
        .start(&mut job, on_progress)
        .await;
        job
    }
}
