//! Record assembly.
//!
//! Runs the field schema against a parsed document, absorbing per-field
//! failures: a failing or panicking extractor is logged, counted and leaves
//! its field at the empty value while every other field is still read.
//! Document-level problems (wrong page type, no identifier) are the only
//! errors that escape.

mod schema;

pub use schema::{apply_schema, FieldRule, Schema, CARD_SCHEMA, DETAIL_SCHEMA};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use scraper::Html;
use url::Url;

use crate::error_handling::{
    update_error_stats, ExtractionError, FieldError, InfoType, ProcessingStats, WarningType,
};
use crate::extract::{
    asin_from_url, is_listing_page, is_product_page, listing_cards, next_page_url,
    ExtractionRules, PageContext,
};
use crate::fetch::PageFetcher;
use crate::models::{PageType, ProductRecord};

/// Logs and counts the fields that fell back to their empty value.
fn report_field_failures(
    url: &Url,
    failures: Vec<(&'static str, FieldError)>,
    stats: &ProcessingStats,
) {
    for (field, source) in failures {
        let error = ExtractionError::FieldExtraction { field, source };
        warn!("{} ({})", error, url);
        update_error_stats(stats, &error);
        stats.increment_warning(WarningType::FieldFellBackToDefault);
    }
}

/// Assembles a product record from a detail page document.
///
/// # Errors
///
/// * `NotApplicablePage` - the document is not a product detail page
/// * `MissingIdentifier` - no identifier on the page and none derivable from the URL
pub fn assemble_detail_page(
    html: &str,
    url: &Url,
    rules: &ExtractionRules,
    stats: &ProcessingStats,
) -> Result<ProductRecord, ExtractionError> {
    let document = Html::parse_document(html);
    let page = PageContext::new(&document, url, rules);
    if !is_product_page(&page) {
        return Err(ExtractionError::NotApplicablePage {
            expected: "product",
            url: url.to_string(),
        });
    }

    let mut record = ProductRecord {
        url: url.to_string(),
        extracted_at: Utc::now(),
        page_type: PageType::Product,
        ..Default::default()
    };
    let failures = apply_schema(&DETAIL_SCHEMA, &page, &mut record);
    report_field_failures(url, failures, stats);

    if !record.has_valid_asin() {
        match asin_from_url(url.as_str()) {
            Some(asin) => {
                debug!("Identifier for {} re-derived from URL", url);
                stats.increment_info(InfoType::IdentifierRederived);
                record.asin = asin;
            }
            None => {
                return Err(ExtractionError::MissingIdentifier {
                    url: url.to_string(),
                })
            }
        }
    }

    if record.title.is_empty() {
        stats.increment_warning(WarningType::MissingTitle);
    }
    if record.current_price.is_empty() && record.price_range.is_none() {
        stats.increment_warning(WarningType::MissingPrice);
    }
    if record.rating.is_none() {
        stats.increment_warning(WarningType::MissingRating);
    }
    Ok(record)
}

/// Records and pagination state read from one listing page.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// One record per result card, in page order
    pub records: Vec<ProductRecord>,
    /// Absolute URL of the next page, when a next control is present
    pub next_url: Option<Url>,
    /// Whether the document looked like a listing at all
    pub is_listing: bool,
}

/// Assembles records for every result card on a listing page.
///
/// `start_index` is the number of cards seen on earlier pages; each record's
/// `source_index` continues from it. Cards without an identifier are kept
/// here and dropped by the filter stage.
pub fn assemble_listing_page(
    html: &str,
    url: &Url,
    rules: &ExtractionRules,
    stats: &ProcessingStats,
    start_index: usize,
) -> ListingPage {
    let document = Html::parse_document(html);
    let page = PageContext::new(&document, url, rules);
    let extracted_at = Utc::now();

    let records = listing_cards(&page)
        .into_iter()
        .enumerate()
        .map(|(offset, card)| {
            let mut record = ProductRecord {
                extracted_at,
                page_type: PageType::List,
                source_index: Some(start_index + offset),
                ..Default::default()
            };
            let failures = apply_schema(&CARD_SCHEMA, &page.scoped(card), &mut record);
            report_field_failures(url, failures, stats);
            record
        })
        .collect();

    ListingPage {
        records,
        next_url: next_page_url(&page),
        is_listing: is_listing_page(&page),
    }
}

/// Runs [`assemble_detail_page`] on the blocking pool.
pub async fn assemble_detail_blocking(
    html: String,
    url: Url,
    rules: Arc<ExtractionRules>,
    stats: Arc<ProcessingStats>,
) -> Result<ProductRecord, ExtractionError> {
    tokio::task::spawn_blocking(move || assemble_detail_page(&html, &url, &rules, &stats))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
}

/// Runs [`assemble_listing_page`] on the blocking pool.
pub async fn assemble_listing_blocking(
    html: String,
    url: Url,
    rules: Arc<ExtractionRules>,
    stats: Arc<ProcessingStats>,
    start_index: usize,
) -> Result<ListingPage, ExtractionError> {
    tokio::task::spawn_blocking(move || {
        assemble_listing_page(&html, &url, &rules, &stats, start_index)
    })
    .await
    .map_err(|e| ExtractionError::Task(e.to_string()))
}

/// Bounds `work` by `budget`, mapping expiry to `PageLoadTimeout`.
///
/// On expiry the in-flight work is abandoned and its result discarded.
pub async fn with_budget<T>(
    budget: Duration,
    work: impl Future<Output = Result<T, ExtractionError>>,
) -> Result<T, ExtractionError> {
    tokio::time::timeout(budget, work)
        .await
        .map_err(|_| ExtractionError::PageLoadTimeout(budget))?
}

/// Fetches a detail page and assembles its record within `budget`.
///
/// The budget covers both the fetch and the parse.
pub async fn fetch_product<F: PageFetcher>(
    fetcher: &F,
    url: &Url,
    rules: Arc<ExtractionRules>,
    stats: Arc<ProcessingStats>,
    budget: Duration,
) -> Result<ProductRecord, ExtractionError> {
    with_budget(budget, async {
        let html = fetcher.fetch(url, None).await?;
        stats.increment_info(InfoType::PageFetched);
        assemble_detail_blocking(html, url.clone(), rules, stats).await
    })
    .await
}
