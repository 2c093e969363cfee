//! Extracted record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ListFilters;
use crate::extract::{is_valid_asin, text::price_value};

/// Which kind of page a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// A single product detail page
    #[default]
    Product,
    /// A result card on a search or category listing
    List,
}

/// Low/high bounds of a price range, as displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound
    pub min: String,
    /// Upper bound
    pub max: String,
}

/// Purchasable variant labels, grouped by dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variants {
    /// Color swatch names
    pub colors: Vec<String>,
    /// Size options
    pub sizes: Vec<String>,
    /// Style options
    pub styles: Vec<String>,
    /// Pattern options
    pub patterns: Vec<String>,
    /// Material options
    pub materials: Vec<String>,
    /// Options from unrecognised variation dimensions
    pub other: Vec<String>,
}

impl Variants {
    /// True when no dimension has any label.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.sizes.is_empty()
            && self.styles.is_empty()
            && self.patterns.is_empty()
            && self.materials.is_empty()
            && self.other.is_empty()
    }
}

/// One customer review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Star rating as displayed ("4.0")
    pub rating: String,
    /// Review headline
    pub title: String,
    /// Review body
    pub content: String,
    /// Reviewer name
    pub author: String,
    /// Review date as displayed
    pub date: String,
    /// Whether the review carries a verified-purchase badge
    pub verified: bool,
    /// Helpful vote count as displayed, "0" when absent
    pub helpful_votes: String,
}

/// Affiliate toolbar data, present only for signed-in associates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateInfo {
    /// True when the affiliate toolbar was found on the page
    pub available: bool,
    /// Commission category
    pub category: String,
    /// Commission rate as displayed ("4.00%")
    pub commission_rate: String,
    /// Associate tracking ID
    pub tracking_id: String,
    /// Associate store ID
    pub store_id: String,
}

/// Structured product data read from a detail page or a listing card.
///
/// Every field has a well-defined empty value so that a record stays usable
/// when individual fields fail to extract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// 10-character product identifier; records without one are not retained
    pub asin: String,
    /// Product title
    pub title: String,
    /// Brand from the byline
    pub brand: String,
    /// Price as displayed, without currency symbol ("1,299.99"); empty when absent
    pub current_price: String,
    /// List price before discount; empty when absent
    pub original_price: String,
    /// Price range shown instead of a single price
    pub price_range: Option<PriceRange>,
    /// Average star rating, 0.0 to 5.0
    pub rating: Option<f64>,
    /// Number of ratings
    pub review_count: u64,
    /// Best-seller badge text
    pub best_seller_rank: String,
    /// Best-seller badge present
    pub is_best_seller: bool,
    /// Availability text ("In Stock")
    pub stock_status: String,
    /// Delivery message
    pub shipping_info: String,
    /// Prime badge present
    pub prime_eligible: bool,
    /// Breadcrumb path joined with " > "
    pub category: String,
    /// Feature bullets
    pub features: Vec<String>,
    /// Specification table rows
    pub specifications: BTreeMap<String, String>,
    /// Product description
    pub description: String,
    /// Variant labels by dimension
    pub variants: Variants,
    /// Product images, high resolution first
    pub images: Vec<String>,
    /// Thumbnail of a listing card
    pub image: String,
    /// Reviews shown on the page
    pub reviews: Vec<Review>,
    /// Affiliate toolbar data
    pub affiliate_info: AffiliateInfo,
    /// Page the record was read from
    pub url: String,
    /// When the record was assembled
    pub extracted_at: DateTime<Utc>,
    /// Kind of page the record came from
    pub page_type: PageType,
    /// Position of a listing card across all crawled pages
    pub source_index: Option<usize>,
}

impl ProductRecord {
    /// True when the record carries a well-formed identifier.
    pub fn has_valid_asin(&self) -> bool {
        is_valid_asin(&self.asin)
    }

    /// Numeric price: current price, else the lower bound of the range, else `0.0`.
    pub fn price_value(&self) -> f64 {
        if !self.current_price.is_empty() {
            return price_value(&self.current_price);
        }
        self.price_range
            .as_ref()
            .map(|range| price_value(&range.min))
            .unwrap_or(0.0)
    }

    /// Numeric rating, `0.0` when absent.
    pub fn rating_value(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Result of crawling a listing: the filtered records plus crawl bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExtraction {
    /// Records that passed the filters, sorted and deduplicated
    pub products: Vec<ProductRecord>,
    /// Cards read across all pages, before filtering
    pub total_found: usize,
    /// Records remaining after filtering
    pub total_filtered: usize,
    /// Pages parsed, including the first
    pub pages_crawled: u32,
    /// Filters applied to the crawl
    pub filters: ListFilters,
    /// When the crawl finished
    pub extracted_at: DateTime<Utc>,
    /// True when a page fetch failed or the time budget ran out before the last page
    pub stopped_early: bool,
}
