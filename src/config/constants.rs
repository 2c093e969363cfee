//! Configuration constants.
//!
//! Timeouts, collection caps and setting bounds used throughout the crate.

use std::time::Duration;

/// Aggregate budget for parsing and assembling one product detail page.
pub const DETAIL_PAGE_TIMEOUT: Duration = Duration::from_secs(30);
/// Aggregate budget for a whole list extraction, pagination included.
pub const LIST_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);
/// Per-request HTTP timeout in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 15;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Marketplace host used when building clean affiliate links.
pub const DEFAULT_MARKETPLACE_DOMAIN: &str = "amazon.com";

// Collection caps
/// Feature bullets kept per record
pub const MAX_FEATURES: usize = 10;
/// Reviews kept per record
pub const MAX_REVIEWS: usize = 10;
/// Number of description fragments joined into the description field
pub const MAX_DESCRIPTION_PARTS: usize = 3;

// Length bounds (exclusive) applied after text cleaning
/// Length floor for a feature bullet
pub const FEATURE_MIN_LEN: usize = 10;
/// Length cap for a feature bullet
pub const FEATURE_MAX_LEN: usize = 300;
/// Length cap for a specification key
pub const SPEC_KEY_MAX_LEN: usize = 100;
/// Length cap for a specification value
pub const SPEC_VALUE_MAX_LEN: usize = 200;
/// Length floor for a specification key
pub const SPEC_KEY_MIN_LEN: usize = 2;
/// Length floor for a specification value
pub const SPEC_VALUE_MIN_LEN: usize = 1;
/// Length floor for a description fragment
pub const DESCRIPTION_MIN_LEN: usize = 10;
/// Length cap for a description fragment
pub const DESCRIPTION_MAX_LEN: usize = 1000;
/// Length cap for a fallback description
pub const DESCRIPTION_FALLBACK_MAX_LEN: usize = 500;
/// Length floor for a review body
pub const REVIEW_CONTENT_MIN_LEN: usize = 10;
/// Length cap for a review body
pub const REVIEW_CONTENT_MAX_LEN: usize = 2000;
/// Length cap for a color label
pub const COLOR_MAX_LEN: usize = 50;
/// Length cap for a size label
pub const SIZE_MAX_LEN: usize = 30;
/// Length cap for a style, pattern or material label
pub const VARIANT_MAX_LEN: usize = 50;
/// Length floor for an unrecognised variant label
pub const OTHER_VARIANT_MIN_LEN: usize = 2;

/// Characters of the title used in a product export filename when no ASIN exists
pub const FILENAME_TITLE_CHARS: usize = 20;

// Setting bounds (inclusive)
/// Fewest pages a list crawl may be limited to
pub const MIN_PAGES: u32 = 1;
/// Most pages a list crawl may load
pub const MAX_PAGES: u32 = 20;
/// Shortest delay between page fetches
pub const MIN_PAGE_DELAY_SECS: u64 = 1;
/// Longest delay between page fetches
pub const MAX_PAGE_DELAY_SECS: u64 = 10;
/// Shortest delay between batch items
pub const MIN_BATCH_INTERVAL_SECS: u64 = 1;
/// Longest delay between batch items
pub const MAX_BATCH_INTERVAL_SECS: u64 = 10;
/// Most retries allowed per batch item
pub const MAX_RETRIES_LIMIT: u32 = 3;
/// Highest star rating
pub const MAX_RATING: f64 = 5.0;

/// Maximum error message length kept in a batch failure entry
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// HTTP status codes (for clarity and consistency)
/// 429 Too Many Requests
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
