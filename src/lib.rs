//! listing_harvest library: product record extraction from listing and detail pages
//!
//! This library reads structured product records out of e-commerce product
//! detail pages and search/category result listings. Field values are resolved
//! through prioritized selector chains, so a markup change degrades a single
//! field to its empty value instead of failing the record. Listings are crawled
//! page by page up to a bound, and queues of product URLs are collected in
//! paced batches that can be paused, resumed or stopped.
//!
//! # Example
//!
//! ```no_run
//! use listing_harvest::{Config, Harvester, Settings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     settings: Settings {
//!         max_pages: 3,
//!         min_rating: 4.0,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let harvester = Harvester::new(config)?;
//! let list = harvester.extract_list("https://www.amazon.com/s?k=desk+lamp").await?;
//! println!("{} of {} products kept from {} pages",
//!          list.total_filtered, list.total_found, list.pages_crawled);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod app;
pub mod assemble;
pub mod batch;
pub mod config;
pub mod crawl;
pub mod error_handling;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod initialization;
pub mod models;
pub mod resolver;
mod run;
mod utils;

// Re-export public API
pub use batch::{BatchControl, BatchJob, BatchProgress, BatchState, FailedItem, ProgressCallback};
pub use config::{Config, ListFilters, LogFormat, LogLevel, Settings, SortBy};
pub use error_handling::{ExtractionError, FetchError, FieldError, ProcessingStats};
pub use fetch::{HttpFetcher, PageFetcher};
pub use models::{ListExtraction, ProductRecord};
pub use run::Harvester;
