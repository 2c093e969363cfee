//! Configuration types.
//!
//! This module defines the user-facing settings object, the library run
//! configuration and the enums shared with the CLI.

use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::constants::*;
use crate::config::patterns::PatternTable;
use crate::config::selectors::SelectorTable;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Sort order applied to filtered list results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Most reviews first (review count is the sales proxy)
    #[default]
    Sales,
    /// Highest rating first
    Rating,
    /// Cheapest first
    Price,
    /// Most expensive first
    PriceDesc,
}

/// User settings, as persisted by the orchestrating front end.
///
/// Field names serialize in camelCase so a settings JSON written by other
/// tooling (`{"minSales": 100, "sortBy": "priceDesc", ...}`) loads directly.
/// Missing keys fall back to [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Minimum review count, used as a sales proxy
    pub min_sales: u32,
    /// Minimum star rating (0.0-5.0)
    pub min_rating: f64,
    /// Minimum review count
    pub min_reviews: u32,
    /// Case-insensitive substring matched against brand or title
    pub brand_filter: String,
    /// Result ordering
    pub sort_by: SortBy,
    /// Maximum number of result pages to crawl (1-20)
    pub max_pages: u32,
    /// Delay before each pagination fetch, in seconds (1-10)
    pub page_delay_seconds: u64,
    /// Delay between batch items, in seconds (1-10)
    pub batch_interval_seconds: u64,
    /// Retries per batch item after the first attempt (0-3)
    pub max_retries: u32,
    /// Associate tag appended to exported product links
    pub affiliate_tag: Option<String>,
    /// Minimum estimated commission for the product check
    pub min_earnings: f64,
    /// Marketplace host used for clean affiliate links
    pub marketplace_domain: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_sales: 0,
            min_rating: 0.0,
            min_reviews: 0,
            brand_filter: String::new(),
            sort_by: SortBy::Sales,
            max_pages: 5,
            page_delay_seconds: 2,
            batch_interval_seconds: 3,
            max_retries: 2,
            affiliate_tag: None,
            min_earnings: 0.0,
            marketplace_domain: DEFAULT_MARKETPLACE_DOMAIN.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if it is not a valid settings object.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        read_json_file(path)
    }

    /// Checks every bounded setting.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` for the first setting outside its bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("minRating", self.min_rating, 0.0, MAX_RATING)?;
        check_range(
            "maxPages",
            f64::from(self.max_pages),
            f64::from(MIN_PAGES),
            f64::from(MAX_PAGES),
        )?;
        check_range(
            "pageDelaySeconds",
            self.page_delay_seconds as f64,
            MIN_PAGE_DELAY_SECS as f64,
            MAX_PAGE_DELAY_SECS as f64,
        )?;
        check_range(
            "batchIntervalSeconds",
            self.batch_interval_seconds as f64,
            MIN_BATCH_INTERVAL_SECS as f64,
            MAX_BATCH_INTERVAL_SECS as f64,
        )?;
        check_range(
            "maxRetries",
            f64::from(self.max_retries),
            0.0,
            f64::from(MAX_RETRIES_LIMIT),
        )?;
        if self.min_earnings.is_nan() || self.min_earnings < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "minEarnings",
                min: 0.0,
                max: f64::MAX,
                value: self.min_earnings,
            });
        }
        Ok(())
    }

    /// Returns a copy with every bounded setting clamped into range.
    ///
    /// Each adjustment is logged at warn level.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        out.min_rating = clamp_logged("minRating", self.min_rating, 0.0, MAX_RATING);
        out.max_pages = clamp_logged("maxPages", self.max_pages, MIN_PAGES, MAX_PAGES);
        out.page_delay_seconds = clamp_logged(
            "pageDelaySeconds",
            self.page_delay_seconds,
            MIN_PAGE_DELAY_SECS,
            MAX_PAGE_DELAY_SECS,
        );
        out.batch_interval_seconds = clamp_logged(
            "batchIntervalSeconds",
            self.batch_interval_seconds,
            MIN_BATCH_INTERVAL_SECS,
            MAX_BATCH_INTERVAL_SECS,
        );
        out.max_retries = clamp_logged("maxRetries", self.max_retries, 0, MAX_RETRIES_LIMIT);
        if self.min_earnings.is_nan() || self.min_earnings < 0.0 {
            warn!("minEarnings {} is invalid, using 0", self.min_earnings);
            out.min_earnings = 0.0;
        }
        out
    }

    /// The list-extraction subset of the settings.
    pub fn list_filters(&self) -> ListFilters {
        ListFilters {
            min_sales: self.min_sales,
            min_rating: self.min_rating,
            min_reviews: self.min_reviews,
            brand_filter: self.brand_filter.clone(),
            sort_by: self.sort_by,
            max_pages: self.max_pages,
            page_delay_seconds: self.page_delay_seconds,
        }
    }

    /// Delay inserted before each pagination fetch.
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_seconds)
    }

    /// Delay inserted between batch items.
    pub fn batch_interval(&self) -> Duration {
        Duration::from_secs(self.batch_interval_seconds)
    }
}

/// Reads and deserializes a JSON configuration file.
pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn clamp_logged<T>(field: &str, value: T, min: T, max: T) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    #[allow(clippy::eq_op)]
    let is_nan = value != value;
    let clamped = if is_nan || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        warn!(
            "{} = {} is outside [{}, {}], using {}",
            field, value, min, max, clamped
        );
    }
    clamped
}

/// Filters applied to a list extraction, echoed back in its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    /// Minimum review count, used as a sales proxy
    pub min_sales: u32,
    /// Minimum star rating
    pub min_rating: f64,
    /// Minimum review count
    pub min_reviews: u32,
    /// Case-insensitive brand/title substring
    pub brand_filter: String,
    /// Result ordering
    pub sort_by: SortBy,
    /// Maximum pages crawled
    pub max_pages: u32,
    /// Delay before each pagination fetch, in seconds
    pub page_delay_seconds: u64,
}

impl Default for ListFilters {
    fn default() -> Self {
        Settings::default().list_filters()
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use listing_harvest::{Config, Settings};
///
/// let config = Config {
///     settings: Settings { max_pages: 3, ..Default::default() },
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// User settings (filters, pacing, retries, affiliate tag)
    pub settings: Settings,

    /// Selector chains for every extracted field
    pub selectors: SelectorTable,

    /// Heuristic pattern tables (image deny list, leak markers, ...)
    pub patterns: PatternTable,

    /// Budget for assembling one detail page
    pub detail_timeout: Duration,

    /// Budget for one list extraction
    pub list_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settings: Settings::default(),
            selectors: SelectorTable::default(),
            patterns: PatternTable::default(),
            detail_timeout: DETAIL_PAGE_TIMEOUT,
            list_timeout: LIST_EXTRACTION_TIMEOUT,
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a setting is out of range, the HTTP
    /// timeout is zero, or a pattern table entry is not a valid regex.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeoutSeconds",
                min: 1.0,
                max: f64::MAX,
                value: 0.0,
            });
        }
        self.settings.validate()?;
        self.patterns.compile()?;
        Ok(())
    }
}
