//! Command-line options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::constants::{DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS};
use crate::config::types::{read_json_file, Config, LogFormat, LogLevel, Settings, SortBy};
use crate::error_handling::ConfigError;

/// Command-line options for the `listing_harvest` binary.
#[derive(Debug, Parser)]
#[command(
    name = "listing_harvest",
    version,
    about = "Extracts structured product records from listing and detail pages"
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value = "plain", global = true)]
    pub log_format: LogFormat,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Settings JSON file (filters, pacing, retries, affiliate tag)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Selector table JSON file overriding the built-in chains
    #[arg(long, global = true)]
    pub selectors: Option<PathBuf>,

    /// Pattern table JSON file overriding the built-in heuristics
    #[arg(long, global = true)]
    pub patterns: Option<PathBuf>,

    /// Associate tag added to exported product links
    #[arg(long, global = true)]
    pub affiliate_tag: Option<String>,

    /// Directory export files are written to
    #[arg(long, default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operation to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract one product detail page
    Product {
        /// Product page URL
        url: String,
    },
    /// Extract a search/category result list, following pagination
    List {
        /// First result page URL
        url: String,
        /// Maximum result pages to crawl (1-20)
        #[arg(long)]
        max_pages: Option<u32>,
        /// Delay before each pagination fetch, in seconds (1-10)
        #[arg(long)]
        page_delay: Option<u64>,
        /// Minimum review count (sales proxy)
        #[arg(long)]
        min_sales: Option<u32>,
        /// Minimum star rating
        #[arg(long)]
        min_rating: Option<f64>,
        /// Minimum review count
        #[arg(long)]
        min_reviews: Option<u32>,
        /// Brand/title substring filter
        #[arg(long)]
        brand: Option<String>,
        /// Sort order
        #[arg(long, value_enum)]
        sort_by: Option<SortBy>,
        /// Also write a links file (one product URL per line)
        #[arg(long)]
        links: bool,
    },
    /// Collect product pages listed in a file, one URL per line (`-` for stdin)
    Batch {
        /// File of product URLs
        file: PathBuf,
        /// Delay between items, in seconds (1-10)
        #[arg(long)]
        interval: Option<u64>,
        /// Retries per item after the first attempt (0-3)
        #[arg(long)]
        max_retries: Option<u32>,
    },
}

impl Opt {
    /// Builds the library configuration from files and flags.
    ///
    /// Flags take precedence over the settings file; out-of-range values are
    /// clamped with a warning rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a referenced JSON file cannot be read or parsed,
    /// or if the pattern table does not compile.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut settings = match &self.settings {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };
        if let Some(tag) = &self.affiliate_tag {
            settings.affiliate_tag = Some(tag.clone());
        }

        match &self.command {
            Command::Product { .. } => {}
            Command::List {
                max_pages,
                page_delay,
                min_sales,
                min_rating,
                min_reviews,
                brand,
                sort_by,
                ..
            } => {
                if let Some(v) = max_pages {
                    settings.max_pages = *v;
                }
                if let Some(v) = page_delay {
                    settings.page_delay_seconds = *v;
                }
                if let Some(v) = min_sales {
                    settings.min_sales = *v;
                }
                if let Some(v) = min_rating {
                    settings.min_rating = *v;
                }
                if let Some(v) = min_reviews {
                    settings.min_reviews = *v;
                }
                if let Some(v) = brand {
                    settings.brand_filter = v.clone();
                }
                if let Some(v) = sort_by {
                    settings.sort_by = *v;
                }
            }
            Command::Batch {
                interval,
                max_retries,
                ..
            } => {
                if let Some(v) = interval {
                    settings.batch_interval_seconds = *v;
                }
                if let Some(v) = max_retries {
                    settings.max_retries = *v;
                }
            }
        }

        let config = Config {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent.clone(),
            settings: settings.clamped(),
            selectors: match &self.selectors {
                Some(path) => read_json_file(path)?,
                None => Default::default(),
            },
            patterns: match &self.patterns {
                Some(path) => read_json_file(path)?,
                None => Default::default(),
            },
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }
}
