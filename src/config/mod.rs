//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, caps, setting bounds)
//! - Browser request header values
//! - Settings, selector tables and pattern tables
//! - CLI option types and parsing

mod cli;
mod constants;
mod headers;
mod patterns;
mod selectors;
mod types;

// Re-export all constants
pub use cli::{Command, Opt};
pub use constants::*;
pub use headers::*;
pub use patterns::{CompiledPatterns, PatternTable};
pub use selectors::{DetailSelectors, ListingSelectors, SelectorTable};
pub use types::{Config, ListFilters, LogFormat, LogLevel, Settings, SortBy};
