//! Shared helpers.
//!
//! This module provides:
//! - CSS selector parsing with logged fallbacks
//! - Regex compilation for static patterns
//! - Error message sanitization for failure logs

mod pattern;
pub mod sanitize;
mod selector;

pub use pattern::compile_regex_unsafe;
pub use selector::{parse_selector_unsafe, parse_selector_with_fallback};
