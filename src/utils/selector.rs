//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses a CSS selector, logging and skipping it when malformed.
///
/// Selector chains come from configuration tables, so a bad entry must not
/// abort extraction. The caller treats `None` as "this selector matched
/// nothing" and moves on to the next candidate.
///
/// # Arguments
///
/// * `selector_str` - The CSS selector string to parse
///
/// # Returns
///
/// The parsed `Selector`, or `None` if parsing fails.
pub fn parse_selector_with_fallback(selector_str: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::warn!(
                "Skipping malformed CSS selector '{}': {}",
                selector_str,
                e
            );
            None
        }
    }
}

/// Parses a CSS selector that must succeed (for compile-time constants).
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}
