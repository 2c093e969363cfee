//! Selector resolution.
//!
//! Field values are looked up through ordered [`SelectorChain`]s: each selector
//! is tried in declared order and the first one that yields a non-empty value
//! wins. Malformed selectors never abort a lookup; they are logged and treated
//! as a miss so a chain keeps working when a markup variant lacks a structure.

mod chain;

pub use chain::SelectorChain;

use std::collections::HashSet;

use scraper::{ElementRef, Html};

use crate::utils::parse_selector_with_fallback;

/// Returns the trimmed text of an element with internal whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the trimmed value of `attr` on `element`, if present and non-empty.
pub fn element_attr(element: ElementRef<'_>, attr: &str) -> Option<String> {
    element
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolves the first non-empty value for `chain` beneath `root`.
///
/// For every selector in declared order, matching elements are visited in
/// document order; the first element whose text (or `attr`, when given) is
/// non-empty after trimming decides the result. Later selectors are never
/// consulted once an earlier one has produced a value, even if they would
/// also match.
///
/// # Arguments
///
/// * `root` - Element to search beneath (use [`resolve_in`] for a whole document)
/// * `chain` - Ordered selector candidates
/// * `attr` - Attribute to read instead of text content
///
/// # Returns
///
/// `Some(value)` for the first hit, `None` when every selector misses.
pub fn resolve(root: ElementRef<'_>, chain: &SelectorChain, attr: Option<&str>) -> Option<String> {
    for selector_str in chain.iter() {
        let Some(selector) = parse_selector_with_fallback(selector_str) else {
            continue;
        };
        for element in root.select(&selector) {
            let value = match attr {
                Some(name) => element_attr(element, name),
                None => Some(element_text(element)).filter(|t| !t.is_empty()),
            };
            if value.is_some() {
                return value;
            }
        }
    }
    None
}

/// Resolves `chain` against the whole document.
pub fn resolve_in(document: &Html, chain: &SelectorChain, attr: Option<&str>) -> Option<String> {
    resolve(document.root_element(), chain, attr)
}

/// Returns the elements of the first selector in `chain` that matches anything.
///
/// Used where alternative container layouts are mutually exclusive, e.g. review
/// blocks: once one layout is recognised the others are ignored.
pub fn select_first_group<'a>(root: ElementRef<'a>, chain: &SelectorChain) -> Vec<ElementRef<'a>> {
    for selector_str in chain.iter() {
        let Some(selector) = parse_selector_with_fallback(selector_str) else {
            continue;
        };
        let found: Vec<_> = root.select(&selector).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Returns the elements of every selector in `chain`, concatenated in declared order.
///
/// Collection fields whose data lives in structurally different containers
/// (table rows, list items, key-value blocks) merge all groups and clean up
/// afterwards. An element matched by several selectors is returned once, at
/// the position of its first match.
pub fn select_all_groups<'a>(root: ElementRef<'a>, chain: &SelectorChain) -> Vec<ElementRef<'a>> {
    let mut seen = HashSet::new();
    chain
        .iter()
        .filter_map(|s| parse_selector_with_fallback(s))
        .flat_map(|selector| root.select(&selector).collect::<Vec<_>>())
        .filter(|element| seen.insert(element.id()))
        .collect()
}

/// Returns true when any selector in `chain` matches at least one element.
pub fn any_match(root: ElementRef<'_>, chain: &SelectorChain) -> bool {
    chain
        .iter()
        .filter_map(|s| parse_selector_with_fallback(s))
        .any(|selector| root.select(&selector).next().is_some())
}
