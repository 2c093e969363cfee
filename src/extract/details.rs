//! Features, specifications and description.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::text::{char_len, clean_text};
use super::PageContext;
use crate::config::{
    DESCRIPTION_FALLBACK_MAX_LEN, DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, FEATURE_MAX_LEN,
    FEATURE_MIN_LEN, MAX_DESCRIPTION_PARTS, MAX_FEATURES, SPEC_KEY_MAX_LEN, SPEC_KEY_MIN_LEN,
    SPEC_VALUE_MAX_LEN, SPEC_VALUE_MIN_LEN,
};
use crate::error_handling::FieldError;
use crate::resolver::element_text;
use crate::utils::parse_selector_unsafe;

static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td, th", "CELL_SELECTOR"));

/// Keeps the first occurrence of each string.
fn unique(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Feature bullets, cleaned, filtered and capped.
pub fn features(page: &PageContext<'_>) -> Result<Vec<String>, FieldError> {
    let candidates = page
        .all(&page.detail().features)
        .into_iter()
        .map(|el| clean_text(&element_text(el)))
        .filter(|text| {
            let len = char_len(text);
            len > FEATURE_MIN_LEN && len < FEATURE_MAX_LEN && !page.patterns().is_leaky_feature(text)
        });
    Ok(unique(candidates).into_iter().take(MAX_FEATURES).collect())
}

/// Reads one key/value pair from a table row or a "Key: value" list item.
fn spec_pair(element: ElementRef<'_>) -> Option<(String, String)> {
    let cells: Vec<_> = element.select(&CELL_SELECTOR).collect();
    let (key, value) = if cells.len() >= 2 {
        (
            clean_text(&element_text(cells[0])),
            clean_text(&element_text(cells[1])),
        )
    } else {
        let raw = element_text(element);
        let (key, value) = raw.split_once(':')?;
        (clean_text(key), clean_text(value))
    };
    let bounded = !key.is_empty()
        && !value.is_empty()
        && char_len(&key) < SPEC_KEY_MAX_LEN
        && char_len(&value) < SPEC_VALUE_MAX_LEN;
    bounded.then_some((key, value))
}

/// Specification table merged from every known layout.
///
/// A later row with the same key overwrites an earlier one.
pub fn specifications(page: &PageContext<'_>) -> Result<BTreeMap<String, String>, FieldError> {
    let mut specs = BTreeMap::new();
    for element in page.all(&page.detail().specifications) {
        if let Some((key, value)) = spec_pair(element) {
            specs.insert(key, value);
        }
    }
    specs.retain(|key, value| {
        !page.patterns().is_leaky_spec(key, value)
            && char_len(key) > SPEC_KEY_MIN_LEN
            && char_len(value) > SPEC_VALUE_MIN_LEN
    });
    Ok(specs)
}

fn description_parts(
    page: &PageContext<'_>,
    chain: &crate::resolver::SelectorChain,
    max_len: usize,
) -> Vec<String> {
    let parts = page.all(chain).into_iter().map(|el| clean_text(&element_text(el))).filter(|text| {
        let len = char_len(text);
        len > DESCRIPTION_MIN_LEN && len < max_len
    });
    unique(parts)
}

/// Product description: up to three distinct paragraphs joined with a space.
///
/// Falls back to bullet-like blocks only when the primary description area
/// yields nothing.
pub fn description(page: &PageContext<'_>) -> Result<String, FieldError> {
    let mut parts = description_parts(page, &page.detail().description, DESCRIPTION_MAX_LEN);
    if parts.is_empty() {
        parts = description_parts(
            page,
            &page.detail().description_fallback,
            DESCRIPTION_FALLBACK_MAX_LEN,
        );
    }
    parts.truncate(MAX_DESCRIPTION_PARTS);
    Ok(parts.join(" "))
}
