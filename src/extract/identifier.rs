//! Product identifier (ASIN) extraction.
//!
//! Strategies are tried in order: a `data-asin` attribute, the page URL, a
//! hidden form input, a meta tag, the canonical link and finally inline
//! script data. Every candidate is uppercased and must be exactly ten
//! alphanumeric characters to be accepted.

use std::sync::LazyLock;

use regex::Regex;

use super::PageContext;
use crate::error_handling::FieldError;
use crate::resolver::{resolve, select_all_groups, SelectorChain};
use crate::utils::compile_regex_unsafe;

static ASIN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"^[A-Z0-9]{10}$", "ASIN_RE"));

/// URL shapes carrying an identifier, most specific first.
static URL_ASIN_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/dp/([A-Z0-9]{10})(?:[/?#]|$)",
        r"(?i)/gp/product/([A-Z0-9]{10})(?:[/?#]|$)",
        r"(?i)/product/([A-Z0-9]{10})(?:[/?#]|$)",
        r"(?i)[?&]asin=([A-Z0-9]{10})(?:[&#]|$)",
    ]
    .iter()
    .map(|p| compile_regex_unsafe(p, "URL_ASIN_RES"))
    .collect()
});

/// A bare path segment; only accepted when it looks like a real ASIN or ISBN-10.
static BARE_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r"/([A-Za-z0-9]{10})(?:[/?#]|$)", "BARE_SEGMENT_RE")
});
static BARE_ASIN_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"^(?:B0[A-Z0-9]{8}|\d{9}[\dX])$", "BARE_ASIN_SHAPE_RE"));

static SCRIPT_ASIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r#""asin"\s*:\s*"([A-Za-z0-9]{10})""#, "SCRIPT_ASIN_RE")
});

/// True when `asin` is exactly ten uppercase alphanumeric characters.
pub fn is_valid_asin(asin: &str) -> bool {
    ASIN_RE.is_match(asin)
}

/// Uppercases and validates a candidate identifier.
pub fn normalize_asin(candidate: &str) -> Option<String> {
    let upper = candidate.trim().to_ascii_uppercase();
    is_valid_asin(&upper).then_some(upper)
}

/// Derives an identifier from a product URL.
///
/// Recognises `/dp/X`, `/gp/product/X`, `/product/X` and an `asin=X` query
/// parameter, then a bare ten-character path segment shaped like an ASIN.
pub fn asin_from_url(url: &str) -> Option<String> {
    for re in URL_ASIN_RES.iter() {
        if let Some(found) = re.captures(url).and_then(|c| c.get(1)) {
            if let Some(asin) = normalize_asin(found.as_str()) {
                return Some(asin);
            }
        }
    }
    BARE_SEGMENT_RE
        .captures_iter(url)
        .filter_map(|c| c.get(1))
        .filter_map(|m| normalize_asin(m.as_str()))
        .find(|asin| BARE_ASIN_SHAPE_RE.is_match(asin))
}

fn from_attribute(page: &PageContext<'_>, chain: &SelectorChain, attr: &str) -> Option<String> {
    resolve(page.root, chain, Some(attr)).and_then(|v| normalize_asin(&v))
}

fn from_scripts(page: &PageContext<'_>) -> Option<String> {
    static SCRIPT_CHAIN: LazyLock<SelectorChain> =
        LazyLock::new(|| SelectorChain::from(&["script"][..]));
    select_all_groups(page.root, &SCRIPT_CHAIN)
        .into_iter()
        .filter_map(|script| {
            let body: String = script.text().collect();
            SCRIPT_ASIN_RE
                .captures(&body)
                .and_then(|c| c.get(1))
                .and_then(|m| normalize_asin(m.as_str()))
        })
        .next()
}

/// Extracts the page's identifier; empty when no strategy yields a valid one.
pub fn asin(page: &PageContext<'_>) -> Result<String, FieldError> {
    let selectors = &page.rules.selectors.detail;
    let found = from_attribute(page, &selectors.asin_attribute, "data-asin")
        .or_else(|| asin_from_url(page.url.as_str()))
        .or_else(|| from_attribute(page, &selectors.asin_input, "value"))
        .or_else(|| from_attribute(page, &selectors.asin_meta, "content"))
        .or_else(|| {
            resolve(page.root, &selectors.canonical_link, Some("href"))
                .and_then(|href| asin_from_url(&href))
        })
        .or_else(|| from_scripts(page));
    Ok(found.unwrap_or_default())
}

/// Extracts the identifier of a listing card from its `data-asin` or its link.
pub fn card_asin(page: &PageContext<'_>) -> Result<String, FieldError> {
    if let Some(asin) = page
        .root
        .value()
        .attr("data-asin")
        .and_then(normalize_asin)
    {
        return Ok(asin);
    }
    let link = resolve(page.root, &page.rules.selectors.listing.item_link, Some("href"));
    Ok(link
        .and_then(|href| asin_from_url(&href))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionRules;
    use scraper::Html;
    use url::Url;

    fn extract(html: &str, url: &str) -> String {
        let document = Html::parse_document(html);
        let url = Url::parse(url).expect("url");
        let rules = ExtractionRules::default();
        let page = PageContext::new(&document, &url, &rules);
        asin(&page).expect("asin never fails")
    }

    #[test]
    fn test_is_valid_asin() {
        assert!(is_valid_asin("B08N5WRWNW"));
        assert!(is_valid_asin("0306406152"));
        assert!(!is_valid_asin("b08n5wrwnw"));
        assert!(!is_valid_asin("B08N5WRWN"));
        assert!(!is_valid_asin("B08N5WRWNW1"));
        assert!(!is_valid_asin(""));
    }

    #[test]
    fn test_asin_from_url_patterns() {
        assert_eq!(
            asin_from_url("https://www.amazon.com/Echo-Dot/dp/B08N5WRWNW/ref=sr_1_1"),
            Some("B08N5WRWNW".to_string())
        );
        assert_eq!(
            asin_from_url("https://www.amazon.com/gp/product/b07xjk9xyz?th=1"),
            Some("B07XJK9XYZ".to_string())
        );
        assert_eq!(
            asin_from_url("https://www.amazon.com/product/B01ABCDEFG"),
            Some("B01ABCDEFG".to_string())
        );
        assert_eq!(
            asin_from_url("https://www.amazon.com/x?ASIN=B00TEST123&tag=a"),
            Some("B00TEST123".to_string())
        );
        assert_eq!(
            asin_from_url("https://www.amazon.com/Some-Book/0306406152/"),
            Some("0306406152".to_string())
        );
    }

    #[test]
    fn test_asin_from_url_rejects_words() {
        assert_eq!(asin_from_url("https://www.amazon.com/electronic/deals"), None);
        assert_eq!(asin_from_url("https://www.amazon.com/s?k=headphones"), None);
        assert_eq!(asin_from_url("https://www.amazon.com/dp/B08N5WRWNWX"), None);
    }

    #[test]
    fn test_asin_prefers_data_attribute() {
        let html = r#"<div data-asin="b0attr0001"></div>"#;
        assert_eq!(
            extract(html, "https://www.amazon.com/dp/B0URL00002"),
            "B0ATTR0001"
        );
    }

    #[test]
    fn test_asin_skips_invalid_attribute_and_uses_url() {
        let html = r#"<div data-asin="short"></div>"#;
        assert_eq!(
            extract(html, "https://www.amazon.com/dp/B0URL00002"),
            "B0URL00002"
        );
    }

    #[test]
    fn test_asin_from_input_meta_canonical_and_script() {
        let base = "https://www.amazon.com/some-page";
        assert_eq!(
            extract(r#"<input name="ASIN" value="B0INPUT001">"#, base),
            "B0INPUT001"
        );
        assert_eq!(
            extract(r#"<meta name="asin" content="B0META0001">"#, base),
            "B0META0001"
        );
        assert_eq!(
            extract(
                r#"<link rel="canonical" href="https://www.amazon.com/x/dp/B0CANON001">"#,
                base
            ),
            "B0CANON001"
        );
        assert_eq!(
            extract(
                r#"<script>var data = {"asin" : "B0SCRIPT01", "price": 3};</script>"#,
                base
            ),
            "B0SCRIPT01"
        );
    }

    #[test]
    fn test_asin_empty_when_absent() {
        assert_eq!(extract("<p>nothing</p>", "https://www.amazon.com/s?k=x"), "");
    }
}
