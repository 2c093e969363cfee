//! Tests to ensure malformed input never panics.
//!
//! Extraction runs against arbitrary markup, so the public assembly entry
//! points must degrade to empty fields or a typed error on any document.

#![allow(clippy::field_reassign_with_default)]

use listing_harvest::assemble::{assemble_detail_page, assemble_listing_page};
use listing_harvest::extract::ExtractionRules;
use listing_harvest::{Config, ProcessingStats, Settings};
use url::Url;

const GARBAGE: &[&str] = &[
    "",
    "<",
    "<html><body><div id=\"productTitle\">",
    "<span id=\"productTitle\"></span><span class=\"a-price-range\"></span>",
    "<div data-component-type=\"s-search-result\"><h2><a href=\"http://[::1\">x</a></h2></div>",
    "<span id=\"acrPopover\"><span class=\"a-icon-alt\">9.9 out of 5</span></span>",
    "<a class=\"s-pagination-next\" href=\"\">Next</a>",
    "\u{0}\u{feff}<table><tr><td>::</td></tr></table>",
];

#[test]
fn test_detail_assembly_never_panics() {
    let rules = ExtractionRules::default();
    let stats = ProcessingStats::new();
    let url = Url::parse("https://www.amazon.com/dp/B08N5WRWNW").unwrap();
    for html in GARBAGE {
        let record = assemble_detail_page(html, &url, &rules, &stats)
            .expect("identifier is recoverable from the URL");
        assert_eq!(record.asin, "B08N5WRWNW");
    }
}

#[test]
fn test_listing_assembly_never_panics() {
    let rules = ExtractionRules::default();
    let stats = ProcessingStats::new();
    let url = Url::parse("https://www.amazon.com/s?k=lamp").unwrap();
    for html in GARBAGE {
        let page = assemble_listing_page(html, &url, &rules, &stats, 0);
        assert!(page.records.iter().all(|r| r.rating.unwrap_or(0.0) <= 5.0));
    }
}

#[test]
fn test_settings_validation_does_not_panic() {
    let mut settings = Settings::default();
    settings.max_pages = 0;
    assert!(settings.validate().is_err(), "Zero max_pages should fail validation");

    settings = Settings::default();
    settings.max_retries = 9;
    assert!(settings.validate().is_err(), "Excessive retries should fail validation");

    settings = Settings::default();
    settings.min_rating = f64::NAN;
    assert!(settings.validate().is_err(), "NaN rating should fail validation");
    assert!(settings.clamped().validate().is_ok());
}

#[test]
fn test_config_default_values_are_valid() {
    assert!(Config::default().validate().is_ok(), "Default config should be valid");
}
