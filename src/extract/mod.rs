//! Field extractors.
//!
//! Each extractor reads one field of a [`ProductRecord`](crate::models::ProductRecord)
//! from a parsed document and returns `Result<T, FieldError>`. Absence is not
//! an error: a missing price is an empty string, a missing badge is `false`.
//! `FieldError` is reserved for values that are present but malformed, and
//! the assembler substitutes the field's empty value in that case.
//!
//! All lookups go through the selector chains and pattern lists in
//! [`ExtractionRules`], so the markup assumptions live in data rather than
//! in this module.

mod affiliate;
mod details;
mod identifier;
mod images;
mod listing;
mod page;
mod product;
mod reviews;
pub mod text;
mod variants;

pub use affiliate::affiliate_info;
pub use details::{description, features, specifications};
pub use identifier::{asin, asin_from_url, card_asin, is_valid_asin, normalize_asin};
pub use images::images;
pub use listing::{
    card_best_seller_rank, card_brand, card_image, card_is_best_seller, card_link, card_price,
    card_prime, card_rating, card_review_count, card_title, listing_cards, next_page_url,
};
pub use page::{detect_page_kind, is_listing_page, is_product_page, PageKind};
pub use product::{
    best_seller_rank, brand, category, current_price, is_best_seller, original_price,
    prime_eligible, price_range, rating, review_count, shipping_info, stock_status, title,
};
pub use reviews::reviews;
pub use variants::variants;

use scraper::{ElementRef, Html};
use url::Url;

use crate::config::{
    CompiledPatterns, Config, DetailSelectors, ListingSelectors, PatternTable, SelectorTable,
};
use crate::error_handling::ConfigError;
use crate::resolver::{any_match, resolve, select_all_groups, SelectorChain};

/// Selector chains and compiled heuristic patterns shared by all extractors.
#[derive(Debug, Clone, Default)]
pub struct ExtractionRules {
    /// Selector chains for detail pages and listing cards
    pub selectors: SelectorTable,
    /// Compiled filter and ranking patterns
    pub patterns: CompiledPatterns,
}

impl ExtractionRules {
    /// Builds rules from a selector table and an uncompiled pattern table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if a pattern list does not compile.
    pub fn new(selectors: SelectorTable, patterns: &PatternTable) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors,
            patterns: patterns.compile()?,
        })
    }

    /// Builds rules from the selector and pattern tables of a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(config.selectors.clone(), &config.patterns)
    }
}

/// A parsed document plus the rules to read it with.
///
/// `root` is the element lookups are scoped to: the document root for a
/// detail page, or one result container for a listing card.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    /// The parsed document
    pub document: &'a Html,
    /// Address the document was loaded from; relative links resolve against it
    pub url: &'a Url,
    /// Selector and pattern tables
    pub rules: &'a ExtractionRules,
    /// Element all lookups are scoped to
    pub root: ElementRef<'a>,
}

impl<'a> PageContext<'a> {
    /// Creates a context scoped to the whole document.
    pub fn new(document: &'a Html, url: &'a Url, rules: &'a ExtractionRules) -> Self {
        Self {
            document,
            url,
            rules,
            root: document.root_element(),
        }
    }

    /// Returns a copy of this context scoped to `root`.
    pub fn scoped(&self, root: ElementRef<'a>) -> Self {
        Self { root, ..*self }
    }

    pub(crate) fn detail(&self) -> &'a DetailSelectors {
        &self.rules.selectors.detail
    }

    pub(crate) fn listing(&self) -> &'a ListingSelectors {
        &self.rules.selectors.listing
    }

    pub(crate) fn patterns(&self) -> &'a CompiledPatterns {
        &self.rules.patterns
    }

    /// First non-empty text for `chain`.
    pub(crate) fn text(&self, chain: &SelectorChain) -> Option<String> {
        resolve(self.root, chain, None)
    }

    /// First non-empty `attr` value for `chain`.
    pub(crate) fn attr(&self, chain: &SelectorChain, attr: &str) -> Option<String> {
        resolve(self.root, chain, Some(attr))
    }

    pub(crate) fn matches(&self, chain: &SelectorChain) -> bool {
        any_match(self.root, chain)
    }

    pub(crate) fn all(&self, chain: &SelectorChain) -> Vec<ElementRef<'a>> {
        select_all_groups(self.root, chain)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Runs `f` against `html` parsed as a document loaded from `url`.
    pub fn with_page<T>(html: &str, url: &str, f: impl FnOnce(&PageContext<'_>) -> T) -> T {
        let document = Html::parse_document(html);
        let url = Url::parse(url).expect("test url");
        let rules = ExtractionRules::default();
        let page = PageContext::new(&document, &url, &rules);
        f(&page)
    }
}
