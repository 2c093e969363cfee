//! Heuristic pattern tables.
//!
//! Image ranking and leaked-markup filtering depend on regex and substring
//! lists tuned against one site's markup. They are kept as data so they can
//! be revised (or loaded from JSON) without touching the extractors.

use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::error_handling::ConfigError;

/// Replaceable pattern lists used by the field extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternTable {
    /// Regexes marking decorative images (badges, logos, play buttons, small thumbnails)
    pub image_deny: Vec<String>,
    /// Substrings at least one of which a product image URL must contain
    pub image_required: Vec<String>,
    /// Regexes marking high-resolution image variants, ranked first
    pub image_hi_res: Vec<String>,
    /// Substrings that disqualify a feature bullet (leaked CSS, boilerplate)
    pub feature_deny: Vec<String>,
    /// Substrings that disqualify a specification key
    pub spec_key_deny: Vec<String>,
    /// Substrings that disqualify a specification value
    pub spec_value_deny: Vec<String>,
    /// Substrings that disqualify review content (inline style leakage)
    pub review_deny: Vec<String>,
    /// Substrings that disqualify a color swatch label
    pub color_deny: Vec<String>,
    /// Dropdown placeholder labels that are not real variant values
    pub variant_placeholders: Vec<String>,
    /// Badge texts that mark a best seller
    pub best_seller_markers: Vec<String>,
}

impl Default for PatternTable {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            image_deny: owned(&[
                r"Prime_Logo_RGB_Prime_Blue_MASTER",
                r"imageBlock-360-thumbnail-icon",
                r"play-button-mb-image-grid",
                r"marketing/prime",
                r"\._?SS125_",
                r"CustomProduct",
                r"HomeCustomProduct",
                r"_SR\d+,\d+_",
                r"_PKplay-button",
            ]),
            image_required: owned(&["/images/I/"]),
            image_hi_res: owned(&[r"_AC_SX\d+_", r"_AC_SY\d+_", r"_SL\d+_"]),
            feature_deny: owned(&["Make sure", "css", "style", "{", "}"]),
            spec_key_deny: owned(&["css", "style"]),
            spec_value_deny: owned(&["{", "}"]),
            review_deny: owned(&["font-weight", "color:"]),
            color_deny: owned(&["Click to"]),
            variant_placeholders: owned(&["Select", "Choose an option"]),
            best_seller_markers: owned(&["Best Seller", "#1"]),
        }
    }
}

impl PatternTable {
    /// Compiles the regex lists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` naming the list that holds a
    /// malformed regex.
    pub fn compile(&self) -> Result<CompiledPatterns, ConfigError> {
        let set = |name: &'static str, patterns: &[String]| {
            RegexSet::new(patterns).map_err(|source| ConfigError::InvalidPattern {
                table: name,
                source,
            })
        };
        Ok(CompiledPatterns {
            image_deny: set("imageDeny", &self.image_deny)?,
            image_hi_res: set("imageHiRes", &self.image_hi_res)?,
            table: self.clone(),
        })
    }
}

/// A `PatternTable` with its regex lists compiled.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    image_deny: RegexSet,
    image_hi_res: RegexSet,
    table: PatternTable,
}

impl Default for CompiledPatterns {
    fn default() -> Self {
        PatternTable::default().compile().unwrap_or_else(|e| {
            panic!(
                "Built-in pattern table failed to compile: {}. This is a programming error.",
                e
            )
        })
    }
}

fn contains_any(text: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| text.contains(n.as_str()))
}

impl CompiledPatterns {
    /// True when `src` is a real product image: not decorative and on the product image path.
    pub fn is_product_image(&self, src: &str) -> bool {
        !self.image_deny.is_match(src) && contains_any(src, &self.table.image_required)
    }

    /// True when `src` carries a high-resolution size marker.
    pub fn is_hi_res(&self, src: &str) -> bool {
        self.image_hi_res.is_match(src)
    }

    /// True when a feature bullet looks like leaked markup or boilerplate.
    pub fn is_leaky_feature(&self, text: &str) -> bool {
        contains_any(text, &self.table.feature_deny)
    }

    /// True when a specification key or value looks like leaked markup.
    pub fn is_leaky_spec(&self, key: &str, value: &str) -> bool {
        contains_any(key, &self.table.spec_key_deny)
            || contains_any(value, &self.table.spec_value_deny)
    }

    /// True when review content carries inline style leakage.
    pub fn is_leaky_review(&self, content: &str) -> bool {
        contains_any(content, &self.table.review_deny)
    }

    /// True when a swatch label is an instruction rather than a color name.
    pub fn is_rejected_color(&self, label: &str) -> bool {
        contains_any(label, &self.table.color_deny)
    }

    /// True when a dropdown label is a placeholder.
    pub fn is_placeholder(&self, label: &str) -> bool {
        self.table
            .variant_placeholders
            .iter()
            .any(|p| p.as_str() == label)
    }

    /// True when badge text marks a best seller.
    pub fn is_best_seller_badge(&self, text: &str) -> bool {
        contains_any(text, &self.table.best_seller_markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        assert!(PatternTable::default().compile().is_ok());
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let table = PatternTable {
            image_hi_res: vec!["_SL(\\d+_".to_string()],
            ..Default::default()
        };
        let err = table.compile().unwrap_err();
        assert!(err.to_string().contains("imageHiRes"));
    }

    #[test]
    fn test_product_image_rules() {
        let p = CompiledPatterns::default();
        assert!(p.is_product_image("https://m.media-amazon.com/images/I/71abc._AC_SX679_.jpg"));
        assert!(!p.is_product_image("https://m.media-amazon.com/images/G/01/marketing/prime/logo.png"));
        assert!(!p.is_product_image("https://m.media-amazon.com/images/I/31x._SS125_.jpg"));
        assert!(!p.is_product_image("https://m.media-amazon.com/images/I/41x._SR38,50_.jpg"));
        assert!(!p.is_product_image("https://example.com/other/41x.jpg"));
    }

    #[test]
    fn test_hi_res_markers() {
        let p = CompiledPatterns::default();
        assert!(p.is_hi_res("https://m.media-amazon.com/images/I/71abc._AC_SY450_.jpg"));
        assert!(p.is_hi_res("https://m.media-amazon.com/images/I/71abc._SL1500_.jpg"));
        assert!(!p.is_hi_res("https://m.media-amazon.com/images/I/71abc._AC_US40_.jpg"));
    }

    #[test]
    fn test_replaced_table_changes_behaviour() {
        let table = PatternTable {
            image_required: vec!["/cdn/".to_string()],
            image_deny: vec![],
            ..Default::default()
        };
        let p = table.compile().unwrap();
        assert!(p.is_product_image("https://shop.example/cdn/a.jpg"));
        assert!(!p.is_product_image("https://m.media-amazon.com/images/I/a.jpg"));
    }

    #[test]
    fn test_leak_markers() {
        let p = CompiledPatterns::default();
        assert!(p.is_leaky_feature(".a-list { color: red }"));
        assert!(!p.is_leaky_feature("Long lasting battery for all day use"));
        assert!(p.is_leaky_spec("inline style", "x"));
        assert!(p.is_leaky_spec("Weight", "{ 1kg }"));
        assert!(p.is_leaky_review("<span style=\"font-weight:700\">"));
        assert!(p.is_placeholder("Select"));
        assert!(!p.is_placeholder("Selected Large"));
        assert!(p.is_best_seller_badge("#1 Best Seller"));
    }
}
