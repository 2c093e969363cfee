//! Text cleaning and numeric token parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::compile_regex_unsafe;

static CSS_RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\.[\w-]+\s*\{[^}]*\}", "CSS_RULE_RE"));
static BRACE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\{[^}]*\}", "BRACE_BLOCK_RE"));
static CSS_DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r"[\w-]+:\s*[\w\s#().,%-]+;", "CSS_DECLARATION_RE")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(r"<[^>]*>", "TAG_RE"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\s+", "WHITESPACE_RE"));
static DISALLOWED_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"[^\w\s.,!?()-]", "DISALLOWED_CHARS_RE"));

static PRICE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"[\d,]+\.?\d*", "PRICE_TOKEN_RE"));
static DECIMAL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\d+(?:\.\d+)?", "DECIMAL_TOKEN_RE"));
static COUNT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(\d[\d,]*(?:\.\d+)?)([KkMm])?", "COUNT_TOKEN_RE"));
static INTEGER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\d+", "INTEGER_TOKEN_RE"));
static BRAND_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(?i)^(Visit the|Brand:|by)\s*", "BRAND_PREFIX_RE"));
static BRAND_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\s+Store$", "BRAND_SUFFIX_RE"));

/// Cleans text that may carry leaked style rules or markup.
///
/// Removes `.class { ... }` rules, any remaining brace blocks, `key: value;`
/// declarations and tags, collapses whitespace, then drops every character
/// outside word characters, whitespace and `. , ! ? ( ) -`.
pub fn clean_text(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let text = CSS_RULE_RE.replace_all(text, "");
    let text = BRACE_BLOCK_RE.replace_all(&text, "");
    let text = CSS_DECLARATION_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = DISALLOWED_CHARS_RE.replace_all(&text, "");
    text.trim().to_string()
}

/// First price-like token (`1,299.99`), thousands separators kept.
pub fn price_token(text: &str) -> Option<String> {
    PRICE_TOKEN_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
}

/// First decimal token (`4.5` in "4.5 out of 5 stars").
pub fn decimal_token(text: &str) -> Option<String> {
    DECIMAL_TOKEN_RE.find(text).map(|m| m.as_str().to_string())
}

/// First integer token.
pub fn integer_token(text: &str) -> Option<String> {
    INTEGER_TOKEN_RE.find(text).map(|m| m.as_str().to_string())
}

/// Parses a count such as `1,234 ratings` or `(2.3K)`.
///
/// Returns `None` when the text holds no digits. A `K`/`M` suffix directly
/// after the number scales it.
pub fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT_TOKEN_RE.captures(text)?;
    let number = caps.get(1)?.as_str().replace(',', "");
    let scale = match caps.get(2).map(|m| m.as_str()) {
        Some("K") | Some("k") => 1_000.0,
        Some("M") | Some("m") => 1_000_000.0,
        _ => 1.0,
    };
    if scale == 1.0 {
        // Plain counts must be whole numbers; "4.5" is not a count.
        return number.split('.').next()?.parse().ok();
    }
    let value: f64 = number.parse().ok()?;
    Some((value * scale).round() as u64)
}

/// Numeric value of a price string; `0.0` when unparsable.
///
/// Currency symbols and thousands separators are ignored.
pub fn price_value(text: &str) -> f64 {
    let stripped: String = text.chars().filter(|c| *c != ',' && *c != '$').collect();
    decimal_token(&stripped)
        .and_then(|t| t.parse().ok())
        .unwrap_or(0.0)
}

/// Strips byline noise ("Visit the X Store", "Brand: X", "by X") from a brand.
pub fn clean_brand(text: &str) -> String {
    let text = BRAND_PREFIX_RE.replace(text.trim(), "");
    BRAND_SUFFIX_RE.replace(&text, "").trim().to_string()
}

/// Character length, as used by every length bound.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_removes_css_rules() {
        assert_eq!(
            clean_text(".a-list-item { color: red; } Great sound quality"),
            "Great sound quality"
        );
        assert_eq!(clean_text("{display:none} Loud and clear"), "Loud and clear");
    }

    #[test]
    fn test_clean_text_removes_declarations_and_tags() {
        assert_eq!(
            clean_text("font-weight: 700; <b>Durable</b> aluminum body"),
            "Durable aluminum body"
        );
    }

    #[test]
    fn test_clean_text_collapses_whitespace_and_drops_symbols() {
        assert_eq!(
            clean_text("  Fast   charging\n\t(USB-C) & more™ !  "),
            "Fast charging (USB-C) more !"
        );
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_price_token() {
        assert_eq!(price_token("$1,299.99"), Some("1,299.99".to_string()));
        assert_eq!(price_token("EUR 15"), Some("15".to_string()));
        assert_eq!(price_token("Currently unavailable"), None);
        assert_eq!(price_token(","), None);
    }

    #[test]
    fn test_decimal_token() {
        assert_eq!(decimal_token("4.5 out of 5 stars"), Some("4.5".to_string()));
        assert_eq!(decimal_token("no rating"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12,345 ratings"), Some(12345));
        assert_eq!(parse_count("(1.2K)"), Some(1200));
        assert_eq!(parse_count("3M+ bought"), Some(3_000_000));
        assert_eq!(parse_count("87"), Some(87));
        assert_eq!(parse_count("no reviews"), None);
    }

    #[test]
    fn test_price_value() {
        assert_eq!(price_value("$1,299.99"), 1299.99);
        assert_eq!(price_value("24.50"), 24.5);
        assert_eq!(price_value(""), 0.0);
        assert_eq!(price_value("N/A"), 0.0);
    }

    #[test]
    fn test_clean_brand() {
        assert_eq!(clean_brand("Visit the Anker Store"), "Anker");
        assert_eq!(clean_brand("Brand: Logitech"), "Logitech");
        assert_eq!(clean_brand("by Sony"), "Sony");
        assert_eq!(clean_brand("Bose"), "Bose");
    }
}
