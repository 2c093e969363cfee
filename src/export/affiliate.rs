//! Associate links, commission estimates and product checks.

use serde::Serialize;
use url::Url;

use crate::config::Settings;
use crate::extract::text::decimal_token;
use crate::models::ProductRecord;

/// Sets the `tag` query parameter on `url`, replacing any existing tag.
///
/// Returns `url` unchanged when `tag` is blank or `url` does not parse.
pub fn with_affiliate_tag(url: &str, tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        return url.to_string();
    }
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != "tag")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("tag", tag);
    parsed.to_string()
}

/// Marketplace host for links built from `page_url`.
///
/// An amazon host keeps its country suffix (`amazon.co.uk`); anything else
/// falls back to `default_domain`.
pub fn marketplace_domain(page_url: &str, default_domain: &str) -> String {
    Url::parse(page_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| host.contains("amazon."))
        .map(|host| host.trim_start_matches("www.").to_string())
        .unwrap_or_else(|| default_domain.to_string())
}

/// Short product link `https://www.{domain}/dp/{asin}?tag={tag}`.
///
/// `None` when either the identifier or the tag is blank.
pub fn clean_affiliate_url(domain: &str, asin: &str, tag: &str) -> Option<String> {
    let tag = tag.trim();
    if asin.is_empty() || tag.is_empty() {
        return None;
    }
    Some(format!("https://www.{}/dp/{}?tag={}", domain, asin, tag))
}

/// Estimated commission: price times the displayed commission rate.
///
/// `0.0` when either the price or the rate is missing or not positive.
pub fn estimate_earnings(record: &ProductRecord) -> f64 {
    let rate = decimal_token(&record.affiliate_info.commission_rate.replace('%', ""))
        .and_then(|t| t.parse::<f64>().ok())
        .unwrap_or(0.0);
    let price = record.price_value();
    if price > 0.0 && rate > 0.0 {
        price * rate / 100.0
    } else {
        0.0
    }
}

/// Outcome of the recommendation checks for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChecks {
    /// Estimated commission meets `minEarnings` (true when not checked)
    pub earnings_ok: bool,
    /// At least one review was captured
    pub reviews_ok: bool,
    /// Rating meets `minRating` (true when the rating is unknown)
    pub rating_ok: bool,
    /// Estimated commission per sale
    pub earnings: f64,
    /// Threshold the estimate was checked against
    pub min_earnings: f64,
}

impl ProductChecks {
    /// True when every check passed.
    pub fn is_recommended(&self) -> bool {
        self.earnings_ok && self.reviews_ok && self.rating_ok
    }
}

/// Runs the recommendation checks for `record` against `settings`.
///
/// The earnings check only applies when affiliate data is available and a
/// positive minimum is configured.
pub fn product_checks(record: &ProductRecord, settings: &Settings) -> ProductChecks {
    let earnings = if record.affiliate_info.available {
        estimate_earnings(record)
    } else {
        0.0
    };
    let earnings_ok = !record.affiliate_info.available
        || settings.min_earnings <= 0.0
        || earnings >= settings.min_earnings;
    ProductChecks {
        earnings_ok,
        reviews_ok: !record.reviews.is_empty(),
        rating_ok: record
            .rating
            .map_or(true, |rating| rating >= settings.min_rating),
        earnings,
        min_earnings: settings.min_earnings,
    }
}
