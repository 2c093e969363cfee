//! Export payloads built from extracted records.
//!
//! Payloads omit empty values so exported files only carry what was found.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::Settings;
use crate::models::ProductRecord;

use super::affiliate::{
    clean_affiliate_url, estimate_earnings, marketplace_domain, with_affiliate_tag,
};

/// Removes nulls, empty strings, empty arrays and empty objects, recursively.
///
/// Booleans and numbers are kept whatever their value. Returns `None` when
/// nothing is left.
pub fn prune_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(prune_empty).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(fields) => {
            let fields: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, value)| prune_empty(value).map(|v| (key, v)))
                .collect();
            (!fields.is_empty()).then_some(Value::Object(fields))
        }
        other => Some(other),
    }
}

/// Per-record export of a detail page record.
///
/// With an affiliate tag the URL becomes the short tagged product link. The
/// affiliate block is reduced to category, commission rate and estimated
/// earnings, and dropped entirely when the toolbar was not present.
pub fn product_payload(record: &ProductRecord, settings: &Settings) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Some(fields) = value.as_object_mut() {
        shape_product_fields(fields, record, settings);
    }
    Ok(prune_empty(value).unwrap_or_else(|| json!({})))
}

fn shape_product_fields(fields: &mut Map<String, Value>, record: &ProductRecord, settings: &Settings) {
    if let Some(tag) = settings.affiliate_tag.as_deref() {
        let domain = marketplace_domain(&record.url, &settings.marketplace_domain);
        if let Some(link) = clean_affiliate_url(&domain, &record.asin, tag) {
            fields.insert("url".to_string(), Value::String(link));
        }
    }

    fields.remove("sourceIndex");
    fields.remove("image");
    if record.affiliate_info.available {
        let earnings = estimate_earnings(record);
        fields.insert(
            "affiliateInfo".to_string(),
            json!({
                "category": record.affiliate_info.category,
                "commissionRate": record.affiliate_info.commission_rate,
                "estimatedEarnings": (earnings > 0.0).then(|| format!("{:.2}", earnings)),
            }),
        );
    } else {
        fields.remove("affiliateInfo");
    }
}

/// One row of the list export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemExport {
    /// Product identifier
    pub asin: String,
    /// Product title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Brand name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub brand: String,
    /// Displayed price
    #[serde(skip_serializing_if = "String::is_empty")]
    pub price: String,
    /// Average star rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of ratings
    #[serde(skip_serializing_if = "is_zero")]
    pub review_count: u64,
    /// Product link, tagged when an affiliate tag is configured
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Card thumbnail
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    /// Prime badge present
    pub is_prime: bool,
    /// Best-seller badge present
    pub is_best_seller: bool,
    /// When the card was read
    pub extracted_at: DateTime<Utc>,
    /// Position across crawled pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl ListItemExport {
    fn from_record(record: &ProductRecord, tag: Option<&str>) -> Self {
        let url = match tag {
            Some(tag) if !record.url.is_empty() => with_affiliate_tag(&record.url, tag),
            _ => record.url.clone(),
        };
        Self {
            asin: record.asin.clone(),
            title: record.title.clone(),
            brand: record.brand.clone(),
            price: record.current_price.clone(),
            rating: record.rating,
            review_count: record.review_count,
            url,
            image: record.image.clone(),
            is_prime: record.prime_eligible,
            is_best_seller: record.is_best_seller,
            extracted_at: record.extracted_at,
            source_index: record.source_index,
        }
    }
}

/// List export rows: only records that carry an identifier, in input order.
pub fn list_payload(records: &[ProductRecord], tag: Option<&str>) -> Vec<ListItemExport> {
    records
        .iter()
        .filter(|record| !record.asin.trim().is_empty())
        .map(|record| ListItemExport::from_record(record, tag))
        .collect()
}

/// Link export: distinct product URLs in input order, one per line.
pub fn links_payload(records: &[ProductRecord], tag: Option<&str>) -> String {
    let mut seen = HashSet::new();
    let mut out = String::new();
    for record in records.iter().filter(|r| !r.url.is_empty()) {
        let url = match tag {
            Some(tag) => with_affiliate_tag(&record.url, tag),
            None => record.url.clone(),
        };
        if seen.insert(url.clone()) {
            out.push_str(&url);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AffiliateInfo;

    #[test]
    fn test_prune_empty_keeps_false_and_zero() {
        let pruned = prune_empty(json!({
            "a": "",
            "b": [],
            "c": {"d": null, "e": []},
            "f": false,
            "g": 0,
            "h": ["x", ""],
        }))
        .unwrap();
        assert_eq!(pruned, json!({"f": false, "g": 0, "h": ["x"]}));
    }

    #[test]
    fn test_product_payload_omits_empty_fields() {
        let record = ProductRecord {
            asin: "B08N5WRWNW".to_string(),
            title: "Echo Dot".to_string(),
            url: "https://www.amazon.co.uk/Echo/dp/B08N5WRWNW?ref=x".to_string(),
            ..Default::default()
        };
        let settings = Settings {
            affiliate_tag: Some("shop-21".to_string()),
            ..Default::default()
        };
        let payload = product_payload(&record, &settings).unwrap();
        assert_eq!(payload["url"], "https://www.amazon.co.uk/dp/B08N5WRWNW?tag=shop-21");
        assert_eq!(payload["primeEligible"], false);
        let fields = payload.as_object().unwrap();
        for absent in ["brand", "currentPrice", "features", "variants", "affiliateInfo", "rating"] {
            assert!(!fields.contains_key(absent), "{} should be omitted", absent);
        }
    }

    #[test]
    fn test_product_payload_affiliate_block() {
        let record = ProductRecord {
            asin: "B08N5WRWNW".to_string(),
            current_price: "50.00".to_string(),
            affiliate_info: AffiliateInfo {
                available: true,
                category: "Electronics".to_string(),
                commission_rate: "4%".to_string(),
                tracking_id: "shop-20".to_string(),
                store_id: String::new(),
            },
            ..Default::default()
        };
        let payload = product_payload(&record, &Settings::default()).unwrap();
        assert_eq!(
            payload["affiliateInfo"],
            json!({"category": "Electronics", "commissionRate": "4%", "estimatedEarnings": "2.00"})
        );
    }

    #[test]
    fn test_list_payload_requires_identifier_and_tags_urls() {
        let records = vec![
            ProductRecord {
                asin: "B000000001".to_string(),
                url: "https://www.amazon.com/dp/B000000001".to_string(),
                ..Default::default()
            },
            ProductRecord {
                url: "https://www.amazon.com/dp/unknown".to_string(),
                ..Default::default()
            },
        ];
        let rows = list_payload(&records, Some("t-20"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "https://www.amazon.com/dp/B000000001?tag=t-20");
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert!(json.get("brand").is_none());
        assert_eq!(json["isPrime"], false);
    }

    #[test]
    fn test_links_payload_dedups() {
        let record = |url: &str| ProductRecord {
            url: url.to_string(),
            ..Default::default()
        };
        let records = vec![
            record("https://www.amazon.com/dp/B000000001"),
            record(""),
            record("https://www.amazon.com/dp/B000000002"),
            record("https://www.amazon.com/dp/B000000001"),
        ];
        assert_eq!(
            links_payload(&records, None),
            "https://www.amazon.com/dp/B000000001\nhttps://www.amazon.com/dp/B000000002\n"
        );
    }
}
