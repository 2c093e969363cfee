//! Export file names.

use chrono::NaiveDate;

use crate::config::FILENAME_TITLE_CHARS;
use crate::models::ProductRecord;

fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `amazon_product_{id}_{YYYYMMDD}.json`.
///
/// `id` is the identifier, else the first 20 characters of the title with
/// punctuation dropped and whitespace runs turned into `_`, else `unknown`.
pub fn product_file_name(record: &ProductRecord, date: NaiveDate) -> String {
    let identifier = if !record.asin.is_empty() {
        record.asin.clone()
    } else {
        let title: String = record
            .title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect();
        let joined = title.split_whitespace().collect::<Vec<_>>().join("_");
        let truncated: String = joined.chars().take(FILENAME_TITLE_CHARS).collect();
        if truncated.is_empty() {
            "unknown".to_string()
        } else {
            truncated
        }
    };
    format!("amazon_product_{}_{}.json", identifier, date_stamp(date))
}

/// `amazon_list_{brand}_{YYYYMMDD}.json`, with `list` when no brand filter is set.
pub fn list_file_name(brand_filter: &str, date: NaiveDate) -> String {
    let brand = brand_filter.trim();
    let identifier = if brand.is_empty() {
        "list".to_string()
    } else {
        brand
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!("amazon_list_{}_{}.json", identifier, date_stamp(date))
}

/// `amazon_links_{YYYYMMDD}.txt`.
pub fn links_file_name(date: NaiveDate) -> String {
    format!("amazon_links_{}.txt", date_stamp(date))
}

/// `amazon_batch_{YYYYMMDD}.json`.
pub fn batch_file_name(date: NaiveDate) -> String {
    format!("amazon_batch_{}.json", date_stamp(date))
}
