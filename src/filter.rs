//! Filter, dedup and sort stage for extracted record sets.
//!
//! Records are never modified here; they are only dropped or reordered.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::{ListFilters, SortBy};
use crate::models::ProductRecord;

/// True when `record` has a valid identifier and meets every threshold in `filters`.
///
/// `minSales` and `minReviews` are both compared against the review count,
/// which is the only sales signal listings expose. A non-empty brand filter
/// must appear, ignoring case, in the brand or the title.
pub fn passes_filters(record: &ProductRecord, filters: &ListFilters) -> bool {
    if !record.has_valid_asin() {
        return false;
    }
    let reviews = record.review_count;
    if reviews < u64::from(filters.min_sales) || reviews < u64::from(filters.min_reviews) {
        return false;
    }
    if record.rating_value() < filters.min_rating {
        return false;
    }
    let needle = filters.brand_filter.trim().to_lowercase();
    needle.is_empty()
        || record.brand.to_lowercase().contains(&needle)
        || record.title.to_lowercase().contains(&needle)
}

/// Keeps the records that pass [`passes_filters`], in their original order.
pub fn apply_filters(records: Vec<ProductRecord>, filters: &ListFilters) -> Vec<ProductRecord> {
    records
        .into_iter()
        .filter(|record| passes_filters(record, filters))
        .collect()
}

/// Removes records with a repeated identifier.
///
/// The last record seen for an identifier wins, placed where the identifier
/// first appeared.
pub fn dedup_by_asin(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<ProductRecord> = Vec::with_capacity(records.len());
    for record in records {
        match position.get(&record.asin) {
            Some(&index) => unique[index] = record,
            None => {
                position.insert(record.asin.clone(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

fn compare(a: &ProductRecord, b: &ProductRecord, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Sales => b.review_count.cmp(&a.review_count),
        SortBy::Rating => b.rating_value().total_cmp(&a.rating_value()),
        SortBy::Price => a.price_value().total_cmp(&b.price_value()),
        SortBy::PriceDesc => b.price_value().total_cmp(&a.price_value()),
    }
}

/// Sorts records in place by `sort_by`; equal keys keep their relative order.
pub fn sort_records(records: &mut [ProductRecord], sort_by: SortBy) {
    records.sort_by(|a, b| compare(a, b, sort_by));
}

/// Full stage: filter, then dedup, then sort.
pub fn refine(records: Vec<ProductRecord>, filters: &ListFilters) -> Vec<ProductRecord> {
    let mut refined = dedup_by_asin(apply_filters(records, filters));
    sort_records(&mut refined, filters.sort_by);
    refined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(asin: &str, reviews: u64, rating: Option<f64>, price: &str) -> ProductRecord {
        ProductRecord {
            asin: asin.to_string(),
            review_count: reviews,
            rating,
            current_price: price.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_thresholds() {
        let filters = ListFilters {
            min_sales: 100,
            min_reviews: 50,
            min_rating: 4.0,
            ..Default::default()
        };
        assert!(passes_filters(&record("B000000001", 100, Some(4.0), ""), &filters));
        assert!(!passes_filters(&record("B000000002", 99, Some(4.5), ""), &filters));
        assert!(!passes_filters(&record("B000000003", 500, Some(3.9), ""), &filters));
        assert!(!passes_filters(&record("B000000004", 500, None, ""), &filters));
    }

    #[test]
    fn test_min_reviews_checked_independently() {
        let filters = ListFilters {
            min_sales: 0,
            min_reviews: 10,
            ..Default::default()
        };
        assert!(!passes_filters(&record("B000000001", 9, Some(5.0), ""), &filters));
        assert!(passes_filters(&record("B000000001", 10, Some(5.0), ""), &filters));
    }

    #[test]
    fn test_invalid_identifier_excluded() {
        let filters = ListFilters::default();
        assert!(!passes_filters(&record("", 10, Some(5.0), ""), &filters));
        assert!(!passes_filters(&record("b000000001", 10, Some(5.0), ""), &filters));
    }

    #[test]
    fn test_brand_filter_matches_brand_or_title() {
        let filters = ListFilters {
            brand_filter: "AnKer".to_string(),
            ..Default::default()
        };
        let by_brand = ProductRecord {
            brand: "Anker".to_string(),
            ..record("B000000001", 0, None, "")
        };
        let by_title = ProductRecord {
            title: "Charger compatible with anker hubs".to_string(),
            ..record("B000000002", 0, None, "")
        };
        let neither = ProductRecord {
            brand: "Belkin".to_string(),
            ..record("B000000003", 0, None, "")
        };
        assert!(passes_filters(&by_brand, &filters));
        assert!(passes_filters(&by_title, &filters));
        assert!(!passes_filters(&neither, &filters));
    }

    #[test]
    fn test_dedup_last_wins_first_position() {
        let records = vec![
            record("B000000001", 1, None, ""),
            record("B000000002", 2, None, ""),
            record("B000000001", 3, None, ""),
        ];
        let unique = dedup_by_asin(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].asin, "B000000001");
        assert_eq!(unique[0].review_count, 3);
        assert_eq!(unique[1].asin, "B000000002");
        assert_eq!(dedup_by_asin(unique.clone()), unique);
    }

    #[test]
    fn test_sort_by_price_treats_unparsable_as_zero() {
        let mut records = vec![
            record("B000000001", 0, None, "24.99"),
            record("B000000002", 0, None, "N/A"),
            record("B000000003", 0, None, "1,099.00"),
            record("B000000004", 0, None, "5.00"),
        ];
        sort_records(&mut records, SortBy::Price);
        let prices: Vec<f64> = records.iter().map(ProductRecord::price_value).collect();
        assert_eq!(prices, vec![0.0, 5.0, 24.99, 1099.0]);

        sort_records(&mut records, SortBy::PriceDesc);
        assert_eq!(records[0].asin, "B000000003");
    }

    #[test]
    fn test_sort_is_stable_and_repeatable() {
        let mut records = vec![
            record("B000000001", 10, Some(4.0), ""),
            record("B000000002", 30, Some(4.0), ""),
            record("B000000003", 10, Some(4.5), ""),
        ];
        sort_records(&mut records, SortBy::Sales);
        let first: Vec<String> = records.iter().map(|r| r.asin.clone()).collect();
        assert_eq!(first, vec!["B000000002", "B000000001", "B000000003"]);
        sort_records(&mut records, SortBy::Sales);
        let second: Vec<String> = records.iter().map(|r| r.asin.clone()).collect();
        assert_eq!(first, second);

        sort_records(&mut records, SortBy::Rating);
        assert_eq!(records[0].asin, "B000000003");
        assert_eq!(records[1].asin, "B000000002");
    }

    #[test]
    fn test_refine_filters_dedups_and_sorts() {
        let filters = ListFilters {
            min_reviews: 5,
            sort_by: SortBy::Sales,
            ..Default::default()
        };
        let records = vec![
            record("B000000001", 6, None, ""),
            record("B000000002", 2, None, ""),
            record("B000000003", 50, None, ""),
            record("B000000001", 8, None, ""),
        ];
        let refined = refine(records, &filters);
        let asins: Vec<&str> = refined.iter().map(|r| r.asin.as_str()).collect();
        assert_eq!(asins, vec!["B000000003", "B000000001"]);
        assert_eq!(refined[1].review_count, 8);
    }
}
