//! Declarative field tables for detail pages and listing cards.
//!
//! Each entry names a record field, the extractor that reads it and the slot
//! it is written to. Adding a field means adding one entry here.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use crate::error_handling::FieldError;
use crate::extract::{self, PageContext};
use crate::models::ProductRecord;

/// One field of a [`ProductRecord`] and how to fill it.
pub trait FieldRule: Send + Sync {
    /// Record field name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Runs the extractor and stores its value.
    ///
    /// On failure or panic the field is set to its empty value and the
    /// failure is returned.
    fn apply(&self, page: &PageContext<'_>, record: &mut ProductRecord) -> Result<(), FieldError>;
}

struct Field<T> {
    name: &'static str,
    extract: fn(&PageContext<'_>) -> Result<T, FieldError>,
    slot: fn(&mut ProductRecord) -> &mut T,
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl<T: Default> FieldRule for Field<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, page: &PageContext<'_>, record: &mut ProductRecord) -> Result<(), FieldError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| (self.extract)(page)))
            .unwrap_or_else(|payload| Err(FieldError::Panicked(panic_message(payload))));
        match outcome {
            Ok(value) => {
                *(self.slot)(record) = value;
                Ok(())
            }
            Err(e) => {
                *(self.slot)(record) = T::default();
                Err(e)
            }
        }
    }
}

fn field<T: Default + 'static>(
    name: &'static str,
    extract: fn(&PageContext<'_>) -> Result<T, FieldError>,
    slot: fn(&mut ProductRecord) -> &mut T,
) -> Box<dyn FieldRule> {
    Box::new(Field {
        name,
        extract,
        slot,
    })
}

/// A list of field rules applied in order.
pub type Schema = Vec<Box<dyn FieldRule>>;

/// Fields read from a product detail page.
pub static DETAIL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    vec![
        field("asin", extract::asin, |r| &mut r.asin),
        field("title", extract::title, |r| &mut r.title),
        field("brand", extract::brand, |r| &mut r.brand),
        field("currentPrice", extract::current_price, |r| &mut r.current_price),
        field("originalPrice", extract::original_price, |r| &mut r.original_price),
        field("priceRange", extract::price_range, |r| &mut r.price_range),
        field("rating", extract::rating, |r| &mut r.rating),
        field("reviewCount", extract::review_count, |r| &mut r.review_count),
        field("bestSellerRank", extract::best_seller_rank, |r| &mut r.best_seller_rank),
        field("isBestSeller", extract::is_best_seller, |r| &mut r.is_best_seller),
        field("stockStatus", extract::stock_status, |r| &mut r.stock_status),
        field("shippingInfo", extract::shipping_info, |r| &mut r.shipping_info),
        field("primeEligible", extract::prime_eligible, |r| &mut r.prime_eligible),
        field("category", extract::category, |r| &mut r.category),
        field("features", extract::features, |r| &mut r.features),
        field("specifications", extract::specifications, |r| &mut r.specifications),
        field("description", extract::description, |r| &mut r.description),
        field("variants", extract::variants, |r| &mut r.variants),
        field("images", extract::images, |r| &mut r.images),
        field("reviews", extract::reviews, |r| &mut r.reviews),
        field("affiliateInfo", extract::affiliate_info, |r| &mut r.affiliate_info),
    ]
});

/// Fields read from one listing card; the context is scoped to the card.
pub static CARD_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    vec![
        field("asin", extract::card_asin, |r| &mut r.asin),
        field("title", extract::card_title, |r| &mut r.title),
        field("url", extract::card_link, |r| &mut r.url),
        field("brand", extract::card_brand, |r| &mut r.brand),
        field("currentPrice", extract::card_price, |r| &mut r.current_price),
        field("rating", extract::card_rating, |r| &mut r.rating),
        field("reviewCount", extract::card_review_count, |r| &mut r.review_count),
        field("image", extract::card_image, |r| &mut r.image),
        field("primeEligible", extract::card_prime, |r| &mut r.prime_eligible),
        field("bestSellerRank", extract::card_best_seller_rank, |r| &mut r.best_seller_rank),
        field("isBestSeller", extract::card_is_best_seller, |r| &mut r.is_best_seller),
    ]
});

/// Applies every rule of `schema`, returning the names and errors of failed fields.
pub fn apply_schema(
    schema: &Schema,
    page: &PageContext<'_>,
    record: &mut ProductRecord,
) -> Vec<(&'static str, FieldError)> {
    schema
        .iter()
        .filter_map(|rule| rule.apply(page, record).err().map(|e| (rule.name(), e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::with_page;

    fn exploding(_: &PageContext<'_>) -> Result<String, FieldError> {
        panic!("selector engine blew up")
    }

    fn malformed(_: &PageContext<'_>) -> Result<u64, FieldError> {
        Err(FieldError::Malformed("bad count".to_string()))
    }

    #[test]
    fn test_panicking_extractor_yields_default() {
        let rule = field("title", exploding, |r| &mut r.title);
        let mut record = ProductRecord {
            title: "stale".to_string(),
            ..Default::default()
        };
        with_page("<p></p>", "https://www.amazon.com/dp/B08N5WRWNW", |page| {
            let err = rule.apply(page, &mut record).unwrap_err();
            assert_eq!(
                err,
                FieldError::Panicked("selector engine blew up".to_string())
            );
        });
        assert_eq!(record.title, "");
    }

    #[test]
    fn test_apply_schema_collects_failures() {
        let schema: Schema = vec![
            field("title", extract::title, |r| &mut r.title),
            field("reviewCount", malformed, |r| &mut r.review_count),
        ];
        let mut record = ProductRecord::default();
        let html = r#"<span id="productTitle">Desk Lamp</span>"#;
        let failures = with_page(html, "https://www.amazon.com/dp/B08N5WRWNW", |page| {
            apply_schema(&schema, page, &mut record)
        });
        assert_eq!(record.title, "Desk Lamp");
        assert_eq!(record.review_count, 0);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "reviewCount");
    }
}
