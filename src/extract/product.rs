//! Scalar fields of a detail page: title, brand, prices, rating and badges.

use super::text::{clean_brand, decimal_token, parse_count, price_token};
use super::PageContext;
use crate::config::MAX_RATING;
use crate::error_handling::FieldError;
use crate::models::PriceRange;
use crate::resolver::{element_text, select_all_groups, select_first_group};

/// Product title.
pub fn title(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page.text(&page.detail().title).unwrap_or_default())
}

/// Brand, with "Visit the … Store" and "Brand:" wrappers removed.
pub fn brand(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page
        .text(&page.detail().brand)
        .map(|b| clean_brand(&b))
        .unwrap_or_default())
}

/// Displayed price without currency symbol.
pub fn current_price(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page
        .text(&page.detail().current_price)
        .and_then(|t| price_token(&t))
        .unwrap_or_default())
}

/// List price shown next to a discount.
pub fn original_price(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page
        .text(&page.detail().original_price)
        .and_then(|t| price_token(&t))
        .unwrap_or_default())
}

/// Reads the first two displayed values inside a price-range container.
///
/// # Errors
///
/// A container with fewer than two price values is malformed.
pub fn price_range(page: &PageContext<'_>) -> Result<Option<PriceRange>, FieldError> {
    let Some(container) = select_first_group(page.root, &page.detail().price_range)
        .into_iter()
        .next()
    else {
        return Ok(None);
    };
    let values: Vec<String> = select_all_groups(container, &page.detail().price_range_value)
        .into_iter()
        .filter_map(|el| price_token(&element_text(el)))
        .take(2)
        .collect();
    match <[String; 2]>::try_from(values) {
        Ok([min, max]) => Ok(Some(PriceRange { min, max })),
        Err(values) => Err(FieldError::Malformed(format!(
            "price range with {} value(s)",
            values.len()
        ))),
    }
}

/// Average star rating.
///
/// # Errors
///
/// A rating above the 5-star scale is malformed.
pub fn rating(page: &PageContext<'_>) -> Result<Option<f64>, FieldError> {
    let Some(token) = page.text(&page.detail().rating).and_then(|t| decimal_token(&t)) else {
        return Ok(None);
    };
    let value: f64 = token
        .parse()
        .map_err(|_| FieldError::Malformed(format!("rating '{}'", token)))?;
    if value > MAX_RATING {
        return Err(FieldError::Malformed(format!(
            "rating {} exceeds {}",
            value, MAX_RATING
        )));
    }
    Ok(Some(value))
}

/// Number of ratings; `0` when absent.
pub fn review_count(page: &PageContext<'_>) -> Result<u64, FieldError> {
    Ok(page
        .text(&page.detail().review_count)
        .and_then(|t| parse_count(&t))
        .unwrap_or(0))
}

/// Availability text.
pub fn stock_status(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page.text(&page.detail().stock_status).unwrap_or_default())
}

/// Delivery message.
pub fn shipping_info(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page.text(&page.detail().shipping).unwrap_or_default())
}

/// Whether a Prime badge is shown.
pub fn prime_eligible(page: &PageContext<'_>) -> Result<bool, FieldError> {
    Ok(page.matches(&page.detail().prime_badge))
}

/// Text of the first badge that marks a best seller.
pub fn best_seller_rank(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page
        .all(&page.detail().best_seller_badge)
        .into_iter()
        .map(element_text)
        .find(|text| page.patterns().is_best_seller_badge(text))
        .unwrap_or_default())
}

/// Whether a best-seller badge is shown.
pub fn is_best_seller(page: &PageContext<'_>) -> Result<bool, FieldError> {
    best_seller_rank(page).map(|rank| !rank.is_empty())
}

/// Breadcrumb trail joined with " > ".
pub fn category(page: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(page
        .all(&page.detail().breadcrumbs)
        .into_iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" > "))
}
