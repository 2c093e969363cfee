//! Customer reviews.

use super::text::{char_len, decimal_token, integer_token};
use super::PageContext;
use crate::config::{MAX_REVIEWS, REVIEW_CONTENT_MAX_LEN, REVIEW_CONTENT_MIN_LEN};
use crate::error_handling::FieldError;
use crate::models::Review;
use crate::resolver::select_first_group;

/// Reduces "Reviewed in the United States on March 3, 2024" to the date part.
fn review_date(raw: &str) -> String {
    match raw.rfind(" on ") {
        Some(pos) => raw[pos + " on ".len()..].trim().to_string(),
        None => raw.trim_start_matches("Reviewed in").trim().to_string(),
    }
}

/// Up to ten reviews from the first container layout present on the page.
///
/// Reviews whose body is too short, too long or carries inline style
/// leakage are dropped.
pub fn reviews(page: &PageContext<'_>) -> Result<Vec<Review>, FieldError> {
    let selectors = page.detail();
    let containers = select_first_group(page.root, &selectors.review_containers);
    let mut reviews = Vec::new();

    for container in containers.into_iter().take(MAX_REVIEWS) {
        let scope = page.scoped(container);
        let content = scope.text(&selectors.review_content).unwrap_or_default();
        let len = char_len(&content);
        if len <= REVIEW_CONTENT_MIN_LEN
            || len >= REVIEW_CONTENT_MAX_LEN
            || page.patterns().is_leaky_review(&content)
        {
            continue;
        }
        reviews.push(Review {
            rating: scope
                .text(&selectors.review_rating)
                .and_then(|t| decimal_token(&t))
                .unwrap_or_default(),
            title: scope.text(&selectors.review_title).unwrap_or_default(),
            content,
            author: scope.text(&selectors.review_author).unwrap_or_default(),
            date: scope
                .text(&selectors.review_date)
                .map(|d| review_date(&d))
                .unwrap_or_default(),
            verified: scope.matches(&selectors.review_verified),
            helpful_votes: scope
                .text(&selectors.review_helpful)
                .and_then(|t| integer_token(&t))
                .unwrap_or_else(|| "0".to_string()),
        });
    }
    Ok(reviews)
}
