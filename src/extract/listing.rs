//! Result cards on search and category listings.

use scraper::ElementRef;
use url::Url;

use super::text::{clean_brand, decimal_token, parse_count, price_token};
use super::PageContext;
use crate::config::MAX_RATING;
use crate::error_handling::FieldError;
use crate::resolver::{element_text, select_first_group};

/// Result containers of the first recognised layout, in page order.
///
/// Spacer containers that carry neither an identifier nor any text are
/// skipped.
pub fn listing_cards<'a>(page: &PageContext<'a>) -> Vec<ElementRef<'a>> {
    select_first_group(page.root, &page.listing().result_container)
        .into_iter()
        .filter(|card| {
            card.value()
                .attr("data-asin")
                .is_some_and(|a| !a.trim().is_empty())
                || !element_text(*card).is_empty()
        })
        .collect()
}

/// Absolute URL of the "next page" control, if the page has one.
pub fn next_page_url(page: &PageContext<'_>) -> Option<Url> {
    page.attr(&page.listing().next_page, "href")
        .and_then(|href| page.url.join(&href).ok())
}

/// Card title.
pub fn card_title(card: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(card.text(&card.listing().item_title).unwrap_or_default())
}

/// Absolute link to the product detail page.
pub fn card_link(card: &PageContext<'_>) -> Result<String, FieldError> {
    let Some(href) = card.attr(&card.listing().item_link, "href") else {
        return Ok(String::new());
    };
    card.url
        .join(&href)
        .map(String::from)
        .map_err(|e| FieldError::Malformed(format!("link '{}': {}", href, e)))
}

/// Brand line of a card.
pub fn card_brand(card: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(card
        .text(&card.listing().item_brand)
        .map(|b| clean_brand(&b))
        .unwrap_or_default())
}

/// Displayed price of a card.
pub fn card_price(card: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(card
        .text(&card.listing().item_price)
        .and_then(|t| price_token(&t))
        .unwrap_or_default())
}

/// Card rating; a value above the 5-star scale is malformed.
pub fn card_rating(card: &PageContext<'_>) -> Result<Option<f64>, FieldError> {
    let Some(token) = card.text(&card.listing().item_rating).and_then(|t| decimal_token(&t)) else {
        return Ok(None);
    };
    match token.parse::<f64>() {
        Ok(value) if value <= MAX_RATING => Ok(Some(value)),
        _ => Err(FieldError::Malformed(format!("rating '{}'", token))),
    }
}

/// Ratings count of a card.
pub fn card_review_count(card: &PageContext<'_>) -> Result<u64, FieldError> {
    Ok(card
        .text(&card.listing().item_review_count)
        .and_then(|t| parse_count(&t))
        .unwrap_or(0))
}

/// Thumbnail `src` of a card.
pub fn card_image(card: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(card.attr(&card.listing().item_image, "src").unwrap_or_default())
}

/// Whether the card carries a Prime badge.
pub fn card_prime(card: &PageContext<'_>) -> Result<bool, FieldError> {
    Ok(card.matches(&card.listing().item_prime))
}

/// Best-seller badge text of a card.
pub fn card_best_seller_rank(card: &PageContext<'_>) -> Result<String, FieldError> {
    Ok(card
        .all(&card.listing().item_best_seller)
        .into_iter()
        .map(element_text)
        .find(|text| card.patterns().is_best_seller_badge(text))
        .unwrap_or_default())
}

/// Whether the card carries a best-seller badge.
pub fn card_is_best_seller(card: &PageContext<'_>) -> Result<bool, FieldError> {
    card_best_seller_rank(card).map(|rank| !rank.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::with_page;

    const URL: &str = "https://www.amazon.com/s?k=speaker";

    const CARD: &str = r#"
        <div data-component-type="s-search-result" data-asin="B0SPEAKER1">
            <img class="s-image" src="https://m.media-amazon.com/images/I/s1.jpg">
            <h2><a class="a-link-normal" href="/Mini-Speaker/dp/B0SPEAKER1/ref=sr_1_1"><span>Mini Speaker</span></a></h2>
            <span class="a-badge-text">Best Seller</span>
            <i class="a-icon-star-small"><span class="a-icon-alt">4.4 out of 5 stars</span></i>
            <span class="a-size-base s-underline-text">(2.1K)</span>
            <span class="a-price"><span class="a-offscreen">$29.99</span></span>
            <i class="a-icon-prime"></i>
        </div>
        <div data-component-type="s-search-result" data-asin=""></div>
        <a class="s-pagination-next" href="/s?k=speaker&page=2">Next</a>"#;

    #[test]
    fn test_card_fields() {
        with_page(CARD, URL, |page| {
            let cards = listing_cards(page);
            assert_eq!(cards.len(), 1);
            let card = page.scoped(cards[0]);
            assert_eq!(card_title(&card).unwrap(), "Mini Speaker");
            assert_eq!(
                card_link(&card).unwrap(),
                "https://www.amazon.com/Mini-Speaker/dp/B0SPEAKER1/ref=sr_1_1"
            );
            assert_eq!(card_price(&card).unwrap(), "29.99");
            assert_eq!(card_rating(&card).unwrap(), Some(4.4));
            assert_eq!(card_review_count(&card).unwrap(), 2100);
            assert_eq!(card_image(&card).unwrap(), "https://m.media-amazon.com/images/I/s1.jpg");
            assert!(card_prime(&card).unwrap());
            assert!(card_is_best_seller(&card).unwrap());
        });
    }

    #[test]
    fn test_next_page_url_resolved() {
        with_page(CARD, URL, |page| {
            assert_eq!(
                next_page_url(page).map(String::from),
                Some("https://www.amazon.com/s?k=speaker&page=2".to_string())
            );
        });
    }

    #[test]
    fn test_disabled_next_is_last_page() {
        let html = r#"<span class="s-pagination-next s-pagination-disabled">Next</span>
            <a class="s-pagination-next s-pagination-disabled" href="/s?page=9">Next</a>"#;
        with_page(html, URL, |page| {
            assert_eq!(next_page_url(page), None);
        });
    }
}
