// Shared fixtures for integration tests: product and listing page markup.

/// A product detail page; `price` of `None` leaves out the price block.
#[allow(dead_code)] // Used by other test files
pub fn product_html(asin: &str, title: &str, price: Option<&str>) -> String {
    let price_block = price
        .map(|p| {
            format!(
                r#"<div id="corePrice_feature_div"><span class="a-price"><span class="a-offscreen">${}</span></span></div>"#,
                p
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body>
        <div id="dp" data-asin="{asin}">
            <span id="productTitle">{title}</span>
            <a id="bylineInfo">Visit the Lumen Store</a>
            {price_block}
            <span id="acrPopover"><span class="a-icon-alt">4.4 out of 5 stars</span></span>
            <span id="acrCustomerReviewText">1,024 ratings</span>
            <div id="availability"><span>In Stock</span></div>
        </div>
        </body></html>"#
    )
}

/// One search result card.
#[allow(dead_code)]
pub fn card_html(asin: &str, title: &str, reviews: u64) -> String {
    format!(
        r#"<div data-component-type="s-search-result" data-asin="{asin}">
            <h2><a class="a-link-normal" href="/dp/{asin}"><span>{title}</span></a></h2>
            <span class="a-price"><span class="a-offscreen">$19.99</span></span>
            <i class="a-icon-star-small"><span class="a-icon-alt">4.5 out of 5 stars</span></i>
            <span class="a-size-base s-underline-text">{reviews}</span>
        </div>"#
    )
}

/// A result page holding `cards`, with a next-page control when `next` is given.
#[allow(dead_code)]
pub fn listing_html(cards: &[String], next: Option<&str>) -> String {
    let next = next
        .map(|href| format!(r#"<a class="s-pagination-next" href="{}">Next</a>"#, href))
        .unwrap_or_else(|| {
            r#"<span class="s-pagination-next s-pagination-disabled">Next</span>"#.to_string()
        });
    format!(
        "<html><body><div class=\"s-main-slot\">{}</div>{}</body></html>",
        cards.join("\n"),
        next
    )
}
