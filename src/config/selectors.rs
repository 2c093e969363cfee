//! Selector tables.
//!
//! Every field is resolved through a [`SelectorChain`]. The built-in tables
//! target the current marketplace markup; a JSON file with the same shape
//! can replace any subset of chains when the markup drifts.

use serde::{Deserialize, Serialize};

use crate::resolver::SelectorChain;

fn chain(selectors: &[&str]) -> SelectorChain {
    SelectorChain::from(selectors)
}

/// All selector chains used by the extractors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorTable {
    /// Product detail page fields
    pub detail: DetailSelectors,
    /// Search/category result page fields
    pub listing: ListingSelectors,
}

/// Selector chains for a product detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetailSelectors {
    /// Marker element whose presence identifies a detail page
    pub product_marker: SelectorChain,
    /// Elements carrying the identifier in `data-asin`
    pub asin_attribute: SelectorChain,
    /// Hidden form inputs carrying the identifier in `value`
    pub asin_input: SelectorChain,
    /// Meta tags carrying the identifier in `content`
    pub asin_meta: SelectorChain,
    /// Canonical link whose `href` contains the product path
    pub canonical_link: SelectorChain,
    /// Product title
    pub title: SelectorChain,
    /// Brand byline
    pub brand: SelectorChain,
    /// Displayed price
    pub current_price: SelectorChain,
    /// List price before discount
    pub original_price: SelectorChain,
    /// Container of a "from - to" price range
    pub price_range: SelectorChain,
    /// Price values inside the range container
    pub price_range_value: SelectorChain,
    /// Average rating text
    pub rating: SelectorChain,
    /// Ratings count text
    pub review_count: SelectorChain,
    /// Availability text
    pub stock_status: SelectorChain,
    /// Delivery message
    pub shipping: SelectorChain,
    /// Prime badge
    pub prime_badge: SelectorChain,
    /// Best-seller badge
    pub best_seller_badge: SelectorChain,
    /// Category breadcrumb links
    pub breadcrumbs: SelectorChain,
    /// Feature bullets
    pub features: SelectorChain,
    /// Table rows and list items holding key/value specifications
    pub specifications: SelectorChain,
    /// Description blocks
    pub description: SelectorChain,
    /// Consulted only when `description` yields nothing usable
    pub description_fallback: SelectorChain,
    /// Swatch images; the color name is read from `alt` or `title`
    pub variant_colors: SelectorChain,
    /// Size options
    pub variant_sizes: SelectorChain,
    /// Style options
    pub variant_styles: SelectorChain,
    /// Pattern options
    pub variant_patterns: SelectorChain,
    /// Material options
    pub variant_materials: SelectorChain,
    /// Options of any other variation dimension
    pub variant_other: SelectorChain,
    /// Main product image
    pub main_image: SelectorChain,
    /// Thumbnail strip images
    pub alternate_images: SelectorChain,
    /// Review blocks; the first selector that matches anything is used
    pub review_containers: SelectorChain,
    /// Star rating inside a review
    pub review_rating: SelectorChain,
    /// Review headline
    pub review_title: SelectorChain,
    /// Review body
    pub review_content: SelectorChain,
    /// Reviewer name
    pub review_author: SelectorChain,
    /// Review date line
    pub review_date: SelectorChain,
    /// Verified-purchase badge
    pub review_verified: SelectorChain,
    /// Helpful vote line
    pub review_helpful: SelectorChain,
    /// Associate toolbar wrapper; present only for signed-in associates
    pub affiliate_toolbar: SelectorChain,
    /// Commission category
    pub affiliate_category: SelectorChain,
    /// Commission rate
    pub affiliate_commission: SelectorChain,
    /// Associate tracking ID
    pub affiliate_tracking_id: SelectorChain,
    /// Associate store ID
    pub affiliate_store_id: SelectorChain,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            product_marker: chain(&["#productTitle"]),
            asin_attribute: chain(&["[data-asin]"]),
            asin_input: chain(&["input[name=\"ASIN\"]", "input#ASIN"]),
            asin_meta: chain(&["meta[name=\"asin\"]", "meta[property=\"og:asin\"]"]),
            canonical_link: chain(&["link[rel=\"canonical\"]"]),
            title: chain(&[
                "#productTitle",
                ".product-title",
                "h1[data-automation-id=\"product-title\"]",
                ".a-size-large.product-title-word-break",
            ]),
            brand: chain(&[
                "#bylineInfo",
                ".a-link-normal[data-attribute=\"brand\"]",
                ".po-brand .po-break-word",
                "a[data-attribute=\"brand\"]",
            ]),
            current_price: chain(&[
                ".a-price.a-text-price.a-size-medium.apexPriceToPay .a-offscreen",
                ".a-price .a-offscreen",
                "#priceblock_dealprice",
                "#priceblock_ourprice",
                ".a-price-whole",
            ]),
            original_price: chain(&[
                ".a-price.a-text-price .a-offscreen",
                "#priceblock_listprice",
                ".a-text-strike .a-offscreen",
            ]),
            price_range: chain(&[".a-price-range"]),
            price_range_value: chain(&[".a-offscreen"]),
            rating: chain(&[
                "[data-hook=\"average-star-rating\"] .a-icon-alt",
                ".a-icon-star .a-icon-alt",
                "#acrPopover .a-icon-alt",
            ]),
            review_count: chain(&[
                "[data-hook=\"total-review-count\"]",
                "#acrCustomerReviewText",
                ".a-link-normal[href*=\"#customerReviews\"]",
            ]),
            stock_status: chain(&[
                "#availability span",
                ".a-color-success",
                ".a-color-state",
                "#outOfStock",
            ]),
            shipping: chain(&[
                "#deliveryBlockMessage",
                ".a-color-success.a-text-bold",
                "[data-feature-name=\"delivery\"] .a-color-success",
            ]),
            prime_badge: chain(&[
                "[aria-label*=\"Prime\"]",
                ".a-icon-prime",
                "[data-testid=\"prime-logo\"]",
            ]),
            best_seller_badge: chain(&[".a-badge-text", "[data-hook=\"badge-text\"]"]),
            breadcrumbs: chain(&[
                "#wayfinding-breadcrumbs_feature_div a",
                ".a-breadcrumb a",
            ]),
            features: chain(&[
                "#feature-bullets ul li",
                "[data-hook=\"feature-bullets\"] li",
                "#featurebullets_feature_div ul li",
                ".a-unordered-list.a-vertical li",
            ]),
            specifications: chain(&[
                "#productDetails_techSpec_section_1 tr",
                "#productDetails_detailBullets_sections1 tr",
                ".a-keyvalue tr",
                "#detailBullets_feature_div ul li",
                ".pdTab table tr",
            ]),
            description: chain(&["#productDescription p", "#productDescription div"]),
            description_fallback: chain(&[
                "#feature-bullets ul li span",
                ".a-unordered-list .a-list-item",
                "#aplus_feature_div p",
            ]),
            variant_colors: chain(&[
                "[data-defaultasin] img",
                ".a-button-thumbnail img",
                "#variation_color_name img",
                "[data-dp-url] img",
                ".swatchElement img",
                ".a-button-selected img",
                ".imgSwatch img",
            ]),
            variant_sizes: chain(&[
                "#size_name_0 option",
                "#size_name_1 option",
                ".a-dropdown-item",
                "[data-dp-url*=\"size\"]",
                ".size-option",
                ".a-button-text[data-action*=\"size\"]",
                "#variation_size_name option",
            ]),
            variant_styles: chain(&[
                "#style_name_0 option",
                "#variation_style_name option",
                "[data-dp-url*=\"style\"]",
                ".style-option",
            ]),
            variant_patterns: chain(&[
                "#pattern_name_0 option",
                "#variation_pattern_name option",
            ]),
            variant_materials: chain(&[
                "#material_name_0 option",
                "#variation_material_name option",
            ]),
            variant_other: chain(&[
                "[id*=\"variation_\"] option",
                "[data-dp-url]:not([data-dp-url*=\"color\"]):not([data-dp-url*=\"size\"]):not([data-dp-url*=\"style\"])",
            ]),
            main_image: chain(&["#landingImage"]),
            alternate_images: chain(&["#altImages img", ".a-dynamic-image"]),
            review_containers: chain(&[
                "[data-hook=\"review\"]",
                ".review",
                ".cr-original-review-text",
                ".a-section.review",
            ]),
            review_rating: chain(&[
                ".a-icon-star .a-icon-alt",
                "[data-hook=\"review-star-rating\"] .a-icon-alt",
                ".a-icon-alt",
            ]),
            review_title: chain(&[
                "[data-hook=\"review-title\"] span:not(.a-letter-space)",
                "[data-hook=\"review-title\"]",
                ".review-title",
            ]),
            review_content: chain(&[
                "[data-hook=\"review-body\"] span",
                "[data-hook=\"review-body\"]",
                ".review-text",
                ".cr-original-review-text",
            ]),
            review_author: chain(&[
                ".a-profile-name",
                "[data-hook=\"review-author\"]",
                ".author",
            ]),
            review_date: chain(&["[data-hook=\"review-date\"]", ".review-date"]),
            review_verified: chain(&["[data-hook=\"avp-badge\"]"]),
            review_helpful: chain(&["[data-hook=\"helpful-vote-statement\"]"]),
            affiliate_toolbar: chain(&[".amzn-ss-wrap"]),
            affiliate_category: chain(&["#amzn-ss-category-content"]),
            affiliate_commission: chain(&["#amzn-ss-commission-rate-content"]),
            affiliate_tracking_id: chain(&["#amzn-ss-tracking-id-dropdown-text"]),
            affiliate_store_id: chain(&["#amzn-ss-store-id-dropdown-text"]),
        }
    }
}

/// Selector chains for a search/category result page.
///
/// Item-level chains are resolved relative to one result container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingSelectors {
    /// One element per product card
    pub result_container: SelectorChain,
    /// Card title
    pub item_title: SelectorChain,
    /// Product link; the `href` is resolved against the page URL
    pub item_link: SelectorChain,
    /// Card brand line
    pub item_brand: SelectorChain,
    /// Card price
    pub item_price: SelectorChain,
    /// Card rating text
    pub item_rating: SelectorChain,
    /// Card ratings count
    pub item_review_count: SelectorChain,
    /// Card thumbnail
    pub item_image: SelectorChain,
    /// Card Prime badge
    pub item_prime: SelectorChain,
    /// Card best-seller badge
    pub item_best_seller: SelectorChain,
    /// The canonical "next page" control; absence means last page
    pub next_page: SelectorChain,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            result_container: chain(&[
                "[data-component-type=\"s-search-result\"]",
                "div.s-result-item[data-asin]",
            ]),
            item_title: chain(&[
                "h2 a span",
                "h2 span.a-text-normal",
                ".a-size-medium.a-text-normal",
                ".a-size-base-plus.a-text-normal",
                "h2",
            ]),
            item_link: chain(&[
                "h2 a.a-link-normal",
                "h2 a.s-link-style",
                ".a-link-normal.s-underline-text",
                "h2 a",
                "a.a-link-normal[href*=\"/dp/\"]",
            ]),
            item_brand: chain(&[
                ".s-line-clamp-1 .a-size-base-plus",
                "h5 .a-size-base-plus",
                ".a-row.a-size-base.a-color-secondary .a-size-base",
            ]),
            item_price: chain(&[
                ".a-price:not([data-a-strike]) .a-offscreen",
                ".a-price .a-offscreen",
            ]),
            item_rating: chain(&[
                "i.a-icon-star-small span.a-icon-alt",
                "i.a-icon-star span.a-icon-alt",
                "span.a-icon-alt",
            ]),
            item_review_count: chain(&[
                "span.a-size-base.s-underline-text",
                "a[href*=\"customerReviews\"] span",
                ".a-size-base.puis-light-weight-text",
            ]),
            item_image: chain(&["img.s-image", ".s-product-image-container img"]),
            item_prime: chain(&[
                "i.a-icon-prime",
                "[data-component-type=\"s-prime-badge\"]",
                "[aria-label*=\"Prime\"]",
            ]),
            item_best_seller: chain(&[
                ".a-badge-text",
                "[data-component-type=\"s-status-badge-component\"]",
            ]),
            next_page: chain(&["a.s-pagination-next:not(.s-pagination-disabled)"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_selector_with_fallback;

    #[test]
    fn test_default_selectors_all_parse() {
        let table = SelectorTable::default();
        let json = serde_json::to_value(&table).unwrap();
        for group in ["detail", "listing"] {
            let fields = json[group].as_object().unwrap();
            for (field, selectors) in fields {
                for selector in selectors.as_array().unwrap() {
                    let s = selector.as_str().unwrap();
                    assert!(
                        parse_selector_with_fallback(s).is_some(),
                        "{}.{} has malformed selector {}",
                        group,
                        field,
                        s
                    );
                }
            }
        }
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r##"{"detail": {"title": ["#customTitle"]}}"##;
        let table: SelectorTable = serde_json::from_str(json).unwrap();
        assert_eq!(
            table.detail.title.iter().collect::<Vec<_>>(),
            vec!["#customTitle"]
        );
        assert_eq!(table.detail.brand, DetailSelectors::default().brand);
        assert_eq!(table.listing, ListingSelectors::default());
    }
}
