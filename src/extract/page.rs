//! Page kind detection.

use url::Url;

use super::PageContext;

/// What a URL points at on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PageKind {
    /// A product detail page
    Product,
    /// Keyword search results
    Search,
    /// A browse node (category) listing
    Category,
    /// A brand storefront
    Store,
    /// Anything else, including other hosts
    Unknown,
}

impl PageKind {
    /// True for kinds that show a grid of result cards.
    pub fn is_listing(self) -> bool {
        matches!(self, PageKind::Search | PageKind::Category | PageKind::Store)
    }
}

/// Classifies a marketplace URL by its path.
///
/// Hosts that are not a marketplace domain are always `Unknown`.
pub fn detect_page_kind(url: &Url) -> PageKind {
    let is_marketplace = url
        .host_str()
        .is_some_and(|host| host.split('.').any(|label| label == "amazon"));
    if !is_marketplace {
        return PageKind::Unknown;
    }
    let path = url.path();
    if path.contains("/dp/") || path.contains("/gp/product/") {
        PageKind::Product
    } else if path == "/s" || path.starts_with("/s/") || path.contains("/gp/search/") {
        PageKind::Search
    } else if path == "/b" || path.contains("/b/") {
        PageKind::Category
    } else if path.contains("/stores/") {
        PageKind::Store
    } else {
        PageKind::Unknown
    }
}

/// True when the document is a product detail page, judged by URL or title marker.
pub fn is_product_page(page: &PageContext<'_>) -> bool {
    let path = page.url.path();
    path.contains("/dp/")
        || path.contains("/gp/product/")
        || page.matches(&page.detail().product_marker)
}

/// True when the document shows result cards, judged by URL kind or containers.
pub fn is_listing_page(page: &PageContext<'_>) -> bool {
    detect_page_kind(page.url).is_listing() || page.matches(&page.listing().result_container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::with_page;

    fn kind(url: &str) -> PageKind {
        detect_page_kind(&Url::parse(url).expect("url"))
    }

    #[test]
    fn test_detect_page_kind() {
        assert_eq!(kind("https://www.amazon.com/Echo/dp/B08N5WRWNW"), PageKind::Product);
        assert_eq!(kind("https://www.amazon.co.uk/gp/product/B08N5WRWNW"), PageKind::Product);
        assert_eq!(kind("https://www.amazon.com/s?k=speakers"), PageKind::Search);
        assert_eq!(kind("https://www.amazon.de/gp/search/ref=x"), PageKind::Search);
        assert_eq!(kind("https://www.amazon.com/b?node=172282"), PageKind::Category);
        assert_eq!(kind("https://www.amazon.com/Audio/b/?node=1"), PageKind::Category);
        assert_eq!(kind("https://www.amazon.com/stores/Anker/page/1"), PageKind::Store);
        assert_eq!(kind("https://www.amazon.com/gp/help"), PageKind::Unknown);
        assert_eq!(kind("https://example.com/dp/B08N5WRWNW"), PageKind::Unknown);
        assert_eq!(kind("https://notamazon.com/s?k=x"), PageKind::Unknown);
    }

    #[test]
    fn test_listing_kinds() {
        assert!(PageKind::Search.is_listing());
        assert!(!PageKind::Product.is_listing());
        assert_eq!(PageKind::Category.to_string(), "category");
    }

    #[test]
    fn test_is_product_page_by_marker() {
        with_page(r#"<span id="productTitle">Thing</span>"#, "http://127.0.0.1/item", |page| {
            assert!(is_product_page(page));
            assert!(!is_listing_page(page));
        });
        with_page("<p></p>", "https://www.amazon.com/dp/B08N5WRWNW", |page| {
            assert!(is_product_page(page));
        });
    }

    #[test]
    fn test_is_listing_page_by_containers() {
        let html = r#"<div data-component-type="s-search-result" data-asin="B000000001"></div>"#;
        with_page(html, "http://127.0.0.1/results", |page| {
            assert!(is_listing_page(page));
            assert!(!is_product_page(page));
        });
    }
}
