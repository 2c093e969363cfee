//! Product image URLs.

use super::PageContext;
use crate::error_handling::FieldError;
use crate::resolver::{element_attr, select_first_group};

/// Attributes read from the main image, in priority order.
const MAIN_IMAGE_ATTRS: &[&str] = &["data-old-hires", "src", "data-src"];

/// Attributes read from gallery thumbnails; every one that is set is collected.
const ALTERNATE_IMAGE_ATTRS: &[&str] = &["data-old-hires", "src", "data-src", "data-a-hires"];

/// Product images: the main image, then gallery images, high resolution first.
///
/// Decorative images (logos, play buttons, small thumbnails) and anything off
/// the product image path are dropped. Ordering within each resolution class
/// follows discovery order.
pub fn images(page: &PageContext<'_>) -> Result<Vec<String>, FieldError> {
    let patterns = page.patterns();
    let mut found: Vec<String> = Vec::new();
    let mut push = |src: String| {
        if patterns.is_product_image(&src) && !found.contains(&src) {
            found.push(src);
        }
    };

    if let Some(main) = select_first_group(page.root, &page.detail().main_image)
        .into_iter()
        .next()
    {
        if let Some(src) = MAIN_IMAGE_ATTRS
            .iter()
            .find_map(|attr| element_attr(main, attr))
        {
            push(src);
        }
    }

    for element in page.all(&page.detail().alternate_images) {
        for attr in ALTERNATE_IMAGE_ATTRS {
            if let Some(src) = element_attr(element, attr) {
                push(src);
            }
        }
    }

    found.sort_by_key(|src| !patterns.is_hi_res(src));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::with_page;

    const URL: &str = "https://www.amazon.com/dp/B08N5WRWNW";

    #[test]
    fn test_main_image_prefers_hires_attribute() {
        let html = r#"<img id="landingImage"
            data-old-hires="https://m.media-amazon.com/images/I/main._AC_SL1500_.jpg"
            src="https://m.media-amazon.com/images/I/main._AC_US40_.jpg">"#;
        with_page(html, URL, |page| {
            assert_eq!(
                images(page).unwrap(),
                vec!["https://m.media-amazon.com/images/I/main._AC_SL1500_.jpg".to_string()]
            );
        });
    }

    #[test]
    fn test_filters_decorative_and_off_path_images() {
        let html = r#"<div id="altImages">
            <img src="https://m.media-amazon.com/images/I/thumb._SS125_.jpg">
            <img src="https://m.media-amazon.com/images/G/01/play-button-mb-image-grid.png">
            <img src="https://m.media-amazon.com/images/G/01/sprite.png">
            <img src="https://m.media-amazon.com/images/I/alt1._AC_US100_.jpg">
        </div>"#;
        with_page(html, URL, |page| {
            assert_eq!(
                images(page).unwrap(),
                vec!["https://m.media-amazon.com/images/I/alt1._AC_US100_.jpg".to_string()]
            );
        });
    }

    #[test]
    fn test_hi_res_sorted_first_and_deduplicated() {
        let html = r#"
            <img id="landingImage" class="a-dynamic-image"
                src="https://m.media-amazon.com/images/I/a._AC_US200_.jpg">
            <div id="altImages">
                <img src="https://m.media-amazon.com/images/I/b._AC_US40_.jpg"
                     data-a-hires="https://m.media-amazon.com/images/I/b._AC_SX679_.jpg">
            </div>"#;
        with_page(html, URL, |page| {
            assert_eq!(
                images(page).unwrap(),
                vec![
                    "https://m.media-amazon.com/images/I/b._AC_SX679_.jpg".to_string(),
                    "https://m.media-amazon.com/images/I/a._AC_US200_.jpg".to_string(),
                    "https://m.media-amazon.com/images/I/b._AC_US40_.jpg".to_string(),
                ]
            );
        });
    }
}
