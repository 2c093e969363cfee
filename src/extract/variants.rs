//! Variant labels (colors, sizes, styles, patterns, materials, other).

use scraper::ElementRef;

use super::text::char_len;
use super::PageContext;
use crate::config::{COLOR_MAX_LEN, OTHER_VARIANT_MIN_LEN, SIZE_MAX_LEN, VARIANT_MAX_LEN};
use crate::error_handling::FieldError;
use crate::models::Variants;
use crate::resolver::{element_attr, element_text, SelectorChain};

fn push_unique(into: &mut Vec<String>, label: String) {
    if !into.contains(&label) {
        into.push(label);
    }
}

/// Collects option labels for one dimension, skipping placeholders.
fn option_labels(page: &PageContext<'_>, chain: &SelectorChain, max_len: usize) -> Vec<String> {
    let mut labels = Vec::new();
    for element in page.all(chain) {
        let label = element_text(element);
        if !label.is_empty() && !page.patterns().is_placeholder(&label) && char_len(&label) < max_len {
            push_unique(&mut labels, label);
        }
    }
    labels
}

fn swatch_label(element: ElementRef<'_>) -> Option<String> {
    element_attr(element, "alt").or_else(|| element_attr(element, "title"))
}

/// Variant labels grouped by dimension.
///
/// Colors come from swatch image `alt`/`title` attributes. The `other`
/// group holds labels from unrecognised variation selectors that are not
/// already listed as a color, size or style.
pub fn variants(page: &PageContext<'_>) -> Result<Variants, FieldError> {
    let selectors = page.detail();
    let mut variants = Variants::default();

    for swatch in page.all(&selectors.variant_colors) {
        if let Some(label) = swatch_label(swatch) {
            if !page.patterns().is_rejected_color(&label) && char_len(&label) < COLOR_MAX_LEN {
                push_unique(&mut variants.colors, label);
            }
        }
    }

    variants.sizes = option_labels(page, &selectors.variant_sizes, SIZE_MAX_LEN);
    variants.styles = option_labels(page, &selectors.variant_styles, VARIANT_MAX_LEN);
    variants.patterns = option_labels(page, &selectors.variant_patterns, VARIANT_MAX_LEN);
    variants.materials = option_labels(page, &selectors.variant_materials, VARIANT_MAX_LEN);

    for element in page.all(&selectors.variant_other) {
        let label = Some(element_text(element))
            .filter(|t| !t.is_empty())
            .or_else(|| element_attr(element, "title"));
        let Some(label) = label else { continue };
        let len = char_len(&label);
        let known = variants.colors.contains(&label)
            || variants.sizes.contains(&label)
            || variants.styles.contains(&label);
        if len > OTHER_VARIANT_MIN_LEN
            && len < VARIANT_MAX_LEN
            && !known
            && !page.patterns().is_placeholder(&label)
        {
            push_unique(&mut variants.other, label);
        }
    }

    Ok(variants)
}
