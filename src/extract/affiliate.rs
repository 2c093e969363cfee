//! Affiliate toolbar data.

use super::PageContext;
use crate::error_handling::FieldError;
use crate::models::AffiliateInfo;

/// Reads the associates toolbar; all fields empty when it is not on the page.
pub fn affiliate_info(page: &PageContext<'_>) -> Result<AffiliateInfo, FieldError> {
    let selectors = page.detail();
    if !page.matches(&selectors.affiliate_toolbar) {
        return Ok(AffiliateInfo::default());
    }
    Ok(AffiliateInfo {
        available: true,
        category: page.text(&selectors.affiliate_category).unwrap_or_default(),
        commission_rate: page
            .text(&selectors.affiliate_commission)
            .unwrap_or_default(),
        tracking_id: page
            .attr(&selectors.affiliate_tracking_id, "value")
            .unwrap_or_default(),
        store_id: page
            .attr(&selectors.affiliate_store_id, "value")
            .unwrap_or_default(),
    })
}
