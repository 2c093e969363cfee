//! Browser request header values.
//!
//! Fetched pages are requested with the same header set a desktop browser
//! sends on a top-level navigation, so listing pages render their normal
//! markup instead of a degraded bot variant.

/// `Accept` header of a top-level navigation
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
/// `Accept-Language` header
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
/// `Accept-Encoding` header
pub const BROWSER_ACCEPT_ENCODING: &str = "gzip, deflate, br";
/// Referer used when a request has no originating page
pub const DEFAULT_REFERER: &str = "https://www.google.com/";
/// `Cache-Control` header
pub const BROWSER_CACHE_CONTROL: &str = "max-age=0";

/// Fetch metadata headers of a user-initiated navigation.
///
/// `sec-fetch-site` is filled in per request (`none` without a referer,
/// `same-origin` when following pagination).
pub const SEC_FETCH_HEADERS: &[(&str, &str)] = &[
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-user", "?1"),
];
