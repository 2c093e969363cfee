//! Browser-like request headers.

use reqwest::header::{
    HeaderName, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use url::Url;

use crate::config::{
    BROWSER_ACCEPT, BROWSER_ACCEPT_ENCODING, BROWSER_ACCEPT_LANGUAGE, BROWSER_CACHE_CONTROL,
    DEFAULT_REFERER, SEC_FETCH_HEADERS,
};

/// Headers a desktop browser sends on a top-level navigation.
///
/// The user agent is set on the client. Marketplace pages serve reduced or
/// challenge markup to requests without this header set, so every page fetch
/// goes through [`RequestHeaders::apply_to_request_builder`].
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Value of `sec-fetch-site` for a navigation from `referer`.
    fn fetch_site(referer: Option<&Url>) -> &'static str {
        if referer.is_some() {
            "same-origin"
        } else {
            "none"
        }
    }

    /// Returns the header set as (name, value) pairs, for logging.
    pub(crate) fn as_vec(referer: Option<&Url>) -> Vec<(String, String)> {
        let mut headers = vec![
            ("accept".to_string(), BROWSER_ACCEPT.to_string()),
            ("accept-language".to_string(), BROWSER_ACCEPT_LANGUAGE.to_string()),
            ("accept-encoding".to_string(), BROWSER_ACCEPT_ENCODING.to_string()),
            (
                "referer".to_string(),
                referer.map_or(DEFAULT_REFERER.to_string(), |r| r.to_string()),
            ),
        ];
        headers.extend(
            SEC_FETCH_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        headers.push((
            "sec-fetch-site".to_string(),
            Self::fetch_site(referer).to_string(),
        ));
        headers.push(("upgrade-insecure-requests".to_string(), "1".to_string()));
        headers.push(("cache-control".to_string(), BROWSER_CACHE_CONTROL.to_string()));
        headers
    }

    /// Applies the navigation headers to a request.
    ///
    /// `referer` is the page the navigation originates from (the previous
    /// listing page when paginating); without one a search-engine referer
    /// is sent.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
        referer: Option<&Url>,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder
            .header(ACCEPT, BROWSER_ACCEPT)
            .header(ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
            .header(ACCEPT_ENCODING, BROWSER_ACCEPT_ENCODING)
            .header(
                REFERER,
                referer.map_or(DEFAULT_REFERER.to_string(), |r| r.to_string()),
            )
            .header(
                HeaderName::from_static("sec-fetch-site"),
                Self::fetch_site(referer),
            )
            .header(UPGRADE_INSECURE_REQUESTS, "1")
            .header(CACHE_CONTROL, BROWSER_CACHE_CONTROL);
        for (name, value) in SEC_FETCH_HEADERS {
            builder = builder.header(HeaderName::from_static(*name), *value);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_headers_without_referer() {
        let headers = RequestHeaders::as_vec(None);
        assert_eq!(header(&headers, "referer"), Some(DEFAULT_REFERER));
        assert_eq!(header(&headers, "sec-fetch-site"), Some("none"));
        assert_eq!(header(&headers, "sec-fetch-mode"), Some("navigate"));
    }

    #[test]
    fn test_headers_with_referer() {
        let previous = Url::parse("https://www.amazon.com/s?k=lamp").expect("url");
        let headers = RequestHeaders::as_vec(Some(&previous));
        assert_eq!(
            header(&headers, "referer"),
            Some("https://www.amazon.com/s?k=lamp")
        );
        assert_eq!(header(&headers, "sec-fetch-site"), Some("same-origin"));
    }

    #[test]
    fn test_apply_sets_headers() {
        let client = reqwest::Client::new();
        let request = RequestHeaders::apply_to_request_builder(
            client.get("http://localhost/"),
            None,
        )
        .build()
        .expect("request");
        let headers = request.headers();
        assert_eq!(headers.get("accept-language").unwrap(), BROWSER_ACCEPT_LANGUAGE);
        assert_eq!(headers.get("sec-fetch-dest").unwrap(), "document");
        assert_eq!(headers.get("sec-fetch-site").unwrap(), "none");
    }
}
