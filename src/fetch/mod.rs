//! Page fetching.
//!
//! Extraction code depends on the [`PageFetcher`] trait rather than on an
//! HTTP client, so the crawler and batch collector can be driven by any
//! source of documents. [`HttpFetcher`] is the network implementation.

mod request;

use std::future::Future;
use std::sync::Arc;

use log::{debug, trace};
use url::Url;

use crate::error_handling::FetchError;
use request::RequestHeaders;

/// Loads the HTML of a page.
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, navigating from `referer` when given.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Status` for non-2xx responses and
    /// `FetchError::Transport` for network or body-read failures.
    fn fetch(
        &self,
        url: &Url,
        referer: Option<&Url>,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches pages over HTTP with browser navigation headers.
///
/// The client is expected to keep a cookie store so that session cookies set
/// by the first page carry over to pagination requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
}

impl HttpFetcher {
    /// Wraps a configured client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, referer: Option<&Url>) -> Result<String, FetchError> {
        debug!("GET {}", url);
        trace!("Request headers: {:?}", RequestHeaders::as_vec(referer));
        let request =
            RequestHeaders::apply_to_request_builder(self.client.get(url.clone()), referer);
        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
