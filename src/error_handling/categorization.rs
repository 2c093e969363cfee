//! Error categorization and retry strategy.

use std::time::Duration;

use super::stats::ProcessingStats;
use super::types::{ErrorType, ExtractionError};

/// Builds the retry schedule for one batch item.
///
/// Retries are immediate (zero delay): pacing between items is handled by the
/// batch interval, and a retried item is re-attempted in place rather than
/// requeued. The iterator yields `max_retries` delays, so the total number of
/// attempts is at most `max_retries + 1`.
pub fn get_retry_strategy(max_retries: u32) -> impl Iterator<Item = Duration> {
    std::iter::repeat(Duration::ZERO).take(max_retries as usize)
}

/// Categorizes an HTTP status code into an `ErrorType`.
pub fn categorize_status(status: u16) -> ErrorType {
    match status {
        403 => ErrorType::HttpRequestBotDetectionError,
        404 => ErrorType::HttpRequestNotFound,
        429 => ErrorType::HttpRequestTooManyRequests,
        400..=499 => ErrorType::HttpRequestClientError,
        500..=599 => ErrorType::HttpRequestServerError,
        _ => ErrorType::HttpRequestOtherError,
    }
}

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The appropriate `ErrorType` for the error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        return categorize_status(status.as_u16());
    }

    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Records an extraction error in the processing statistics.
pub fn update_error_stats(stats: &ProcessingStats, error: &ExtractionError) {
    stats.increment_error(error.error_type());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_strategy_length() {
        assert_eq!(get_retry_strategy(0).count(), 0);
        assert_eq!(get_retry_strategy(3).count(), 3);
        assert!(get_retry_strategy(2).all(|d| d == Duration::ZERO));
    }

    #[test]
    fn test_categorize_status() {
        assert_eq!(categorize_status(403), ErrorType::HttpRequestBotDetectionError);
        assert_eq!(categorize_status(404), ErrorType::HttpRequestNotFound);
        assert_eq!(categorize_status(429), ErrorType::HttpRequestTooManyRequests);
        assert_eq!(categorize_status(410), ErrorType::HttpRequestClientError);
        assert_eq!(categorize_status(503), ErrorType::HttpRequestServerError);
        assert_eq!(categorize_status(302), ErrorType::HttpRequestOtherError);
    }

    #[test]
    fn test_update_error_stats() {
        let stats = ProcessingStats::new();
        let err = ExtractionError::MissingIdentifier {
            url: "https://x".into(),
        };
        update_error_stats(&stats, &err);
        assert_eq!(stats.get_error_count(ErrorType::MissingIdentifier), 1);
    }
}
