//! Error handling and processing statistics.
//!
//! This module provides:
//! - The extraction error taxonomy and retriability rules
//! - Processing statistics tracking (errors, warnings, info metrics)
//! - Retry strategy configuration
//!
//! Error types are categorized into:
//! - **Errors**: Failures that lose a page or record
//! - **Warnings**: Degraded records that are still kept
//! - **Info**: Informational metrics (retries, pagination, duplicates)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_reqwest_error, categorize_status, get_retry_strategy, update_error_stats,
};
pub use stats::ProcessingStats;
pub use types::{
    ConfigError, ErrorType, ExtractionError, FetchError, FieldError, InfoType,
    InitializationError, WarningType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for warning_type in WarningType::iter() {
            assert_eq!(stats.get_warning_count(warning_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::PageLoadTimeout);
        stats.increment_error(ErrorType::HttpRequestServerError);
        stats.increment_warning(WarningType::MissingPrice);
        stats.increment_info(InfoType::PageFetched);
        stats.increment_info(InfoType::PageFetched);

        assert_eq!(stats.total_errors(), 2);
        assert_eq!(stats.total_warnings(), 1);
        assert_eq!(stats.total_info(), 2);
        assert_eq!(stats.get_info_count(InfoType::PageFetched), 2);
    }
}
