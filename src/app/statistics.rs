//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};

/// Prints error, warning, and info counts to the log.
///
/// Categories with a zero count are left out.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_warnings = error_stats.total_warnings();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_warnings > 0 {
        info!("Warning Counts ({} total):", total_warnings);
        for warning_type in WarningType::iter() {
            let count = error_stats.get_warning_count(warning_type);
            if count > 0 {
                info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

/// Logs a one-line summary of a run.
pub fn print_summary(kind: &str, kept: usize, failed: usize, elapsed_seconds: f64) {
    info!(
        "✅ {}: {} record{} kept, {} failed in {:.1}s",
        kind,
        kept,
        if kept == 1 { "" } else { "s" },
        failed,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_handles_empty_and_populated() {
        let stats = ProcessingStats::new();
        print_error_statistics(&stats);
        stats.increment_error(ErrorType::HttpRequestServerError);
        stats.increment_warning(WarningType::MissingPrice);
        stats.increment_info(InfoType::PageFetched);
        print_error_statistics(&stats);
        assert_eq!(stats.total_errors(), 1);
    }
}
