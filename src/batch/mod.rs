//! Batch collection of product pages.
//!
//! A [`BatchCollector`] works through a [`BatchJob`]'s URL queue one item at
//! a time: fetch and assemble with bounded retries, store the record by
//! identifier, report progress, then wait the configured interval before the
//! next item. Pause and stop requests arrive through a [`BatchControl`] and
//! take effect between items. Whatever was collected before a stop is kept.

mod control;
mod job;

pub use control::BatchControl;
pub use job::{BatchJob, BatchProgress, BatchState, FailedItem};

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio_retry::RetryIf;
use url::Url;

use crate::assemble::fetch_product;
use crate::error_handling::{
    get_retry_strategy, update_error_stats, ExtractionError, InfoType, ProcessingStats,
};
use crate::extract::ExtractionRules;
use crate::fetch::PageFetcher;
use crate::models::ProductRecord;
use crate::utils::sanitize::sanitize_and_truncate_error_message;

/// Callback invoked with a progress snapshot at start, after every item and at the end.
pub type ProgressCallback = Arc<dyn Fn(&BatchProgress) + Send + Sync>;

/// Runs batch jobs against a fetcher.
pub struct BatchCollector<F> {
    fetcher: Arc<F>,
    rules: Arc<ExtractionRules>,
    stats: Arc<ProcessingStats>,
    control: BatchControl,
    detail_timeout: Duration,
}

impl<F: PageFetcher> BatchCollector<F> {
    /// Creates a collector with a fresh control handle.
    ///
    /// `detail_timeout` bounds each attempt (fetch plus assembly).
    pub fn new(
        fetcher: Arc<F>,
        rules: Arc<ExtractionRules>,
        stats: Arc<ProcessingStats>,
        detail_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            rules,
            stats,
            control: BatchControl::new(),
            detail_timeout,
        }
    }

    /// Uses an existing control handle instead of the collector's own.
    pub fn with_control(mut self, control: BatchControl) -> Self {
        self.control = control;
        self
    }

    /// A handle for pausing, resuming or stopping runs of this collector.
    pub fn control(&self) -> BatchControl {
        self.control.clone()
    }

    fn transition(&self, job: &mut BatchJob, state: BatchState) {
        debug!("Batch state {} -> {}", job.state, state);
        job.state = state;
        self.control.set_state(state);
    }

    /// Processes `job` until every item is attempted or a stop is requested.
    ///
    /// A job that is not idle is reset first, discarding earlier results.
    /// Pause and stop requests made before the call apply to this run; the
    /// control is re-armed when the run ends.
    /// Returns the final state, `Completed` or `Stopped`.
    pub async fn start(
        &self,
        job: &mut BatchJob,
        on_progress: Option<ProgressCallback>,
    ) -> BatchState {
        if job.state != BatchState::Idle {
            debug!("Resetting batch job left in state {}", job.state);
            job.current_index = 0;
            job.collected.clear();
            job.failed.clear();
        }
        let report = |progress: BatchProgress| {
            if let Some(callback) = &on_progress {
                callback(&progress);
            }
        };

        self.transition(job, BatchState::Running);
        info!("Starting batch of {} item(s)", job.urls.len());
        let first = job.urls.first().cloned().unwrap_or_default();
        report(job.progress(&first));

        while job.current_index < job.urls.len() {
            if self.control.is_stopped() {
                break;
            }
            if self.control.is_paused() {
                self.transition(job, BatchState::Paused);
                info!("Batch paused before item {}", job.current_index + 1);
                if !self.control.wait_while_paused().await {
                    break;
                }
                info!("Batch resumed");
                self.transition(job, BatchState::Running);
            }

            let url = job.urls[job.current_index].clone();
            match self.collect_one(&url, job.max_retries).await {
                Ok(record) => {
                    if job.collected.insert(record.asin.clone(), record).is_some() {
                        info!("Replaced earlier record with the same identifier ({})", url);
                        self.stats.increment_info(InfoType::DuplicateIdentifier);
                    }
                }
                Err(failed) => job.failed.push(failed),
            }
            job.current_index += 1;
            report(job.progress(&url));

            if job.current_index < job.urls.len() {
                tokio::select! {
                    _ = tokio::time::sleep(job.interval) => {}
                    _ = self.control.stopped() => {}
                }
            }
        }

        let final_state = if job.current_index >= job.urls.len() {
            BatchState::Completed
        } else {
            BatchState::Stopped
        };
        self.transition(job, final_state);
        report(job.progress(""));
        self.control.rearm();
        info!(
            "Batch {}: {} collected, {} failed, {} not attempted",
            final_state,
            job.collected.len(),
            job.failed.len(),
            job.urls.len() - job.current_index
        );
        final_state
    }

    /// Extracts one item, retrying transient failures up to `max_retries` times.
    async fn collect_one(&self, url: &str, max_retries: u32) -> Result<ProductRecord, FailedItem> {
        let target = Url::parse(url).map_err(|source| {
            let error = ExtractionError::InvalidUrl {
                url: url.to_string(),
                source,
            };
            warn!("{}", error);
            update_error_stats(&self.stats, &error);
            FailedItem {
                url: url.to_string(),
                error: error.to_string(),
                attempts: 0,
            }
        })?;

        let attempts = AtomicU32::new(0);
        let result = RetryIf::spawn(
            get_retry_strategy(max_retries),
            || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt > 1 {
                    debug!("Retry {} for {}", attempt - 1, url);
                    self.stats.increment_info(InfoType::RetryAttempt);
                }
                fetch_product(
                    self.fetcher.as_ref(),
                    &target,
                    Arc::clone(&self.rules),
                    Arc::clone(&self.stats),
                    self.detail_timeout,
                )
            },
            |e: &ExtractionError| e.is_retriable(),
        )
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        result.map_err(|error| {
            update_error_stats(&self.stats, &error);
            if error.is_retriable() {
                let exhausted = ExtractionError::ExhaustedRetries {
                    url: url.to_string(),
                    attempts,
                    last_error: error.to_string(),
                };
                warn!("{}", exhausted);
                update_error_stats(&self.stats, &exhausted);
            } else {
                warn!("Skipping {}: {}", url, error);
            }
            FailedItem {
                url: url.to_string(),
                error: sanitize_and_truncate_error_message(&error.to_string()),
                attempts,
            }
        })
    }
}
