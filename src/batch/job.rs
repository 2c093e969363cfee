//! Batch job data.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::config::Settings;
use crate::models::ProductRecord;

/// Lifecycle of a batch run.
///
/// `Idle -> Running -> (Paused <-> Running)* -> Completed | Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BatchState {
    /// Created, not started
    #[default]
    Idle,
    /// Processing items
    Running,
    /// Waiting for resume between items
    Paused,
    /// Stopped by request; partial results are kept
    Stopped,
    /// Every item was attempted
    Completed,
}

impl BatchState {
    /// True for states a run cannot leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Stopped | BatchState::Completed)
    }
}

/// An item that failed on every attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedItem {
    /// Item URL as given
    pub url: String,
    /// Text of the last error
    pub error: String,
    /// Attempts made, including the first
    pub attempts: u32,
}

/// Progress snapshot reported after each item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// Items in the queue
    pub total: usize,
    /// Items collected successfully
    pub completed: usize,
    /// Items that failed on every attempt
    pub failed: usize,
    /// URL of the item just processed or about to be processed
    pub current: String,
}

/// A queue of product URLs and everything collected from it.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Target URLs, processed in order
    pub urls: Vec<String>,
    /// Delay between consecutive items
    pub interval: Duration,
    /// Retries per item after the first attempt
    pub max_retries: u32,
    /// Index of the next item to process
    pub current_index: usize,
    /// Records keyed by identifier; a later record replaces an earlier one
    pub collected: BTreeMap<String, ProductRecord>,
    /// Items that failed on every attempt, in processing order
    pub failed: Vec<FailedItem>,
    /// Lifecycle state
    pub state: BatchState,
}

impl BatchJob {
    /// Creates an idle job.
    pub fn new(urls: Vec<String>, interval: Duration, max_retries: u32) -> Self {
        Self {
            urls,
            interval,
            max_retries,
            current_index: 0,
            collected: BTreeMap::new(),
            failed: Vec::new(),
            state: BatchState::Idle,
        }
    }

    /// Creates an idle job paced and retried per `settings`.
    pub fn from_settings(urls: Vec<String>, settings: &Settings) -> Self {
        Self::new(urls, settings.batch_interval(), settings.max_retries)
    }

    /// Snapshot of the job's counters.
    pub fn progress(&self, current: &str) -> BatchProgress {
        BatchProgress {
            total: self.urls.len(),
            completed: self.collected.len(),
            failed: self.failed.len(),
            current: current.to_string(),
        }
    }

    /// Collected records in identifier order.
    pub fn records(&self) -> Vec<ProductRecord> {
        self.collected.values().cloned().collect()
    }
}
