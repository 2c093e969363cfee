//! Progress logging.

use log::info;

use crate::batch::BatchProgress;

/// Logs a batch progress snapshot.
pub fn log_batch_progress(progress: &BatchProgress) {
    let done = progress.completed + progress.failed;
    if progress.current.is_empty() {
        info!(
            "Batch finished: {}/{} collected, {} failed",
            progress.completed, progress.total, progress.failed
        );
    } else {
        info!(
            "[{}/{}] {} collected, {} failed - {}",
            done, progress.total, progress.completed, progress.failed, progress.current
        );
    }
}
