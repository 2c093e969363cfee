//! Pause/resume/stop handle shared between a running batch and its controller.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::job::BatchState;

/// Control handle for a running batch.
///
/// Cloning yields another handle to the same batch. Pause and stop take
/// effect between items: the collector checks them before starting each
/// item and while paused, never in the middle of an extraction.
///
/// Pause and stop requests belong to one run. When a run ends the handle is
/// re-armed, so the next run on the same handle starts unpaused and unstopped.
#[derive(Debug, Clone)]
pub struct BatchControl {
    paused: Arc<watch::Sender<bool>>,
    state: Arc<watch::Sender<BatchState>>,
    stop: Arc<Mutex<CancellationToken>>,
}

impl Default for BatchControl {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchControl {
    /// Creates a handle for a batch that is not yet running.
    pub fn new() -> Self {
        Self {
            paused: Arc::new(watch::Sender::new(false)),
            state: Arc::new(watch::Sender::new(BatchState::Idle)),
            stop: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Asks the batch to pause before its next item.
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    /// Lets a paused batch continue.
    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Token of the current run.
    fn token(&self) -> CancellationToken {
        self.stop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Asks the batch to stop before its next item.
    ///
    /// The request holds until the current run ends; a stop issued while no
    /// run is active applies to the next one.
    pub fn stop(&self) {
        self.token().cancel();
    }

    /// True when a pause has been requested and not yet resumed.
    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    /// True once [`BatchControl::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.token().is_cancelled()
    }

    /// Current state of the batch this handle controls.
    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    pub(crate) fn set_state(&self, state: BatchState) {
        self.state.send_replace(state);
    }

    /// Resolves once stop is requested.
    pub(crate) async fn stopped(&self) {
        self.token().cancelled().await;
    }

    /// Clears pause and stop requests once a run has finished.
    pub(crate) fn rearm(&self) {
        let mut stop = self.stop.lock().unwrap_or_else(PoisonError::into_inner);
        if stop.is_cancelled() {
            *stop = CancellationToken::new();
        }
        self.paused.send_replace(false);
    }

    /// Waits while paused.
    ///
    /// Returns `true` when resumed (or never paused) and `false` when stop
    /// was requested during the wait.
    pub(crate) async fn wait_while_paused(&self) -> bool {
        let stop = self.token();
        let mut paused = self.paused.subscribe();
        loop {
            if stop.is_cancelled() {
                return false;
            }
            if !*paused.borrow_and_update() {
                return true;
            }
            tokio::select! {
                changed = paused.changed() => {
                    if changed.is_err() {
                        return true;
                    }
                }
                _ = stop.cancelled() => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pause_resume_stop_flags() {
        let control = BatchControl::new();
        assert!(!control.is_paused());
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
        assert!(!control.is_stopped());
        control.clone().stop();
        assert!(control.is_stopped());
    }

    #[test]
    fn test_rearm_clears_requests() {
        let control = BatchControl::new();
        let other = control.clone();
        control.pause();
        control.stop();
        other.rearm();
        assert!(!control.is_stopped());
        assert!(!control.is_paused());
        control.stop();
        assert!(other.is_stopped());
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_not_paused() {
        assert!(BatchControl::new().wait_while_paused().await);
    }

    #[tokio::test]
    async fn test_wait_released_by_resume() {
        let control = BatchControl::new();
        control.pause();
        let resumer = control.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            resumer.resume();
        });
        assert!(control.wait_while_paused().await);
    }

    #[tokio::test]
    async fn test_wait_released_by_stop() {
        let control = BatchControl::new();
        control.pause();
        let stopper = control.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            stopper.stop();
        });
        assert!(!control.wait_while_paused().await);
    }
}
