//! Ctrl-C handling.

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::batch::BatchControl;

/// Stops the batch behind `control` on the first Ctrl-C.
///
/// The batch finishes its current item and keeps what it collected, so the
/// caller can still export partial results. Abort the returned handle once
/// the batch is over.
pub fn stop_on_ctrl_c(control: BatchControl) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after the current item");
                control.stop();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
}
