//! Abort monitor.
//!
//! Watches for the cancellation key (and Ctrl+C) in the background and
//! cancels the shared [`CancellationToken`] the first time either is seen.
//! The monitor is one-shot: once it has fired it stops listening.

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AbortKey;

mod hook;

/// Handle to the background listener. Call [`AbortMonitor::stop`] at
/// shutdown to join it.
pub struct AbortMonitor {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl AbortMonitor {
    /// Listen on the global keyboard hook for `key` and on Ctrl+C.
    pub fn start(key: AbortKey, cancel: CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        hook::spawn_key_hook(key, tx);
        info!(target: "ghostwriter::abort", ?key, "Press the abort key at any time to stop");
        Self::spawn(rx, cancel, true)
    }

    /// Listen on an arbitrary stream of abort presses.
    pub fn spawn(
        mut presses: UnboundedReceiver<()>,
        cancel: CancellationToken,
        watch_ctrl_c: bool,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();
        let task = tokio::spawn(async move {
            let mut hook_alive = true;
            loop {
                tokio::select! {
                    _ = stop.cancelled() => {
                        debug!(target: "ghostwriter::abort", "Monitor stopped");
                        break;
                    }
                    press = presses.recv(), if hook_alive => match press {
                        Some(()) => {
                            warn!(target: "ghostwriter::abort", "Abort key pressed; stopping");
                            cancel.cancel();
                            break;
                        }
                        None => {
                            warn!(target: "ghostwriter::abort", "Key hook closed; only Ctrl+C can abort now");
                            hook_alive = false;
                        }
                    },
                    signal = tokio::signal::ctrl_c(), if watch_ctrl_c => {
                        match signal {
                            Ok(()) => warn!(target: "ghostwriter::abort", "Received Ctrl+C; stopping"),
                            Err(err) => warn!(target: "ghostwriter::abort", error = %err, "Ctrl+C handler failed; stopping"),
                        }
                        cancel.cancel();
                        break;
                    }
                }
            }
            presses.close();
        });
        Self { shutdown, task }
    }

    /// Whether the listener has already exited (fired or stopped).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop listening and wait for the listener to exit. Never fails and
    /// never touches the cancellation token.
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(err) = self.task.await {
            warn!(target: "ghostwriter::abort", error = %err, "Monitor task ended abnormally");
        }
    }
}
