use std::time::Duration;
use tracing::{error, info, warn};

use super::process::ProcessControl;
use crate::config::EditorSettings;

/// Keeps the target editor available.
///
/// No window handle is retained: after `ensure_editor_running` all typing
/// goes to whichever window holds focus, which is expected to be the editor.
pub struct EditorSession {
    processes: Box<dyn ProcessControl>,
    settings: EditorSettings,
}

impl EditorSession {
    pub fn new(processes: Box<dyn ProcessControl>, settings: EditorSettings) -> Self {
        Self {
            processes,
            settings,
        }
    }

    /// Launch the editor unless it is already running.
    ///
    /// Returns `false` only when the launch itself fails. When the process
    /// table cannot be read the editor is launched unconditionally.
    pub async fn ensure_editor_running(&mut self) -> bool {
        let name = self.settings.process_name.as_str();
        match self.processes.is_running(name) {
            Some(true) => {
                info!(target: "ghostwriter::editor", %name, "Already running; skipping launch");
                return true;
            }
            Some(false) => {
                info!(target: "ghostwriter::editor", %name, "Launching");
            }
            None => {
                warn!(
                    target: "ghostwriter::editor",
                    %name,
                    "Process enumeration unavailable; launching without check"
                );
            }
        }

        if let Err(err) = self
            .processes
            .launch(&self.settings.program, &self.settings.args)
        {
            error!(target: "ghostwriter::editor", error = %err, "Failed to open editor");
            return false;
        }

        tokio::time::sleep(Duration::from_millis(self.settings.launch_settle_ms)).await;
        info!(target: "ghostwriter::editor", %name, "Opened successfully");
        true
    }
}
