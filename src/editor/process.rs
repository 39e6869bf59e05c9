use std::process::{Command, Stdio};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use thiserror::Error;
use tracing::{debug, info, trace};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Access to the OS process table.
pub trait ProcessControl {
    /// Whether a process whose name contains `name` (case-insensitive) is
    /// running. `None` when the platform cannot enumerate processes.
    fn is_running(&mut self, name: &str) -> Option<bool>;

    /// Start `program` detached from this process.
    fn launch(&mut self, program: &str, args: &[String]) -> Result<(), EditorError>;
}

/// Live process table backed by `sysinfo`, with an optional dry-run mode in
/// which launches are only logged.
pub struct SystemProcesses {
    system: System,
    dry_run: bool,
}

impl SystemProcesses {
    pub fn new(dry_run: bool) -> Self {
        Self {
            system: System::new(),
            dry_run,
        }
    }
}

impl ProcessControl for SystemProcesses {
    fn is_running(&mut self, name: &str) -> Option<bool> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return None;
        }
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        let found = self
            .system
            .processes()
            .values()
            .any(|p| name_matches(&p.name().to_string_lossy(), name));
        trace!(target: "ghostwriter::editor", %name, found, "Process lookup");
        Some(found)
    }

    fn launch(&mut self, program: &str, args: &[String]) -> Result<(), EditorError> {
        if self.dry_run {
            info!(target: "ghostwriter::editor", %program, ?args, "DRY-RUN launch");
            return Ok(());
        }
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EditorError::Launch {
                program: program.to_string(),
                source,
            })?;
        debug!(target: "ghostwriter::editor", %program, pid = child.id(), "Spawned editor");
        Ok(())
    }
}

/// Case-insensitive substring match on process names.
pub(crate) fn name_matches(process_name: &str, wanted: &str) -> bool {
    process_name
        .to_lowercase()
        .contains(&wanted.to_lowercase())
}
