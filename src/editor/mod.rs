//! Target editor lifecycle.
//!
//! - `process`: the [`ProcessControl`] seam over the OS process table.
//! - `session`: [`EditorSession`], which launches the editor when absent.

pub mod process;
pub mod session;

pub use process::{EditorError, ProcessControl, SystemProcesses};
pub use session::EditorSession;
