#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Ghostwriter — keeps a workstation looking busy.
//!
//! It types randomized text into a text editor and periodically opens and
//! discards an email draft, alternating Editor -> Mail -> Editor until the
//! abort key is pressed. Modules:
//! - `config`: run settings, defaults and validation.
//! - `text`: word stream and email body generation.
//! - `input`: keyboard backends and human-paced typing.
//! - `editor`: process lookup and editor launch.
//! - `mail`: mail client capability interface and draft automation.
//! - `abort`: background cancellation listener.
//! - `orchestrator`: the cycle state machine.
//! - `utils`: cancellable pacing helpers.
//!
//! Use `ghostwriter::prelude::*` to bring commonly used items into scope quickly.

pub mod abort;
pub mod config;
pub mod editor;
pub mod input;
pub mod mail;
pub mod orchestrator;
pub mod text;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

/// Crate-level constants for consumers that want to inspect package metadata at runtime.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version (e.g., "0.1.0").
#[inline]
pub const fn version() -> &'static str {
    PKG_VERSION
}

/// Parse a level name (trace|debug|info|warn|error), case-insensitively.
pub fn parse_level(name: &str) -> Option<tracing::Level> {
    use tracing::Level;
    match name.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize tracing (logging).
/// - `level` wins when given and valid.
/// - Otherwise honors the `RUST_LOG` environment variable as a simple level.
/// - Falls back to `info`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_tracing(level: Option<&str>) {
    let level = level
        .and_then(parse_level)
        .or_else(|| std::env::var("RUST_LOG").ok().as_deref().and_then(parse_level))
        .unwrap_or(tracing::Level::INFO);

    // Ignore the error if the global subscriber was already set.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init();
}

/// A convenient set of exports for most consumers.
///
/// Bring this into scope with:
/// `use ghostwriter::prelude::*;`
pub mod prelude {
    pub use anyhow::{Context, Error, Result, anyhow, bail};

    pub use tracing::{debug, error, info, trace, warn};

    pub use std::time::Duration;
    pub use tokio_util::sync::CancellationToken;

    pub use crate as ghostwriter;
    pub use crate::abort::AbortMonitor;
    pub use crate::config::Settings;
    pub use crate::mail::{MailBackend, MailClient};
    pub use crate::orchestrator::{CycleReport, Orchestrator, Outcome};
}
