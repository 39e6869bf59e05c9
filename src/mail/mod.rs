/*!
Mail draft automation.

The automator only ever talks to a [`MailBackend`], a small capability
interface (`connect`, `compose`, `display`, `discard`) that any mail client
with an automation surface can satisfy:

- `outlook.rs`  -> [`OutlookBridge`] (Outlook COM reached through a PowerShell host)
- `log_only.rs` -> [`LogOnlyMail`]  (logs each step, touches nothing)
- `automator.rs` -> [`MailDraftAutomator`], the per-invocation state machine

[`MailClient`] picks a backend from settings so callers can stay generic.
*/

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::config::{MailBackendKind, MailSettings};

pub mod automator;
pub mod log_only;
pub mod outlook;

pub use automator::MailDraftAutomator;
pub use log_only::LogOnlyMail;
pub use outlook::OutlookBridge;

/// Stage of the draft lifecycle, used to label errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Connect,
    Compose,
    Display,
    Discard,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Connect => "connect",
            Step::Compose => "compose",
            Step::Display => "display",
            Step::Discard => "discard",
        })
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail client unavailable: {0}")]
    Unavailable(String),

    #[error("failed to start automation host `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o with automation host during {step}: {source}")]
    Io {
        step: Step,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode draft: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{step} failed: {message}")]
    Automation { step: Step, message: String },

    #[error("unexpected reply during {step}: {reply:?}")]
    UnexpectedReply { step: Step, reply: String },

    #[error("automation host exited during {step}")]
    BridgeClosed { step: Step },

    #[error("no reply during {step} before timeout")]
    Timeout { step: Step },

    #[error("{step} requested without an open session")]
    NotConnected { step: Step },
}

/// Content placed on a new message item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Capability interface over a scriptable mail client.
#[allow(async_fn_in_trait)]
pub trait MailBackend {
    /// Static identifier used in logs.
    fn name(&self) -> &'static str;

    /// Obtain a handle to the client's automation endpoint.
    async fn connect(&mut self) -> Result<(), MailError>;

    /// Create a new message item and fill it in.
    async fn compose(&mut self, draft: &Draft) -> Result<(), MailError>;

    /// Show the message window without blocking on it.
    async fn display(&mut self) -> Result<(), MailError>;

    /// Close the message window, discarding changes so nothing is saved.
    async fn discard(&mut self) -> Result<(), MailError>;
}

/// Backend chosen at startup.
pub enum MailClient {
    Outlook(OutlookBridge),
    LogOnly(LogOnlyMail),
}

impl MailClient {
    /// Dry runs always log instead of automating a real client.
    pub fn from_settings(settings: &MailSettings, dry_run: bool) -> Self {
        match (settings.backend, dry_run) {
            (MailBackendKind::Outlook, false) => Self::Outlook(OutlookBridge::new(settings)),
            _ => Self::LogOnly(LogOnlyMail::new()),
        }
    }
}

impl MailBackend for MailClient {
    fn name(&self) -> &'static str {
        match self {
            Self::Outlook(b) => b.name(),
            Self::LogOnly(b) => b.name(),
        }
    }

    async fn connect(&mut self) -> Result<(), MailError> {
        match self {
            Self::Outlook(b) => b.connect().await,
            Self::LogOnly(b) => b.connect().await,
        }
    }

    async fn compose(&mut self, draft: &Draft) -> Result<(), MailError> {
        match self {
            Self::Outlook(b) => b.compose(draft).await,
            Self::LogOnly(b) => b.compose(draft).await,
        }
    }

    async fn display(&mut self) -> Result<(), MailError> {
        match self {
            Self::Outlook(b) => b.display().await,
            Self::LogOnly(b) => b.display().await,
        }
    }

    async fn discard(&mut self) -> Result<(), MailError> {
        match self {
            Self::Outlook(b) => b.discard().await,
            Self::LogOnly(b) => b.discard().await,
        }
    }
}
