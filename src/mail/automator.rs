use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{Draft, MailBackend, MailError};
use crate::config::MailSettings;
use crate::text::generate_email;
use crate::utils::pace::pause;

/// Runs one draft through connect, compose, display, hold and discard.
///
/// Each invocation is terminal: it either completes or stops at the first
/// failing step. Nothing is retried.
pub struct MailDraftAutomator<M> {
    backend: M,
    settings: MailSettings,
}

impl<M: MailBackend> MailDraftAutomator<M> {
    pub fn new(backend: M, settings: MailSettings) -> Self {
        Self { backend, settings }
    }

    /// Create a draft, show it for the configured time, then close it
    /// without saving. Failures are logged and reported as `false`.
    pub async fn create_and_discard<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> bool {
        match self.run_steps(rng, cancel).await {
            Ok(()) => {
                info!(target: "ghostwriter::mail", "Draft closed successfully");
                true
            }
            Err(err) => {
                warn!(target: "ghostwriter::mail", backend = self.backend.name(), error = %err, "Draft step failed");
                false
            }
        }
    }

    async fn run_steps<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<(), MailError> {
        info!(target: "ghostwriter::mail", backend = self.backend.name(), "Connecting to mail client");
        self.backend.connect().await?;

        info!(target: "ghostwriter::mail", "Creating new email draft");
        let email = generate_email(rng);
        let draft = Draft {
            to: self.settings.recipient.clone(),
            subject: self.settings.subject.clone(),
            body: email.body(),
        };
        self.backend.compose(&draft).await?;

        info!(target: "ghostwriter::mail", "Opening email draft window");
        self.backend.display().await?;

        let secs = self.settings.display_secs;
        info!(target: "ghostwriter::mail", secs, "Email visible");
        for _ in 0..secs {
            if !pause(cancel, Duration::from_secs(1)).await {
                break;
            }
        }

        info!(target: "ghostwriter::mail", "Closing draft without saving");
        self.backend.discard().await
    }
}
