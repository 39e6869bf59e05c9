use tracing::info;

use super::{Draft, MailBackend, MailError, Step};

/// Walks through the draft lifecycle while only logging. Used for dry runs
/// and on machines without a scriptable mail client.
#[derive(Debug, Default)]
pub struct LogOnlyMail {
    connected: bool,
    composed: bool,
}

impl LogOnlyMail {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_session(&self, step: Step) -> Result<(), MailError> {
        if self.connected {
            Ok(())
        } else {
            Err(MailError::NotConnected { step })
        }
    }
}

impl MailBackend for LogOnlyMail {
    fn name(&self) -> &'static str {
        "log-only"
    }

    async fn connect(&mut self) -> Result<(), MailError> {
        info!(target: "ghostwriter::mail", "DRY-RUN connect");
        self.connected = true;
        self.composed = false;
        Ok(())
    }

    async fn compose(&mut self, draft: &Draft) -> Result<(), MailError> {
        self.require_session(Step::Compose)?;
        info!(
            target: "ghostwriter::mail",
            subject = %draft.subject,
            body_chars = draft.body.chars().count(),
            "DRY-RUN compose"
        );
        self.composed = true;
        Ok(())
    }

    async fn display(&mut self) -> Result<(), MailError> {
        self.require_session(Step::Display)?;
        info!(target: "ghostwriter::mail", "DRY-RUN display");
        Ok(())
    }

    async fn discard(&mut self) -> Result<(), MailError> {
        self.require_session(Step::Discard)?;
        info!(target: "ghostwriter::mail", composed = self.composed, "DRY-RUN discard");
        self.connected = false;
        self.composed = false;
        Ok(())
    }
}
