//! The Editor -> Mail -> Editor cycle.

use anyhow::{Context, Result};
use futures::FutureExt;
use rand::rngs::StdRng;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{CycleSettings, Settings};
use crate::editor::{EditorSession, ProcessControl};
use crate::input::{InputInjector, KeyboardBackend, NewTabChord};
use crate::mail::{MailBackend, MailDraftAutomator};
use crate::utils::pace::pause_ms;

/// Where the orchestrator currently is in its cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CycleState {
    Starting,
    EditorFirst,
    Mail,
    EditorSecond,
    Aborted,
    Failed,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Cancellation was requested.
    Aborted,
    /// The run could not continue; carries the reason.
    Failed(String),
}

/// Final tally reported when the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycles entered, including one cut short.
    pub started: u64,
    /// Full Editor -> Mail -> Editor traversals.
    pub completed: u64,
    pub outcome: Outcome,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Aborted => write!(f, "terminated by user")?,
            Outcome::Failed(reason) => write!(f, "failed: {reason}")?,
        }
        write!(f, "; completed {} full cycles", self.completed)
    }
}

/// Drives the editor and mail components strictly one at a time until
/// cancellation or an unrecoverable error.
pub struct Orchestrator<M> {
    cycle: CycleSettings,
    injector: InputInjector,
    editor: EditorSession,
    mail: MailDraftAutomator<M>,
    rng: StdRng,
    cancel: CancellationToken,
    state: CycleState,
    started: u64,
    completed: u64,
}

impl<M: MailBackend> Orchestrator<M> {
    pub fn new(
        settings: &Settings,
        keyboard: Box<dyn KeyboardBackend>,
        processes: Box<dyn ProcessControl>,
        mail: M,
        rng: StdRng,
        cancel: CancellationToken,
    ) -> Self {
        let injector = InputInjector::new(
            keyboard,
            settings.typing.clone(),
            NewTabChord::from(&settings.editor),
        );
        Self {
            cycle: settings.cycle.clone(),
            injector,
            editor: EditorSession::new(processes, settings.editor.clone()),
            mail: MailDraftAutomator::new(mail, settings.mail.clone()),
            rng,
            cancel,
            state: CycleState::Starting,
            started: 0,
            completed: 0,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Full traversals so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Run until cancelled or failed. Errors and panics never escape; they
    /// become a `Failed` outcome in the report.
    pub async fn run(&mut self) -> CycleReport {
        let outcome = match AssertUnwindSafe(self.drive()).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                error!(target: "ghostwriter::cycle", error = ?err, "Unrecoverable error");
                Outcome::Failed(format!("{err:#}"))
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                error!(target: "ghostwriter::cycle", state = ?self.state, %reason, "Cycle loop panicked");
                Outcome::Failed(format!("panic: {reason}"))
            }
        };
        self.transition(match outcome {
            Outcome::Aborted => CycleState::Aborted,
            Outcome::Failed(_) => CycleState::Failed,
        });
        CycleReport {
            started: self.started,
            completed: self.completed,
            outcome,
        }
    }

    async fn drive(&mut self) -> Result<Outcome> {
        self.transition(CycleState::Starting);
        if !self.editor.ensure_editor_running().await {
            error!(target: "ghostwriter::cycle", "Cannot proceed without the editor");
            return Ok(Outcome::Failed("editor could not be started".into()));
        }

        loop {
            if self.cancel.is_cancelled() {
                return Ok(Outcome::Aborted);
            }
            self.started += 1;
            let cycle = self.started;

            self.transition(CycleState::EditorFirst);
            info!(target: "ghostwriter::cycle", cycle, step = "1/3", "Editor");
            if !self.editor_visit().await? {
                return Ok(Outcome::Aborted);
            }
            if !pause_ms(&self.cancel, self.cycle.mail_settle_ms).await {
                return Ok(Outcome::Aborted);
            }

            self.transition(CycleState::Mail);
            info!(target: "ghostwriter::cycle", cycle, step = "2/3", "Mail");
            if !self.mail.create_and_discard(&mut self.rng, &self.cancel).await {
                warn!(target: "ghostwriter::cycle", cycle, "Mail step failed, continuing");
            }
            if !pause_ms(&self.cancel, self.cycle.mail_settle_ms).await {
                return Ok(Outcome::Aborted);
            }

            self.transition(CycleState::EditorSecond);
            info!(target: "ghostwriter::cycle", cycle, step = "3/3", "Editor");
            if !self.editor_visit().await? {
                return Ok(Outcome::Aborted);
            }

            self.completed += 1;
            info!(target: "ghostwriter::cycle", cycle, completed = self.completed, "Cycle complete");
            pause_ms(&self.cancel, self.cycle.cycle_settle_ms).await;
        }
    }

    /// New tab, settle, then one word stream. `Ok(false)` means cancelled.
    async fn editor_visit(&mut self) -> Result<bool> {
        self.injector
            .new_tab_gesture()
            .await
            .context("New tab gesture failed")?;
        if !pause_ms(&self.cancel, self.cycle.pre_typing_settle_ms).await {
            return Ok(false);
        }
        let finished = self
            .injector
            .type_word_stream(self.cycle.words_per_stream, &mut self.rng, &self.cancel)
            .await
            .context("Typing into the editor failed")?;
        Ok(finished && !self.cancel.is_cancelled())
    }

    fn transition(&mut self, next: CycleState) {
        if self.state != next {
            debug!(target: "ghostwriter::cycle", from = ?self.state, to = ?next, "State change");
        }
        self.state = next;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DelayRange, Modifier};
    use crate::input::{KeyDirection, KeyInput};
    use crate::test_support::{FakeMail, FakeProcesses, KeyLog, RecordingKeyboard};
    use rand::SeedableRng;

    fn quick_settings() -> Settings {
        let mut settings = Settings::default();
        settings.typing.char_delay = DelayRange::fixed(1);
        settings.typing.word_pause = DelayRange::fixed(1);
        settings.cycle.words_per_stream = 4;
        settings
    }

    /// Keyboard that cancels once the new-tab chord has been pressed `n` times.
    fn cancel_on_tab(log: &KeyLog, n: usize, cancel: &CancellationToken) -> RecordingKeyboard {
        let trigger = cancel.clone();
        RecordingKeyboard::new(log.clone()).with_hook(move |log| {
            if log.modifier_presses() == n {
                trigger.cancel();
            }
        })
    }

    fn orchestrator(
        keyboard: RecordingKeyboard,
        processes: FakeProcesses,
        mail: FakeMail,
        cancel: &CancellationToken,
    ) -> Orchestrator<FakeMail> {
        Orchestrator::new(
            &quick_settings(),
            Box::new(keyboard),
            Box::new(processes),
            mail,
            StdRng::seed_from_u64(11),
            cancel.clone(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn one_full_cycle_counts_once() {
        let cancel = CancellationToken::new();
        let log = KeyLog::default();
        let mail = FakeMail::new();
        let calls = mail.calls();
        // Third chord opens cycle 2; cancelling there aborts it partway.
        let mut orch = orchestrator(
            cancel_on_tab(&log, 3, &cancel),
            FakeProcesses::running(),
            mail,
            &cancel,
        );

        let report = orch.run().await;
        assert_eq!(report.outcome, Outcome::Aborted);
        assert_eq!(report.completed, 1);
        assert_eq!(report.started, 2);
        assert_eq!(orch.completed(), 1);
        assert_eq!(orch.state(), CycleState::Aborted);
        assert_eq!(calls.steps(), vec!["connect", "compose", "display", "discard"]);
        assert!(log.is_balanced());
    }

    #[tokio::test(start_paused = true)]
    async fn abort_in_second_editor_does_not_count() {
        let cancel = CancellationToken::new();
        let log = KeyLog::default();
        let mut orch = orchestrator(
            cancel_on_tab(&log, 2, &cancel),
            FakeProcesses::running(),
            FakeMail::new(),
            &cancel,
        );

        let report = orch.run().await;
        assert_eq!(report.outcome, Outcome::Aborted);
        assert_eq!(report.started, 1);
        assert_eq!(report.completed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn mail_failure_does_not_stop_the_cycle() {
        let cancel = CancellationToken::new();
        let log = KeyLog::default();
        let mail = FakeMail::new().failing_at("connect");
        let calls = mail.calls();
        let mut orch = orchestrator(
            cancel_on_tab(&log, 3, &cancel),
            FakeProcesses::running(),
            mail,
            &cancel,
        );

        let report = orch.run().await;
        assert_eq!(calls.steps(), vec!["connect"]);
        assert_eq!(report.completed, 1);
        // Both editor visits of cycle 1 typed their full 4-word stream.
        assert_eq!(log.space_presses(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_editor_fails_before_any_input() {
        let cancel = CancellationToken::new();
        let log = KeyLog::default();
        let mut orch = orchestrator(
            RecordingKeyboard::new(log.clone()),
            FakeProcesses::stopped().failing_launch(),
            FakeMail::new(),
            &cancel,
        );

        let report = orch.run().await;
        assert!(matches!(report.outcome, Outcome::Failed(_)));
        assert_eq!(report.started, 0);
        assert_eq!(orch.state(), CycleState::Failed);
        assert!(log.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn keyboard_error_becomes_failed_outcome() {
        let cancel = CancellationToken::new();
        let log = KeyLog::default();
        let keyboard = RecordingKeyboard::new(log.clone()).failing_on(KeyInput::Char('n'));
        let mut orch = orchestrator(keyboard, FakeProcesses::running(), FakeMail::new(), &cancel);

        let report = orch.run().await;
        match &report.outcome {
            Outcome::Failed(reason) => assert!(reason.contains("New tab gesture failed")),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(report.completed, 0);
        // The chord modifier was still released.
        assert_eq!(
            log.events().last().copied(),
            Some((
                KeyInput::Modifier(Modifier::platform_default()),
                KeyDirection::Release
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn keyboard_panic_becomes_failed_outcome() {
        let cancel = CancellationToken::new();
        let log = KeyLog::default();
        let keyboard = RecordingKeyboard::new(log.clone()).with_hook(|log| {
            if log.char_presses() > 0 {
                panic!("keyboard driver crashed");
            }
        });
        let mut orch = orchestrator(keyboard, FakeProcesses::running(), FakeMail::new(), &cancel);

        let report = orch.run().await;
        match &report.outcome {
            Outcome::Failed(reason) => assert!(reason.contains("keyboard driver crashed")),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(report.started, 1);
        assert_eq!(report.completed, 0);
        assert_eq!(orch.state(), CycleState::Failed);
    }

    #[test]
    fn panic_payloads_are_readable() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let text: Box<dyn Any + Send> = Box::new("static");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(text.as_ref()), "static");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_types_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let log = KeyLog::default();
        let mut orch = orchestrator(
            RecordingKeyboard::new(log.clone()),
            FakeProcesses::running(),
            FakeMail::new(),
            &cancel,
        );

        let report = orch.run().await;
        assert_eq!(report.outcome, Outcome::Aborted);
        assert_eq!(report.started, 0);
        assert!(log.events().is_empty());
    }

    #[test]
    fn report_mentions_completed_cycles() {
        let report = CycleReport {
            started: 4,
            completed: 3,
            outcome: Outcome::Aborted,
        };
        assert_eq!(report.to_string(), "terminated by user; completed 3 full cycles");
    }
}
