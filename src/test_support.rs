//! Test doubles for the keyboard, process table and mail seams.

use anyhow::{Result, bail};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::editor::{EditorError, ProcessControl};
use crate::input::{KeyDirection, KeyInput, KeyboardBackend};
use crate::mail::{Draft, MailBackend, MailError, Step};

pub type KeyEvent = (KeyInput, KeyDirection);

/// Shared record of every key event a [`RecordingKeyboard`] received.
#[derive(Clone, Default)]
pub struct KeyLog(Arc<Mutex<Vec<KeyEvent>>>);

impl KeyLog {
    pub fn events(&self) -> Vec<KeyEvent> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: KeyEvent) {
        self.0.lock().unwrap().push(event);
    }

    fn presses(&self, want: impl Fn(&KeyInput) -> bool) -> usize {
        self.events()
            .iter()
            .filter(|(k, d)| *d == KeyDirection::Press && want(k))
            .count()
    }

    pub fn char_presses(&self) -> usize {
        self.presses(|k| matches!(k, KeyInput::Char(_)))
    }

    pub fn space_presses(&self) -> usize {
        self.presses(|k| *k == KeyInput::Space)
    }

    pub fn modifier_presses(&self) -> usize {
        self.presses(|k| matches!(k, KeyInput::Modifier(_)))
    }

    /// Text produced by character and space presses, ignoring chords.
    pub fn typed_text(&self) -> String {
        let events = self.events();
        let mut held_modifier = false;
        let mut out = String::new();
        for (key, dir) in events {
            match (key, dir) {
                (KeyInput::Modifier(_), KeyDirection::Press) => held_modifier = true,
                (KeyInput::Modifier(_), KeyDirection::Release) => held_modifier = false,
                (KeyInput::Char(c), KeyDirection::Press) if !held_modifier => out.push(c),
                (KeyInput::Space, KeyDirection::Press) => out.push(' '),
                _ => {}
            }
        }
        out
    }

    /// Every press has a matching release and nothing is left held.
    pub fn is_balanced(&self) -> bool {
        let mut held: Vec<KeyInput> = Vec::new();
        for (key, dir) in self.events() {
            match dir {
                KeyDirection::Press => held.push(key),
                KeyDirection::Release => match held.iter().rposition(|k| *k == key) {
                    Some(pos) => {
                        held.remove(pos);
                    }
                    None => return false,
                },
            }
        }
        held.is_empty()
    }
}

type Hook = Box<dyn FnMut(&KeyLog)>;

/// Keyboard backend that records events and can run a hook after each one.
pub struct RecordingKeyboard {
    log: KeyLog,
    hook: Option<Hook>,
    fail_on: Option<KeyInput>,
}

impl RecordingKeyboard {
    pub fn new(log: KeyLog) -> Self {
        Self {
            log,
            hook: None,
            fail_on: None,
        }
    }

    pub fn with_hook(mut self, hook: impl FnMut(&KeyLog) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Fail every press of `key`.
    pub fn failing_on(mut self, key: KeyInput) -> Self {
        self.fail_on = Some(key);
        self
    }
}

impl KeyboardBackend for RecordingKeyboard {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn key(&mut self, key: KeyInput, direction: KeyDirection) -> Result<()> {
        if self.fail_on == Some(key) && direction == KeyDirection::Press {
            bail!("injected failure on {key:?}");
        }
        self.log.push((key, direction));
        if let Some(hook) = self.hook.as_mut() {
            hook(&self.log);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Process table with a fixed answer.
pub struct FakeProcesses {
    running: Option<bool>,
    fail_launch: bool,
    launches: Counter,
}

impl FakeProcesses {
    pub fn running() -> Self {
        Self::with_state(Some(true))
    }

    pub fn stopped() -> Self {
        Self::with_state(Some(false))
    }

    pub fn unsupported() -> Self {
        Self::with_state(None)
    }

    fn with_state(running: Option<bool>) -> Self {
        Self {
            running,
            fail_launch: false,
            launches: Counter::default(),
        }
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn launches(&self) -> Counter {
        self.launches.clone()
    }
}

impl ProcessControl for FakeProcesses {
    fn is_running(&mut self, _name: &str) -> Option<bool> {
        self.running
    }

    fn launch(&mut self, program: &str, _args: &[String]) -> Result<(), EditorError> {
        self.launches.bump();
        if self.fail_launch {
            return Err(EditorError::Launch {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            });
        }
        self.running = Some(true);
        Ok(())
    }
}

/// What a [`FakeMail`] was asked to do.
#[derive(Clone, Default)]
pub struct MailCalls {
    steps: Arc<Mutex<Vec<&'static str>>>,
    drafts: Arc<Mutex<Vec<Draft>>>,
}

impl MailCalls {
    pub fn steps(&self) -> Vec<&'static str> {
        self.steps.lock().unwrap().clone()
    }

    pub fn drafts(&self) -> Vec<Draft> {
        self.drafts.lock().unwrap().clone()
    }
}

/// Mail backend that records calls and can fail at a chosen step.
pub struct FakeMail {
    calls: MailCalls,
    fail_at: Option<&'static str>,
}

impl FakeMail {
    pub fn new() -> Self {
        Self {
            calls: MailCalls::default(),
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, step: &'static str) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn calls(&self) -> MailCalls {
        self.calls.clone()
    }

    fn record(&self, step: Step) -> Result<(), MailError> {
        let name = match step {
            Step::Connect => "connect",
            Step::Compose => "compose",
            Step::Display => "display",
            Step::Discard => "discard",
        };
        self.calls.steps.lock().unwrap().push(name);
        if self.fail_at == Some(name) {
            return Err(match step {
                Step::Connect => MailError::Unavailable("fake client offline".into()),
                step => MailError::Automation {
                    step,
                    message: "fake failure".into(),
                },
            });
        }
        Ok(())
    }
}

impl MailBackend for FakeMail {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn connect(&mut self) -> Result<(), MailError> {
        self.record(Step::Connect)
    }

    async fn compose(&mut self, draft: &Draft) -> Result<(), MailError> {
        self.record(Step::Compose)?;
        self.calls.drafts.lock().unwrap().push(draft.clone());
        Ok(())
    }

    async fn display(&mut self) -> Result<(), MailError> {
        self.record(Step::Display)
    }

    async fn discard(&mut self) -> Result<(), MailError> {
        self.record(Step::Discard)
    }
}
