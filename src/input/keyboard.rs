use anyhow::{Context, Result};
use enigo::Keyboard as _;
use enigo::{Direction, Enigo, Key};
use tracing::{debug, trace};

use crate::config::Modifier;

/// A key the injector can emit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Space,
    Modifier(Modifier),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyDirection {
    Press,
    Release,
}

/// Sink for synthetic key events. The live implementation talks to the OS
/// input queue; tests and dry runs record or log instead.
pub trait KeyboardBackend {
    /// Static identifier used in logs.
    fn name(&self) -> &'static str;

    fn key(&mut self, key: KeyInput, direction: KeyDirection) -> Result<()>;

    /// Press then release.
    fn tap(&mut self, key: KeyInput) -> Result<()> {
        self.key(key, KeyDirection::Press)?;
        self.key(key, KeyDirection::Release)
    }
}

/// Sends real key events through Enigo. The Enigo connection is opened on
/// first use so constructing the backend never touches the display server.
#[derive(Default)]
pub struct EnigoKeyboard {
    enigo: Option<Enigo>,
}

impl EnigoKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_enigo(&mut self) -> Result<&mut Enigo> {
        if self.enigo.is_none() {
            trace!(target: "ghostwriter::input", "Initializing Enigo");
            let enigo =
                Enigo::new(&enigo::Settings::default()).context("Failed to initialize Enigo")?;
            self.enigo = Some(enigo);
        }
        self.enigo.as_mut().context("Enigo connection missing")
    }
}

impl KeyboardBackend for EnigoKeyboard {
    fn name(&self) -> &'static str {
        "enigo"
    }

    fn key(&mut self, key: KeyInput, direction: KeyDirection) -> Result<()> {
        let enigo = self.ensure_enigo()?;
        trace!(target: "ghostwriter::input", ?key, ?direction, "key");
        enigo
            .key(map_key(key), map_direction(direction))
            .with_context(|| format!("Failed to send {direction:?} for {key:?}"))?;
        Ok(())
    }
}

/// Logs every key event instead of simulating it.
#[derive(Debug, Default)]
pub struct DryRunKeyboard;

impl KeyboardBackend for DryRunKeyboard {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn key(&mut self, key: KeyInput, direction: KeyDirection) -> Result<()> {
        debug!(target: "ghostwriter::input", ?key, ?direction, "DRY-RUN key");
        Ok(())
    }
}

fn map_key(key: KeyInput) -> Key {
    match key {
        KeyInput::Char(c) => Key::Unicode(c),
        KeyInput::Space => Key::Space,
        KeyInput::Modifier(Modifier::Control) => Key::Control,
        KeyInput::Modifier(Modifier::Meta) => Key::Meta,
        KeyInput::Modifier(Modifier::Alt) => Key::Alt,
        KeyInput::Modifier(Modifier::Shift) => Key::Shift,
    }
}

fn map_direction(direction: KeyDirection) -> Direction {
    match direction {
        KeyDirection::Press => Direction::Press,
        KeyDirection::Release => Direction::Release,
    }
}
