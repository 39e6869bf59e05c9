use anyhow::Result;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::keyboard::{KeyDirection, KeyInput, KeyboardBackend};
use crate::config::{EditorSettings, Modifier, TypingSettings};
use crate::text::{WORDS, sample_words};
use crate::utils::pace::{jitter, pause};

/// Chord that opens a fresh document in the target editor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NewTabChord {
    pub modifier: Modifier,
    pub key: char,
    pub chord_settle: Duration,
    pub tab_settle: Duration,
}

impl From<&EditorSettings> for NewTabChord {
    fn from(editor: &EditorSettings) -> Self {
        Self {
            modifier: editor.new_tab_modifier,
            key: editor.new_tab_key,
            chord_settle: Duration::from_millis(editor.chord_settle_ms),
            tab_settle: Duration::from_millis(editor.tab_settle_ms),
        }
    }
}

/// Types human-paced text through a [`KeyboardBackend`].
///
/// Cancellation is observed between characters: a character that has been
/// pressed is always released before typing stops.
pub struct InputInjector {
    keyboard: Box<dyn KeyboardBackend>,
    typing: TypingSettings,
    chord: NewTabChord,
}

impl InputInjector {
    pub fn new(keyboard: Box<dyn KeyboardBackend>, typing: TypingSettings, chord: NewTabChord) -> Self {
        Self {
            keyboard,
            typing,
            chord,
        }
    }

    /// Type `word` one character at a time with a random delay after each.
    ///
    /// Returns `Ok(false)` when cancellation stopped the word before its last
    /// character.
    pub async fn type_word<R: Rng + ?Sized>(
        &mut self,
        word: &str,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        for c in word.chars() {
            if cancel.is_cancelled() {
                return Ok(false);
            }
            self.keyboard.tap(KeyInput::Char(c))?;
            pause(cancel, jitter(rng, self.typing.char_delay)).await;
        }
        Ok(true)
    }

    /// Type `word_count` random words separated by spaces.
    ///
    /// Returns `Ok(false)` if cancellation cut the stream short. Whatever was
    /// typed stays typed.
    pub async fn type_word_stream<R: Rng + ?Sized>(
        &mut self,
        word_count: usize,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let words = sample_words(WORDS, word_count, rng);
        info!(target: "ghostwriter::input", word_count, "Typing words");

        for (idx, word) in words.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(target: "ghostwriter::input", typed = idx, "Stream interrupted");
                return Ok(false);
            }
            if !self.type_word(word, rng, cancel).await? {
                debug!(target: "ghostwriter::input", typed = idx, "Stream interrupted mid-word");
                return Ok(false);
            }
            if idx + 1 < words.len() {
                if cancel.is_cancelled() {
                    return Ok(false);
                }
                self.keyboard.tap(KeyInput::Space)?;
                pause(cancel, jitter(rng, self.typing.word_pause)).await;
            }
        }

        if cancel.is_cancelled() {
            return Ok(false);
        }
        info!(target: "ghostwriter::input", word_count, "Completed words");
        Ok(true)
    }

    /// Press the new-tab chord, then give the editor time to open the tab.
    ///
    /// The modifier is released even if pressing the letter fails.
    pub async fn new_tab_gesture(&mut self) -> Result<()> {
        let NewTabChord {
            modifier,
            key,
            chord_settle,
            tab_settle,
        } = self.chord;
        info!(target: "ghostwriter::input", ?modifier, %key, "Opening new tab");

        let modifier = KeyInput::Modifier(modifier);
        let letter = KeyInput::Char(key);

        self.keyboard.key(modifier, KeyDirection::Press)?;
        tokio::time::sleep(chord_settle).await;
        let pressed = self.press_release_with_settle(letter, chord_settle).await;
        let released = self.keyboard.key(modifier, KeyDirection::Release);
        pressed?;
        released?;

        tokio::time::sleep(tab_settle).await;
        debug!(target: "ghostwriter::input", "New tab ready");
        Ok(())
    }

    async fn press_release_with_settle(&mut self, key: KeyInput, settle: Duration) -> Result<()> {
        self.keyboard.key(key, KeyDirection::Press)?;
        tokio::time::sleep(settle).await;
        self.keyboard.key(key, KeyDirection::Release)
    }
}
