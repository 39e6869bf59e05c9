//! Synthetic keyboard input.
//!
//! - `keyboard`: the [`KeyboardBackend`] seam with Enigo and dry-run backends.
//! - `injector`: human-paced typing and the editor's new-tab chord.

pub mod injector;
pub mod keyboard;

pub use injector::{InputInjector, NewTabChord};
pub use keyboard::{DryRunKeyboard, EnigoKeyboard, KeyDirection, KeyInput, KeyboardBackend};
