//! Utilities for ghostwriter.
//!
//! Submodules:
//! - `pace`: cancellable sleeps and random delay draws used by every loop.

pub mod pace;

pub use pace::{jitter, pause, pause_ms};
