//! Run settings for ghostwriter.
//!
//! There is no settings file: every value has a default and the CLI can
//! override a few of them. Import from here for a stable API.
//!
//! Example:
//! use ghostwriter::config::{Settings, validate_settings};
//!
//! let settings = Settings::default();
//! validate_settings(&settings)?;

pub mod models;
pub mod validate;

pub use models::{
    AbortKey, AbortSettings, CycleSettings, DelayRange, EditorSettings, MailBackendKind,
    MailSettings, Modifier, Settings, TypingSettings,
};

pub use validate::{generate_schema, validate_settings, write_settings_to_writer};
