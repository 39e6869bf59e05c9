use schemars::JsonSchema;
use serde::Serialize;
use serde_valid::Validate;

/// Root settings for a ghostwriter run.
///
/// Every field has a default, so a run needs no input at all. The CLI may
/// override a handful of fields before `validate_settings` is applied.
#[derive(Debug, Clone, Serialize, JsonSchema, Validate, Default)]
pub struct Settings {
    /// Keystroke pacing.
    #[validate]
    pub typing: TypingSettings,

    /// Target editor process and its new-tab chord.
    #[validate]
    pub editor: EditorSettings,

    /// Mail draft automation.
    #[validate]
    pub mail: MailSettings,

    /// Settle delays and stream size for the Editor -> Mail -> Editor cycle.
    #[validate]
    pub cycle: CycleSettings,

    /// Cancellation key.
    pub abort: AbortSettings,
}

/// Inclusive millisecond interval a random delay is drawn from.
#[derive(Debug, Copy, Clone, Serialize, JsonSchema, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields exactly `ms`.
    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, Validate)]
pub struct TypingSettings {
    /// Delay after each typed character.
    pub char_delay: DelayRange,

    /// Pause after each space between words.
    pub word_pause: DelayRange,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            char_delay: DelayRange::new(50, 500),
            word_pause: DelayRange::new(200, 2000),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, Validate)]
pub struct EditorSettings {
    /// Name looked up in the OS process table (case-insensitive substring).
    #[validate(min_length = 1)]
    pub process_name: String,

    /// Program spawned when no matching process is running.
    #[validate(min_length = 1)]
    pub program: String,

    /// Arguments passed to `program`.
    pub args: Vec<String>,

    /// Wait after launching the editor so its window can take focus.
    pub launch_settle_ms: u64,

    /// Modifier held for the new-tab chord.
    pub new_tab_modifier: Modifier,

    /// Letter pressed with the modifier.
    pub new_tab_key: char,

    /// Gap between the individual presses and releases of the chord.
    pub chord_settle_ms: u64,

    /// Wait after the chord for the editor to open the tab.
    pub tab_settle_ms: u64,
}

impl EditorSettings {
    /// Point at another editor, launched the way the platform starts apps by name.
    pub fn use_editor(&mut self, process_name: &str) {
        let (program, args) = launch_command(process_name);
        self.process_name = process_name.to_string();
        self.program = program;
        self.args = args;
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        let process_name = default_editor();
        let (program, args) = launch_command(process_name);
        Self {
            process_name: process_name.into(),
            program,
            args,
            launch_settle_ms: 2000,
            new_tab_modifier: Modifier::platform_default(),
            new_tab_key: 'n',
            chord_settle_ms: 50,
            tab_settle_ms: 1000,
        }
    }
}

#[cfg(windows)]
fn default_editor() -> &'static str {
    "notepad.exe"
}

#[cfg(target_os = "macos")]
fn default_editor() -> &'static str {
    "TextEdit"
}

#[cfg(not(any(windows, target_os = "macos")))]
fn default_editor() -> &'static str {
    "gedit"
}

/// Application bundles are started through `open -a` on macOS.
#[cfg(target_os = "macos")]
fn launch_command(name: &str) -> (String, Vec<String>) {
    ("open".into(), vec!["-a".into(), name.into()])
}

#[cfg(not(target_os = "macos"))]
fn launch_command(name: &str) -> (String, Vec<String>) {
    (name.into(), Vec::new())
}

#[derive(Debug, Clone, Serialize, JsonSchema, Validate)]
pub struct MailSettings {
    /// Which mail client automation to drive.
    pub backend: MailBackendKind,

    /// Recipient placed on the draft (empty by default).
    pub recipient: String,

    /// Subject placed on the draft.
    #[validate(min_length = 1)]
    pub subject: String,

    /// How long the draft stays on screen before it is discarded.
    pub display_secs: u64,

    /// Scripting host used to reach the Outlook automation endpoint.
    #[validate(min_length = 1)]
    pub powershell: String,

    /// Maximum wait for each reply from the automation bridge.
    #[validate(minimum = 1)]
    pub reply_timeout_secs: u64,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            backend: MailBackendKind::platform_default(),
            recipient: String::new(),
            subject: "Project Update and Strategic Recommendations".into(),
            display_secs: 8,
            powershell: "powershell.exe".into(),
            reply_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, Validate)]
pub struct CycleSettings {
    /// Words typed per editor visit.
    #[validate(minimum = 1)]
    pub words_per_stream: usize,

    /// Pause between the new-tab chord and the first keystroke.
    pub pre_typing_settle_ms: u64,

    /// Pause on each side of the mail step.
    pub mail_settle_ms: u64,

    /// Pause after a completed cycle.
    pub cycle_settle_ms: u64,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            words_per_stream: 85,
            pre_typing_settle_ms: 1000,
            mail_settle_ms: 2000,
            cycle_settle_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, Default)]
pub struct AbortSettings {
    pub key: AbortKey,
}

/// Modifier keys usable in the new-tab chord.
#[derive(Debug, Copy, Clone, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Control,
    Meta,
    Alt,
    Shift,
}

impl Modifier {
    /// Cmd on macOS, Ctrl elsewhere.
    pub const fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Meta
        } else {
            Self::Control
        }
    }
}

/// Key that requests cancellation when pressed anywhere on the desktop.
#[derive(Debug, Copy, Clone, Serialize, JsonSchema, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AbortKey {
    #[default]
    Escape,
    F12,
    Pause,
    ScrollLock,
}

/// Mail client automation backends.
#[derive(Debug, Copy, Clone, Serialize, JsonSchema, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MailBackendKind {
    /// Outlook through its COM automation surface.
    Outlook,
    /// Log each step without touching any mail client.
    LogOnly,
}

impl MailBackendKind {
    /// Outlook automation only exists on Windows.
    pub const fn platform_default() -> Self {
        if cfg!(windows) {
            Self::Outlook
        } else {
            Self::LogOnly
        }
    }
}
