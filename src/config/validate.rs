use anyhow::{Context, Result, anyhow, bail};
use schemars::{Schema, schema_for};
use serde_valid::Validate;
use std::io::Write;
use tracing::trace;

use super::models::{DelayRange, Settings};

/// Generate the JSON Schema for the Settings model (for tooling and docs).
pub fn generate_schema() -> Schema {
    schema_for!(Settings)
}

/// Write the effective settings to any writer (pretty-printed JSON).
pub fn write_settings_to_writer<W: Write>(settings: &Settings, mut writer: W) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    writer
        .write_all(json.as_bytes())
        .context("Failed to write settings to writer")?;
    Ok(())
}

/// Check declared bounds, then the relations between fields that the
/// declarative attributes cannot express.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    settings
        .validate()
        .map_err(|errors| anyhow!("Settings out of bounds: {errors}"))?;

    check_range("typing.char_delay", settings.typing.char_delay)?;
    check_range("typing.word_pause", settings.typing.word_pause)?;

    let key = settings.editor.new_tab_key;
    if !key.is_ascii_alphanumeric() {
        bail!("editor.new_tab_key must be an ASCII letter or digit, got {key:?}");
    }

    trace!(target: "ghostwriter::config", "Settings validated");
    Ok(())
}

fn check_range(name: &str, range: DelayRange) -> Result<()> {
    if range.min_ms > range.max_ms {
        bail!(
            "{name}: min_ms ({}) must not exceed max_ms ({})",
            range.min_ms,
            range.max_ms
        );
    }
    Ok(())
}
