use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use ghostwriter::abort::AbortMonitor;
use ghostwriter::config::{self as cfg, AbortKey, MailBackendKind, Settings};
use ghostwriter::editor::SystemProcesses;
use ghostwriter::input::{DryRunKeyboard, EnigoKeyboard, KeyboardBackend};
use ghostwriter::mail::{MailBackend, MailClient};
use ghostwriter::orchestrator::{Orchestrator, Outcome};

/// Ghostwriter CLI
#[derive(Debug, Parser)]
#[command(
    name = ghostwriter::PKG_NAME,
    version = ghostwriter::PKG_VERSION,
    about = "Types into a text editor and cycles mail drafts until the abort key is pressed"
)]
struct Args {
    /// Log key events, launches and mail steps instead of performing them
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Set log level (e.g., trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Words typed per editor visit
    #[arg(long = "words")]
    words: Option<usize>,

    /// Seconds each mail draft stays on screen
    #[arg(long = "display-secs")]
    display_secs: Option<u64>,

    /// Editor process name; it is launched by that name when not running
    #[arg(long = "editor")]
    editor: Option<String>,

    /// Key that stops the run
    #[arg(long = "abort-key", value_enum)]
    abort_key: Option<AbortKey>,

    /// Mail client automation backend
    #[arg(long = "mail", value_enum)]
    mail: Option<MailBackendKind>,

    /// Seed the random generator for a reproducible run
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Print the effective settings as JSON and exit
    #[arg(long = "print-settings")]
    print_settings: bool,

    /// Print the JSON Schema for the settings and exit
    #[arg(long = "print-schema")]
    print_schema: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::default();
        if let Some(words) = self.words {
            settings.cycle.words_per_stream = words;
        }
        if let Some(secs) = self.display_secs {
            settings.mail.display_secs = secs;
        }
        if let Some(editor) = &self.editor {
            settings.editor.use_editor(editor);
        }
        if let Some(key) = self.abort_key {
            settings.abort.key = key;
        }
        if let Some(mail) = self.mail {
            settings.mail.backend = mail;
        }
        cfg::validate_settings(&settings).context("Invalid settings")?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ghostwriter::init_tracing(args.log_level.as_deref());

    if args.print_schema {
        let schema = cfg::generate_schema();
        let json = serde_json::to_string_pretty(&schema)?;
        println!("{json}");
        return Ok(());
    }

    let settings = args.settings()?;
    if args.print_settings {
        cfg::write_settings_to_writer(&settings, std::io::stdout())?;
        println!();
        return Ok(());
    }

    let dry_run = args.dry_run;
    info!(
        version = ghostwriter::PKG_VERSION,
        words = settings.cycle.words_per_stream,
        display_secs = settings.mail.display_secs,
        editor = %settings.editor.process_name,
        abort_key = ?settings.abort.key,
        dry_run,
        "Starting Ghostwriter (editor -> mail -> editor)"
    );

    let cancel = CancellationToken::new();
    let monitor = AbortMonitor::start(settings.abort.key, cancel.clone());

    let keyboard: Box<dyn KeyboardBackend> = if dry_run {
        Box::new(DryRunKeyboard)
    } else {
        Box::new(EnigoKeyboard::new())
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mail = MailClient::from_settings(&settings.mail, dry_run);
    debug!(keyboard = keyboard.name(), mail = mail.name(), "Backends selected");

    let mut orchestrator = Orchestrator::new(
        &settings,
        keyboard,
        Box::new(SystemProcesses::new(dry_run)),
        mail,
        rng,
        cancel,
    );
    let report = orchestrator.run().await;

    monitor.stop().await;

    match &report.outcome {
        Outcome::Aborted => info!(completed = report.completed, "{report}"),
        Outcome::Failed(_) => error!(completed = report.completed, "{report}"),
    }
    info!("Ghostwriter exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_valid() {
        let args = Args::try_parse_from(["ghostwriter"]).unwrap();
        let settings = args.settings().unwrap();
        assert_eq!(settings.cycle.words_per_stream, 85);
        assert!(!args.dry_run);
    }

    #[test]
    fn overrides_apply() {
        let args = Args::try_parse_from([
            "ghostwriter",
            "--words",
            "12",
            "--editor",
            "kate",
            "--abort-key",
            "f12",
            "--mail",
            "log-only",
        ])
        .unwrap();
        let settings = args.settings().unwrap();
        assert_eq!(settings.cycle.words_per_stream, 12);
        assert_eq!(settings.editor.process_name, "kate");
        assert_eq!(settings.abort.key, AbortKey::F12);
        assert_eq!(settings.mail.backend, MailBackendKind::LogOnly);
    }

    #[test]
    fn zero_words_is_rejected() {
        let args = Args::try_parse_from(["ghostwriter", "--words", "0"]).unwrap();
        assert!(args.settings().is_err());
    }
}
