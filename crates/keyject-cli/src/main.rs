//! keyject — entry point.
//!
//! Injects the positional text fragments as keystrokes, either into
//! the controlling terminal (default) or system-wide through a uinput
//! virtual keyboard (`-g`).
//!
//! # Usage
//!
//! ```text
//! keyject [OPTIONS] <FRAGMENTS>... [-- <FRAGMENTS>...]
//!
//! Options:
//!   -e, --escapes    Decode \\, \^X, \xHH, \OOO, \n, \r in each fragment
//!   -g, --global     Use the uinput virtual-keyboard backend
//!   -c, --caps-ctrl  Chord control bytes with Caps Lock instead of Left Ctrl
//! ```
//!
//! Fragments are joined with a single space. Everything after `--` is
//! taken literally even if it starts with `-`.
//!
//! # Exit codes
//!
//! `0` on success; `1` for missing fragments, an unknown flag, a
//! resource-acquisition failure, an escape-syntax failure, or an
//! emission failure. (`--help`/`--version` exit 0.)

use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use keyject_cli::application::inject_text::{
    Backend, InjectConfig, InjectTextUseCase, DEFAULT_INTER_KEY_DELAY,
};
use keyject_core::ControlModifier;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inject keystrokes into the terminal or system-wide.
#[derive(Debug, Parser)]
#[command(
    name = "keyject",
    about = "Inject text as keystrokes into the controlling terminal or a virtual keyboard",
    version
)]
struct Cli {
    /// Text fragments to inject, joined with a single space.
    #[arg(required = true)]
    fragments: Vec<String>,

    /// Decode escape sequences (\\, \^X, \xHH, \OOO, \n, \r) in each fragment.
    #[arg(short = 'e', long)]
    escapes: bool,

    /// Inject system-wide through a uinput virtual keyboard instead of
    /// the controlling terminal.
    #[arg(short = 'g', long)]
    global: bool,

    /// Chord control bytes with Caps Lock instead of Left Ctrl (for
    /// setups where the two keys are swapped at the OS level).
    #[arg(short = 'c', long)]
    caps_ctrl: bool,
}

impl Cli {
    fn inject_config(&self) -> InjectConfig {
        InjectConfig {
            escapes: self.escapes,
            ctrl_modifier: if self.caps_ctrl {
                ControlModifier::CapsLock
            } else {
                ControlModifier::LeftCtrl
            },
            inter_key_delay: DEFAULT_INTER_KEY_DELAY,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Log level via RUST_LOG, defaulting to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // try_parse instead of parse: the exit-code contract is 1 for any
    // argument error, not clap's default 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.inject_config();
    let mut backend = acquire_backend(cli.global)?;

    let report = InjectTextUseCase::new(config).run(&cli.fragments, &mut backend)?;

    info!(
        injected = report.injected,
        skipped = report.skipped,
        "injection finished"
    );
    Ok(())
}

#[cfg(target_os = "linux")]
fn acquire_backend(global: bool) -> anyhow::Result<Backend> {
    use keyject_cli::infrastructure::backend::{terminal::TerminalEchoBackend, uinput::UinputBackend};

    Ok(if global {
        Backend::KeyEvents(Box::new(UinputBackend::create()?))
    } else {
        Backend::RawBytes(Box::new(TerminalEchoBackend::open()?))
    })
}

#[cfg(not(target_os = "linux"))]
fn acquire_backend(_global: bool) -> anyhow::Result<Backend> {
    anyhow::bail!("no injection backend is available on this platform (Linux only)")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
