//! InjectTextUseCase: turns text fragments into injected keystrokes.
//!
//! This use case sits at the application layer and delegates to a
//! capability-tagged [`Backend`] for the actual OS-level delivery. The
//! platform-specific implementations are in the infrastructure layer.
//!
//! # The two backend capabilities
//!
//! - **Raw byte injection** ([`RawByteSink`]): the target consumes
//!   decoded bytes directly (the terminal-echo backend pushes each byte
//!   into the tty input queue). No key mapping is involved.
//! - **Synthetic key events** ([`KeyEventSink`]): the target consumes
//!   press/release/sync events (the uinput backend). Each decoded byte
//!   goes through the character mapper and chord expansion first.
//!
//! # Lifecycle guarantee
//!
//! The backend handle is exclusively owned here for the duration of one
//! invocation and moves through Ready → Closed exactly once. `close()`
//! is invoked on every exit path — normal completion, escape-syntax
//! failure, or emission failure — so terminal echo state and virtual
//! devices are always torn down. Already-emitted characters are never
//! retracted: an error aborts the remaining stream, nothing else.

use std::io;
use std::thread;
use std::time::Duration;

use keyject_core::{decode, expand_stroke, map_byte, ControlModifier, EscapeError, KeyEvent};
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed pause between characters on key-event backends. This is a
/// compatibility measure for downstream event coalescing, not a
/// correctness requirement; tests run with zero.
pub const DEFAULT_INTER_KEY_DELAY: Duration = Duration::from_millis(5);

/// Error type for backend acquisition and emission.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The injection target could not be opened or registered.
    #[error("failed to acquire injection target: {0}")]
    Acquire(String),
    /// A low-level write to the backend failed mid-stream.
    #[error("write to injection target failed: {0}")]
    Write(#[source] io::Error),
    /// Saved terminal state could not be restored during teardown.
    #[error("failed to restore terminal state: {0}")]
    Restore(String),
    /// The backend was used after `close()`. Lifecycle bug in the caller.
    #[error("backend used after close")]
    Closed,
}

/// Error type for one injection run.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("escape syntax error: {0}")]
    Escape(#[from] EscapeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A backend that accepts decoded bytes directly.
pub trait RawByteSink {
    /// Delivers one byte into the target's input stream.
    fn inject_byte(&mut self, byte: u8) -> Result<(), BackendError>;

    /// Tears the backend down. Called exactly once; the backend must
    /// restore any altered OS state even if earlier writes failed.
    fn close(&mut self) -> Result<(), BackendError>;
}

/// A backend that accepts synthetic key events.
pub trait KeyEventSink {
    /// Delivers one key event to the target device.
    fn emit_event(&mut self, event: &KeyEvent) -> Result<(), BackendError>;

    /// Tears the backend down (destroys the virtual device). Called
    /// exactly once.
    fn close(&mut self) -> Result<(), BackendError>;
}

/// Capability-tagged backend handle.
///
/// A windowing-system backend would be one more variant here with the
/// same contract; only these two are built.
pub enum Backend {
    /// Raw bytes flow straight through (terminal-echo style).
    RawBytes(Box<dyn RawByteSink>),
    /// Bytes are mapped to key identifiers and chorded (uinput style).
    KeyEvents(Box<dyn KeyEventSink>),
}

impl Backend {
    fn close(&mut self) -> Result<(), BackendError> {
        match self {
            Backend::RawBytes(sink) => sink.close(),
            Backend::KeyEvents(sink) => sink.close(),
        }
    }
}

/// Per-invocation configuration, built once from the CLI arguments.
#[derive(Debug, Clone)]
pub struct InjectConfig {
    /// Apply the escape grammar to each fragment.
    pub escapes: bool,
    /// Which key chords control bytes (Left Ctrl, or Caps Lock when
    /// the swap option is set).
    pub ctrl_modifier: ControlModifier,
    /// Pause between characters on key-event backends.
    pub inter_key_delay: Duration,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            escapes: false,
            ctrl_modifier: ControlModifier::LeftCtrl,
            inter_key_delay: DEFAULT_INTER_KEY_DELAY,
        }
    }
}

/// What one run actually delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InjectReport {
    /// Characters (or raw bytes) successfully injected.
    pub injected: usize,
    /// Characters skipped because no key mapping exists for them.
    pub skipped: usize,
}

/// The Inject Text use case.
///
/// Owns the per-invocation configuration; the backend handle is passed
/// in already acquired (Ready) and always leaves Closed.
pub struct InjectTextUseCase {
    config: InjectConfig,
}

impl InjectTextUseCase {
    /// Creates a new use case with the given configuration.
    pub fn new(config: InjectConfig) -> Self {
        Self { config }
    }

    /// Decodes and injects `fragments`, joined by single spaces.
    ///
    /// The backend is closed exactly once before this returns, on
    /// every path.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] for escape-syntax failures and for
    /// backend write failures. An emission error takes precedence over
    /// a teardown error when both occur.
    pub fn run(
        &self,
        fragments: &[String],
        backend: &mut Backend,
    ) -> Result<InjectReport, InjectError> {
        let outcome = self.decode_and_emit(fragments, backend);
        let teardown = backend.close();

        let report = outcome?;
        teardown?;
        Ok(report)
    }

    fn decode_and_emit(
        &self,
        fragments: &[String],
        backend: &mut Backend,
    ) -> Result<InjectReport, InjectError> {
        let decoded = self.decode_fragments(fragments)?;
        debug!(bytes = decoded.len(), "fragments decoded");

        match backend {
            Backend::RawBytes(sink) => {
                // No mapping step: decoded bytes flow straight through,
                // one at a time, aborting on the first write failure.
                for &byte in &decoded {
                    sink.inject_byte(byte)?;
                }
                Ok(InjectReport {
                    injected: decoded.len(),
                    skipped: 0,
                })
            }
            Backend::KeyEvents(sink) => self.emit_key_events(&decoded, sink.as_mut()),
        }
    }

    /// Decodes each fragment independently, then joins the results with
    /// exactly one 0x20 between consecutive fragments. The separator is
    /// inserted after decoding, so it is never itself escape-decoded.
    fn decode_fragments(&self, fragments: &[String]) -> Result<Vec<u8>, EscapeError> {
        let mut joined = Vec::new();
        for (index, fragment) in fragments.iter().enumerate() {
            if index > 0 {
                joined.push(b' ');
            }
            joined.extend(decode(fragment, self.config.escapes)?);
        }
        Ok(joined)
    }

    fn emit_key_events(
        &self,
        bytes: &[u8],
        sink: &mut dyn KeyEventSink,
    ) -> Result<InjectReport, InjectError> {
        let mut report = InjectReport::default();

        for &byte in bytes {
            let Some(mapped) = map_byte(byte) else {
                warn!("no key mapping for byte {byte:#04x}, skipping");
                report.skipped += 1;
                continue;
            };

            // One character is fully emitted, sync markers included,
            // before the next begins.
            for event in expand_stroke(mapped, self.config.ctrl_modifier) {
                sink.emit_event(&event)?;
            }
            report.injected += 1;

            if !self.config.inter_key_delay.is_zero() {
                thread::sleep(self.config.inter_key_delay);
            }
        }

        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
