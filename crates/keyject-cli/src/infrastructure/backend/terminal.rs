//! Terminal-echo backend: raw byte injection into the controlling tty.
//!
//! # How TIOCSTI works (for beginners)
//!
//! The `TIOCSTI` ioctl ("Simulate Terminal Input") pushes one byte into
//! a terminal's input queue exactly as if the user had typed it. The
//! shell or program reading that terminal cannot tell the difference.
//! Because the byte goes straight into the input stream, no key mapping
//! is needed — newlines, control bytes, anything a terminal accepts can
//! flow through.
//!
//! # The echo guard
//!
//! A terminal normally *echoes* typed input back to the screen. Without
//! intervention every injected byte would be printed twice: once by the
//! echo and once when the reading program handles it. The backend
//! therefore saves the terminal attributes, clears the `ECHO` flag for
//! the duration of the injection, and restores the saved attributes on
//! `close()`. `Drop` re-runs the restore as a backstop so an early
//! return or panic can never leave the user's terminal silent.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;

use rustix::termios::{self, LocalModes, OptionalActions, Termios};
use tracing::debug;

use crate::application::inject_text::{BackendError, RawByteSink};

const TTY_PATH: &str = "/dev/tty";

/// Raw-byte backend writing into the controlling terminal.
///
/// `saved` doubles as the lifecycle flag: `Some` while Ready, taken on
/// the single transition to Closed.
pub struct TerminalEchoBackend {
    tty: File,
    saved: Option<Termios>,
}

impl TerminalEchoBackend {
    /// Acquires the controlling terminal and disables local echo.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Acquire`] if `/dev/tty` cannot be opened
    /// (no controlling terminal) or its attributes cannot be changed.
    pub fn open() -> Result<Self, BackendError> {
        let tty = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TTY_PATH)
            .map_err(|e| BackendError::Acquire(format!("cannot open {TTY_PATH}: {e}")))?;

        let saved = termios::tcgetattr(&tty)
            .map_err(|e| BackendError::Acquire(format!("tcgetattr on {TTY_PATH}: {e}")))?;

        let mut silenced = saved.clone();
        silenced.local_modes.remove(LocalModes::ECHO);
        termios::tcsetattr(&tty, OptionalActions::Now, &silenced)
            .map_err(|e| BackendError::Acquire(format!("disabling echo on {TTY_PATH}: {e}")))?;

        debug!("terminal echo disabled for injection");
        Ok(Self {
            tty,
            saved: Some(saved),
        })
    }

    /// Restores the saved terminal attributes. Idempotent: only the
    /// first call does anything.
    fn restore(&mut self) -> Result<(), BackendError> {
        if let Some(saved) = self.saved.take() {
            termios::tcsetattr(&self.tty, OptionalActions::Now, &saved)
                .map_err(|e| BackendError::Restore(format!("restoring echo: {e}")))?;
            debug!("terminal echo restored");
        }
        Ok(())
    }
}

impl RawByteSink for TerminalEchoBackend {
    fn inject_byte(&mut self, byte: u8) -> Result<(), BackendError> {
        if self.saved.is_none() {
            return Err(BackendError::Closed);
        }

        // SAFETY: TIOCSTI reads exactly one byte from the pointer; the
        // fd stays valid for the lifetime of `self.tty`.
        let rc = unsafe { libc::ioctl(self.tty.as_raw_fd(), libc::TIOCSTI, &byte as *const u8) };
        if rc == -1 {
            return Err(BackendError::Write(io::Error::last_os_error()));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.restore()
    }
}

impl Drop for TerminalEchoBackend {
    fn drop(&mut self) {
        // Backstop only: close() has normally already restored.
        let _ = self.restore();
    }
}
