//! # keyject-core
//!
//! Shared library for keyject containing the escape-sequence decoder,
//! the character-to-key mapping tables, and the chord expansion logic
//! that turns one mapped character into an ordered key-event sequence.
//!
//! This crate is pure: it has zero dependencies on OS APIs, terminals,
//! or device files. Everything here is deterministic and unit-testable
//! without root privileges or a real keyboard.
//!
//! # Architecture overview (for beginners)
//!
//! keyject simulates typing. Text supplied on the command line flows
//! through three pure stages defined in this crate before anything
//! touches the operating system:
//!
//! - **`escape`** – Decodes a text fragment into raw bytes. With
//!   escapes enabled, `\x41`, `\101`, `\^A`, `\n`, and friends expand
//!   into the byte they name; with escapes disabled the fragment passes
//!   through unchanged.
//!
//! - **`keymap`** – Classifies one decoded byte as a key stroke: which
//!   physical key produces it, and whether Shift (or a control
//!   modifier) must be held. `'a'` is the A key, `'A'` is Shift+A,
//!   `'!'` is Shift+1, byte 0x01 is Ctrl+A. Bytes with no US-layout
//!   key (e.g. 0xC3) are simply unmapped.
//!
//! - **`domain::chord`** – Expands one mapped stroke into the ordered
//!   press/release/sync event sequence a virtual keyboard must emit so
//!   that consumers never observe a half-applied chord.
//!
//! The `keyject-cli` crate owns the impure side: the terminal and
//! uinput backends that deliver these bytes and events to the OS.

pub mod domain;
pub mod escape;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `keyject_core::KeyCode` instead of `keyject_core::keymap::linux_ev::KeyCode`.
pub use domain::chord::{expand_stroke, ControlModifier, KeyEvent};
pub use escape::{decode, EscapeError};
pub use keymap::{map_byte, MappedKey};
pub use keymap::linux_ev::KeyCode;
