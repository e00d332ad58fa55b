//! # keyject-cli
//!
//! Library crate backing the `keyject` binary. Split into two layers
//! following the application/infrastructure convention:
//!
//! - **`application`** – the injection use case: decodes and joins the
//!   text fragments, drives a [`application::inject_text::Backend`]
//!   through its lifecycle, and guarantees teardown on every exit path.
//!   Defines the backend traits; knows nothing about device files.
//!
//! - **`infrastructure`** – the concrete backends: the terminal-echo
//!   backend (`TIOCSTI` into `/dev/tty`), the uinput virtual-keyboard
//!   backend, and recording mocks for tests.
//!
//! The pure pieces (escape decoding, key tables, chord expansion) live
//! in the `keyject-core` crate.

pub mod application;
pub mod infrastructure;
