//! Injection backend implementations.
//!
//! The real backends talk to Linux device files and are compiled only
//! on Linux; the mocks are always available for tests.

pub mod mock;

#[cfg(target_os = "linux")]
pub mod terminal;

#[cfg(target_os = "linux")]
pub mod uinput;
