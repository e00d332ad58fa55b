//! Pure domain logic: key events and chord expansion.

pub mod chord;
