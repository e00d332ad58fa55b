//! Infrastructure layer: concrete injection backends.

pub mod backend;
