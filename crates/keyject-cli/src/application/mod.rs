//! Application layer: the injection use case and the backend contract
//! it drives. Platform-specific backend implementations live in the
//! infrastructure layer.

pub mod inject_text;
