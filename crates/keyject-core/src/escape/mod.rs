//! Escape-sequence decoder: turns a raw text fragment into decoded bytes.
//!
//! # The escape grammar
//!
//! With escapes enabled, a backslash introduces one of:
//!
//! | Escape  | Produces                                              |
//! |---------|-------------------------------------------------------|
//! | `\\`    | a literal backslash                                   |
//! | `\^X`   | the control byte for X: uppercase X, subtract 0x40    |
//! | `\xHH`  | the byte with hex value HH (exactly two digits)       |
//! | `\OOO`  | the byte with octal value OOO (one to three digits)   |
//! | `\n`    | 0x0A (newline)                                        |
//! | `\r`    | 0x0D (carriage return)                                |
//!
//! Examples: `\x41` and `\101` both decode to `A`; `\^A` (or `\^a`)
//! decodes to byte 0x01 (what pressing Ctrl+A produces).
//!
//! Any other `\X` is a *malformed* escape: the backslash and the
//! following character are emitted literally and a warning is logged,
//! but decoding continues. Two cases are hard errors instead, because
//! silently guessing would inject the wrong bytes: a `\^X` whose
//! uppercased X falls outside `@`..`_` (0x40–0x5F, the only range that
//! has a control byte), and an octal value above 255.
//!
//! # Decoding is one pass
//!
//! The scan moves strictly left to right and never re-reads consumed
//! bytes, so an expansion is never reinterpreted: `\x5c` decodes to a
//! backslash byte that is emitted as-is, not treated as the start of
//! another escape.
//!
//! With escapes disabled, [`decode`] is the identity function.

use thiserror::Error;
use tracing::warn;

/// Hard decoding failures. Malformed escapes (e.g. `\q`) are *not*
/// errors; they fall back to literal output with a warning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscapeError {
    /// `\^X` where the uppercased X is outside `@`..`_`, so no control
    /// byte exists for it.
    #[error("control escape `\\^{found}` is outside the @..._ range")]
    InvalidControl { found: char },

    /// `\^` at the very end of a fragment, with no character to apply
    /// the control transform to.
    #[error("control escape `\\^` at end of fragment")]
    TruncatedControl,

    /// An octal escape whose value does not fit in one byte, e.g. `\400`.
    #[error("octal escape value {value} exceeds 255")]
    OctalOverflow { value: u32 },
}

/// Decodes one text fragment into raw bytes.
///
/// When `enabled` is false the fragment's bytes are returned unchanged.
/// When true, the escape grammar above is applied in a single
/// deterministic left-to-right pass.
///
/// # Errors
///
/// Returns [`EscapeError`] for an invalid or truncated `\^X` control
/// specifier and for octal values above 255. Everything else decodes,
/// possibly with warn-level diagnostics for malformed escapes.
pub fn decode(fragment: &str, enabled: bool) -> Result<Vec<u8>, EscapeError> {
    let bytes = fragment.as_bytes();
    if !enabled {
        return Ok(bytes.to_vec());
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        match bytes.get(i + 1).copied() {
            // Lone trailing backslash: nothing follows, emit it literally.
            None => {
                warn!("trailing backslash at end of fragment, emitting literally");
                out.push(b'\\');
                i += 1;
            }

            Some(b'\\') => {
                out.push(b'\\');
                i += 2;
            }

            Some(b'^') => {
                let Some(&target) = bytes.get(i + 2) else {
                    return Err(EscapeError::TruncatedControl);
                };
                let upper = target.to_ascii_uppercase();
                if !(0x40..=0x5F).contains(&upper) {
                    return Err(EscapeError::InvalidControl {
                        found: target as char,
                    });
                }
                out.push(upper - 0x40);
                i += 3;
            }

            Some(b'x') => {
                let hi = bytes.get(i + 2).copied().and_then(hex_digit);
                let lo = bytes.get(i + 3).copied().and_then(hex_digit);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 4;
                    }
                    // Fewer than two hex digits: malformed, emit `\x`
                    // literally and rescan from the byte after `x`.
                    _ => {
                        warn!("malformed hex escape `\\x` without two hex digits");
                        out.extend_from_slice(b"\\x");
                        i += 2;
                    }
                }
            }

            Some(b'n') => {
                out.push(b'\n');
                i += 2;
            }

            Some(b'r') => {
                out.push(b'\r');
                i += 2;
            }

            Some(b'0'..=b'7') => {
                // Greedy: up to three octal digits, stop at the first
                // non-octal byte.
                let mut value: u32 = 0;
                let mut digits = 0;
                while digits < 3 {
                    match bytes.get(i + 1 + digits) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                if value > 255 {
                    return Err(EscapeError::OctalOverflow { value });
                }
                out.push(value as u8);
                i += 1 + digits;
            }

            Some(other) => {
                warn!(
                    "malformed escape `\\{}`, emitting literally",
                    other as char
                );
                out.push(b'\\');
                out.push(other);
                i += 2;
            }
        }
    }

    Ok(out)
}

/// Value of one ASCII hex digit, or `None` for anything else.
fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Disabled mode ─────────────────────────────────────────────────────────

    #[test]
    fn test_disabled_mode_is_identity() {
        // Arrange – a fragment full of would-be escapes
        let input = r"\x41 \101 \^A \\ \n plain";

        // Act
        let decoded = decode(input, false).unwrap();

        // Assert
        assert_eq!(decoded, input.as_bytes());
    }

    // ── Plain text ────────────────────────────────────────────────────────────

    #[test]
    fn test_plain_text_passes_through_unchanged() {
        let decoded = decode("hello world", true).unwrap();
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn test_empty_fragment_decodes_to_empty() {
        assert_eq!(decode("", true).unwrap(), b"");
    }

    // ── Hex escapes ───────────────────────────────────────────────────────────

    #[test]
    fn test_hex_escape_decodes_to_byte() {
        assert_eq!(decode(r"\x41", true).unwrap(), b"A");
    }

    #[test]
    fn test_hex_escape_lowercase_digits() {
        assert_eq!(decode(r"\x7e", true).unwrap(), b"~");
    }

    #[test]
    fn test_hex_escape_consumes_exactly_two_digits() {
        // `\x412` is byte 0x41 followed by a literal '2'
        assert_eq!(decode(r"\x412", true).unwrap(), b"A2");
    }

    #[test]
    fn test_hex_escape_with_one_digit_is_malformed_literal() {
        // Only one hex digit follows `\x`: emit `\x` literally, then
        // continue with the remaining bytes.
        assert_eq!(decode(r"\x4", true).unwrap(), b"\\x4");
    }

    #[test]
    fn test_hex_escape_with_no_digits_is_malformed_literal() {
        assert_eq!(decode(r"\xzz", true).unwrap(), b"\\xzz");
    }

    // ── Octal escapes ─────────────────────────────────────────────────────────

    #[test]
    fn test_octal_escape_decodes_to_byte() {
        // 101 octal = 65 = 'A'
        assert_eq!(decode(r"\101", true).unwrap(), b"A");
    }

    #[test]
    fn test_octal_escape_single_digit() {
        assert_eq!(decode(r"\7", true).unwrap(), [0x07]);
    }

    #[test]
    fn test_octal_escape_stops_at_non_octal_digit() {
        // `\78` is octal 7 followed by a literal '8'
        assert_eq!(decode(r"\78", true).unwrap(), [0x07, b'8']);
    }

    #[test]
    fn test_octal_escape_is_greedy_up_to_three_digits() {
        // `\1013` is octal 101 ('A') followed by a literal '3'
        assert_eq!(decode(r"\1013", true).unwrap(), b"A3");
    }

    #[test]
    fn test_octal_overflow_is_hard_error() {
        // 400 octal = 256, which does not fit in a byte
        assert_eq!(
            decode(r"\400", true),
            Err(EscapeError::OctalOverflow { value: 256 })
        );
    }

    #[test]
    fn test_octal_377_is_highest_legal_value() {
        assert_eq!(decode(r"\377", true).unwrap(), [0xFF]);
    }

    // ── Control escapes ───────────────────────────────────────────────────────

    #[test]
    fn test_control_escape_uppercase() {
        assert_eq!(decode(r"\^A", true).unwrap(), [0x01]);
    }

    #[test]
    fn test_control_escape_lowercase_is_uppercased_first() {
        assert_eq!(decode(r"\^a", true).unwrap(), [0x01]);
    }

    #[test]
    fn test_control_escape_at_sign_is_nul() {
        assert_eq!(decode(r"\^@", true).unwrap(), [0x00]);
    }

    #[test]
    fn test_control_escape_underscore_is_unit_separator() {
        assert_eq!(decode(r"\^_", true).unwrap(), [0x1F]);
    }

    #[test]
    fn test_control_escape_out_of_range_is_hard_error() {
        assert_eq!(
            decode(r"\^1", true),
            Err(EscapeError::InvalidControl { found: '1' })
        );
    }

    #[test]
    fn test_control_escape_truncated_is_hard_error() {
        assert_eq!(decode(r"ab\^", true), Err(EscapeError::TruncatedControl));
    }

    // ── Backslash and newline escapes ─────────────────────────────────────────

    #[test]
    fn test_double_backslash_decodes_to_single_backslash() {
        assert_eq!(decode(r"\\", true).unwrap(), b"\\");
    }

    #[test]
    fn test_decoded_backslash_is_not_rescanned() {
        // `\\n` is a literal backslash followed by a literal 'n', never
        // a newline: the expansion of `\\` must not be reinterpreted.
        assert_eq!(decode(r"\\n", true).unwrap(), b"\\n");
    }

    #[test]
    fn test_newline_and_carriage_return_escapes() {
        assert_eq!(decode(r"\n\r", true).unwrap(), b"\n\r");
    }

    // ── Malformed escapes ─────────────────────────────────────────────────────

    #[test]
    fn test_unknown_escape_is_emitted_literally() {
        assert_eq!(decode(r"\q", true).unwrap(), b"\\q");
    }

    #[test]
    fn test_decoding_continues_after_malformed_escape() {
        assert_eq!(decode(r"a\qb\x42", true).unwrap(), b"a\\qbB");
    }

    #[test]
    fn test_trailing_lone_backslash_is_emitted_literally() {
        assert_eq!(decode("end\\", true).unwrap(), b"end\\");
    }

    // ── Mixed fragments ───────────────────────────────────────────────────────

    #[test]
    fn test_mixed_fragment_decodes_in_one_pass() {
        let decoded = decode(r"say \x68\151\^H!", true).unwrap();
        assert_eq!(decoded, b"say hi\x08!");
    }
}
