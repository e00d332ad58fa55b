//! Character-to-key mapping: one decoded byte in, one key stroke out.
//!
//! The canonical representation is the Linux evdev key code (see
//! [`linux_ev`]); the mapper classifies each byte into the stroke that
//! produces it on a US layout, or reports it as unmapped.
//!
//! Unmapped is not an error: the emitter skips the byte with a
//! diagnostic and keeps going, matching how a human would shrug at a
//! character their keyboard cannot type.

pub mod linux_ev;

use linux_ev::{lookup_printable, KeyCode, LETTER_KEYS};

/// One byte classified as a key stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedKey {
    /// Press and release the key, no modifier.
    Plain(KeyCode),
    /// Hold Shift around the key press.
    Shifted(KeyCode),
    /// Hold the configured control modifier around the letter key.
    /// Which modifier (Left Ctrl, or Caps Lock when the swap option is
    /// set) is decided at emission time, not here.
    ControlChord(KeyCode),
}

/// Maps one decoded byte to the stroke that produces it.
///
/// Coverage:
///
/// - 0x0A / 0x0D → Enter (both land on the Enter key; checked before
///   the control range so newline never becomes Ctrl+J)
/// - 0x01–0x1A → a control chord on the corresponding letter key
/// - 0x20–0x7E → the printable table (uppercase letters and shifted
///   punctuation require Shift)
/// - everything else → `None` (unmapped)
pub fn map_byte(byte: u8) -> Option<MappedKey> {
    match byte {
        b'\n' | b'\r' => Some(MappedKey::Plain(KeyCode::Enter)),
        0x01..=0x1A => Some(MappedKey::ControlChord(LETTER_KEYS[(byte - 1) as usize])),
        0x20..=0x7E => lookup_printable(byte).map(|(key, shifted)| {
            if shifted {
                MappedKey::Shifted(key)
            } else {
                MappedKey::Plain(key)
            }
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_letter_maps_plain() {
        assert_eq!(map_byte(b'a'), Some(MappedKey::Plain(KeyCode::KeyA)));
    }

    #[test]
    fn test_uppercase_letter_requires_shift() {
        assert_eq!(map_byte(b'A'), Some(MappedKey::Shifted(KeyCode::KeyA)));
    }

    #[test]
    fn test_shifted_digit_punctuation() {
        assert_eq!(map_byte(b'!'), Some(MappedKey::Shifted(KeyCode::Key1)));
    }

    #[test]
    fn test_digit_maps_plain() {
        assert_eq!(map_byte(b'7'), Some(MappedKey::Plain(KeyCode::Key7)));
    }

    #[test]
    fn test_space_maps_plain() {
        assert_eq!(map_byte(b' '), Some(MappedKey::Plain(KeyCode::Space)));
    }

    #[test]
    fn test_newline_and_carriage_return_map_to_enter() {
        // Both are inside the 0x01–0x1A control range but must resolve
        // to Enter, not Ctrl+J / Ctrl+M.
        assert_eq!(map_byte(b'\n'), Some(MappedKey::Plain(KeyCode::Enter)));
        assert_eq!(map_byte(b'\r'), Some(MappedKey::Plain(KeyCode::Enter)));
    }

    #[test]
    fn test_control_byte_maps_to_letter_chord() {
        assert_eq!(
            map_byte(0x01),
            Some(MappedKey::ControlChord(KeyCode::KeyA))
        );
        assert_eq!(
            map_byte(0x1A),
            Some(MappedKey::ControlChord(KeyCode::KeyZ))
        );
    }

    #[test]
    fn test_bytes_outside_all_classes_are_unmapped() {
        assert_eq!(map_byte(0x00), None); // NUL
        assert_eq!(map_byte(0x1B), None); // ESC, outside the chord range
        assert_eq!(map_byte(0x7F), None); // DEL
        assert_eq!(map_byte(0xC3), None); // UTF-8 continuation territory
    }

    #[test]
    fn test_every_printable_byte_is_mapped() {
        for byte in 0x20..=0x7Eu8 {
            assert!(
                map_byte(byte).is_some(),
                "printable byte {byte:#04x} must map"
            );
        }
    }
}
