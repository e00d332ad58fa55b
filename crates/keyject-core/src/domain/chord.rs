//! Chord expansion: one mapped character → an ordered key-event sequence.
//!
//! # Why an explicit sequence? (for beginners)
//!
//! A physical keyboard never sends "capital A". It sends *Shift down*,
//! then *A down*, then *A up*, then *Shift up*, and the receiving
//! system composes the character. A virtual keyboard must reproduce
//! exactly that choreography, with one extra wrinkle: after every
//! discrete state change it emits a *synchronization* marker telling
//! consumers "apply what you have seen so far as one atomic update".
//! Without the markers, a consumer could observe the A press while
//! Shift is only half-applied and type a lowercase `a`.
//!
//! The ordering invariant is therefore:
//!
//! 1. modifier press strictly precedes the key it protects,
//! 2. key release strictly precedes modifier release,
//! 3. every press/release is followed by a [`KeyEvent::Sync`].
//!
//! [`expand_stroke`] encodes this as a pure function so the exact event
//! order is testable without any device.

use crate::keymap::linux_ev::KeyCode;
use crate::keymap::MappedKey;

/// One low-level keyboard event, strictly ordered within the sequence
/// produced for a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Modifier key goes down (Shift, Ctrl, or Caps Lock).
    ModifierPress(KeyCode),
    /// The protected key goes down.
    KeyPress(KeyCode),
    /// The protected key comes up.
    KeyRelease(KeyCode),
    /// Modifier key comes up.
    ModifierRelease(KeyCode),
    /// Synchronization marker: treat preceding changes as one atomic update.
    Sync,
}

/// Which key acts as the control modifier in control-byte chords.
///
/// Conventionally Left Ctrl; the swap option substitutes Caps Lock for
/// setups where the two keys are exchanged at the OS level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlModifier {
    #[default]
    LeftCtrl,
    CapsLock,
}

impl ControlModifier {
    /// The physical key emitting this modifier.
    pub fn key(self) -> KeyCode {
        match self {
            ControlModifier::LeftCtrl => KeyCode::LeftCtrl,
            ControlModifier::CapsLock => KeyCode::CapsLock,
        }
    }
}

/// Expands one mapped character into its full ordered event sequence.
///
/// Plain strokes produce 4 events, chorded strokes 8:
///
/// ```text
/// Plain:   KeyPress, Sync, KeyRelease, Sync
/// Chorded: ModifierPress, Sync, KeyPress, Sync,
///          KeyRelease, Sync, ModifierRelease, Sync
/// ```
pub fn expand_stroke(mapped: MappedKey, ctrl: ControlModifier) -> Vec<KeyEvent> {
    let (key, modifier) = match mapped {
        MappedKey::Plain(key) => (key, None),
        MappedKey::Shifted(key) => (key, Some(KeyCode::LeftShift)),
        MappedKey::ControlChord(key) => (key, Some(ctrl.key())),
    };

    let mut events = Vec::with_capacity(8);
    if let Some(m) = modifier {
        events.push(KeyEvent::ModifierPress(m));
        events.push(KeyEvent::Sync);
    }
    events.push(KeyEvent::KeyPress(key));
    events.push(KeyEvent::Sync);
    events.push(KeyEvent::KeyRelease(key));
    events.push(KeyEvent::Sync);
    if let Some(m) = modifier {
        events.push(KeyEvent::ModifierRelease(m));
        events.push(KeyEvent::Sync);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_stroke_is_press_sync_release_sync() {
        // Act
        let events = expand_stroke(MappedKey::Plain(KeyCode::KeyA), ControlModifier::LeftCtrl);

        // Assert
        assert_eq!(
            events,
            vec![
                KeyEvent::KeyPress(KeyCode::KeyA),
                KeyEvent::Sync,
                KeyEvent::KeyRelease(KeyCode::KeyA),
                KeyEvent::Sync,
            ]
        );
    }

    #[test]
    fn test_shifted_stroke_has_exact_eight_event_order() {
        // Act
        let events =
            expand_stroke(MappedKey::Shifted(KeyCode::KeyA), ControlModifier::LeftCtrl);

        // Assert – the full required order, nothing more, nothing less
        assert_eq!(
            events,
            vec![
                KeyEvent::ModifierPress(KeyCode::LeftShift),
                KeyEvent::Sync,
                KeyEvent::KeyPress(KeyCode::KeyA),
                KeyEvent::Sync,
                KeyEvent::KeyRelease(KeyCode::KeyA),
                KeyEvent::Sync,
                KeyEvent::ModifierRelease(KeyCode::LeftShift),
                KeyEvent::Sync,
            ]
        );
    }

    #[test]
    fn test_control_chord_uses_left_ctrl_by_default() {
        let events = expand_stroke(
            MappedKey::ControlChord(KeyCode::KeyC),
            ControlModifier::LeftCtrl,
        );
        assert_eq!(events[0], KeyEvent::ModifierPress(KeyCode::LeftCtrl));
        assert_eq!(events[6], KeyEvent::ModifierRelease(KeyCode::LeftCtrl));
    }

    #[test]
    fn test_control_chord_respects_caps_lock_swap() {
        let events = expand_stroke(
            MappedKey::ControlChord(KeyCode::KeyC),
            ControlModifier::CapsLock,
        );
        assert_eq!(events[0], KeyEvent::ModifierPress(KeyCode::CapsLock));
        assert_eq!(events[6], KeyEvent::ModifierRelease(KeyCode::CapsLock));
    }

    #[test]
    fn test_modifier_press_precedes_key_and_release_follows_it() {
        let events =
            expand_stroke(MappedKey::Shifted(KeyCode::Key1), ControlModifier::LeftCtrl);

        let modifier_press = events
            .iter()
            .position(|e| matches!(e, KeyEvent::ModifierPress(_)))
            .unwrap();
        let key_press = events
            .iter()
            .position(|e| matches!(e, KeyEvent::KeyPress(_)))
            .unwrap();
        let key_release = events
            .iter()
            .position(|e| matches!(e, KeyEvent::KeyRelease(_)))
            .unwrap();
        let modifier_release = events
            .iter()
            .position(|e| matches!(e, KeyEvent::ModifierRelease(_)))
            .unwrap();

        assert!(modifier_press < key_press);
        assert!(key_release < modifier_release);
    }

    #[test]
    fn test_every_state_change_is_followed_by_sync() {
        let events =
            expand_stroke(MappedKey::Shifted(KeyCode::KeyZ), ControlModifier::LeftCtrl);
        for pair in events.chunks(2) {
            assert_ne!(pair[0], KeyEvent::Sync, "state change expected first");
            assert_eq!(pair[1], KeyEvent::Sync, "Sync must follow each change");
        }
    }
}
