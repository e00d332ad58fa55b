//! Linux evdev key codes and the printable-ASCII key table.
//!
//! # What is an evdev key code? (for beginners)
//!
//! The Linux input subsystem identifies keys by *position*, not by the
//! character they produce. `KEY_A` (30) is the key in the A position of
//! a QWERTY board; whether it types `a`, `A`, or `Ctrl-A` depends on
//! which modifiers are held. These position codes are what a uinput
//! virtual keyboard writes in its `input_event` records, so the numeric
//! value of each [`KeyCode`] variant below is its code from
//! `<linux/input-event-codes.h>`.
//!
//! The codes are not in alphabetical order — they follow the physical
//! rows of the original PC keyboard (`KEY_Q` = 16, `KEY_A` = 30,
//! `KEY_Z` = 44), which is why `KeyB = 48` sits far from `KeyA = 30`.
//!
//! # The printable table
//!
//! [`lookup_printable`] resolves every printable ASCII byte
//! (0x20–0x7E) to the key that produces it on a US layout plus a
//! "Shift required" flag: `'-'` is the Minus key unshifted, `'_'` is
//! the same key shifted; `'1'`/`'!'` share Key1, and so on. The table
//! is static data with a first-match lookup so both the mapping and its
//! completeness are directly testable.

/// Symbolic identifier for one physical key.
///
/// The numeric value of each variant is its Linux evdev key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum KeyCode {
    // Number row (KEY_1..KEY_0 are consecutive; 0 comes after 9)
    Key1 = 2,
    Key2 = 3,
    Key3 = 4,
    Key4 = 5,
    Key5 = 6,
    Key6 = 7,
    Key7 = 8,
    Key8 = 9,
    Key9 = 10,
    Key0 = 11,
    Minus = 12,
    Equal = 13,

    // Top letter row
    KeyQ = 16,
    KeyW = 17,
    KeyE = 18,
    KeyR = 19,
    KeyT = 20,
    KeyY = 21,
    KeyU = 22,
    KeyI = 23,
    KeyO = 24,
    KeyP = 25,
    LeftBrace = 26,
    RightBrace = 27,
    Enter = 28,
    LeftCtrl = 29,

    // Home row
    KeyA = 30,
    KeyS = 31,
    KeyD = 32,
    KeyF = 33,
    KeyG = 34,
    KeyH = 35,
    KeyJ = 36,
    KeyK = 37,
    KeyL = 38,
    Semicolon = 39,
    Apostrophe = 40,
    Grave = 41,
    LeftShift = 42,
    Backslash = 43,

    // Bottom letter row
    KeyZ = 44,
    KeyX = 45,
    KeyC = 46,
    KeyV = 47,
    KeyB = 48,
    KeyN = 49,
    KeyM = 50,
    Comma = 51,
    Dot = 52,
    Slash = 53,

    Space = 57,
    CapsLock = 58,
}

impl KeyCode {
    /// The raw evdev code written into `input_event.code`.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Every key the injection engine may ever press, including the
    /// modifiers used for chording. A virtual keyboard must register
    /// exactly this set (via `UI_SET_KEYBIT`) before creating itself,
    /// or the kernel will silently drop events for unregistered keys.
    pub const ALL: &'static [KeyCode] = &[
        KeyCode::Key1,
        KeyCode::Key2,
        KeyCode::Key3,
        KeyCode::Key4,
        KeyCode::Key5,
        KeyCode::Key6,
        KeyCode::Key7,
        KeyCode::Key8,
        KeyCode::Key9,
        KeyCode::Key0,
        KeyCode::Minus,
        KeyCode::Equal,
        KeyCode::KeyQ,
        KeyCode::KeyW,
        KeyCode::KeyE,
        KeyCode::KeyR,
        KeyCode::KeyT,
        KeyCode::KeyY,
        KeyCode::KeyU,
        KeyCode::KeyI,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::LeftBrace,
        KeyCode::RightBrace,
        KeyCode::Enter,
        KeyCode::LeftCtrl,
        KeyCode::KeyA,
        KeyCode::KeyS,
        KeyCode::KeyD,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::Semicolon,
        KeyCode::Apostrophe,
        KeyCode::Grave,
        KeyCode::LeftShift,
        KeyCode::Backslash,
        KeyCode::KeyZ,
        KeyCode::KeyX,
        KeyCode::KeyC,
        KeyCode::KeyV,
        KeyCode::KeyB,
        KeyCode::KeyN,
        KeyCode::KeyM,
        KeyCode::Comma,
        KeyCode::Dot,
        KeyCode::Slash,
        KeyCode::Space,
        KeyCode::CapsLock,
    ];
}

/// The A–Z letter keys indexed by alphabet position, for resolving
/// control chords (byte 0x01 is Ctrl + `LETTER_KEYS[0]`, i.e. Ctrl+A).
pub const LETTER_KEYS: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

/// US-layout table: printable ASCII byte → (key, Shift required).
///
/// Covers 0x20–0x7E completely, in ASCII order. Shifted and unshifted
/// variants of the same physical key appear as separate rows (`-` and
/// `_` both resolve to [`KeyCode::Minus`]).
static PRINTABLE: &[(u8, KeyCode, bool)] = &[
    (b' ', KeyCode::Space, false),
    (b'!', KeyCode::Key1, true),
    (b'"', KeyCode::Apostrophe, true),
    (b'#', KeyCode::Key3, true),
    (b'$', KeyCode::Key4, true),
    (b'%', KeyCode::Key5, true),
    (b'&', KeyCode::Key7, true),
    (b'\'', KeyCode::Apostrophe, false),
    (b'(', KeyCode::Key9, true),
    (b')', KeyCode::Key0, true),
    (b'*', KeyCode::Key8, true),
    (b'+', KeyCode::Equal, true),
    (b',', KeyCode::Comma, false),
    (b'-', KeyCode::Minus, false),
    (b'.', KeyCode::Dot, false),
    (b'/', KeyCode::Slash, false),
    (b'0', KeyCode::Key0, false),
    (b'1', KeyCode::Key1, false),
    (b'2', KeyCode::Key2, false),
    (b'3', KeyCode::Key3, false),
    (b'4', KeyCode::Key4, false),
    (b'5', KeyCode::Key5, false),
    (b'6', KeyCode::Key6, false),
    (b'7', KeyCode::Key7, false),
    (b'8', KeyCode::Key8, false),
    (b'9', KeyCode::Key9, false),
    (b':', KeyCode::Semicolon, true),
    (b';', KeyCode::Semicolon, false),
    (b'<', KeyCode::Comma, true),
    (b'=', KeyCode::Equal, false),
    (b'>', KeyCode::Dot, true),
    (b'?', KeyCode::Slash, true),
    (b'@', KeyCode::Key2, true),
    (b'A', KeyCode::KeyA, true),
    (b'B', KeyCode::KeyB, true),
    (b'C', KeyCode::KeyC, true),
    (b'D', KeyCode::KeyD, true),
    (b'E', KeyCode::KeyE, true),
    (b'F', KeyCode::KeyF, true),
    (b'G', KeyCode::KeyG, true),
    (b'H', KeyCode::KeyH, true),
    (b'I', KeyCode::KeyI, true),
    (b'J', KeyCode::KeyJ, true),
    (b'K', KeyCode::KeyK, true),
    (b'L', KeyCode::KeyL, true),
    (b'M', KeyCode::KeyM, true),
    (b'N', KeyCode::KeyN, true),
    (b'O', KeyCode::KeyO, true),
    (b'P', KeyCode::KeyP, true),
    (b'Q', KeyCode::KeyQ, true),
    (b'R', KeyCode::KeyR, true),
    (b'S', KeyCode::KeyS, true),
    (b'T', KeyCode::KeyT, true),
    (b'U', KeyCode::KeyU, true),
    (b'V', KeyCode::KeyV, true),
    (b'W', KeyCode::KeyW, true),
    (b'X', KeyCode::KeyX, true),
    (b'Y', KeyCode::KeyY, true),
    (b'Z', KeyCode::KeyZ, true),
    (b'[', KeyCode::LeftBrace, false),
    (b'\\', KeyCode::Backslash, false),
    (b']', KeyCode::RightBrace, false),
    (b'^', KeyCode::Key6, true),
    (b'_', KeyCode::Minus, true),
    (b'`', KeyCode::Grave, false),
    (b'a', KeyCode::KeyA, false),
    (b'b', KeyCode::KeyB, false),
    (b'c', KeyCode::KeyC, false),
    (b'd', KeyCode::KeyD, false),
    (b'e', KeyCode::KeyE, false),
    (b'f', KeyCode::KeyF, false),
    (b'g', KeyCode::KeyG, false),
    (b'h', KeyCode::KeyH, false),
    (b'i', KeyCode::KeyI, false),
    (b'j', KeyCode::KeyJ, false),
    (b'k', KeyCode::KeyK, false),
    (b'l', KeyCode::KeyL, false),
    (b'm', KeyCode::KeyM, false),
    (b'n', KeyCode::KeyN, false),
    (b'o', KeyCode::KeyO, false),
    (b'p', KeyCode::KeyP, false),
    (b'q', KeyCode::KeyQ, false),
    (b'r', KeyCode::KeyR, false),
    (b's', KeyCode::KeyS, false),
    (b't', KeyCode::KeyT, false),
    (b'u', KeyCode::KeyU, false),
    (b'v', KeyCode::KeyV, false),
    (b'w', KeyCode::KeyW, false),
    (b'x', KeyCode::KeyX, false),
    (b'y', KeyCode::KeyY, false),
    (b'z', KeyCode::KeyZ, false),
    (b'{', KeyCode::LeftBrace, true),
    (b'|', KeyCode::Backslash, true),
    (b'}', KeyCode::RightBrace, true),
    (b'~', KeyCode::Grave, true),
];

/// First-match lookup in the printable table.
///
/// Returns the key that produces `byte` on a US layout and whether
/// Shift must be held, or `None` for bytes outside 0x20–0x7E.
pub fn lookup_printable(byte: u8) -> Option<(KeyCode, bool)> {
    PRINTABLE
        .iter()
        .find(|(ch, _, _)| *ch == byte)
        .map(|&(_, key, shift)| (key, shift))
}
