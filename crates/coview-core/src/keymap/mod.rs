//! Key-to-virtual-key-code mapping.
//!
//! Pure lookups used when synthesizing keyboard events from remote input.
//! Remote clients send DOM `key`/`code` values; CDP additionally wants the
//! Windows virtual key code of the physical key.

use coview_cdp::protocol::input::modifiers;

use crate::protocol::KeyModifiers;

/// The Windows virtual key code for a DOM `key` value.
///
/// Named keys use the fixed table; single-character keys map to their
/// uppercase ASCII code (letters) or character code (digits and symbols).
/// Unknown named keys map to 0.
pub fn windows_virtual_key_code(key: &str) -> i64 {
    match key {
        "Backspace" => 8,
        "Tab" => 9,
        "Enter" => 13,
        "Shift" => 16,
        "Control" => 17,
        "Alt" => 18,
        "Escape" => 27,
        "Space" => 32,
        "ArrowLeft" => 37,
        "ArrowUp" => 38,
        "ArrowRight" => 39,
        "ArrowDown" => 40,
        "Delete" => 46,
        "F1" => 112,
        "F2" => 113,
        "F3" => 114,
        "F4" => 115,
        "F5" => 116,
        "F6" => 117,
        "F7" => 118,
        "F8" => 119,
        "F9" => 120,
        "F10" => 121,
        "F11" => 122,
        "F12" => 123,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    i64::from(c.to_ascii_uppercase() as u32)
                }
                (Some(c), None) => i64::from(c as u32),
                _ => 0,
            }
        }
    }
}

/// The CDP modifier bit field for a set of client-reported modifiers.
pub fn modifier_flags(m: &KeyModifiers) -> i32 {
    let mut flags = 0;
    if m.alt {
        flags |= modifiers::ALT;
    }
    if m.ctrl {
        flags |= modifiers::CTRL;
    }
    if m.meta {
        flags |= modifiers::META;
    }
    if m.shift {
        flags |= modifiers::SHIFT;
    }
    flags
}

/// Whether a DOM `key` value is a single printable character.
///
/// Such keys generate a `char` event after their `keyDown`.
pub fn is_printable(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(_), None))
}

#[cfg(test)]
mod tests;
