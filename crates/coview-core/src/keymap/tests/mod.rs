use super::*;

#[test]
fn test_named_keys() {
    assert_eq!(windows_virtual_key_code("Backspace"), 8);
    assert_eq!(windows_virtual_key_code("Tab"), 9);
    assert_eq!(windows_virtual_key_code("Enter"), 13);
    assert_eq!(windows_virtual_key_code("Shift"), 16);
    assert_eq!(windows_virtual_key_code("Control"), 17);
    assert_eq!(windows_virtual_key_code("Alt"), 18);
    assert_eq!(windows_virtual_key_code("Escape"), 27);
    assert_eq!(windows_virtual_key_code("Space"), 32);
    assert_eq!(windows_virtual_key_code("ArrowLeft"), 37);
    assert_eq!(windows_virtual_key_code("ArrowDown"), 40);
    assert_eq!(windows_virtual_key_code("Delete"), 46);
}

#[test]
fn test_function_keys() {
    assert_eq!(windows_virtual_key_code("F1"), 112);
    assert_eq!(windows_virtual_key_code("F12"), 123);
}

#[test]
fn test_letters_map_to_uppercase_code() {
    assert_eq!(windows_virtual_key_code("a"), 65);
    assert_eq!(windows_virtual_key_code("A"), 65);
    assert_eq!(windows_virtual_key_code("z"), 90);
}

#[test]
fn test_digits_and_symbols_map_to_char_code() {
    assert_eq!(windows_virtual_key_code("0"), 48);
    assert_eq!(windows_virtual_key_code("9"), 57);
    assert_eq!(windows_virtual_key_code("/"), 47);
    assert_eq!(windows_virtual_key_code(" "), 32);
}

#[test]
fn test_unknown_named_key_is_zero() {
    assert_eq!(windows_virtual_key_code("MediaPlayPause"), 0);
    assert_eq!(windows_virtual_key_code(""), 0);
}

#[test]
fn test_modifier_flags() {
    let none = KeyModifiers::default();
    assert_eq!(modifier_flags(&none), 0);

    let ctrl = KeyModifiers {
        ctrl: true,
        ..Default::default()
    };
    assert_eq!(modifier_flags(&ctrl), 2);

    let all = KeyModifiers {
        ctrl: true,
        alt: true,
        shift: true,
        meta: true,
    };
    assert_eq!(modifier_flags(&all), 1 + 2 + 4 + 8);
}

#[test]
fn test_is_printable() {
    assert!(is_printable("a"));
    assert!(is_printable("/"));
    assert!(is_printable("中"));
    assert!(!is_printable("Enter"));
    assert!(!is_printable(""));
}
