//! Input domain types.
//!
//! The Input domain dispatches synthetic key, mouse, and IME events into a
//! page as if a user had produced them.

use serde::Serialize;

/// Modifier bit flags carried on key and mouse events.
pub mod modifiers {
    /// Alt key.
    pub const ALT: i32 = 1;
    /// Control key.
    pub const CTRL: i32 = 2;
    /// Meta/Command key.
    pub const META: i32 = 4;
    /// Shift key.
    pub const SHIFT: i32 = 8;
}

/// Type of a dispatched key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Key pressed without text generation.
    RawKeyDown,
    /// Character generated by a key press.
    Char,
}

/// Parameters for Input.dispatchKeyEvent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEventParams {
    /// Type of the key event.
    #[serde(rename = "type")]
    pub event_type: KeyEventType,
    /// Bit field of pressed modifier keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i32>,
    /// Text generated by the key (char and keyDown events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text that would have been generated without modifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmodified_text: Option<String>,
    /// Unique DOM-level code of the physical key (e.g., "KeyA").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// DOM-level key value (e.g., "a", "Control").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Windows virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_virtual_key_code: Option<i64>,
    /// Native virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_virtual_key_code: Option<i64>,
    /// Whether the event was generated from auto repeat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repeat: Option<bool>,
    /// Whether the event was generated from the keypad.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_keypad: Option<bool>,
    /// Whether the event was a system key event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system_key: Option<bool>,
}

/// Type of a dispatched mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    /// Button pressed.
    MousePressed,
    /// Button released.
    MouseReleased,
    /// Pointer moved.
    MouseMoved,
    /// Wheel scrolled.
    MouseWheel,
}

/// Mouse button carried on a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// No button.
    #[default]
    None,
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
}

/// Parameters for Input.dispatchMouseEvent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseEventParams {
    /// Type of the mouse event.
    #[serde(rename = "type")]
    pub event_type: MouseEventType,
    /// X coordinate in CSS pixels relative to the viewport.
    pub x: f64,
    /// Y coordinate in CSS pixels relative to the viewport.
    pub y: f64,
    /// Bit field of pressed modifier keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i32>,
    /// Mouse button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    /// Number of times the button was clicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i32>,
    /// X delta in CSS pixels (wheel events only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    /// Y delta in CSS pixels (wheel events only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
}

impl DispatchMouseEventParams {
    /// A button press at the given coordinates.
    pub fn mouse_down(x: f64, y: f64, button: MouseButton) -> Self {
        Self {
            event_type: MouseEventType::MousePressed,
            x,
            y,
            modifiers: None,
            button: Some(button),
            click_count: Some(1),
            delta_x: None,
            delta_y: None,
        }
    }

    /// A button release at the given coordinates.
    pub fn mouse_up(x: f64, y: f64, button: MouseButton) -> Self {
        Self {
            event_type: MouseEventType::MouseReleased,
            x,
            y,
            modifiers: None,
            button: Some(button),
            click_count: Some(1),
            delta_x: None,
            delta_y: None,
        }
    }

    /// A pointer move to the given coordinates.
    pub fn mouse_move(x: f64, y: f64) -> Self {
        Self {
            event_type: MouseEventType::MouseMoved,
            x,
            y,
            modifiers: None,
            button: None,
            click_count: None,
            delta_x: None,
            delta_y: None,
        }
    }

    /// A wheel scroll at the given coordinates.
    pub fn wheel(x: f64, y: f64, delta_x: f64, delta_y: f64) -> Self {
        Self {
            event_type: MouseEventType::MouseWheel,
            x,
            y,
            modifiers: None,
            button: None,
            click_count: None,
            delta_x: Some(delta_x),
            delta_y: Some(delta_y),
        }
    }
}

/// Parameters for Input.insertText.
#[derive(Debug, Clone, Serialize)]
pub struct InsertTextParams {
    /// Text to insert at the current cursor position.
    pub text: String,
}

/// Parameters for Input.imeSetComposition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImeSetCompositionParams {
    /// Composition text.
    pub text: String,
    /// Selection start within the composition.
    pub selection_start: i32,
    /// Selection end within the composition.
    pub selection_end: i32,
}
