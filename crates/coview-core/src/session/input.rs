//! Remote input injection.
//!
//! Pointer events pass straight through. Keyboard events carry a modifier
//! discipline: the remote client reports which modifiers it expects held for
//! each keystroke, and the session synthesizes the modifier key transitions
//! so the page never sees a primary key with a modifier flag whose key-down
//! was never delivered.

use coview_cdp::protocol::input::{
    DispatchKeyEventParams, DispatchMouseEventParams, ImeSetCompositionParams, InsertTextParams,
    KeyEventType, MouseButton, modifiers,
};
use serde_json::Value;
use tracing::debug;

use super::BrowserSession;
use crate::error::SessionError;
use crate::keymap;
use crate::protocol::KeyModifiers;

/// Canonical synthetic modifier key events.
const CTRL_KEY: (&str, &str, i64) = ("Control", "ControlLeft", 17);
const ALT_KEY: (&str, &str, i64) = ("Alt", "AltLeft", 18);
const SHIFT_KEY: (&str, &str, i64) = ("Shift", "ShiftLeft", 16);

/// Modifier keys currently held down on behalf of remote keystrokes.
///
/// Meta is folded into Ctrl: remote meta requests press the Control key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ModifierState {
    pub(crate) ctrl: bool,
    pub(crate) alt: bool,
    pub(crate) shift: bool,
}

impl ModifierState {
    /// CDP flag bits for the currently held modifiers.
    pub(crate) fn flags(self) -> i32 {
        let mut flags = 0;
        if self.ctrl {
            flags |= modifiers::CTRL;
        }
        if self.alt {
            flags |= modifiers::ALT;
        }
        if self.shift {
            flags |= modifiers::SHIFT;
        }
        flags
    }

}

impl BrowserSession {
    /// Click at viewport coordinates: press then release, left button.
    pub async fn click_at(&self, x: f64, y: f64) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        debug!(token = %self.token, x, y, "Click");
        self.dispatch_mouse(
            DispatchMouseEventParams::mouse_down(x, y, MouseButton::Left),
            &session_id,
        )
        .await?;
        self.dispatch_mouse(
            DispatchMouseEventParams::mouse_up(x, y, MouseButton::Left),
            &session_id,
        )
        .await
    }

    /// Move the pointer.
    pub async fn mouse_move(&self, x: f64, y: f64) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        self.dispatch_mouse(DispatchMouseEventParams::mouse_move(x, y), &session_id)
            .await
    }

    /// Scroll the wheel at the given position.
    pub async fn scroll(
        &self,
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
    ) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        self.dispatch_mouse(
            DispatchMouseEventParams::wheel(x, y, delta_x, delta_y),
            &session_id,
        )
        .await
    }

    /// Press a key, synthesizing modifier key-downs first.
    ///
    /// Modifiers are pressed in Ctrl, Alt, Shift order. Each synthetic press
    /// carries the flags of the modifiers already held *before* it, so the
    /// first synthetic press goes out with flags 0. A remote `meta` request
    /// presses Ctrl.
    #[tracing::instrument(level = "debug", skip(self), fields(token = %self.token, key = %key))]
    pub async fn key_down(
        &self,
        key: &str,
        code: &str,
        modifiers: KeyModifiers,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let session_id = state.session_id()?;

        let want_ctrl = modifiers.ctrl || modifiers.meta;
        if want_ctrl && !state.modifiers.ctrl {
            self.dispatch_synthetic(&session_id, KeyEventType::KeyDown, CTRL_KEY, state.modifiers)
                .await?;
            state.modifiers.ctrl = true;
        }
        if modifiers.alt && !state.modifiers.alt {
            self.dispatch_synthetic(&session_id, KeyEventType::KeyDown, ALT_KEY, state.modifiers)
                .await?;
            state.modifiers.alt = true;
        }
        if modifiers.shift && !state.modifiers.shift {
            self.dispatch_synthetic(&session_id, KeyEventType::KeyDown, SHIFT_KEY, state.modifiers)
                .await?;
            state.modifiers.shift = true;
        }

        let flags = keymap::modifier_flags(&modifiers);
        let vk = keymap::windows_virtual_key_code(key);
        self.dispatch_key(
            &session_id,
            DispatchKeyEventParams {
                event_type: KeyEventType::KeyDown,
                modifiers: Some(flags),
                text: None,
                unmodified_text: None,
                code: Some(code.to_string()),
                key: Some(key.to_string()),
                windows_virtual_key_code: Some(vk),
                native_virtual_key_code: Some(vk),
                auto_repeat: None,
                is_keypad: None,
                is_system_key: None,
            },
        )
        .await?;

        // Printable keys generate the character immediately after the press.
        if keymap::is_printable(key) {
            self.dispatch_key(
                &session_id,
                DispatchKeyEventParams {
                    event_type: KeyEventType::Char,
                    modifiers: Some(flags),
                    text: Some(key.to_string()),
                    unmodified_text: Some(key.to_string()),
                    code: Some(code.to_string()),
                    key: Some(key.to_string()),
                    windows_virtual_key_code: Some(vk),
                    native_virtual_key_code: Some(vk),
                    auto_repeat: None,
                    is_keypad: None,
                    is_system_key: None,
                },
            )
            .await?;
        }

        Ok(())
    }

    /// Release a key, then any modifiers the client no longer expects.
    ///
    /// Releases run in reverse press order (Shift, Alt, Ctrl); each synthetic
    /// release carries the flags of the modifiers still held *after* it.
    #[tracing::instrument(level = "debug", skip(self), fields(token = %self.token, key = %key))]
    pub async fn key_up(
        &self,
        key: &str,
        code: &str,
        modifiers: KeyModifiers,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let session_id = state.session_id()?;

        let flags = keymap::modifier_flags(&modifiers);
        let vk = keymap::windows_virtual_key_code(key);
        self.dispatch_key(
            &session_id,
            DispatchKeyEventParams {
                event_type: KeyEventType::KeyUp,
                modifiers: Some(flags),
                text: None,
                unmodified_text: None,
                code: Some(code.to_string()),
                key: Some(key.to_string()),
                windows_virtual_key_code: Some(vk),
                native_virtual_key_code: Some(vk),
                auto_repeat: None,
                is_keypad: None,
                is_system_key: None,
            },
        )
        .await?;

        if state.modifiers.shift && !modifiers.shift {
            state.modifiers.shift = false;
            self.dispatch_synthetic(&session_id, KeyEventType::KeyUp, SHIFT_KEY, state.modifiers)
                .await?;
        }
        if state.modifiers.alt && !modifiers.alt {
            state.modifiers.alt = false;
            self.dispatch_synthetic(&session_id, KeyEventType::KeyUp, ALT_KEY, state.modifiers)
                .await?;
        }
        if state.modifiers.ctrl && !(modifiers.ctrl || modifiers.meta) {
            state.modifiers.ctrl = false;
            self.dispatch_synthetic(&session_id, KeyEventType::KeyUp, CTRL_KEY, state.modifiers)
                .await?;
        }

        Ok(())
    }

    /// Update the IME composition string.
    pub async fn ime_set_composition(
        &self,
        text: &str,
        selection_start: i32,
        selection_end: i32,
    ) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;
        conn.send_command::<_, Value>(
            "Input.imeSetComposition",
            Some(ImeSetCompositionParams {
                text: text.to_string(),
                selection_start,
                selection_end,
            }),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// Commit the IME composition as inserted text.
    pub async fn ime_commit_composition(&self, text: &str) -> Result<(), SessionError> {
        self.insert_text(text).await
    }

    /// Insert text at the cursor without key events.
    pub async fn insert_text(&self, text: &str) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;
        conn.send_command::<_, Value>(
            "Input.insertText",
            Some(InsertTextParams {
                text: text.to_string(),
            }),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// Dispatch one synthetic modifier key transition.
    async fn dispatch_synthetic(
        &self,
        session_id: &str,
        event_type: KeyEventType,
        (key, code, vk): (&str, &str, i64),
        held: ModifierState,
    ) -> Result<(), SessionError> {
        self.dispatch_key(
            session_id,
            DispatchKeyEventParams {
                event_type,
                modifiers: Some(held.flags()),
                text: None,
                unmodified_text: None,
                code: Some(code.to_string()),
                key: Some(key.to_string()),
                windows_virtual_key_code: Some(vk),
                native_virtual_key_code: Some(vk),
                auto_repeat: None,
                is_keypad: None,
                is_system_key: None,
            },
        )
        .await
    }

    /// Send one key event to the active page.
    pub(super) async fn dispatch_key(
        &self,
        session_id: &str,
        params: DispatchKeyEventParams,
    ) -> Result<(), SessionError> {
        let conn = self.conn()?;
        conn.send_command::<_, Value>("Input.dispatchKeyEvent", Some(params), Some(session_id))
            .await?;
        Ok(())
    }

    /// Send one mouse event to the active page.
    async fn dispatch_mouse(
        &self,
        params: DispatchMouseEventParams,
        session_id: &str,
    ) -> Result<(), SessionError> {
        let conn = self.conn()?;
        conn.send_command::<_, Value>("Input.dispatchMouseEvent", Some(params), Some(session_id))
            .await?;
        Ok(())
    }
}
