//! Client-facing message protocol.
//!
//! The wire surface between remote clients and the mediation tier: typed
//! request/reply actions, fire-and-forget input messages, and server-push
//! events. Message names follow the `browser:*` convention of the client
//! SDK; the transport layer carrying these frames is not this crate's
//! concern.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ClientKind;

/// Modifier keys reported alongside a remote key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyModifiers {
    /// Control key.
    pub ctrl: bool,
    /// Alt key.
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
    /// Meta/Command key.
    pub meta: bool,
}

/// Options for `browser:getScreenshot`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotOptions {
    /// Image format name ("png", "jpeg", "webp"). Defaults to "png".
    pub format: Option<String>,
    /// Compression quality, 0-100. Only sent for non-PNG formats.
    pub quality: Option<u8>,
    /// Capture the full scrollable page instead of the viewport.
    pub full_page: Option<bool>,
}

/// A request or fire-and-forget message from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", content = "params")]
pub enum ClientRequest {
    /// Bind this socket to a browser session.
    #[serde(rename = "browser:connect")]
    Connect {
        /// Browser token assigned by the pool.
        token: String,
        /// Kind of client attaching.
        #[serde(rename = "clientType")]
        client_type: ClientKind,
    },
    /// Unbind this socket from its session.
    #[serde(rename = "browser:disconnect")]
    Disconnect,
    /// Navigate the active page.
    #[serde(rename = "browser:navigate")]
    Navigate(String),
    /// Go back in the active page's history.
    #[serde(rename = "browser:goBack")]
    GoBack,
    /// Go forward in the active page's history.
    #[serde(rename = "browser:goForward")]
    GoForward,
    /// Reload the active page.
    #[serde(rename = "browser:reload")]
    Reload,
    /// Make another page the active one.
    #[serde(rename = "browser:switchPage")]
    SwitchPage(String),
    /// Open a new page.
    #[serde(rename = "browser:newPage")]
    NewPage(Option<String>),
    /// Close a page.
    #[serde(rename = "browser:closePage")]
    ClosePage(String),
    /// Click at viewport coordinates.
    #[serde(rename = "browser:clickAt")]
    ClickAt {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Click the element with the given backend node id (API only).
    #[serde(rename = "browser:click")]
    Click {
        /// Backend DOM node id from a snapshot.
        #[serde(rename = "backendNodeId")]
        backend_node_id: i64,
    },
    /// Replace the value of the element with the given backend node id
    /// (API only).
    #[serde(rename = "browser:fill")]
    Fill {
        /// Backend DOM node id from a snapshot.
        #[serde(rename = "backendNodeId")]
        backend_node_id: i64,
        /// Text to fill in.
        value: String,
    },
    /// Capture a compressed accessibility snapshot (API only).
    #[serde(rename = "browser:getSnapshot")]
    GetSnapshot,
    /// Capture a screenshot (API only).
    #[serde(rename = "browser:getScreenshot")]
    GetScreenshot(ScreenshotOptions),

    // Fire-and-forget input (viewer only).
    /// Move the pointer.
    #[serde(rename = "browser:mouseMove")]
    MouseMove {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Scroll the wheel.
    #[serde(rename = "browser:scroll")]
    Scroll {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Horizontal scroll delta.
        #[serde(rename = "deltaX")]
        delta_x: f64,
        /// Vertical scroll delta.
        #[serde(rename = "deltaY")]
        delta_y: f64,
    },
    /// Press a key.
    #[serde(rename = "browser:keyDown")]
    KeyDown {
        /// DOM key value.
        key: String,
        /// DOM physical key code.
        code: String,
        /// Modifier state the client expects.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
    /// Release a key.
    #[serde(rename = "browser:keyUp")]
    KeyUp {
        /// DOM key value.
        key: String,
        /// DOM physical key code.
        code: String,
        /// Modifier state the client expects.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
    /// Update the IME composition.
    #[serde(rename = "browser:imeSetComposition")]
    ImeSetComposition {
        /// Composition text.
        text: String,
        /// Selection start within the composition.
        #[serde(rename = "selectionStart")]
        selection_start: i32,
        /// Selection end within the composition.
        #[serde(rename = "selectionEnd")]
        selection_end: i32,
    },
    /// Commit the IME composition.
    #[serde(rename = "browser:imeCommitComposition")]
    ImeCommitComposition {
        /// Committed text.
        text: String,
    },
    /// Insert text at the cursor without key events.
    #[serde(rename = "browser:insertText")]
    InsertText {
        /// Text to insert.
        text: String,
    },
}

/// Reply to a request-reply action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReply {
    /// Whether the action succeeded.
    pub success: bool,
    /// Action-specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionReply {
    /// A bare success.
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// A success carrying a payload.
    pub fn with_data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A failure with a message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<E: std::fmt::Display> From<Result<ActionReply, E>> for ActionReply {
    fn from(result: Result<ActionReply, E>) -> Self {
        result.unwrap_or_else(|e| Self::fail(e.to_string()))
    }
}

/// Summary of one page target, as shown in page lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// Target identifier.
    pub target_id: String,
    /// Page URL.
    pub url: String,
    /// Page title.
    pub title: String,
}

/// An event pushed from the mediation tier to a viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ServerEvent {
    /// A screencast (or initial-push) frame, base64 JPEG.
    #[serde(rename = "browser:frame")]
    Frame(String),
    /// The active page navigated.
    #[serde(rename = "browser:urlChanged")]
    UrlChanged(String),
    /// The session attached to a page.
    #[serde(rename = "browser:connected")]
    #[serde(rename_all = "camelCase")]
    Connected {
        /// Current URL, empty when priming a late-joining client.
        url: String,
        /// Active target, absent when priming a late-joining client.
        target_id: Option<String>,
    },
    /// A page target appeared.
    #[serde(rename = "browser:pageCreated")]
    #[serde(rename_all = "camelCase")]
    PageCreated {
        /// Target identifier.
        target_id: String,
        /// Page URL.
        url: String,
        /// Page title.
        title: String,
    },
    /// A page target vanished.
    #[serde(rename = "browser:pageDestroyed")]
    #[serde(rename_all = "camelCase")]
    PageDestroyed {
        /// Target identifier.
        target_id: String,
    },
    /// A page target's URL or title changed.
    #[serde(rename = "browser:pageInfoChanged")]
    #[serde(rename_all = "camelCase")]
    PageInfoChanged {
        /// Target identifier.
        target_id: String,
        /// Page URL.
        url: String,
        /// Page title.
        title: String,
    },
    /// The active page changed.
    #[serde(rename = "browser:pageSwitched")]
    #[serde(rename_all = "camelCase")]
    PageSwitched {
        /// Target identifier of the new active page.
        target_id: String,
        /// Its URL.
        url: String,
    },
    /// Fresh list of every page target.
    #[serde(rename = "browser:pageList")]
    #[serde(rename_all = "camelCase")]
    PageList {
        /// All page targets.
        pages: Vec<PageSummary>,
        /// The active one, if any.
        active_target_id: Option<String>,
    },
    /// A lifecycle error worth surfacing to viewers.
    #[serde(rename = "browser:error")]
    Error(String),
}

#[cfg(test)]
mod tests;
