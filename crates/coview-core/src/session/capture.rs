//! Structured introspection and node-targeted actions.
//!
//! Everything an API client does that is not plain navigation: accessibility
//! snapshots, screenshots, and clicks/fills addressed by backend DOM node id.

use coview_cdp::CdpError;
use coview_cdp::protocol::accessibility::{self, GetFullAxTreeParams, GetFullAxTreeResult};
use coview_cdp::protocol::dom::{self, FocusParams, GetBoxModelParams, GetBoxModelResult};
use coview_cdp::protocol::input::{
    DispatchKeyEventParams, DispatchMouseEventParams, InsertTextParams, KeyEventType, MouseButton,
    modifiers,
};
use coview_cdp::protocol::page::{
    CaptureScreenshotParams, CaptureScreenshotResult, GetLayoutMetricsParams,
    GetLayoutMetricsResult, ScreenshotFormat, Viewport,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::BrowserSession;
use crate::a11y::{self, Snapshot};
use crate::error::SessionError;
use crate::protocol::ScreenshotOptions;

/// A captured screenshot.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenshotData {
    /// Base64-encoded image bytes.
    pub data: String,
    /// The format that was captured.
    pub format: String,
}

impl BrowserSession {
    /// Capture an accessibility snapshot of the active page.
    ///
    /// With `interesting_only`, the tree is filtered to the nodes an agent
    /// can act on; with `compressed`, the result is the line-oriented text
    /// rendering keyed by backend DOM node ids.
    #[instrument(level = "debug", skip(self), fields(token = %self.token))]
    pub async fn snapshot(
        &self,
        interesting_only: bool,
        compressed: bool,
    ) -> Result<Snapshot, SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;

        conn.send_command::<_, Value>(
            "Accessibility.enable",
            Some(accessibility::EnableParams::default()),
            Some(&session_id),
        )
        .await?;

        let tree: GetFullAxTreeResult = conn
            .send_command(
                "Accessibility.getFullAXTree",
                Some(GetFullAxTreeParams::default()),
                Some(&session_id),
            )
            .await?;

        let nodes = if interesting_only {
            a11y::filter_interesting(&tree.nodes)
        } else {
            tree.nodes
        };

        Ok(if compressed {
            Snapshot::Text(a11y::render_compressed(&nodes))
        } else {
            Snapshot::Nodes(nodes)
        })
    }

    /// Click the element with the given backend DOM node id.
    ///
    /// The click lands on the center of the element's content box.
    #[instrument(level = "debug", skip(self), fields(token = %self.token, backend_node_id))]
    pub async fn click_node(&self, backend_node_id: i64) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;

        conn.send_command::<_, Value>(
            "DOM.enable",
            Some(dom::EnableParams::default()),
            Some(&session_id),
        )
        .await?;

        let box_model: GetBoxModelResult = conn
            .send_command(
                "DOM.getBoxModel",
                Some(GetBoxModelParams { backend_node_id }),
                Some(&session_id),
            )
            .await
            .map_err(|e| match e {
                // The browser answers a protocol error for unknown or
                // box-less nodes; both read as "element not found" here.
                CdpError::Protocol { .. } => SessionError::ElementNotFound(backend_node_id),
                other => other.into(),
            })?;

        let (x, y) = box_model
            .model
            .content_center()
            .ok_or(SessionError::ElementNotFound(backend_node_id))?;

        debug!(token = %self.token, backend_node_id, x, y, "Clicking element center");

        conn.send_command::<_, Value>(
            "Input.dispatchMouseEvent",
            Some(DispatchMouseEventParams::mouse_down(x, y, MouseButton::Left)),
            Some(&session_id),
        )
        .await?;
        conn.send_command::<_, Value>(
            "Input.dispatchMouseEvent",
            Some(DispatchMouseEventParams::mouse_up(x, y, MouseButton::Left)),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// Replace the value of the element with the given backend DOM node id.
    ///
    /// Focuses the element, selects everything (Ctrl+A), deletes it
    /// (Backspace), then inserts the new value directly.
    #[instrument(level = "debug", skip(self, value), fields(token = %self.token, backend_node_id))]
    pub async fn fill_node(&self, backend_node_id: i64, value: &str) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;

        conn.send_command::<_, Value>(
            "DOM.enable",
            Some(dom::EnableParams::default()),
            Some(&session_id),
        )
        .await?;
        conn.send_command::<_, Value>(
            "DOM.focus",
            Some(FocusParams { backend_node_id }),
            Some(&session_id),
        )
        .await?;

        // Select-all.
        self.press_and_release(&session_id, "a", "KeyA", modifiers::CTRL, 65)
            .await?;
        // Clear.
        self.press_and_release(&session_id, "Backspace", "Backspace", 0, 8)
            .await?;

        conn.send_command::<_, Value>(
            "Input.insertText",
            Some(InsertTextParams {
                text: value.to_string(),
            }),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// One key press and release with explicit flags, outside the remote
    /// modifier discipline.
    async fn press_and_release(
        &self,
        session_id: &str,
        key: &str,
        code: &str,
        flags: i32,
        vk: i64,
    ) -> Result<(), SessionError> {
        for event_type in [KeyEventType::KeyDown, KeyEventType::KeyUp] {
            self.dispatch_key(
                session_id,
                DispatchKeyEventParams {
                    event_type,
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
        }
        Ok(())
    }

    /// Capture a screenshot of the active page.
    #[instrument(level = "debug", skip(self), fields(token = %self.token))]
    pub async fn screenshot(
        &self,
        options: &ScreenshotOptions,
    ) -> Result<ScreenshotData, SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;

        let format = ScreenshotFormat::parse(options.format.as_deref().unwrap_or("png"));
        let full_page = options.full_page.unwrap_or(false);

        let mut params = CaptureScreenshotParams {
            format: Some(format),
            ..CaptureScreenshotParams::default()
        };
        // PNG is lossless; quality only applies to the lossy formats.
        if format != ScreenshotFormat::Png {
            params.quality = Some(options.quality.unwrap_or(80));
        }

        if full_page {
            let metrics: GetLayoutMetricsResult = conn
                .send_command(
                    "Page.getLayoutMetrics",
                    Some(GetLayoutMetricsParams::default()),
                    Some(&session_id),
                )
                .await?;
            if let Some(content) = metrics.content() {
                params.clip = Some(Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: content.width,
                    height: content.height,
                    scale: 1.0,
                });
                params.capture_beyond_viewport = Some(true);
            }
        }

        let captured: CaptureScreenshotResult = conn
            .send_command("Page.captureScreenshot", Some(params), Some(&session_id))
            .await?;

        Ok(ScreenshotData {
            data: captured.data,
            format: format.as_str().to_string(),
        })
    }
}
