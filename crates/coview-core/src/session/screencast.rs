//! On-demand screencast control.
//!
//! The screencast is the expensive part of a session: the browser encodes
//! and ships JPEG frames continuously. It runs only while at least one
//! viewer is attached, and follows the active page across switches. Start
//! and stop are background operations; failures are logged, never raised.

use coview_cdp::protocol::page::{
    CaptureScreenshotParams, CaptureScreenshotResult, ScreenshotFormat,
};
use coview_cdp::protocol::{ScreencastFormat, StartScreencastParams, StopScreencastParams};
use serde_json::Value;
use tracing::{debug, warn};

use super::{BrowserSession, SessionState};
use crate::protocol::ServerEvent;

/// JPEG quality for the initial still frame pushed after a page switch.
const INITIAL_FRAME_QUALITY: u8 = 60;

impl BrowserSession {
    /// Start the screencast on the active page, if it is not running.
    pub(super) async fn start_screencast(&self, state: &mut SessionState) {
        if state.screencast_running {
            return;
        }
        let Some(active) = state.active.as_ref() else {
            return;
        };
        let Ok(conn) = self.conn() else {
            return;
        };

        let viewport = self.config.viewport;
        let params = StartScreencastParams::new()
            .format(ScreencastFormat::Jpeg)
            .quality(self.config.screencast_quality)
            .max_width(viewport.width)
            .max_height(viewport.height)
            .every_nth_frame(self.config.screencast_every_nth_frame);

        match conn
            .send_command::<_, Value>("Page.startScreencast", Some(params), Some(&active.session_id))
            .await
        {
            Ok(_) => {
                debug!(token = %self.token, "Screencast started");
                state.screencast_running = true;
            }
            Err(e) => warn!(token = %self.token, error = %e, "Screencast start failed"),
        }
    }

    /// Stop the screencast, if it is running.
    pub(super) async fn stop_screencast(&self, state: &mut SessionState) {
        if !state.screencast_running {
            return;
        }
        state.screencast_running = false;

        let Some(active) = state.active.as_ref() else {
            return;
        };
        let Ok(conn) = self.conn() else {
            return;
        };

        if let Err(e) = conn
            .send_command::<_, Value>(
                "Page.stopScreencast",
                Some(StopScreencastParams::default()),
                Some(&active.session_id),
            )
            .await
        {
            warn!(token = %self.token, error = %e, "Screencast stop failed");
        } else {
            debug!(token = %self.token, "Screencast stopped");
        }
    }

    /// Push one still frame to viewers right after a page switch.
    ///
    /// Without this, a static page looks frozen until the screencast
    /// produces its next frame. Background operation: failures are logged.
    pub(super) async fn push_initial_frame(&self, state: &SessionState) {
        if self.viewer_count() == 0 {
            return;
        }
        let Some(active) = state.active.as_ref() else {
            return;
        };
        let Ok(conn) = self.conn() else {
            return;
        };

        let params = CaptureScreenshotParams {
            format: Some(ScreenshotFormat::Jpeg),
            quality: Some(INITIAL_FRAME_QUALITY),
            ..CaptureScreenshotParams::default()
        };

        match conn
            .send_command::<_, CaptureScreenshotResult>(
                "Page.captureScreenshot",
                Some(params),
                Some(&active.session_id),
            )
            .await
        {
            Ok(captured) => self.broadcast(&ServerEvent::Frame(captured.data)),
            Err(e) => warn!(token = %self.token, error = %e, "Initial frame push failed"),
        }
    }
}
