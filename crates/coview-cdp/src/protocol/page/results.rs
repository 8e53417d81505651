//! Page domain result types.

use serde::Deserialize;

use super::types::{ContentSize, FrameTree, NavigationEntry};

/// Result of Page.navigate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
    /// Frame id that has navigated (or failed to navigate).
    pub frame_id: String,
    /// Loader identifier.
    pub loader_id: Option<String>,
    /// User friendly error message if navigation failed.
    pub error_text: Option<String>,
}

/// Result of Page.getFrameTree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFrameTreeResult {
    /// Frame tree structure.
    pub frame_tree: FrameTree,
}

/// Result of Page.getNavigationHistory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNavigationHistoryResult {
    /// Index of the current navigation history entry.
    pub current_index: i32,
    /// Array of navigation history entries.
    pub entries: Vec<NavigationEntry>,
}

/// Result of Page.captureScreenshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureScreenshotResult {
    /// Base64-encoded image data.
    pub data: String,
}

/// Result of Page.getLayoutMetrics.
///
/// Only the CSS content size is consumed; the visual and layout viewports
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLayoutMetricsResult {
    /// Size of scrollable area, in CSS pixels.
    pub css_content_size: Option<ContentSize>,
    /// Size of scrollable area, in device pixels (deprecated fallback).
    pub content_size: Option<ContentSize>,
}

impl GetLayoutMetricsResult {
    /// The content size, preferring the CSS measurement.
    pub fn content(&self) -> Option<&ContentSize> {
        self.css_content_size.as_ref().or(self.content_size.as_ref())
    }
}
