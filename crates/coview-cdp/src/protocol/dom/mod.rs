//! DOM domain types.
//!
//! Only the node-targeting subset is typed: resolving a backend node id to
//! its box model and focusing it.

use serde::{Deserialize, Serialize};

/// Unique DOM node identifier used to reference a node that may not have been
/// pushed to the front-end.
pub type BackendNodeId = i64;

/// Parameters for DOM.enable (empty).
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {}

/// Parameters for DOM.getBoxModel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBoxModelParams {
    /// Backend identifier of the node.
    pub backend_node_id: BackendNodeId,
}

/// Box model of an element.
///
/// Each quad is 8 numbers: the x/y pairs of the four corners, clockwise from
/// the top left.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxModel {
    /// Content box quad.
    pub content: Vec<f64>,
    /// Padding box quad.
    pub padding: Option<Vec<f64>>,
    /// Border box quad.
    pub border: Option<Vec<f64>>,
    /// Margin box quad.
    pub margin: Option<Vec<f64>>,
    /// Node width.
    pub width: Option<f64>,
    /// Node height.
    pub height: Option<f64>,
}

impl BoxModel {
    /// Center of the content quad, if the quad is well-formed.
    pub fn content_center(&self) -> Option<(f64, f64)> {
        if self.content.len() < 8 {
            return None;
        }
        let xs = self.content[0] + self.content[2] + self.content[4] + self.content[6];
        let ys = self.content[1] + self.content[3] + self.content[5] + self.content[7];
        Some((xs / 4.0, ys / 4.0))
    }
}

/// Result of DOM.getBoxModel.
#[derive(Debug, Clone, Deserialize)]
pub struct GetBoxModelResult {
    /// Box model for the node.
    pub model: BoxModel,
}

/// Parameters for DOM.focus.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusParams {
    /// Backend identifier of the node to focus.
    pub backend_node_id: BackendNodeId,
}
