//! Accessibility tree compression.
//!
//! Raw accessibility trees are enormous: every generic wrapper, every piece
//! of ignored structure. Agents driving a page need the opposite - a compact,
//! line-oriented rendering of just the interesting nodes, keyed by backend
//! DOM node ids they can hand straight back to click and fill actions.
//!
//! Two pure passes over the flat node list from
//! `Accessibility.getFullAXTree`:
//!
//! 1. [`filter_interesting`] keeps landmarks, controls, focusable and live
//!    nodes, and named leaves, preserving tree connectivity.
//! 2. [`render_compressed`] flattens the filtered tree into indented
//!    `uid=<depth>_<backendDOMNodeId> role "name" attrs` lines.

mod filter;
mod render;
mod roles;

use coview_cdp::protocol::accessibility::AxNode;
use serde::Serialize;

pub use filter::filter_interesting;
pub use render::{parse_uid, render_compressed};

/// The payload of a snapshot action.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Compressed line-oriented rendering.
    Text(String),
    /// Filtered (or raw) nodes.
    Nodes(Vec<AxNode>),
}

#[cfg(test)]
mod tests;
