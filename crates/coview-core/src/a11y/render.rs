//! Compact text rendering of a filtered accessibility tree.

use std::collections::HashMap;
use std::fmt::Write as _;

use coview_cdp::protocol::accessibility::{AxNode, AxValue};

/// Render nodes as indented `uid=...` lines.
///
/// Walks depth-first from the first node. Each line is
/// `uid=<depth>_<backendDOMNodeId> <role> "<name>"` followed by attributes;
/// nodes without a backend DOM node id fall back to their tree-local node id
/// as the uid.
pub fn render_compressed(nodes: &[AxNode]) -> String {
    let Some(root) = nodes.first() else {
        return String::new();
    };
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.node_id.as_str(), i))
        .collect();

    let mut out = String::new();
    let mut visited: Vec<usize> = Vec::new();
    walk(root, nodes, &index, 0, &mut visited, &mut out);
    out
}

fn walk(
    node: &AxNode,
    nodes: &[AxNode],
    index: &HashMap<&str, usize>,
    depth: usize,
    visited: &mut Vec<usize>,
    out: &mut String,
) {
    if let Some(line) = format_line(node, depth) {
        out.push_str(&line);
        out.push('\n');
    }

    let Some(&position) = index.get(node.node_id.as_str()) else {
        return;
    };
    visited.push(position);
    for child_id in node.children() {
        if let Some(&child_pos) = index.get(child_id.as_str()) {
            if !visited.contains(&child_pos) {
                walk(&nodes[child_pos], nodes, index, depth + 1, visited, out);
            }
        }
    }
    visited.pop();
}

/// Format a single node, or nothing for ignored nodes.
fn format_line(node: &AxNode, depth: usize) -> Option<String> {
    if node.ignored || node.role_str() == Some("Ignored") {
        return None;
    }

    let uid = match node.backend_dom_node_id {
        Some(backend_id) => format!("{depth}_{backend_id}"),
        None => node.node_id.clone(),
    };

    let mut line = format!(
        "{}uid={} {}",
        "  ".repeat(depth),
        uid,
        node.role_str().unwrap_or("unknown")
    );

    let name = node.name_str();
    if let Some(name) = name {
        let _ = write!(line, " \"{name}\"");
    }

    if let Some(url) = node.property("url").and_then(AxValue::as_str) {
        let _ = write!(line, " url=\"{url}\"");
    }
    for flag in ["focusable", "focused", "multiline"] {
        if node.bool_property(flag) {
            let _ = write!(line, " {flag}");
        }
    }
    if let Some(checked) = node.property("checked") {
        if checked.as_str() == Some("mixed") {
            line.push_str(" checked=mixed");
        } else if checked.as_bool() == Some(true) {
            line.push_str(" checked");
        }
    }
    if let Some(expanded) = node.property("expanded").and_then(AxValue::as_bool) {
        line.push_str(if expanded { " expanded" } else { " collapsed" });
    }
    for flag in ["selected", "disabled", "required"] {
        if node.bool_property(flag) {
            let _ = write!(line, " {flag}");
        }
    }
    if let Some(level) = node.property("level").and_then(AxValue::as_i64) {
        let _ = write!(line, " level={level}");
    }
    if let Some(value) = node.value.as_ref().and_then(AxValue::as_str) {
        if !value.is_empty() && Some(value) != name {
            let _ = write!(line, " value=\"{value}\"");
        }
    }

    Some(line)
}

/// Parse a `uid=<depth>_<backendDOMNodeId>` identifier back into its parts.
///
/// This is the inverse clients use to turn a snapshot line into a
/// `backendNodeId` for click and fill actions.
pub fn parse_uid(uid: &str) -> Option<(usize, i64)> {
    let (depth, backend_id) = uid.split_once('_')?;
    Some((depth.parse().ok()?, backend_id.parse().ok()?))
}
