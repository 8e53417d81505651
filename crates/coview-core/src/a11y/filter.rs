//! Interesting-node filtering.

use std::collections::{HashMap, HashSet};

use coview_cdp::protocol::accessibility::{AxNode, AxValue};

use super::roles;

/// Index from node id to position in the flat node list.
type NodeIndex<'a> = HashMap<&'a str, usize>;

fn build_index(nodes: &[AxNode]) -> NodeIndex<'_> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.node_id.as_str(), i))
        .collect()
}

fn is_ignored(node: &AxNode) -> bool {
    node.ignored || node.role_str() == Some("Ignored")
}

/// Whether the node is a leaf for filtering purposes: a leaf role, no
/// children, or only ignored/text children.
fn is_leaf(node: &AxNode, nodes: &[AxNode], index: &NodeIndex<'_>) -> bool {
    if node.role_str().is_some_and(roles::is_leaf_role) {
        return true;
    }
    node.children().iter().all(|child_id| {
        index.get(child_id.as_str()).is_none_or(|&i| {
            let child = &nodes[i];
            is_ignored(child) || child.role_str().is_none_or(roles::is_text_role)
        })
    })
}

/// The interesting-node predicate.
///
/// `inside_control` is true when any ancestor's role is a control role; such
/// nodes only stay interesting through their own role or focusability.
fn is_interesting(
    node: &AxNode,
    nodes: &[AxNode],
    index: &NodeIndex<'_>,
    inside_control: bool,
) -> bool {
    if is_ignored(node) {
        return false;
    }

    let role = node.role_str().unwrap_or("");

    // Landmarks and controls qualify on role alone, even inside a control.
    if roles::is_landmark(role) || roles::is_control(role) {
        return true;
    }

    let focusable = node.bool_property("focusable");

    // Non-focusable structure inside a control is noise (a button's inner
    // generics, a link's text wrappers).
    if inside_control && !focusable {
        return false;
    }

    let live_region = node
        .property("live")
        .and_then(AxValue::as_str)
        .is_some_and(|live| live != "off");
    if focusable || node.bool_property("editable") || node.bool_property("modal") || live_region {
        return true;
    }

    if role == "heading" && node.name_str().is_some() {
        return true;
    }

    if is_leaf(node, nodes, index)
        && (node.name_str().is_some() || node.description_str().is_some())
    {
        return true;
    }

    if role == "image" && node.name_str().is_some() {
        return true;
    }

    matches!(role, "StaticText" | "text") && node.name_str().is_some()
}

/// Filter a flat accessibility node list down to the interesting subtree.
///
/// Walks depth-first from the first node (the root). Interesting nodes mark
/// their whole ancestor chain so the result stays a connected tree. Nodes
/// come back in their original order with `child_ids` pruned to surviving
/// children; childless survivors drop the field entirely.
pub fn filter_interesting(nodes: &[AxNode]) -> Vec<AxNode> {
    let Some(root) = nodes.first() else {
        return Vec::new();
    };
    let index = build_index(nodes);

    let mut keep: HashSet<usize> = HashSet::new();
    let mut ancestors: Vec<usize> = Vec::new();
    mark(root, nodes, &index, false, &mut ancestors, &mut keep);

    nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, node)| {
            let mut kept = node.clone();
            let child_ids: Vec<String> = node
                .children()
                .iter()
                .filter(|child_id| {
                    index
                        .get(child_id.as_str())
                        .is_some_and(|i| keep.contains(i))
                })
                .cloned()
                .collect();
            kept.child_ids = if child_ids.is_empty() {
                None
            } else {
                Some(child_ids)
            };
            kept
        })
        .collect()
}

fn mark(
    node: &AxNode,
    nodes: &[AxNode],
    index: &NodeIndex<'_>,
    inside_control: bool,
    ancestors: &mut Vec<usize>,
    keep: &mut HashSet<usize>,
) {
    let Some(&position) = index.get(node.node_id.as_str()) else {
        return;
    };

    if is_interesting(node, nodes, index, inside_control) {
        keep.insert(position);
        // Keep the chain above connected.
        keep.extend(ancestors.iter().copied());
    }

    let child_inside_control =
        inside_control || node.role_str().is_some_and(roles::is_control);

    ancestors.push(position);
    for child_id in node.children() {
        if let Some(&child_pos) = index.get(child_id.as_str()) {
            // Guard against malformed cycles in the child links.
            if !ancestors.contains(&child_pos) {
                mark(
                    &nodes[child_pos],
                    nodes,
                    index,
                    child_inside_control,
                    ancestors,
                    keep,
                );
            }
        }
    }
    ancestors.pop();
}
