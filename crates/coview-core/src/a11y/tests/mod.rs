use coview_cdp::protocol::accessibility::AxNode;
use serde_json::json;

use super::*;

fn nodes(value: serde_json::Value) -> Vec<AxNode> {
    serde_json::from_value(value).unwrap()
}

/// Root with a named link and an ignored generic wrapper.
fn link_tree() -> Vec<AxNode> {
    nodes(json!([
        {
            "nodeId": "1",
            "role": {"value": "RootWebArea"},
            "name": {"value": "Site"},
            "childIds": ["2", "3"],
            "backendDOMNodeId": 1,
            "properties": [{"name": "focusable", "value": {"value": true}}]
        },
        {
            "nodeId": "2",
            "role": {"value": "link"},
            "name": {"value": "VIP会员"},
            "backendDOMNodeId": 6804,
            "properties": [{"name": "url", "value": {"value": "https://example.com/vip"}}]
        },
        {
            "nodeId": "3",
            "ignored": true,
            "role": {"value": "generic"},
            "childIds": []
        }
    ]))
}

#[test]
fn test_link_kept_ignored_generic_dropped() {
    let filtered = filter_interesting(&link_tree());

    let ids: Vec<&str> = filtered.iter().map(|n| n.node_id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);

    // The root's child list no longer mentions the dropped node.
    assert_eq!(filtered[0].children(), &["2".to_string()]);
}

#[test]
fn test_compressed_rendering() {
    let filtered = filter_interesting(&link_tree());
    let text = render_compressed(&filtered);

    assert!(text.contains("uid=1_6804 link \"VIP会员\""));
    assert!(!text.contains("generic"));
    // The link line is indented under the root.
    assert!(text.contains("\n  uid=1_6804"));
}

#[test]
fn test_uid_round_trip() {
    let filtered = filter_interesting(&link_tree());
    let text = render_compressed(&filtered);

    let link_line = text
        .lines()
        .find(|l| l.contains("link"))
        .expect("link line present");
    let uid = link_line
        .trim_start()
        .strip_prefix("uid=")
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap();

    let (depth, backend_id) = parse_uid(uid).unwrap();
    assert_eq!(depth, 1);
    assert_eq!(backend_id, 6804);
}

#[test]
fn test_ancestors_of_interesting_nodes_survive() {
    let tree = nodes(json!([
        {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2"]},
        {"nodeId": "2", "role": {"value": "generic"}, "childIds": ["3"]},
        {"nodeId": "3", "role": {"value": "button"}, "name": {"value": "Go"},
         "backendDOMNodeId": 7}
    ]));

    let filtered = filter_interesting(&tree);
    let ids: Vec<&str> = filtered.iter().map(|n| n.node_id.as_str()).collect();
    // The uninteresting generic stays because it connects root to button.
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
fn test_non_focusable_structure_inside_control_dropped() {
    let tree = nodes(json!([
        {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2"]},
        {"nodeId": "2", "role": {"value": "button"}, "name": {"value": "Save"},
         "backendDOMNodeId": 5, "childIds": ["3"]},
        {"nodeId": "3", "role": {"value": "StaticText"}, "name": {"value": "Save"}}
    ]));

    let filtered = filter_interesting(&tree);
    let ids: Vec<&str> = filtered.iter().map(|n| n.node_id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
}

#[test]
fn test_nested_control_inside_control_kept() {
    let tree = nodes(json!([
        {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2"]},
        {"nodeId": "2", "role": {"value": "menu"}, "childIds": ["3"]},
        {"nodeId": "3", "role": {"value": "menuitem"}, "name": {"value": "Open"},
         "backendDOMNodeId": 9}
    ]));

    let filtered = filter_interesting(&tree);
    let ids: Vec<&str> = filtered.iter().map(|n| n.node_id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
fn test_heading_and_live_region() {
    let tree = nodes(json!([
        {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2", "3", "4"]},
        {"nodeId": "2", "role": {"value": "heading"}, "name": {"value": "Title"},
         "backendDOMNodeId": 2,
         "properties": [{"name": "level", "value": {"value": 1}}]},
        {"nodeId": "3", "role": {"value": "generic"},
         "properties": [{"name": "live", "value": {"value": "polite"}}],
         "backendDOMNodeId": 3},
        {"nodeId": "4", "role": {"value": "generic"},
         "properties": [{"name": "live", "value": {"value": "off"}}],
         "childIds": []}
    ]));

    let filtered = filter_interesting(&tree);
    let ids: Vec<&str> = filtered.iter().map(|n| n.node_id.as_str()).collect();
    // The polite live region stays, the off one has nothing else going on.
    assert_eq!(ids, ["1", "2", "3"]);

    let text = render_compressed(&filtered);
    assert!(text.contains("heading \"Title\""));
    assert!(text.contains("level=1"));
}

#[test]
fn test_attribute_rendering() {
    let tree = nodes(json!([
        {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2", "3"]},
        {"nodeId": "2", "role": {"value": "checkbox"}, "name": {"value": "Agree"},
         "backendDOMNodeId": 11,
         "properties": [
            {"name": "focusable", "value": {"value": true}},
            {"name": "checked", "value": {"value": "mixed"}}
         ]},
        {"nodeId": "3", "role": {"value": "textbox"}, "name": {"value": "Email"},
         "backendDOMNodeId": 12,
         "value": {"value": "user@example.com"},
         "properties": [
            {"name": "focusable", "value": {"value": true}},
            {"name": "focused", "value": {"value": true}},
            {"name": "required", "value": {"value": true}}
         ]}
    ]));

    let text = render_compressed(&filter_interesting(&tree));
    assert!(text.contains("checkbox \"Agree\" focusable checked=mixed"));
    assert!(text.contains("textbox \"Email\" focusable focused required value=\"user@example.com\""));
}

#[test]
fn test_value_equal_to_name_not_repeated() {
    let tree = nodes(json!([
        {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2"]},
        {"nodeId": "2", "role": {"value": "StaticText"}, "name": {"value": "hello"},
         "value": {"value": "hello"}, "backendDOMNodeId": 4}
    ]));

    let text = render_compressed(&filter_interesting(&tree));
    assert!(text.contains("StaticText \"hello\""));
    assert!(!text.contains("value="));
}

#[test]
fn test_empty_input() {
    assert!(filter_interesting(&[]).is_empty());
    assert_eq!(render_compressed(&[]), "");
}

#[test]
fn test_parse_uid() {
    assert_eq!(parse_uid("1_6804"), Some((1, 6804)));
    assert_eq!(parse_uid("0_1"), Some((0, 1)));
    assert_eq!(parse_uid("nope"), None);
    assert_eq!(parse_uid("x_y"), None);
}
