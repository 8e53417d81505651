use super::*;

fn node(json: serde_json::Value) -> AxNode {
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_wrapped_role_and_name() {
    let n = node(serde_json::json!({
        "nodeId": "1",
        "ignored": false,
        "role": {"type": "role", "value": "link"},
        "name": {"type": "computedString", "value": "VIP"},
        "backendDOMNodeId": 6804
    }));

    assert_eq!(n.role_str(), Some("link"));
    assert_eq!(n.name_str(), Some("VIP"));
    assert_eq!(n.backend_dom_node_id, Some(6804));
}

#[test]
fn test_raw_property_shape() {
    let n = node(serde_json::json!({
        "nodeId": "2",
        "role": "button",
        "name": "Submit"
    }));

    assert_eq!(n.role_str(), Some("button"));
    assert_eq!(n.name_str(), Some("Submit"));
}

#[test]
fn test_empty_name_filtered() {
    let n = node(serde_json::json!({
        "nodeId": "3",
        "role": {"value": "generic"},
        "name": {"value": ""}
    }));

    assert_eq!(n.name_str(), None);
}

#[test]
fn test_property_list_lookup() {
    let n = node(serde_json::json!({
        "nodeId": "4",
        "role": {"value": "textbox"},
        "properties": [
            {"name": "focusable", "value": {"type": "boolean", "value": true}},
            {"name": "level", "value": {"type": "integer", "value": 2}},
            {"name": "live", "value": "polite"}
        ]
    }));

    assert!(n.bool_property("focusable"));
    assert!(!n.bool_property("focused"));
    assert_eq!(n.property("level").and_then(AxValue::as_i64), Some(2));
    assert_eq!(n.property("live").and_then(AxValue::as_str), Some("polite"));
}

#[test]
fn test_stringified_boolean_property() {
    let n = node(serde_json::json!({
        "nodeId": "5",
        "role": {"value": "checkbox"},
        "properties": [
            {"name": "checked", "value": {"type": "tristate", "value": "true"}}
        ]
    }));

    assert!(n.bool_property("checked"));
}

#[test]
fn test_top_level_fields_win_over_property_list() {
    let n = node(serde_json::json!({
        "nodeId": "6",
        "role": {"value": "textbox"},
        "name": {"value": "field"},
        "properties": [
            {"name": "name", "value": {"value": "shadowed"}}
        ]
    }));

    assert_eq!(n.property("name").and_then(AxValue::as_str), Some("field"));
}

#[test]
fn test_full_tree_result() {
    let result: GetFullAxTreeResult = serde_json::from_value(serde_json::json!({
        "nodes": [
            {"nodeId": "1", "role": {"value": "RootWebArea"}, "childIds": ["2"]},
            {"nodeId": "2", "role": {"value": "StaticText"}, "name": {"value": "hello"}}
        ]
    }))
    .unwrap();

    assert_eq!(result.nodes.len(), 2);
    assert_eq!(result.nodes[0].children(), &["2".to_string()]);
}
