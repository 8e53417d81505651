use serde_json::json;

use super::*;

#[test]
fn test_connect_request_deserialization() {
    let request: ClientRequest = serde_json::from_value(json!({
        "action": "browser:connect",
        "params": {"token": "T1", "clientType": "viewer"}
    }))
    .unwrap();

    match request {
        ClientRequest::Connect { token, client_type } => {
            assert_eq!(token, "T1");
            assert_eq!(client_type, ClientKind::Viewer);
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn test_navigate_request_string_payload() {
    let request: ClientRequest = serde_json::from_value(json!({
        "action": "browser:navigate",
        "params": "https://example.com"
    }))
    .unwrap();

    assert!(matches!(request, ClientRequest::Navigate(url) if url == "https://example.com"));
}

#[test]
fn test_key_down_defaults_modifiers() {
    let request: ClientRequest = serde_json::from_value(json!({
        "action": "browser:keyDown",
        "params": {"key": "a", "code": "KeyA"}
    }))
    .unwrap();

    match request {
        ClientRequest::KeyDown { modifiers, .. } => {
            assert_eq!(modifiers, KeyModifiers::default());
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn test_click_request_backend_node_id() {
    let request: ClientRequest = serde_json::from_value(json!({
        "action": "browser:click",
        "params": {"backendNodeId": 6804}
    }))
    .unwrap();

    assert!(matches!(request, ClientRequest::Click { backend_node_id: 6804 }));
}

#[test]
fn test_action_reply_serialization() {
    let ok = ActionReply::ok();
    assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true}));

    let fail = ActionReply::fail("No browser session");
    assert_eq!(
        serde_json::to_value(&fail).unwrap(),
        json!({"success": false, "message": "No browser session"})
    );
}

#[test]
fn test_server_event_wire_names() {
    let event = ServerEvent::PageSwitched {
        target_id: "T2".to_string(),
        url: "https://example.com/".to_string(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "browser:pageSwitched");
    assert_eq!(value["payload"]["targetId"], "T2");

    let frame = ServerEvent::Frame("aGVsbG8=".to_string());
    let value = serde_json::to_value(&frame).unwrap();
    assert_eq!(value["event"], "browser:frame");
    assert_eq!(value["payload"], "aGVsbG8=");
}

#[test]
fn test_connected_priming_shape() {
    let event = ServerEvent::Connected {
        url: String::new(),
        target_id: None,
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["payload"]["url"], "");
    assert_eq!(value["payload"]["targetId"], serde_json::Value::Null);
}

#[test]
fn test_page_list_serialization() {
    let event = ServerEvent::PageList {
        pages: vec![PageSummary {
            target_id: "T1".to_string(),
            url: "about:blank".to_string(),
            title: String::new(),
        }],
        active_target_id: Some("T1".to_string()),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["payload"]["activeTargetId"], "T1");
    assert_eq!(value["payload"]["pages"][0]["targetId"], "T1");
}
