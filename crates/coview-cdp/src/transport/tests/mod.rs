use crate::transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};

#[test]
fn test_cdp_request_serialization() {
    let request = CdpRequest {
        id: 1,
        method: "Target.createTarget".to_string(),
        params: Some(serde_json::json!({"url": "about:blank"})),
        session_id: None,
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"id\":1"));
    assert!(json.contains("\"method\":\"Target.createTarget\""));
    assert!(json.contains("\"url\":\"about:blank\""));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_request_session_routing() {
    let request = CdpRequest {
        id: 7,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://example.com"})),
        session_id: Some("SESSION1".to_string()),
    };

    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("\"sessionId\":\"SESSION1\""));
}

#[test]
fn test_cdp_response_deserialization() {
    let json = r#"{"id": 1, "result": {"targetId": "abc123"}}"#;
    let response: CdpResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.id, 1);
    assert!(response.result.is_some());
    assert!(response.error.is_none());
}

#[test]
fn test_cdp_response_error_deserialization() {
    let json = r#"{"id": 3, "error": {"code": -32000, "message": "No target with given id found"}}"#;
    let response: CdpResponse = serde_json::from_str(json).unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, -32000);
    assert_eq!(error.message, "No target with given id found");
}

#[test]
fn test_cdp_event_deserialization() {
    let json = r#"{"method": "Target.targetDestroyed", "params": {"targetId": "abc"}}"#;
    let event: CdpEvent = serde_json::from_str(json).unwrap();

    assert_eq!(event.method, "Target.targetDestroyed");
    assert!(event.params.is_some());
    assert!(event.session_id.is_none());
}

#[test]
fn test_cdp_event_session_tag() {
    let json = r#"{"method": "Page.screencastFrame", "params": {}, "sessionId": "S1"}"#;
    let event: CdpEvent = serde_json::from_str(json).unwrap();

    assert_eq!(event.session_id.as_deref(), Some("S1"));
}

#[test]
fn test_cdp_message_discrimination() {
    let resp_json = r#"{"id": 1, "result": {}}"#;
    let event_json = r#"{"method": "Page.frameNavigated", "params": {}}"#;

    let resp: CdpMessage = serde_json::from_str(resp_json).unwrap();
    let event: CdpMessage = serde_json::from_str(event_json).unwrap();

    assert!(resp.is_response_for(1));
    assert!(!resp.is_response_for(2));
    assert!(resp.into_response().is_some());
    assert!(event.into_event().is_some());
}
