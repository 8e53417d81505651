use super::*;

#[test]
fn test_target_info_deserialization() {
    let json = r#"{
        "targetId": "E5A4",
        "type": "page",
        "title": "Example Domain",
        "url": "https://example.com/",
        "attached": true,
        "browserContextId": "CTX1"
    }"#;

    let info: TargetInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.target_id, "E5A4");
    assert!(info.is_page());
    assert_eq!(info.title, "Example Domain");
    assert!(info.attached);
}

#[test]
fn test_non_page_target() {
    let json = r#"{
        "targetId": "W1",
        "type": "service_worker",
        "title": "",
        "url": "https://example.com/sw.js",
        "attached": false
    }"#;

    let info: TargetInfo = serde_json::from_str(json).unwrap();
    assert!(!info.is_page());
}

#[test]
fn test_attach_params_serialization() {
    let params = AttachToTargetParams {
        target_id: "T1".to_string(),
        flatten: Some(true),
    };

    let json = serde_json::to_string(&params).unwrap();
    assert!(json.contains("\"targetId\":\"T1\""));
    assert!(json.contains("\"flatten\":true"));
}

#[test]
fn test_detach_params_omit_session() {
    let params = DetachFromTargetParams { session_id: None };
    let json = serde_json::to_string(&params).unwrap();
    assert_eq!(json, "{}");
}

#[test]
fn test_target_created_event_deserialization() {
    let json = r#"{"targetInfo": {
        "targetId": "T9", "type": "page", "title": "t", "url": "about:blank",
        "attached": false
    }}"#;

    let event: TargetCreatedEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.target_info.target_id, "T9");
}
