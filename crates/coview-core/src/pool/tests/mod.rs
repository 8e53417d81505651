use super::*;

#[test]
fn test_envelope_success_with_data() {
    let envelope: Envelope<StartData> =
        serde_json::from_str(r#"{"success": true, "data": {"token": "T1"}}"#).unwrap();
    let data = envelope.into_data().unwrap().unwrap();
    assert_eq!(data.token, "T1");
}

#[test]
fn test_envelope_rejection_carries_message() {
    let envelope: Envelope<StartData> =
        serde_json::from_str(r#"{"success": false, "message": "session has clients"}"#).unwrap();
    let err = envelope.into_data().unwrap_err();
    assert_eq!(err.to_string(), "pool rejected request: session has clients");
}

#[test]
fn test_envelope_rejection_without_message() {
    let envelope: Envelope<ListData> = serde_json::from_str(r#"{"success": false}"#).unwrap();
    let err = envelope.into_data().unwrap_err();
    assert!(err.to_string().contains("unknown pool error"));
}

#[test]
fn test_list_data_shape() {
    let envelope: Envelope<ListData> =
        serde_json::from_str(r#"{"success": true, "data": {"browsers": ["a", "b"]}}"#).unwrap();
    let data = envelope.into_data().unwrap().unwrap();
    assert_eq!(data.browsers, ["a", "b"]);
}
