use std::time::Duration;

use super::*;

#[test]
fn test_connection_failed_error_display() {
    let err = CdpError::ConnectionFailed("connection refused".to_string());
    assert_eq!(
        err.to_string(),
        "WebSocket connection failed: connection refused"
    );
}

#[test]
fn test_connection_lost_error_display() {
    let err = CdpError::ConnectionLost;
    assert_eq!(err.to_string(), "WebSocket connection lost");
}

#[test]
fn test_send_failed_error_display() {
    let err = CdpError::SendFailed("channel closed".to_string());
    assert_eq!(err.to_string(), "failed to send CDP message: channel closed");
}

#[test]
fn test_protocol_error_display() {
    let err = CdpError::Protocol {
        code: -32601,
        message: "Method not found".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "CDP protocol error -32601: Method not found"
    );
}

#[test]
fn test_json_error_from_serde() {
    let json_err: serde_json::Error = serde_json::from_str::<i32>("not a number").unwrap_err();
    let err: CdpError = json_err.into();
    assert!(err.to_string().starts_with("JSON error:"));
}

#[test]
fn test_timeout_error_display() {
    let err = CdpError::Timeout(Duration::from_secs(30));
    assert_eq!(err.to_string(), "response timeout after 30s");
}

#[test]
fn test_from_tungstenite_connection_closed() {
    let ws_err = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
    let err: CdpError = ws_err.into();
    assert!(matches!(err, CdpError::ConnectionLost));
}

#[test]
fn test_from_tungstenite_already_closed() {
    let ws_err = tokio_tungstenite::tungstenite::Error::AlreadyClosed;
    let err: CdpError = ws_err.into();
    assert!(matches!(err, CdpError::ConnectionLost));
}
