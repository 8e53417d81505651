use coview_cdp::CdpError;

use super::*;

#[test]
fn test_not_connected_display() {
    let err = SessionError::NotConnected;
    assert_eq!(err.to_string(), "Browser not connected");
}

#[test]
fn test_element_not_found_display() {
    let err = SessionError::ElementNotFound(42);
    assert_eq!(
        err.to_string(),
        "Element with backendNodeId 42 not found or has no box model"
    );
}

#[test]
fn test_connection_lost_maps_to_not_connected() {
    let err: SessionError = CdpError::ConnectionLost.into();
    assert!(matches!(err, SessionError::NotConnected));
}

#[test]
fn test_protocol_error_passes_through() {
    let err: SessionError = CdpError::Protocol {
        code: -32000,
        message: "No target with given id found".to_string(),
    }
    .into();
    assert_eq!(
        err.to_string(),
        "CDP protocol error -32000: No target with given id found"
    );
}

#[test]
fn test_no_session_display() {
    let err = RegistryError::NoSession;
    assert_eq!(err.to_string(), "No browser session");
}
