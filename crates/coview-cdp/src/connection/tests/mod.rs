use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use super::CdpConnection;
use crate::error::CdpError;
use crate::protocol::target_domain::{GetTargetsParams, GetTargetsResult};

/// Spawn a scripted CDP endpoint for one connection.
///
/// The handler receives each decoded request and returns the frames to send
/// back (replies and/or events), or `None` to stop responding.
async fn spawn_endpoint<F>(handler: F) -> String
where
    F: Fn(Value) -> Option<Vec<Value>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            let Message::Text(text) = msg else { continue };
            let request: Value = serde_json::from_str(text.as_str()).unwrap();
            match handler(request) {
                Some(frames) => {
                    for frame in frames {
                        ws.send(Message::Text(frame.to_string().into()))
                            .await
                            .unwrap();
                    }
                }
                None => break,
            }
        }
    });

    format!("ws://{addr}")
}

#[tokio::test]
async fn test_send_command_roundtrip() {
    let url = spawn_endpoint(|req| {
        assert_eq!(req["method"], "Target.getTargets");
        Some(vec![json!({"id": req["id"], "result": {"targetInfos": []}})])
    })
    .await;

    let conn = CdpConnection::connect(&url).await.unwrap();
    let result: GetTargetsResult = conn
        .send_command("Target.getTargets", Some(GetTargetsParams::default()), None)
        .await
        .unwrap();

    assert!(result.target_infos.is_empty());
}

#[tokio::test]
async fn test_message_ids_increase() {
    let url = spawn_endpoint(|req| Some(vec![json!({"id": req["id"], "result": {}})])).await;

    let conn = CdpConnection::connect(&url).await.unwrap();
    let _: Value = conn
        .send_command::<Value, _>("Page.enable", None, None)
        .await
        .unwrap();
    let _: Value = conn
        .send_command::<Value, _>("Runtime.enable", None, None)
        .await
        .unwrap();

    // The next allocated id must be past the two already used.
    assert!(conn.message_id.load(std::sync::atomic::Ordering::Relaxed) >= 3);
}

#[tokio::test]
async fn test_protocol_error_surfaced() {
    let url = spawn_endpoint(|req| {
        Some(vec![json!({
            "id": req["id"],
            "error": {"code": -32000, "message": "No target with given id found"},
        })])
    })
    .await;

    let conn = CdpConnection::connect(&url).await.unwrap();
    let err = conn
        .send_command::<Value, Value>("Target.attachToTarget", Some(json!({})), None)
        .await
        .unwrap_err();

    match err {
        CdpError::Protocol { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "No target with given id found");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_events_broadcast_to_subscribers() {
    let url = spawn_endpoint(|req| {
        Some(vec![
            json!({
                "method": "Target.targetCreated",
                "params": {"targetInfo": {
                    "targetId": "T1", "type": "page", "title": "", "url": "about:blank",
                    "attached": false,
                }},
            }),
            json!({"id": req["id"], "result": {}}),
        ])
    })
    .await;

    let conn = CdpConnection::connect(&url).await.unwrap();
    let mut events = conn.subscribe_events();

    let _: Value = conn
        .send_command::<Value, _>("Target.setDiscoverTargets", Some(json!({"discover": true})), None)
        .await
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.method, "Target.targetCreated");
}

#[tokio::test]
async fn test_close_fails_pending_calls() {
    // Endpoint that swallows every request.
    let url = spawn_endpoint(|_| Some(vec![])).await;

    let conn = std::sync::Arc::new(CdpConnection::connect(&url).await.unwrap());
    let pending_conn = conn.clone();
    let pending = tokio::spawn(async move {
        pending_conn
            .send_command::<Value, Value>("Page.enable", None, None)
            .await
    });

    // Let the command get registered before closing.
    tokio::time::sleep(Duration::from_millis(50)).await;
    conn.close().await;

    let result = pending.await.unwrap();
    assert!(matches!(result, Err(CdpError::ConnectionLost)));
    assert!(conn.is_closed());
}

#[tokio::test]
async fn test_send_after_close_fails_immediately() {
    let url = spawn_endpoint(|req| Some(vec![json!({"id": req["id"], "result": {}})])).await;

    let conn = CdpConnection::connect(&url).await.unwrap();
    conn.close().await;

    let err = conn
        .send_command::<Value, Value>("Page.enable", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CdpError::ConnectionLost));
}

#[tokio::test]
async fn test_remote_close_fails_pending_calls() {
    // Endpoint that hangs up as soon as the first request arrives.
    let url = spawn_endpoint(|_| None).await;

    let conn = CdpConnection::connect(&url).await.unwrap();
    let err = conn
        .send_command::<Value, Value>("Page.enable", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, CdpError::ConnectionLost));
}
