use tokio::sync::mpsc;

use super::*;
use crate::protocol::ClientRequest;

fn sink() -> EventSink {
    let (tx, _rx) = mpsc::unbounded_channel();
    tx
}

#[tokio::test]
async fn test_dispatch_without_session() {
    let registry = SessionRegistry::new(Config::default());
    let sink = sink();

    let reply = registry
        .dispatch(
            "nobody",
            &sink,
            ClientRequest::Navigate("https://example.com".to_string()),
        )
        .await;

    assert!(!reply.success);
    assert_eq!(reply.message.as_deref(), Some("No browser session"));
}

#[tokio::test]
async fn test_detach_unknown_socket_is_noop() {
    let registry = SessionRegistry::new(Config::default());
    registry.detach("nobody").await;
    assert_eq!(registry.client_count("any-token").await, 0);
}

#[tokio::test]
async fn test_unknown_token_has_no_session() {
    let registry = SessionRegistry::new(Config::default());
    assert!(registry.session_by_token("missing").await.is_none());
}

#[tokio::test]
async fn test_disconnect_without_session_succeeds() {
    let registry = SessionRegistry::new(Config::default());
    let sink = sink();

    let reply = registry
        .dispatch("nobody", &sink, ClientRequest::Disconnect)
        .await;

    assert!(reply.success);
}
