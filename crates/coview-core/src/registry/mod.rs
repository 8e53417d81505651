//! Process-wide session registry.
//!
//! Owns every [`BrowserSession`] and the socket-to-session bookkeeping.
//! Attaches route a client to the existing session for its token or create a
//! fresh one; the last detach tears the session down. One registry lock
//! serializes attach/detach; contention is low, sessions do their own
//! serialization internally.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::client::{ClientHandle, ClientKind, EventSink};
use crate::config::Config;
use crate::error::RegistryError;
use crate::protocol::{ActionReply, ClientRequest, ServerEvent};
use crate::session::BrowserSession;

/// Result of an attach.
#[derive(Debug, Clone, Copy)]
pub struct AttachOutcome {
    /// Whether an existing session was joined instead of created.
    pub reused: bool,
}

/// Bookkeeping maps, guarded together.
#[derive(Debug, Default)]
struct RegistryInner {
    /// Live sessions by browser token.
    sessions_by_token: HashMap<String, Arc<BrowserSession>>,
    /// Attached clients by socket id.
    clients_by_id: HashMap<String, ClientHandle>,
    /// Which token each socket is bound to.
    token_by_socket: HashMap<String, String>,
}

/// The process-wide registry of sessions and clients.
#[derive(Debug)]
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
    config: Config,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new(config: Config) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            config,
        }
    }

    /// Bind a socket to the session for `token`, creating the session on
    /// first use.
    ///
    /// A socket already bound elsewhere is detached first. Clients joining
    /// an existing session receive a synthesized `connected` event priming
    /// their state before any live event can reach them.
    #[instrument(level = "info", skip(self, sink), fields(socket_id = %socket_id, token = %token))]
    pub async fn attach(
        &self,
        socket_id: &str,
        token: &str,
        kind: ClientKind,
        sink: EventSink,
    ) -> Result<AttachOutcome, RegistryError> {
        let mut inner = self.inner.lock().await;

        if inner.token_by_socket.contains_key(socket_id) {
            debug!(socket_id = %socket_id, "Socket re-attaching, detaching first");
            self.detach_locked(&mut inner, socket_id).await;
        }

        let handle = ClientHandle::new(socket_id, kind, sink);

        if let Some(session) = inner.sessions_by_token.get(token).cloned() {
            // Prime the late joiner before it can see any live event; it
            // missed the original connected event.
            handle.send(ServerEvent::Connected {
                url: String::new(),
                target_id: None,
            });
            session.add_client(handle.clone()).await;
            inner
                .clients_by_id
                .insert(socket_id.to_string(), handle);
            inner
                .token_by_socket
                .insert(socket_id.to_string(), token.to_string());

            info!(token = %token, "Client joined existing session");
            return Ok(AttachOutcome { reused: true });
        }

        let session = BrowserSession::new(token, self.config.clone());
        inner
            .sessions_by_token
            .insert(token.to_string(), session.clone());
        session.add_client(handle.clone()).await;
        inner
            .clients_by_id
            .insert(socket_id.to_string(), handle);
        inner
            .token_by_socket
            .insert(socket_id.to_string(), token.to_string());

        if let Err(e) = session.connect().await {
            warn!(token = %token, error = %e, "Session connect failed");
            // Roll the half-made session back out of the maps.
            session.shutdown().await;
            inner.sessions_by_token.remove(token);
            inner.clients_by_id.remove(socket_id);
            inner.token_by_socket.remove(socket_id);
            return Err(e.into());
        }

        info!(token = %token, "Session created");
        Ok(AttachOutcome { reused: false })
    }

    /// Unbind a socket from its session. The session is torn down when its
    /// last client leaves.
    #[instrument(level = "info", skip(self), fields(socket_id = %socket_id))]
    pub async fn detach(&self, socket_id: &str) {
        let mut inner = self.inner.lock().await;
        self.detach_locked(&mut inner, socket_id).await;
    }

    async fn detach_locked(&self, inner: &mut RegistryInner, socket_id: &str) {
        inner.clients_by_id.remove(socket_id);
        let Some(token) = inner.token_by_socket.remove(socket_id) else {
            return;
        };
        let Some(session) = inner.sessions_by_token.get(&token).cloned() else {
            return;
        };

        let remaining = session.remove_client(socket_id).await;
        if remaining == 0 {
            info!(token = %token, "Last client left, destroying session");
            session.shutdown().await;
            inner.sessions_by_token.remove(&token);
        }
    }

    /// A dropped socket is a detach.
    pub async fn on_socket_disconnect(&self, socket_id: &str) {
        self.detach(socket_id).await;
    }

    /// The session for a token, if one is live.
    pub async fn session_by_token(&self, token: &str) -> Option<Arc<BrowserSession>> {
        self.inner.lock().await.sessions_by_token.get(token).cloned()
    }

    /// Number of clients attached to a token's session. The pool refuses to
    /// stop browsers that still have clients.
    pub async fn client_count(&self, token: &str) -> usize {
        match self.session_by_token(token).await {
            Some(session) => session.client_count(),
            None => 0,
        }
    }

    /// The session a socket is bound to, with its client kind.
    async fn session_for_socket(
        &self,
        socket_id: &str,
    ) -> Result<(Arc<BrowserSession>, ClientKind), RegistryError> {
        let inner = self.inner.lock().await;
        let kind = inner
            .clients_by_id
            .get(socket_id)
            .map(|c| c.kind)
            .ok_or(RegistryError::NoSession)?;
        let token = inner
            .token_by_socket
            .get(socket_id)
            .ok_or(RegistryError::NoSession)?;
        let session = inner
            .sessions_by_token
            .get(token)
            .cloned()
            .ok_or(RegistryError::NoSession)?;
        Ok((session, kind))
    }

    /// Handle one client message and produce its reply.
    ///
    /// Fire-and-forget input messages also come through here; their replies
    /// are produced but the transport layer is free to drop them.
    pub async fn dispatch(
        &self,
        socket_id: &str,
        sink: &EventSink,
        request: ClientRequest,
    ) -> ActionReply {
        self.dispatch_inner(socket_id, sink, request)
            .await
            .into()
    }

    async fn dispatch_inner(
        &self,
        socket_id: &str,
        sink: &EventSink,
        request: ClientRequest,
    ) -> Result<ActionReply, RegistryError> {
        // Connect and disconnect manage the binding itself.
        match &request {
            ClientRequest::Connect { token, client_type } => {
                let outcome = self
                    .attach(socket_id, token, *client_type, sink.clone())
                    .await?;
                return Ok(ActionReply::with_data(json!({ "reused": outcome.reused })));
            }
            ClientRequest::Disconnect => {
                self.detach(socket_id).await;
                return Ok(ActionReply::ok());
            }
            _ => {}
        }

        let (session, kind) = self.session_for_socket(socket_id).await?;

        match request {
            ClientRequest::Connect { .. } | ClientRequest::Disconnect => unreachable!(),

            ClientRequest::Navigate(url) => {
                session.navigate(&url).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::GoBack => {
                session.go_back().await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::GoForward => {
                session.go_forward().await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::Reload => {
                session.reload().await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::SwitchPage(target_id) => {
                session.switch_to_page(&target_id).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::NewPage(url) => {
                session
                    .create_page(url.as_deref().unwrap_or("about:blank"))
                    .await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::ClosePage(target_id) => {
                session.close_page(&target_id).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::ClickAt { x, y } => {
                session.click_at(x, y).await?;
                Ok(ActionReply::ok())
            }

            // Structured actions are the API surface.
            ClientRequest::Click { backend_node_id } => {
                require_api(kind)?;
                session.click_node(backend_node_id).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::Fill {
                backend_node_id,
                value,
            } => {
                require_api(kind)?;
                session.fill_node(backend_node_id, &value).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::GetSnapshot => {
                require_api(kind)?;
                let snapshot = session.snapshot(true, true).await?;
                Ok(ActionReply::with_data(json!({ "snapshot": snapshot })))
            }
            ClientRequest::GetScreenshot(options) => {
                require_api(kind)?;
                let shot = session.screenshot(&options).await?;
                Ok(ActionReply::with_data(json!({
                    "data": shot.data,
                    "format": shot.format,
                })))
            }

            // Fire-and-forget input is the viewer surface.
            ClientRequest::MouseMove { x, y } => {
                require_viewer(kind)?;
                session.mouse_move(x, y).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::Scroll {
                x,
                y,
                delta_x,
                delta_y,
            } => {
                require_viewer(kind)?;
                session.scroll(x, y, delta_x, delta_y).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::KeyDown {
                key,
                code,
                modifiers,
            } => {
                require_viewer(kind)?;
                session.key_down(&key, &code, modifiers).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::KeyUp {
                key,
                code,
                modifiers,
            } => {
                require_viewer(kind)?;
                session.key_up(&key, &code, modifiers).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::ImeSetComposition {
                text,
                selection_start,
                selection_end,
            } => {
                require_viewer(kind)?;
                session
                    .ime_set_composition(&text, selection_start, selection_end)
                    .await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::ImeCommitComposition { text } => {
                require_viewer(kind)?;
                session.ime_commit_composition(&text).await?;
                Ok(ActionReply::ok())
            }
            ClientRequest::InsertText { text } => {
                require_viewer(kind)?;
                session.insert_text(&text).await?;
                Ok(ActionReply::ok())
            }
        }
    }
}

/// Structured actions are for API clients.
fn require_api(kind: ClientKind) -> Result<(), RegistryError> {
    match kind {
        ClientKind::Api => Ok(()),
        ClientKind::Viewer => Err(RegistryError::UnsupportedAction(
            "action is available to API clients only",
        )),
    }
}

/// Fire-and-forget input is for viewers.
fn require_viewer(kind: ClientKind) -> Result<(), RegistryError> {
    match kind {
        ClientKind::Viewer => Ok(()),
        ClientKind::Api => Err(RegistryError::UnsupportedAction(
            "input injection is available to viewer clients only",
        )),
    }
}

#[cfg(test)]
mod tests;
