//! CDP WebSocket connection management.
//!
//! A [`CdpConnection`] owns one WebSocket to one browser's CDP endpoint. It
//! multiplexes every flat-attached page session over that single socket:
//! replies are correlated to callers by message ID, and events fan out to
//! every subscriber tagged with their originating session ID.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, Notify, broadcast, mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::CdpError;
use crate::transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};

/// Default timeout for CDP commands.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for the event broadcast channel.
const EVENT_CHANNEL_SIZE: usize = 256;

/// Map of in-flight commands awaiting their reply.
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>;

/// A CDP connection to one browser.
#[derive(Debug)]
pub struct CdpConnection {
    /// Sender for outgoing requests.
    tx: mpsc::Sender<CdpRequest>,
    /// Broadcast side of the inbound event channel.
    event_tx: broadcast::Sender<CdpEvent>,
    /// Pending responses keyed by message ID.
    pending: PendingMap,
    /// Atomic counter for message IDs.
    message_id: AtomicU64,
    /// Set once the socket is gone, by either side.
    closed: Arc<AtomicBool>,
    /// Woken when the socket goes away.
    close_notify: Arc<Notify>,
    /// Handle to the background read task.
    read_handle: tokio::task::JoinHandle<()>,
    /// Handle to the background write task.
    write_handle: tokio::task::JoinHandle<()>,
}

impl CdpConnection {
    /// Connect to a CDP WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the WebSocket connection fails.
    #[instrument(level = "info", skip(ws_url), fields(ws_url = %ws_url))]
    pub async fn connect(ws_url: &str) -> Result<Self, CdpError> {
        info!("Connecting to CDP WebSocket endpoint");
        let (ws_stream, response) = tokio_tungstenite::connect_async(ws_url).await?;
        info!(status = %response.status(), "WebSocket connection established");

        let (write, read) = ws_stream.split();

        let (tx, rx) = mpsc::channel::<CdpRequest>(64);
        let (event_tx, _) = broadcast::channel::<CdpEvent>(EVENT_CHANNEL_SIZE);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let close_notify = Arc::new(Notify::new());

        let write_handle = tokio::spawn(Self::write_loop(rx, write));
        debug!("Spawned CDP write loop");

        let read_pending = pending.clone();
        let read_event_tx = event_tx.clone();
        let read_closed = closed.clone();
        let read_notify = close_notify.clone();
        let read_handle = tokio::spawn(Self::read_loop(
            read,
            read_pending,
            read_event_tx,
            read_closed,
            read_notify,
        ));
        debug!("Spawned CDP read loop");

        Ok(Self {
            tx,
            event_tx,
            pending,
            message_id: AtomicU64::new(1),
            closed,
            close_notify,
            read_handle,
            write_handle,
        })
    }

    /// Background task that writes CDP requests to the WebSocket.
    async fn write_loop<S>(mut rx: mpsc::Receiver<CdpRequest>, mut sink: S)
    where
        S: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        debug!("CDP write loop started");
        while let Some(request) = rx.recv().await {
            let method = request.method.clone();
            let id = request.id;

            let json = match serde_json::to_string(&request) {
                Ok(j) => j,
                Err(e) => {
                    error!(error = %e, method = %method, "Failed to serialize CDP request");
                    continue;
                }
            };

            trace!(id = id, method = %method, json_len = json.len(), "Sending CDP request");

            if sink.send(Message::Text(json.into())).await.is_err() {
                warn!("WebSocket sink closed, ending write loop");
                break;
            }
        }
        debug!("CDP write loop ended");
    }

    /// Background task that reads CDP frames from the WebSocket.
    ///
    /// When the socket ends, every pending call is failed so that no caller
    /// waits out its full timeout against a dead browser.
    async fn read_loop<S>(
        mut stream: S,
        pending: PendingMap,
        event_tx: broadcast::Sender<CdpEvent>,
        closed: Arc<AtomicBool>,
        close_notify: Arc<Notify>,
    ) where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        debug!("CDP read loop started");
        while let Some(msg) = stream.next().await {
            let msg = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(frame)) => {
                    info!(?frame, "WebSocket closed by remote");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "WebSocket error, ending read loop");
                    break;
                }
                Ok(_) => continue,
            };

            let cdp_msg: CdpMessage = match serde_json::from_str(&msg) {
                Ok(m) => m,
                Err(e) => {
                    error!(error = %e, "Failed to parse CDP message");
                    continue;
                }
            };

            match cdp_msg {
                CdpMessage::Response(resp) => {
                    let id = resp.id;
                    trace!(id = id, has_error = resp.error.is_some(), "Received CDP response");

                    let mut pending = pending.lock().await;
                    if let Some(sender) = pending.remove(&id) {
                        let _ = sender.send(resp);
                    } else {
                        warn!(id = id, "Received response for unknown request ID");
                    }
                }
                CdpMessage::Event(ref event) => {
                    trace!(method = %event.method, session_id = ?event.session_id, "Received CDP event");
                    // Broadcast to all subscribers; ignore if no receivers.
                    let _ = event_tx.send(event.clone());
                }
            }
        }

        closed.store(true, Ordering::SeqCst);
        close_notify.notify_waiters();
        // Dropping the senders fails the matching receivers.
        pending.lock().await.clear();
        debug!("CDP read loop ended");
    }

    /// Send a CDP command and wait for its reply.
    ///
    /// Pass a `session_id` to route the command to a flat-attached page
    /// session; omit it for browser-level commands (the Target domain).
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the reply times out,
    /// or the browser reports a protocol error.
    pub async fn send_command<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        session_id: Option<&str>,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.send_command_with_timeout(method, params, session_id, DEFAULT_TIMEOUT)
            .await
    }

    /// Send a CDP command with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the reply times out,
    /// or the browser reports a protocol error.
    #[instrument(level = "debug", skip(self, params), fields(method = %method, session_id = ?session_id))]
    pub async fn send_command_with_timeout<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        session_id: Option<&str>,
        timeout_duration: Duration,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if self.is_closed() {
            return Err(CdpError::ConnectionLost);
        }

        let id = self.message_id.fetch_add(1, Ordering::Relaxed);

        let params_value = params.map(serde_json::to_value).transpose()?;

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: params_value,
            session_id: session_id.map(ToString::to_string),
        };

        let (resp_tx, resp_rx) = oneshot::channel();

        {
            let mut pending = self.pending.lock().await;
            pending.insert(id, resp_tx);
            trace!(id = id, pending_count = pending.len(), "Registered pending response");
        }

        if self.tx.send(request).await.is_err() {
            self.pending.lock().await.remove(&id);
            return Err(CdpError::ConnectionLost);
        }

        // Wait for the response; a dropped sender means the socket died.
        let response = timeout(timeout_duration, resp_rx)
            .await
            .map_err(|_| {
                warn!(id = id, method = %method, "CDP command timed out");
                CdpError::Timeout(timeout_duration)
            })?
            .map_err(|_| CdpError::ConnectionLost)?;

        if let Some(ref error) = response.error {
            warn!(id = id, method = %method, code = error.code, error_msg = %error.message, "CDP protocol error");
            return Err(CdpError::Protocol {
                code: error.code,
                message: error.message.clone(),
            });
        }

        debug!(id = id, method = %method, "CDP command completed");

        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(CdpError::from)
    }

    /// Subscribe to CDP events.
    ///
    /// Returns a receiver observing every event from the browser, including
    /// session-tagged events from flat-attached pages.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CdpEvent> {
        self.event_tx.subscribe()
    }

    /// Whether the underlying socket is gone.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Wait until the socket is gone.
    ///
    /// Resolves immediately when the connection is already closed. Used by
    /// event consumers to stop pumping when the browser disappears.
    pub async fn closed(&self) {
        if self.is_closed() {
            return;
        }
        self.close_notify.notified().await;
    }

    /// Close the connection.
    ///
    /// Idempotent. Every in-flight call fails with
    /// [`CdpError::ConnectionLost`], and every later call fails the same way.
    #[instrument(level = "debug", skip(self))]
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("Closing CDP connection");
        self.read_handle.abort();
        self.write_handle.abort();
        self.close_notify.notify_waiters();
        self.pending.lock().await.clear();
    }
}

impl Drop for CdpConnection {
    fn drop(&mut self) {
        self.read_handle.abort();
        self.write_handle.abort();
    }
}

#[cfg(test)]
mod tests;
