//! Per-token browser sessions.
//!
//! A [`BrowserSession`] owns the CDP connection to one headless browser and
//! everything stateful about it: which page is active, the current URL, the
//! attached clients, the screencast, and the pressed-modifier set used when
//! synthesizing keystrokes.
//!
//! Exactly one page session is attached at a time. Page-scoped CDP traffic is
//! routed through that session id; target lifecycle events re-elect the
//! active page as tabs come and go.
//!
//! Every public operation serializes against the session's state lock, so a
//! page switch can never interleave with a keystroke or a snapshot on the
//! same session. Different sessions are fully independent.

mod actions;
mod capture;
mod events;
mod input;
mod screencast;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use coview_cdp::CdpConnection;
use coview_cdp::protocol::emulation::SetDeviceMetricsOverrideParams;
use coview_cdp::protocol::runtime::{EvaluateParams, EvaluateResult};
use coview_cdp::protocol::target_domain::{
    ActivateTargetParams, AttachToTargetParams, AttachToTargetResult, CreateTargetParams,
    CreateTargetResult, DetachFromTargetParams, GetTargetsParams, GetTargetsResult,
    SetDiscoverTargetsParams, TargetInfo,
};
use coview_cdp::protocol::{page, runtime};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::client::{ClientHandle, ClientId};
use crate::config::Config;
use crate::error::SessionError;
use crate::protocol::{PageSummary, ServerEvent};

pub use capture::ScreenshotData;
use input::ModifierState;

/// The currently attached page.
#[derive(Debug, Clone)]
struct ActivePage {
    /// CDP session id of the flat attach.
    session_id: String,
    /// Target id of the page.
    target_id: String,
}

/// Mutable session state, serialized behind one lock.
#[derive(Debug, Default)]
struct SessionState {
    /// The attached page, if any.
    active: Option<ActivePage>,
    /// URL of the active page's main frame.
    current_url: String,
    /// Whether the screencast is currently running.
    screencast_running: bool,
    /// Modifier keys currently held down by synthesized input.
    modifiers: ModifierState,
}

impl SessionState {
    /// The active page's CDP session id, cloned for use across awaits.
    fn session_id(&self) -> Result<String, SessionError> {
        self.active
            .as_ref()
            .map(|a| a.session_id.clone())
            .ok_or(SessionError::NoActivePage)
    }
}

/// One browser, one CDP connection, many clients.
#[derive(Debug)]
pub struct BrowserSession {
    /// Opaque browser token assigned by the pool.
    token: String,
    /// Tuning knobs.
    config: Config,
    /// The CDP transport, present once connected.
    connection: parking_lot::RwLock<Option<Arc<CdpConnection>>>,
    /// Serialized mutable state.
    state: Mutex<SessionState>,
    /// Attached clients by socket id.
    clients: parking_lot::RwLock<HashMap<ClientId, ClientHandle>>,
    /// Event pump task, aborted on shutdown.
    pump: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
    /// Set while tearing down, to keep the pump from reporting our own close.
    shutting_down: AtomicBool,
}

impl BrowserSession {
    /// Create a session for a token. No connection is made yet; call
    /// [`connect`](Self::connect) after registering the first client.
    pub fn new(token: impl Into<String>, config: Config) -> Arc<Self> {
        Arc::new(Self {
            token: token.into(),
            config,
            connection: parking_lot::RwLock::new(None),
            state: Mutex::new(SessionState::default()),
            clients: parking_lot::RwLock::new(HashMap::new()),
            pump: parking_lot::Mutex::new(None),
            shutting_down: AtomicBool::new(false),
        })
    }

    /// The session's browser token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Number of attached clients of any kind.
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    /// Number of attached viewers.
    pub fn viewer_count(&self) -> usize {
        self.clients.read().values().filter(|c| c.is_viewer()).count()
    }

    /// The live transport, or `NotConnected`.
    fn conn(&self) -> Result<Arc<CdpConnection>, SessionError> {
        self.connection
            .read()
            .as_ref()
            .filter(|c| !c.is_closed())
            .cloned()
            .ok_or(SessionError::NotConnected)
    }

    /// Attach a client to this session.
    ///
    /// The first viewer starts the screencast if a page is attached.
    pub async fn add_client(&self, handle: ClientHandle) {
        let mut state = self.state.lock().await;
        debug!(token = %self.token, client = %handle.id, kind = ?handle.kind, "Adding client");
        self.clients.write().insert(handle.id.clone(), handle);
        if self.viewer_count() > 0 && state.active.is_some() && !state.screencast_running {
            self.start_screencast(&mut state).await;
        }
    }

    /// Detach a client from this session, returning the remaining client
    /// count. The last viewer leaving stops the screencast.
    pub async fn remove_client(&self, id: &str) -> usize {
        let mut state = self.state.lock().await;
        debug!(token = %self.token, client = %id, "Removing client");
        self.clients.write().remove(id);
        if self.viewer_count() == 0 {
            self.stop_screencast(&mut state).await;
        }
        self.client_count()
    }

    /// Push an event to every viewer.
    ///
    /// Sinks are cloned out under the read lock; sends happen lock-free.
    pub(crate) fn broadcast(&self, event: &ServerEvent) {
        let sinks: Vec<_> = self
            .clients
            .read()
            .values()
            .filter(|c| c.is_viewer())
            .map(|c| c.sink.clone())
            .collect();
        for sink in sinks {
            let _ = sink.send(event.clone());
        }
    }

    /// Open the CDP connection and attach to the browser's active page.
    ///
    /// Elects the visible page (creating a blank one if the browser has no
    /// pages), attaches flat, applies the default viewport, and starts the
    /// screencast when viewers are already waiting.
    #[instrument(level = "info", skip(self), fields(token = %self.token))]
    pub async fn connect(self: &Arc<Self>) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;

        let ws_url = self.config.browser_ws_url(&self.token);
        let conn = Arc::new(CdpConnection::connect(&ws_url).await?);
        *self.connection.write() = Some(conn.clone());

        conn.send_command::<_, Value>(
            "Target.setDiscoverTargets",
            Some(SetDiscoverTargetsParams { discover: true }),
            None,
        )
        .await?;

        self.spawn_pump(&conn);

        let target_id = match self.find_active_target(&conn).await? {
            Some(target) => target.target_id,
            None => {
                info!(token = %self.token, "Browser has no pages, creating one");
                let created: CreateTargetResult = conn
                    .send_command(
                        "Target.createTarget",
                        Some(CreateTargetParams {
                            url: "about:blank".to_string(),
                        }),
                        None,
                    )
                    .await?;
                created.target_id
            }
        };

        self.attach_to_page(&mut state, &target_id).await?;

        self.broadcast(&ServerEvent::Connected {
            url: state.current_url.clone(),
            target_id: Some(target_id),
        });
        self.refresh_page_list(&state).await;
        info!(token = %self.token, url = %state.current_url, "Session connected");
        Ok(())
    }

    /// Find the page the browser considers active.
    ///
    /// Probes `document.visibilityState` on every non-blank page through a
    /// temporary flat attach. Falls back to the first non-blank page, then to
    /// any page at all. `None` means the browser has no page targets.
    async fn find_active_target(
        &self,
        conn: &Arc<CdpConnection>,
    ) -> Result<Option<TargetInfo>, SessionError> {
        let targets: GetTargetsResult = conn
            .send_command("Target.getTargets", Some(GetTargetsParams::default()), None)
            .await?;

        let pages: Vec<TargetInfo> = targets
            .target_infos
            .into_iter()
            .filter(TargetInfo::is_page)
            .collect();

        for target in pages.iter().filter(|t| t.url != "about:blank") {
            match self.probe_visibility(conn, &target.target_id).await {
                Ok(true) => {
                    debug!(target_id = %target.target_id, "Found visible page");
                    return Ok(Some(target.clone()));
                }
                Ok(false) => {}
                Err(e) => {
                    // The target can vanish mid-probe; skip it.
                    warn!(target_id = %target.target_id, error = %e, "Visibility probe failed");
                }
            }
        }

        Ok(pages
            .iter()
            .find(|t| t.url != "about:blank")
            .or_else(|| pages.first())
            .cloned())
    }

    /// Evaluate `document.visibilityState` on a target via a temporary
    /// attach.
    async fn probe_visibility(
        &self,
        conn: &Arc<CdpConnection>,
        target_id: &str,
    ) -> Result<bool, SessionError> {
        let attached: AttachToTargetResult = conn
            .send_command(
                "Target.attachToTarget",
                Some(AttachToTargetParams {
                    target_id: target_id.to_string(),
                    flatten: Some(true),
                }),
                None,
            )
            .await?;
        let session_id = attached.session_id;

        let result: Result<bool, SessionError> = async {
            conn.send_command::<_, Value>(
                "Runtime.enable",
                Some(runtime::EnableParams::default()),
                Some(&session_id),
            )
            .await?;
            let evaluated: EvaluateResult = conn
                .send_command(
                    "Runtime.evaluate",
                    Some(EvaluateParams::by_value("document.visibilityState")),
                    Some(&session_id),
                )
                .await?;
            Ok(evaluated.result.as_str() == Some("visible"))
        }
        .await;

        // Always detach the probe attach, even on evaluation failure.
        let _ = conn
            .send_command::<_, Value>(
                "Target.detachFromTarget",
                Some(DetachFromTargetParams {
                    session_id: Some(session_id),
                }),
                None,
            )
            .await;

        result
    }

    /// Attach to a page and make it the active one.
    ///
    /// Enables the Page and Runtime domains, reads the initial URL, applies
    /// the default viewport, and starts the screencast when viewers are
    /// present.
    async fn attach_to_page(
        &self,
        state: &mut SessionState,
        target_id: &str,
    ) -> Result<(), SessionError> {
        let conn = self.conn()?;

        let attached: AttachToTargetResult = conn
            .send_command(
                "Target.attachToTarget",
                Some(AttachToTargetParams {
                    target_id: target_id.to_string(),
                    flatten: Some(true),
                }),
                None,
            )
            .await?;
        let session_id = attached.session_id;

        conn.send_command::<_, Value>(
            "Page.enable",
            Some(page::EnableParams::default()),
            Some(&session_id),
        )
        .await?;
        conn.send_command::<_, Value>(
            "Runtime.enable",
            Some(runtime::EnableParams::default()),
            Some(&session_id),
        )
        .await?;

        let tree: page::GetFrameTreeResult = conn
            .send_command(
                "Page.getFrameTree",
                Some(page::GetFrameTreeParams::default()),
                Some(&session_id),
            )
            .await?;
        state.current_url = tree.frame_tree.frame.url.clone();

        let viewport = self.config.viewport;
        conn.send_command::<_, Value>(
            "Emulation.setDeviceMetricsOverride",
            Some(SetDeviceMetricsOverrideParams {
                width: viewport.width,
                height: viewport.height,
                device_scale_factor: viewport.device_scale_factor,
                mobile: viewport.mobile,
            }),
            Some(&session_id),
        )
        .await?;

        state.active = Some(ActivePage {
            session_id,
            target_id: target_id.to_string(),
        });

        if self.viewer_count() > 0 {
            self.start_screencast(state).await;
        }

        debug!(token = %self.token, target_id = %target_id, url = %state.current_url, "Attached to page");
        Ok(())
    }

    /// Make another page the active one.
    #[instrument(level = "debug", skip(self), fields(token = %self.token, target_id = %target_id))]
    pub async fn switch_to_page(&self, target_id: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        self.switch_locked(&mut state, target_id).await
    }

    /// Page-switch state machine, under the session lock.
    ///
    /// Stops the screencast, detaches from the old page (both best-effort),
    /// activates and attaches the new one, pushes one still frame so viewers
    /// are not stuck on the last frame of the old page, and announces the
    /// switch.
    async fn switch_locked(
        &self,
        state: &mut SessionState,
        target_id: &str,
    ) -> Result<(), SessionError> {
        if state
            .active
            .as_ref()
            .is_some_and(|a| a.target_id == target_id)
        {
            return Ok(());
        }

        let conn = self.conn()?;

        self.stop_screencast(state).await;

        if let Some(old) = state.active.take() {
            let _ = conn
                .send_command::<_, Value>(
                    "Target.detachFromTarget",
                    Some(DetachFromTargetParams {
                        session_id: Some(old.session_id),
                    }),
                    None,
                )
                .await;
        }

        if let Err(e) = conn
            .send_command::<_, Value>(
                "Target.activateTarget",
                Some(ActivateTargetParams {
                    target_id: target_id.to_string(),
                }),
                None,
            )
            .await
        {
            warn!(target_id = %target_id, error = %e, "activateTarget failed");
        }

        self.attach_to_page(state, target_id).await?;

        self.push_initial_frame(state).await;

        self.broadcast(&ServerEvent::PageSwitched {
            target_id: target_id.to_string(),
            url: state.current_url.clone(),
        });
        self.refresh_page_list(state).await;
        Ok(())
    }

    /// Fetch every page target as a summary list.
    async fn page_summaries(&self) -> Result<Vec<PageSummary>, SessionError> {
        let conn = self.conn()?;
        let targets: GetTargetsResult = conn
            .send_command("Target.getTargets", Some(GetTargetsParams::default()), None)
            .await?;
        Ok(targets
            .target_infos
            .into_iter()
            .filter(TargetInfo::is_page)
            .map(|t| PageSummary {
                target_id: t.target_id,
                url: t.url,
                title: t.title,
            })
            .collect())
    }

    /// Broadcast a fresh page list. Background operation: failures are
    /// logged, never raised.
    pub(crate) async fn refresh_page_list(&self, state: &SessionState) {
        match self.page_summaries().await {
            Ok(pages) => {
                self.broadcast(&ServerEvent::PageList {
                    pages,
                    active_target_id: state.active.as_ref().map(|a| a.target_id.clone()),
                });
            }
            Err(e) => warn!(token = %self.token, error = %e, "Page list refresh failed"),
        }
    }

    /// Tear the session down: stop the screencast, detach from the page,
    /// close the transport, stop the event pump.
    #[instrument(level = "info", skip(self), fields(token = %self.token))]
    pub async fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        let mut state = self.state.lock().await;

        self.stop_screencast(&mut state).await;

        if let Some(active) = state.active.take() {
            if let Ok(conn) = self.conn() {
                let _ = conn
                    .send_command::<_, Value>(
                        "Target.detachFromTarget",
                        Some(DetachFromTargetParams {
                            session_id: Some(active.session_id),
                        }),
                        None,
                    )
                    .await;
            }
        }

        let connection = self.connection.write().take();
        if let Some(conn) = connection {
            conn.close().await;
        }

        if let Some(pump) = self.pump.lock().take() {
            pump.abort();
        }
        info!(token = %self.token, "Session shut down");
    }
}
