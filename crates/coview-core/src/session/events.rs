//! CDP event pump.
//!
//! One background task per session drains the connection's event stream.
//! Page-scoped events are accepted only when tagged with the active page's
//! session id; target lifecycle events drive the active-page election.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use coview_cdp::CdpConnection;
use coview_cdp::protocol::page::FrameNavigatedEvent;
use coview_cdp::protocol::target_domain::{
    CreateTargetParams, CreateTargetResult, GetTargetsParams, GetTargetsResult, TargetCreatedEvent,
    TargetDestroyedEvent, TargetInfo, TargetInfoChangedEvent,
};
use coview_cdp::protocol::{ScreencastFrameAckParams, ScreencastFrameEvent};
use coview_cdp::transport::CdpEvent;
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, trace, warn};

use super::{BrowserSession, SessionState};
use crate::error::SessionError;
use crate::protocol::ServerEvent;

impl BrowserSession {
    /// Start the event pump for a freshly opened connection.
    pub(super) fn spawn_pump(self: &Arc<Self>, conn: &Arc<CdpConnection>) {
        let session = self.clone();
        let conn = conn.clone();
        let mut events = conn.subscribe_events();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = events.recv() => match received {
                        Ok(event) => session.handle_cdp_event(event).await,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(token = %session.token, skipped, "Event pump lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    () = conn.closed() => break,
                }
            }
            if !session.shutting_down.load(Ordering::SeqCst) {
                warn!(token = %session.token, "Browser connection lost");
                session.broadcast(&ServerEvent::Error("Browser connection lost".to_string()));
            }
        });

        *self.pump.lock() = Some(handle);
    }

    /// Route one inbound CDP event.
    async fn handle_cdp_event(self: &Arc<Self>, event: CdpEvent) {
        match event.method.as_str() {
            "Page.frameNavigated" => self.on_frame_navigated(&event).await,
            "Page.screencastFrame" => self.on_screencast_frame(&event).await,
            "Page.screencastVisibilityChanged" => {
                trace!(token = %self.token, params = ?event.params, "Screencast visibility changed");
            }
            "Target.targetCreated" => {
                if let Some(decoded) = decode::<TargetCreatedEvent>(&event) {
                    self.on_target_created(decoded).await;
                }
            }
            "Target.targetDestroyed" => {
                if let Some(decoded) = decode::<TargetDestroyedEvent>(&event) {
                    self.on_target_destroyed(decoded).await;
                }
            }
            "Target.targetInfoChanged" => {
                if let Some(decoded) = decode::<TargetInfoChangedEvent>(&event) {
                    self.on_target_info_changed(decoded).await;
                }
            }
            _ => {}
        }
    }

    /// Main-frame navigation on the active page updates the tracked URL.
    async fn on_frame_navigated(&self, event: &CdpEvent) {
        let Some(decoded) = decode::<FrameNavigatedEvent>(event) else {
            return;
        };
        if !decoded.frame.is_main() {
            return;
        }

        let mut state = self.state.lock().await;
        if !is_for_active_page(&state, event) {
            return;
        }
        state.current_url = decoded.frame.url.clone();
        debug!(token = %self.token, url = %state.current_url, "URL changed");
        self.broadcast(&ServerEvent::UrlChanged(decoded.frame.url));
    }

    /// Screencast frames fan out to viewers and are acknowledged
    /// fire-and-forget so the browser keeps producing them.
    async fn on_screencast_frame(&self, event: &CdpEvent) {
        let Some(decoded) = decode::<ScreencastFrameEvent>(event) else {
            return;
        };

        let page_session_id = {
            let state = self.state.lock().await;
            if !is_for_active_page(&state, event) {
                return;
            }
            match state.session_id() {
                Ok(sid) => sid,
                Err(_) => return,
            }
        };

        self.broadcast(&ServerEvent::Frame(decoded.data));

        // The ack carries the integer frame session id from the event
        // payload, not the CDP page session id.
        if let Ok(conn) = self.conn() {
            let frame_session = decoded.session_id;
            tokio::spawn(async move {
                if let Err(e) = conn
                    .send_command::<_, Value>(
                        "Page.screencastFrameAck",
                        Some(ScreencastFrameAckParams {
                            session_id: frame_session,
                        }),
                        Some(&page_session_id),
                    )
                    .await
                {
                    trace!(error = %e, "Screencast ack failed");
                }
            });
        }
    }

    /// A new page target becomes the active page.
    async fn on_target_created(self: &Arc<Self>, event: TargetCreatedEvent) {
        let info = event.target_info;
        if !info.is_page() {
            return;
        }
        debug!(token = %self.token, target_id = %info.target_id, url = %info.url, "Page created");

        self.broadcast(&ServerEvent::PageCreated {
            target_id: info.target_id.clone(),
            url: info.url.clone(),
            title: info.title.clone(),
        });

        let mut state = self.state.lock().await;
        let already_active = state
            .active
            .as_ref()
            .is_some_and(|a| a.target_id == info.target_id);
        if already_active {
            self.refresh_page_list(&state).await;
            return;
        }

        if let Err(e) = self.switch_locked(&mut state, &info.target_id).await {
            warn!(token = %self.token, target_id = %info.target_id, error = %e, "Switch to created page failed");
            self.broadcast(&ServerEvent::Error(e.to_string()));
        }
    }

    /// A destroyed target may take the active page with it; elect a
    /// replacement if so.
    async fn on_target_destroyed(self: &Arc<Self>, event: TargetDestroyedEvent) {
        debug!(token = %self.token, target_id = %event.target_id, "Page destroyed");
        self.broadcast(&ServerEvent::PageDestroyed {
            target_id: event.target_id.clone(),
        });

        let mut state = self.state.lock().await;
        let lost_active = match state.active.as_ref() {
            Some(active) => active.target_id == event.target_id,
            // A failed switch can leave the session pageless; a destroy
            // event is the cue to recover.
            None => true,
        };

        if lost_active {
            if state
                .active
                .as_ref()
                .is_some_and(|a| a.target_id == event.target_id)
            {
                state.active = None;
            }
            if let Err(e) = self.elect_replacement(&mut state).await {
                warn!(token = %self.token, error = %e, "Replacement page election failed");
                self.broadcast(&ServerEvent::Error(e.to_string()));
            }
        }

        self.refresh_page_list(&state).await;
    }

    /// Pick any remaining page, or create a blank one, and switch to it.
    async fn elect_replacement(
        self: &Arc<Self>,
        state: &mut SessionState,
    ) -> Result<(), SessionError> {
        let conn = self.conn()?;
        let targets: GetTargetsResult = conn
            .send_command("Target.getTargets", Some(GetTargetsParams::default()), None)
            .await?;

        let replacement = targets.target_infos.into_iter().find(TargetInfo::is_page);

        let target_id = match replacement {
            Some(target) => target.target_id,
            None => {
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

        self.switch_locked(state, &target_id).await
    }

    /// Title/URL updates fan out with a fresh page list.
    async fn on_target_info_changed(&self, event: TargetInfoChangedEvent) {
        let info = event.target_info;
        if !info.is_page() {
            return;
        }

        self.broadcast(&ServerEvent::PageInfoChanged {
            target_id: info.target_id,
            url: info.url,
            title: info.title,
        });

        let state = self.state.lock().await;
        self.refresh_page_list(&state).await;
    }
}

/// Whether an event's session tag matches the active page.
fn is_for_active_page(state: &SessionState, event: &CdpEvent) -> bool {
    match (&state.active, &event.session_id) {
        (Some(active), Some(sid)) => active.session_id == *sid,
        _ => false,
    }
}

/// Decode an event payload, logging and dropping undecodable ones.
fn decode<T: serde::de::DeserializeOwned>(event: &CdpEvent) -> Option<T> {
    let params = event.params.clone()?;
    match serde_json::from_value(params) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(method = %event.method, error = %e, "Undecodable CDP event");
            None
        }
    }
}
