//! Navigation, history, and page management actions.

use coview_cdp::protocol::page::{
    GetNavigationHistoryParams, GetNavigationHistoryResult, NavigateParams,
    NavigateToHistoryEntryParams, ReloadParams,
};
use coview_cdp::protocol::target_domain::{CloseTargetParams, CreateTargetParams};
use serde_json::Value;
use tracing::{debug, instrument};

use super::BrowserSession;
use crate::error::SessionError;

impl BrowserSession {
    /// Navigate the active page to a URL.
    #[instrument(level = "debug", skip(self), fields(token = %self.token, url = %url))]
    pub async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;
        conn.send_command::<_, Value>(
            "Page.navigate",
            Some(NavigateParams::new(url)),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// Go back one history entry, if there is one.
    pub async fn go_back(&self) -> Result<(), SessionError> {
        self.navigate_history(-1).await
    }

    /// Go forward one history entry, if there is one.
    pub async fn go_forward(&self) -> Result<(), SessionError> {
        self.navigate_history(1).await
    }

    /// Step through the navigation history. Out-of-range steps are no-ops.
    async fn navigate_history(&self, offset: i32) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;

        let history: GetNavigationHistoryResult = conn
            .send_command(
                "Page.getNavigationHistory",
                Some(GetNavigationHistoryParams::default()),
                Some(&session_id),
            )
            .await?;

        let target_index = history.current_index + offset;
        let Some(entry) = usize::try_from(target_index)
            .ok()
            .and_then(|i| history.entries.get(i))
        else {
            debug!(token = %self.token, offset, "History step out of range");
            return Ok(());
        };

        conn.send_command::<_, Value>(
            "Page.navigateToHistoryEntry",
            Some(NavigateToHistoryEntryParams { entry_id: entry.id }),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// Reload the active page.
    pub async fn reload(&self) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        let session_id = state.session_id()?;
        let conn = self.conn()?;
        conn.send_command::<_, Value>(
            "Page.reload",
            Some(ReloadParams::default()),
            Some(&session_id),
        )
        .await?;
        Ok(())
    }

    /// Open a new page. The target listeners fan the resulting state out to
    /// viewers and switch to the created page.
    #[instrument(level = "debug", skip(self), fields(token = %self.token, url = %url))]
    pub async fn create_page(&self, url: &str) -> Result<(), SessionError> {
        let _state = self.state.lock().await;
        let conn = self.conn()?;
        conn.send_command::<_, Value>(
            "Target.createTarget",
            Some(CreateTargetParams {
                url: url.to_string(),
            }),
            None,
        )
        .await?;
        Ok(())
    }

    /// Close a page. The target listeners elect a replacement if the active
    /// page goes away.
    #[instrument(level = "debug", skip(self), fields(token = %self.token, target_id = %target_id))]
    pub async fn close_page(&self, target_id: &str) -> Result<(), SessionError> {
        let _state = self.state.lock().await;
        let conn = self.conn()?;
        conn.send_command::<_, Value>(
            "Target.closeTarget",
            Some(CloseTargetParams {
                target_id: target_id.to_string(),
            }),
            None,
        )
        .await?;
        Ok(())
    }
}
