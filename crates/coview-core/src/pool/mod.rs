//! Typed client for the upstream browser pool.
//!
//! The pool launches and reaps the actual headless browsers; this tier only
//! consumes its small HTTP surface. Every reply uses the same envelope:
//! `{success, data?, message?}`. Pool-reported failures are propagated
//! verbatim.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::PoolError;

/// Reply envelope common to every pool endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope, surfacing pool-reported failures.
    fn into_data(self) -> Result<Option<T>, PoolError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(PoolError::Rejected(
                self.message.unwrap_or_else(|| "unknown pool error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct StartData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ListData {
    browsers: Vec<String>,
}

/// HTTP client for the browser pool's control surface.
#[derive(Debug, Clone)]
pub struct PoolClient {
    http: reqwest::Client,
    base_url: String,
}

impl PoolClient {
    /// Create a client for the pool address in `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.pool_base_url(),
        }
    }

    /// Launch a browser; returns its token.
    #[instrument(level = "debug", skip(self))]
    pub async fn start(&self) -> Result<String, PoolError> {
        let envelope: Envelope<StartData> = self
            .http
            .post(format!("{}/start", self.base_url))
            .send()
            .await?
            .json()
            .await?;
        let data = envelope
            .into_data()?
            .ok_or_else(|| PoolError::Rejected("pool returned no token".to_string()))?;
        debug!(token = %data.token, "Browser started");
        Ok(data.token)
    }

    /// Stop a browser.
    ///
    /// The pool refuses tokens whose session still has clients; that refusal
    /// comes back as [`PoolError::Rejected`].
    #[instrument(level = "debug", skip(self), fields(token = %token))]
    pub async fn stop(&self, token: &str) -> Result<(), PoolError> {
        let envelope: Envelope<serde_json::Value> = self
            .http
            .post(format!("{}/stop", self.base_url))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?
            .json()
            .await?;
        envelope.into_data()?;
        Ok(())
    }

    /// List the tokens of every running browser.
    #[instrument(level = "debug", skip(self))]
    pub async fn list(&self) -> Result<Vec<String>, PoolError> {
        let envelope: Envelope<ListData> = self
            .http
            .get(format!("{}/list", self.base_url))
            .send()
            .await?
            .json()
            .await?;
        Ok(envelope.into_data()?.map(|d| d.browsers).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests;
