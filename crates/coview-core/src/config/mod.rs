//! Environment-driven configuration.
//!
//! Every knob has a default that works against a local browser pool; garbage
//! or missing environment values fall back to the default rather than
//! failing startup.

use std::env;

use tracing::warn;

/// Default browser pool host.
const DEFAULT_HOST: &str = "127.0.0.1";
/// Default browser pool port.
const DEFAULT_PORT: u16 = 8100;
/// Default screencast JPEG quality.
const DEFAULT_SCREENCAST_QUALITY: i32 = 60;
/// Default screencast frame sampling.
const DEFAULT_EVERY_NTH_FRAME: i32 = 3;

/// The viewport applied to every attached page.
#[derive(Debug, Clone, Copy)]
pub struct ViewportConfig {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Device scale factor.
    pub device_scale_factor: f64,
    /// Whether to emulate a mobile device.
    pub mobile: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_scale_factor: 1.0,
            mobile: false,
        }
    }
}

/// Tuning knobs for the mediation tier.
#[derive(Debug, Clone)]
pub struct Config {
    /// Browser pool host (`BROWSER_ENDPOINT_HOST`).
    pub endpoint_host: String,
    /// Browser pool port (`BROWSER_ENDPOINT_PORT`).
    pub endpoint_port: u16,
    /// Screencast JPEG quality, 0-100 (`SCREENCAST_QUALITY`).
    pub screencast_quality: i32,
    /// Deliver every n-th screencast frame (`SCREENCAST_EVERY_NTH_FRAME`).
    pub screencast_every_nth_frame: i32,
    /// Viewport applied to attached pages.
    pub viewport: ViewportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_host: DEFAULT_HOST.to_string(),
            endpoint_port: DEFAULT_PORT,
            screencast_quality: DEFAULT_SCREENCAST_QUALITY,
            screencast_every_nth_frame: DEFAULT_EVERY_NTH_FRAME,
            viewport: ViewportConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint_host: env::var("BROWSER_ENDPOINT_HOST")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.endpoint_host),
            endpoint_port: parse_env("BROWSER_ENDPOINT_PORT", defaults.endpoint_port),
            screencast_quality: parse_env("SCREENCAST_QUALITY", defaults.screencast_quality),
            screencast_every_nth_frame: parse_env(
                "SCREENCAST_EVERY_NTH_FRAME",
                defaults.screencast_every_nth_frame,
            ),
            viewport: defaults.viewport,
        }
    }

    /// The CDP WebSocket URL for a browser token.
    ///
    /// The token is query-escaped; opaque tokens may contain anything.
    pub fn browser_ws_url(&self, token: &str) -> String {
        let escaped: String = url::form_urlencoded::byte_serialize(token.as_bytes()).collect();
        format!(
            "ws://{}:{}/browser?token={}",
            self.endpoint_host, self.endpoint_port, escaped
        )
    }

    /// The HTTP base URL of the browser pool.
    pub fn pool_base_url(&self) -> String {
        format!("http://{}:{}", self.endpoint_host, self.endpoint_port)
    }
}

/// Parse an environment variable, warning and defaulting on garbage.
fn parse_env<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(var = name, value = %raw, "Unparseable environment value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests;
