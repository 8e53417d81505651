//! Emulation domain types.
//!
//! The Emulation domain overrides the device metrics the page renders with.

use serde::Serialize;

/// Parameters for Emulation.setDeviceMetricsOverride.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceMetricsOverrideParams {
    /// Overriding width value in pixels (0 disables override).
    pub width: i32,
    /// Overriding height value in pixels (0 disables override).
    pub height: i32,
    /// Overriding device scale factor value (0 disables override).
    pub device_scale_factor: f64,
    /// Whether to emulate a mobile device.
    pub mobile: bool,
}
