// ── Runtime dashboard configuration ──
//
// Describes *where* the backend lives and how patient to be with it.
// Never touches disk: `cobox-config` resolves files and environment and
// hands a `DashboardConfig` in.

use std::time::Duration;

/// Origin used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend origin. Service paths are joined onto it; a malformed
    /// value surfaces as [`CoreError::Config`](crate::CoreError::Config)
    /// when the dashboard is built.
    pub api_base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}
