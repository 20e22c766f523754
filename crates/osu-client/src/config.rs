//! Client configuration with environment overrides.

use std::time::Duration;

use crate::{API_V1_BASE, API_V2_BASE};

/// Fixed per-request timeout applied when nothing overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URLs containing this prefix (and not `v2_base`) get the v1 key.
    pub v1_base: String,
    /// URLs containing this prefix get bearer auth.
    pub v2_base: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            v1_base: API_V1_BASE.into(),
            v2_base: API_V2_BASE.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("osu-client/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `OSU_API_V1_BASE`, `OSU_API_V2_BASE`
    /// and `OSU_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = get("OSU_API_V1_BASE").filter(|v| !v.is_empty()) {
            config.v1_base = v;
        }
        if let Some(v) = get("OSU_API_V2_BASE").filter(|v| !v.is_empty()) {
            config.v2_base = v;
        }
        if let Some(v) = get("OSU_REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %v,
                    "Invalid OSU_REQUEST_TIMEOUT_SECS, using default"
                ),
            }
        }

        config
    }

    /// Point both API surfaces at `root` (e.g. a local mock server).
    pub fn with_root(mut self, root: &str) -> Self {
        let root = root.trim_end_matches('/');
        self.v1_base = format!("{root}/api/");
        self.v2_base = format!("{root}/api/v2");
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
