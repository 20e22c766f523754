//! osu! web API client library.
//!
//! Provides the shared request layer for the v1 and v2 REST APIs:
//! query encoding, per-version credential injection, JSON detection
//! and bounded re-authentication when the bearer token goes stale.

pub mod api;
pub mod auth;
pub mod config;
pub mod query;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use api::{ApiResponse, OsuClient, RequestOptions};
pub use auth::{OsuAuth, Session, TokenRefresher};
pub use config::ClientConfig;
pub use query::{ParamValue, Params};

/// Prefix shared by every v1 endpoint.
pub const API_V1_BASE: &str = "https://osu.ppy.sh/api/";

/// Prefix shared by every v2 endpoint.
pub const API_V2_BASE: &str = "https://osu.ppy.sh/api/v2";

/// OAuth token endpoint used for bearer token acquisition.
pub const OAUTH_TOKEN_URL: &str = "https://osu.ppy.sh/oauth/token";

/// Bearer token for the v2 API.
///
/// The caller is responsible for persisting this between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}

impl Token {
    /// True when the token expires within `margin_secs` from now.
    pub fn is_expired(&self, margin_secs: i64) -> bool {
        Utc::now().timestamp() >= self.expires_at - margin_secs
    }
}

/// Unified error type for the osu-client crate.
#[derive(Debug, thiserror::Error)]
pub enum OsuError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("authentication required: no valid token")]
    AuthRequired,

    #[error("token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("osu! API error: {0}")]
    ApiError(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
