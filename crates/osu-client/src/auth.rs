//! Credential storage and bearer token acquisition.
//!
//! [`Session`] is the shared token cache read by the dispatcher on every
//! call. [`OsuAuth`] obtains v2 bearer tokens from the osu! OAuth endpoint
//! and doubles as the default [`TokenRefresher`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::{OAUTH_TOKEN_URL, OsuError, Token};

/// Produces a fresh v2 token when the cached one is reported stale.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, current: Option<&Token>) -> Result<Token, OsuError>;
}

/// Shared credential cache.
///
/// Cloning is cheap; all clones observe the same credentials. Refreshes
/// are serialized so concurrent stale-token detections refresh once.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<SessionState>,
}

#[derive(Default)]
struct SessionState {
    v1_key: RwLock<Option<String>>,
    v2_token: RwLock<Option<Token>>,
    refresh_lock: Mutex<()>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

impl Session {
    /// Create an empty session without a refresher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that refreshes stale v2 tokens through `refresher`.
    pub fn with_refresher(refresher: impl TokenRefresher + 'static) -> Self {
        let refresher: Arc<dyn TokenRefresher> = Arc::new(refresher);
        Self::from_parts(None, None, Some(refresher))
    }

    pub fn from_parts(
        v1_key: Option<String>,
        v2_token: Option<Token>,
        refresher: Option<Arc<dyn TokenRefresher>>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionState {
                v1_key: RwLock::new(v1_key),
                v2_token: RwLock::new(v2_token),
                refresh_lock: Mutex::new(()),
                refresher,
            }),
        }
    }

    /// Build a session with the v1 key taken from `OSU_API_KEY`.
    pub fn from_env(refresher: Option<Arc<dyn TokenRefresher>>) -> Self {
        let v1_key = std::env::var("OSU_API_KEY").ok().filter(|k| !k.is_empty());
        Self::from_parts(v1_key, None, refresher)
    }

    pub async fn v1_key(&self) -> Option<String> {
        self.inner.v1_key.read().await.clone()
    }

    pub async fn set_v1_key(&self, key: impl Into<String>) {
        *self.inner.v1_key.write().await = Some(key.into());
    }

    pub async fn v2_token(&self) -> Option<Token> {
        self.inner.v2_token.read().await.clone()
    }

    pub async fn set_v2_token(&self, token: Token) {
        *self.inner.v2_token.write().await = Some(token);
    }

    pub async fn clear_v2_token(&self) {
        *self.inner.v2_token.write().await = None;
    }

    /// Replace the cached v2 token after the server reported `stale` as expired.
    ///
    /// When the cached token no longer matches `stale`, another request has
    /// already refreshed it and the cached token is returned as is.
    pub async fn refresh_v2(&self, stale: Option<&str>) -> Result<Token, OsuError> {
        let refresher = self.inner.refresher.clone().ok_or(OsuError::AuthRequired)?;
        let _guard = self.inner.refresh_lock.lock().await;

        let current = self.v2_token().await;
        if let (Some(current), Some(stale)) = (&current, stale) {
            if current.access_token != stale {
                tracing::debug!("v2 token already refreshed by a concurrent request");
                return Ok(current.clone());
            }
        }

        tracing::info!("Refreshing osu! v2 token");
        let token = refresher.refresh(current.as_ref()).await?;
        self.set_v2_token(token.clone()).await;
        Ok(token)
    }
}

/// osu! OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

/// osu! OAuth error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
}

/// Obtains v2 bearer tokens with the application's client credentials.
pub struct OsuAuth {
    client_id: String,
    client_secret: String,
    token_url: String,
    http: reqwest::Client,
}

impl OsuAuth {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: OAUTH_TOKEN_URL.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Point token requests at a different endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Acquire an application token via the `client_credentials` grant.
    pub async fn login(&self) -> Result<Token, OsuError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", "public"),
        ];

        let resp = self.http.post(&self.token_url).form(&params).send().await?;
        self.parse_token_response(resp).await
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, OsuError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let resp = self.http.post(&self.token_url).form(&params).send().await?;
        self.parse_token_response(resp).await
    }

    async fn parse_token_response(&self, resp: reqwest::Response) -> Result<Token, OsuError> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: ErrorResponse = serde_json::from_str(&body).unwrap_or(ErrorResponse {
                error: Some(status.to_string()),
                error_description: Some(body.clone()),
                message: None,
            });
            return Err(OsuError::TokenRefreshFailed(format!(
                "{}: {}",
                err.error.unwrap_or_default(),
                err.error_description.or(err.message).unwrap_or_default()
            )));
        }

        let token_resp: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            OsuError::TokenRefreshFailed(format!("failed to parse response: {e}"))
        })?;

        Ok(Token {
            access_token: token_resp.access_token,
            refresh_token: token_resp.refresh_token.filter(|t| !t.is_empty()),
            expires_at: Utc::now().timestamp() + token_resp.expires_in,
        })
    }
}

#[async_trait]
impl TokenRefresher for OsuAuth {
    async fn refresh(&self, current: Option<&Token>) -> Result<Token, OsuError> {
        match current.and_then(|t| t.refresh_token.as_deref()) {
            Some(refresh_token) => self.refresh_token(refresh_token).await,
            None => self.login().await,
        }
    }
}
