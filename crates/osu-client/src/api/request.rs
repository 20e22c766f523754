use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::*;
use crate::query::{ParamValue, Params};

/// Stale-token retries allowed within one call chain.
pub const MAX_AUTH_RETRIES: u32 = 3;

/// Query parameter carrying the v1 API key.
const V1_KEY_PARAM: &str = "k";

/// Per-call request descriptor.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    /// Ignored for v2 URLs, which always get the fixed bearer headers.
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub params: Params,
    /// Used instead of the session's v1 key.
    pub v1_key: Option<String>,
    /// Used instead of the session's v2 token.
    pub v2_token: Option<String>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as the JSON request payload.
    pub fn json_body(self, body: &impl Serialize) -> Result<Self, OsuError> {
        Ok(self.body(serde_json::to_string(body)?))
    }

    pub fn v1_key(mut self, key: impl Into<String>) -> Self {
        self.v1_key = Some(key.into());
        self
    }

    pub fn v2_token(mut self, token: impl Into<String>) -> Self {
        self.v2_token = Some(token.into());
        self
    }
}

/// Body returned by [`OsuClient::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Body served with an `application/json` content type.
    Json(Value),
    /// Any other body, untouched.
    Text(String),
}

impl ApiResponse {
    /// True for the `{"authentication": "basic"}` marker the API returns for
    /// stale bearer tokens. Seen by callers only once retries are exhausted.
    pub fn is_stale_authentication(&self) -> bool {
        match self {
            Self::Json(value) => is_stale(value),
            Self::Text(_) => false,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(body) => Some(body),
        }
    }
}

fn is_stale(value: &Value) -> bool {
    value.get("authentication").and_then(Value::as_str) == Some("basic")
}

/// Which credential scheme a URL falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    V1,
    V2,
    Other,
}

impl OsuClient {
    pub fn new(session: Session) -> Result<Self, OsuError> {
        Self::with_config(session, ClientConfig::default())
    }

    pub fn with_config(session: Session, config: ClientConfig) -> Result<Self, OsuError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            session,
            config,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn surface(&self, url: &str) -> Surface {
        if url.contains(&self.config.v2_base) {
            Surface::V2
        } else if url.contains(&self.config.v1_base) {
            Surface::V1
        } else {
            Surface::Other
        }
    }

    /// Send one request and return its body.
    ///
    /// v1 URLs get the API key as the `k` query parameter. v2 URLs get
    /// exactly the bearer, `Accept` and `Content-Type` headers; headers in
    /// `options` are discarded for them. When a JSON body carries the
    /// stale-token marker and the session holds a v2 token, the token is
    /// refreshed and the request re-sent, at most [`MAX_AUTH_RETRIES`] times
    /// per call. Past that bound the stale body is returned as is.
    pub async fn dispatch(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, OsuError> {
        if url.is_empty() {
            return Err(OsuError::MissingArgument("url"));
        }
        let method = options
            .method
            .clone()
            .ok_or(OsuError::MissingArgument("method"))?;

        let mut attempt = 0;
        loop {
            let (response, cached_token) = self.send_once(url, &method, &options).await?;

            if !response.is_stale_authentication()
                || cached_token.is_none()
                || attempt >= MAX_AUTH_RETRIES
            {
                return Ok(response);
            }

            attempt += 1;
            tracing::warn!(url, attempt, "Bearer token reported stale, refreshing");
            self.session.refresh_v2(cached_token.as_deref()).await?;
        }
    }

    /// One round trip. Also returns the cached v2 access token seen before
    /// sending, so a refresh can tell whether someone else already replaced it.
    async fn send_once(
        &self,
        url: &str,
        method: &Method,
        options: &RequestOptions,
    ) -> Result<(ApiResponse, Option<String>), OsuError> {
        let cached_token = self.session.v2_token().await.map(|t| t.access_token);
        let mut params = options.params.clone();
        let mut headers = options.headers.clone();

        match self.surface(url) {
            Surface::V1 => {
                let key = match &options.v1_key {
                    Some(key) => Some(key.clone()),
                    None => self.session.v1_key().await,
                };
                params.insert(V1_KEY_PARAM, key);
            }
            Surface::V2 => {
                let token = options
                    .v2_token
                    .as_deref()
                    .or(cached_token.as_deref())
                    .unwrap_or_default();
                headers = v2_headers(token)?;
            }
            Surface::Other => {}
        }

        let query = params.to_query_string();
        let full_url = if query.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{query}")
        };
        tracing::debug!(url = %full_url, %method, "Dispatching osu! API request");

        let mut request = self
            .http
            .request(method.clone(), &full_url)
            .headers(headers);
        if let Some(body) = options.body.as_ref().filter(|b| !b.is_empty()) {
            request = request.body(body.clone());
        }

        let exchange = async {
            let resp = request.send().await?;
            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((content_type, body))
        };

        let (content_type, body) = tokio::time::timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| OsuError::Timeout {
                url: full_url.clone(),
                timeout_ms: self.config.timeout.as_millis(),
            })??;

        let response = if content_type.is_some_and(|ct| ct.starts_with("application/json")) {
            ApiResponse::Json(serde_json::from_str(&body)?)
        } else {
            ApiResponse::Text(body)
        };

        Ok((response, cached_token))
    }

    /// Dispatch and deserialize a JSON body into `T`.
    pub(super) async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T, OsuError> {
        let response = self.dispatch(url, options).await?;
        decode(response)
    }
}

fn v2_headers(token: &str) -> Result<HeaderMap, OsuError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Reject bodies that report a failure: an exhausted stale-token marker, a
/// JSON `error` payload, or any non-empty non-JSON body.
pub(super) fn check(response: &ApiResponse) -> Result<(), OsuError> {
    if response.is_stale_authentication() {
        return Err(OsuError::AuthRequired);
    }

    match response {
        ApiResponse::Json(value) => match value.get("error").and_then(Value::as_str) {
            Some(message) => Err(OsuError::ApiError(message.to_string())),
            None => Ok(()),
        },
        ApiResponse::Text(body) if body.trim().is_empty() => Ok(()),
        ApiResponse::Text(body) => Err(OsuError::ApiError(format!(
            "expected a JSON response, got: {body}"
        ))),
    }
}

pub(super) fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T, OsuError> {
    check(&response)?;

    match response {
        ApiResponse::Json(value) => Ok(serde_json::from_value(value)?),
        ApiResponse::Text(_) => Err(OsuError::ApiError(
            "expected a JSON response, got an empty body".into(),
        )),
    }
}
