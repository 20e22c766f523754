use super::request::check;
use super::*;
use crate::query::encode_component;

/// Most users the lookup endpoint returns per request.
pub const USERS_LOOKUP_LIMIT: usize = 50;

impl OsuClient {
    /// Get a user by id or username, optionally for a specific ruleset.
    pub async fn users_details(
        &self,
        user: &str,
        mode: Option<GameMode>,
    ) -> Result<User, OsuError> {
        let mut url = format!("{}/users/{}", self.config.v2_base, encode_component(user));
        if let Some(mode) = mode {
            url = format!("{url}/{}", mode.as_str());
        }
        self.fetch(&url, RequestOptions::get()).await
    }

    /// Get the user owning the current token.
    pub async fn me_details(&self, mode: Option<GameMode>) -> Result<User, OsuError> {
        let mut url = format!("{}/me", self.config.v2_base);
        if let Some(mode) = mode {
            url = format!("{url}/{}", mode.as_str());
        }
        self.fetch(&url, RequestOptions::get()).await
    }

    /// Get users by id or username.
    ///
    /// Only the first [`USERS_LOOKUP_LIMIT`] entries are sent; the rest are
    /// dropped with a warning.
    pub async fn users_lookup(&self, ids: &[impl ToString]) -> Result<Vec<User>, OsuError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > USERS_LOOKUP_LIMIT {
            tracing::warn!(
                requested = ids.len(),
                limit = USERS_LOOKUP_LIMIT,
                "Too many users for one lookup, extra ids dropped"
            );
        }

        let url = format!("{}/users/lookup", self.config.v2_base);
        let ids: Vec<String> = ids
            .iter()
            .take(USERS_LOOKUP_LIMIT)
            .map(ToString::to_string)
            .collect();
        let resp: UsersLookup = self
            .fetch(&url, RequestOptions::get().param("ids", ids))
            .await?;
        Ok(resp.users)
    }

    /// Revoke the token in use and drop it from the session.
    ///
    /// The session keeps its token when the server reports a failure.
    pub async fn revoke_current_token(&self) -> Result<(), OsuError> {
        let url = format!("{}/oauth/tokens/current", self.config.v2_base);
        let resp = self.dispatch(&url, RequestOptions::delete()).await?;
        check(&resp)?;

        self.session.clear_v2_token().await;
        tracing::info!("Revoked current osu! v2 token");
        Ok(())
    }
}
