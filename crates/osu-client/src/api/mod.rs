//! osu! REST API client.
//!
//! All endpoint callers go through [`OsuClient::dispatch`], which injects
//! the v1 key or v2 bearer token and re-authenticates on stale tokens.

mod legacy;
mod mods;
mod request;
mod scores;
mod users;

pub mod models;

pub use legacy::{
    LegacyCombo, LegacyHits, LegacyMods, LegacyScore, LegacyScoreTotal, LegacyScoreUser,
    LegacyUser,
};
pub use models::{
    BeatmapScores, GameMode, Score, ScoreMod, ScoreStatistics, User, UserStatistics, UsersLookup,
};
pub use mods::{mod_acronyms, mod_name};
pub use request::{ApiResponse, MAX_AUTH_RETRIES, RequestOptions};
pub use scores::BeatmapScoresQuery;
pub use users::USERS_LOOKUP_LIMIT;

use crate::query::Params;
use crate::{ClientConfig, OsuError, Session};

/// osu! API client sharing one [`Session`] across all calls.
pub struct OsuClient {
    pub(super) http: reqwest::Client,
    pub(super) session: Session,
    pub(super) config: ClientConfig,
}
