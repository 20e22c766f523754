use serde::{Deserialize, Serialize};

/// Ruleset selector shared by v1 and v2 endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Osu,
    Taiko,
    Fruits,
    Mania,
}

impl GameMode {
    /// Name used in v2 paths and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Osu => "osu",
            Self::Taiko => "taiko",
            Self::Fruits => "fruits",
            Self::Mania => "mania",
        }
    }

    /// Numeric id used by the v1 `m` parameter.
    pub fn legacy_id(self) -> i64 {
        match self {
            Self::Osu => 0,
            Self::Taiko => 1,
            Self::Fruits => 2,
            Self::Mania => 3,
        }
    }
}

/// User from GET /v2/users/{user} and GET /v2/me.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_supporter: bool,
    #[serde(default)]
    pub playmode: Option<String>,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub statistics: Option<UserStatistics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatistics {
    #[serde(default)]
    pub pp: f64,
    #[serde(default)]
    pub global_rank: Option<u32>,
    #[serde(default)]
    pub hit_accuracy: f64,
    #[serde(default)]
    pub play_count: u32,
}

/// Wrapper for GET /v2/users/lookup.
#[derive(Debug, Deserialize)]
pub struct UsersLookup {
    pub users: Vec<User>,
}

/// Mod as reported by v2 score payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMod {
    pub acronym: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreStatistics {
    #[serde(default)]
    pub great: u32,
    #[serde(default)]
    pub ok: u32,
    #[serde(default)]
    pub meh: u32,
    #[serde(default)]
    pub miss: u32,
}

/// Score from GET /v2/beatmaps/{beatmap}/scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub id: u64,
    pub user_id: u32,
    #[serde(default)]
    pub beatmap_id: Option<u32>,
    pub rank: String,
    pub accuracy: f64,
    pub max_combo: u32,
    #[serde(default)]
    pub pp: Option<f64>,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub mods: Vec<ScoreMod>,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub statistics: ScoreStatistics,
}

#[derive(Debug, Deserialize)]
pub struct BeatmapScores {
    pub scores: Vec<Score>,
}
