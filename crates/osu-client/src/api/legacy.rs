//! v1 endpoints.
//!
//! The v1 API reports every number as a string; scores are reshaped
//! into [`LegacyScore`] with typed fields, mod names and accuracy.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::mods::mod_name;
use super::*;

/// User row from GET /api/get_user. Values are kept as the API sends them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUser {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pp_rank: Option<String>,
    #[serde(default)]
    pub pp_raw: Option<String>,
    #[serde(default)]
    pub accuracy: Option<String>,
    #[serde(default)]
    pub playcount: Option<String>,
}

/// Score row as returned by GET /api/get_scores.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLegacyScore {
    score_id: Option<String>,
    score: Option<String>,
    username: Option<String>,
    maxcombo: Option<String>,
    count50: Option<String>,
    count100: Option<String>,
    count300: Option<String>,
    countmiss: Option<String>,
    countkatu: Option<String>,
    countgeki: Option<String>,
    perfect: Option<String>,
    enabled_mods: Option<String>,
    user_id: Option<String>,
    date: Option<String>,
    rank: Option<String>,
    pp: Option<String>,
    replay_available: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyScore {
    pub date: String,
    pub rank: String,
    pub user: LegacyScoreUser,
    pub score: LegacyScoreTotal,
    pub combo: LegacyCombo,
    pub hits: LegacyHits,
    pub mods: LegacyMods,
    /// Percentage in `0..=100`.
    pub accuracy: f64,
    pub pp: Option<f64>,
    pub replay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyScoreUser {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyScoreTotal {
    pub id: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyCombo {
    pub max: u32,
    pub full: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegacyHits {
    pub n300: u32,
    pub geki: u32,
    pub n100: u32,
    pub katu: u32,
    pub n50: u32,
    pub miss: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyMods {
    pub id: u32,
    pub name: String,
}

impl LegacyHits {
    /// Accuracy percentage for the given ruleset.
    pub fn accuracy(&self, mode: GameMode) -> f64 {
        let [n300, geki, n100, katu, n50, miss] =
            [self.n300, self.geki, self.n100, self.katu, self.n50, self.miss].map(f64::from);

        let (achieved, possible) = match mode {
            GameMode::Osu => (
                300.0 * n300 + 100.0 * n100 + 50.0 * n50,
                300.0 * (n300 + n100 + n50 + miss),
            ),
            GameMode::Taiko => (n300 + 0.5 * n100, n300 + n100 + miss),
            GameMode::Fruits => (n300 + n100 + n50, n300 + n100 + n50 + katu + miss),
            GameMode::Mania => (
                300.0 * (geki + n300) + 200.0 * katu + 100.0 * n100 + 50.0 * n50,
                300.0 * (geki + n300 + katu + n100 + n50 + miss),
            ),
        };

        if possible == 0.0 {
            return 0.0;
        }
        achieved / possible * 100.0
    }
}

fn num<T: FromStr + Default>(value: &Option<String>) -> T {
    value
        .as_deref()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

fn flag(value: &Option<String>) -> bool {
    num::<u32>(value) != 0
}

impl RawLegacyScore {
    fn into_score(self, mode: GameMode) -> LegacyScore {
        let hits = LegacyHits {
            n300: num(&self.count300),
            geki: num(&self.countgeki),
            n100: num(&self.count100),
            katu: num(&self.countkatu),
            n50: num(&self.count50),
            miss: num(&self.countmiss),
        };
        let mods: u32 = num(&self.enabled_mods);

        LegacyScore {
            accuracy: hits.accuracy(mode),
            date: self.date.unwrap_or_default(),
            rank: self.rank.unwrap_or_default(),
            user: LegacyScoreUser {
                id: num(&self.user_id),
                name: self.username.unwrap_or_default(),
            },
            score: LegacyScoreTotal {
                id: num(&self.score_id),
                total: num(&self.score),
            },
            combo: LegacyCombo {
                max: num(&self.maxcombo),
                full: flag(&self.perfect),
            },
            hits,
            mods: LegacyMods {
                id: mods,
                name: mod_name(mods),
            },
            pp: self.pp.as_deref().and_then(|pp| pp.parse().ok()),
            replay: flag(&self.replay_available),
        }
    }
}

impl OsuClient {
    /// Get a user through the v1 API. `None` when the user does not exist.
    pub async fn legacy_user(
        &self,
        user: &str,
        mode: GameMode,
    ) -> Result<Option<LegacyUser>, OsuError> {
        let url = format!("{}get_user", self.config.v1_base);
        let options = RequestOptions::get()
            .param("u", user)
            .param("m", mode.legacy_id());
        let users: Vec<LegacyUser> = self.fetch(&url, options).await?;
        Ok(users.into_iter().next())
    }

    /// Get the top scores on a beatmap through the v1 API.
    pub async fn legacy_beatmap_scores(
        &self,
        beatmap_id: u32,
        mode: GameMode,
        limit: Option<u32>,
    ) -> Result<Vec<LegacyScore>, OsuError> {
        let url = format!("{}get_scores", self.config.v1_base);
        let options = RequestOptions::get()
            .param("b", beatmap_id)
            .param("m", mode.legacy_id())
            .param("limit", limit);
        let raw: Vec<RawLegacyScore> = self.fetch(&url, options).await?;
        tracing::debug!(beatmap_id, count = raw.len(), "Fetched legacy beatmap scores");

        Ok(raw.into_iter().map(|s| s.into_score(mode)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(n300: u32, n100: u32, n50: u32, miss: u32) -> LegacyHits {
        LegacyHits {
            n300,
            n100,
            n50,
            miss,
            ..LegacyHits::default()
        }
    }

    #[test]
    fn osu_accuracy() {
        let acc = hits(90, 10, 0, 0).accuracy(GameMode::Osu);
        assert!((acc - 93.333).abs() < 0.001);
    }

    #[test]
    fn taiko_accuracy_counts_goods_as_half() {
        let acc = hits(50, 50, 0, 0).accuracy(GameMode::Taiko);
        assert!((acc - 75.0).abs() < 1e-9);
    }

    #[test]
    fn fruits_accuracy_counts_missed_droplets() {
        let mut h = hits(80, 10, 5, 0);
        h.katu = 5;
        assert!((h.accuracy(GameMode::Fruits) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn mania_accuracy_weights_geki_and_katu() {
        let h = LegacyHits {
            geki: 10,
            n300: 10,
            katu: 10,
            ..LegacyHits::default()
        };
        let acc = h.accuracy(GameMode::Mania);
        assert!((acc - (8000.0 / 9000.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_hits_have_zero_accuracy() {
        assert_eq!(LegacyHits::default().accuracy(GameMode::Osu), 0.0);
    }

    #[test]
    fn raw_score_is_reshaped() {
        let body = r#"{
            "score_id": "4012345678",
            "score": "12345678",
            "username": "peppy",
            "maxcombo": "1234",
            "count50": "0",
            "count100": "10",
            "count300": "90",
            "countmiss": "0",
            "countkatu": "3",
            "countgeki": "40",
            "perfect": "1",
            "enabled_mods": "72",
            "user_id": "2",
            "date": "2024-01-01 00:00:00",
            "rank": "SH",
            "pp": "512.3",
            "replay_available": "0"
        }"#;

        let raw: RawLegacyScore = serde_json::from_str(body).unwrap();
        let score = raw.into_score(GameMode::Osu);

        assert_eq!(score.user, LegacyScoreUser { id: 2, name: "peppy".into() });
        assert_eq!(score.score.id, 4012345678);
        assert_eq!(score.combo, LegacyCombo { max: 1234, full: true });
        assert_eq!(score.mods.name, "HDDT");
        assert_eq!(score.pp, Some(512.3));
        assert!(!score.replay);
        assert!((score.accuracy - 93.333).abs() < 0.001);
    }

    #[test]
    fn missing_pp_is_none() {
        let raw: RawLegacyScore = serde_json::from_str(r#"{"pp": null, "enabled_mods": "0"}"#).unwrap();
        let score = raw.into_score(GameMode::Taiko);
        assert_eq!(score.pp, None);
        assert_eq!(score.mods.name, "NM");
    }
}
