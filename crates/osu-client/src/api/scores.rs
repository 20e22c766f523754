use super::*;

/// Filters for [`OsuClient::beatmap_scores`].
#[derive(Debug, Clone, Default)]
pub struct BeatmapScoresQuery {
    pub mode: Option<GameMode>,
    /// Mod acronyms, e.g. `["HD", "DT"]`.
    pub mods: Vec<String>,
    /// Leaderboard type: `global`, `country` or `friend`.
    pub kind: Option<String>,
    pub limit: Option<u32>,
}

impl BeatmapScoresQuery {
    fn into_params(self) -> Params {
        Params::new()
            .with("mode", self.mode.map(GameMode::as_str))
            .with("mods", self.mods)
            .with("type", self.kind)
            .with("limit", self.limit)
    }
}

impl OsuClient {
    /// Get the leaderboard of a beatmap.
    pub async fn beatmap_scores(
        &self,
        beatmap_id: u32,
        query: BeatmapScoresQuery,
    ) -> Result<Vec<Score>, OsuError> {
        let url = format!("{}/beatmaps/{beatmap_id}/scores", self.config.v2_base);
        let resp: BeatmapScores = self
            .fetch(&url, RequestOptions::get().params(query.into_params()))
            .await?;
        tracing::debug!(beatmap_id, count = resp.scores.len(), "Fetched beatmap scores");
        Ok(resp.scores)
    }
}
