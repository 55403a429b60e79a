use super::{get_api_sports, map_items, parse_api_date, stat_blocks, value_to_string, TeamStatBlocks};
use crate::config::{BASKETBALL_API_BASE_URL, DEFAULT_NBA_LEAGUE_ID};
use crate::error::FetchError;
use crate::models::{AdditionalData, GameData, SportType};
use crate::utils::status::normalize_basketball_status;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const BASKETBALL_API_HOST: &str = "v1.basketball.api-sports.io";
const UNKNOWN_ARENA: &str = "Venue TBD";

/// A game as returned by API-Basketball
#[derive(Debug, Deserialize)]
pub(crate) struct ApiGame {
    id: u64,
    date: String,
    status: GameStatusInfo,
    league: League,
    teams: Teams,
    #[serde(default)]
    scores: Scores,
    #[serde(default)]
    arena: Option<Arena>,
}

#[derive(Debug, Deserialize)]
struct GameStatusInfo {
    #[serde(default)]
    short: String,
}

#[derive(Debug, Deserialize)]
struct League {
    name: String,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    season: Value,
}

#[derive(Debug, Deserialize)]
struct Teams {
    home: Team,
    away: Team,
}

#[derive(Debug, Deserialize)]
struct Team {
    name: String,
    #[serde(default)]
    logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Scores {
    #[serde(default)]
    home: TeamScore,
    #[serde(default)]
    away: TeamScore,
}

#[derive(Debug, Default, Deserialize)]
struct TeamScore {
    quarter_2: Option<u32>,
    quarter_3: Option<u32>,
    quarter_4: Option<u32>,
    total: Option<u32>,
}

impl TeamScore {
    /// Latest quarter with a recorded score
    fn current_quarter(&self) -> u8 {
        if self.quarter_4.is_some() {
            4
        } else if self.quarter_3.is_some() {
            3
        } else if self.quarter_2.is_some() {
            2
        } else {
            1
        }
    }
}

#[derive(Debug, Deserialize)]
struct Arena {
    #[serde(default)]
    name: Option<String>,
}

/// NBA season label containing `date`; a new season starts in October
pub fn nba_season_for(date: NaiveDate) -> String {
    let start_year = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{}", start_year, start_year + 1)
}

/// Convert an API-Basketball game to canonical game data.
/// Returns `None` when the tip-off date cannot be read.
pub(crate) fn game_to_game_data(game: ApiGame) -> Option<GameData> {
    let date = parse_api_date(&game.date)?;
    let status = normalize_basketball_status(&game.status.short);

    let data = GameData {
        game_id: game.id.to_string(),
        home_team: game.teams.home.name,
        away_team: game.teams.away.name,
        home_score: game.scores.home.total,
        away_score: game.scores.away.total,
        competition: game.league.name,
        date,
        venue: game
            .arena
            .and_then(|a| a.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_ARENA.to_string()),
        status,
        sport_type: SportType::Nba,
        additional_data: AdditionalData {
            home_team_logo: game.teams.home.logo,
            away_team_logo: game.teams.away.logo,
            league_logo: game.league.logo,
            season: value_to_string(&game.league.season),
            quarter: status
                .has_started()
                .then(|| game.scores.home.current_quarter()),
            ..Default::default()
        },
    };

    Some(data.with_normalized_scores())
}

pub struct BasketballApiClient {
    api_key: Option<String>,
    base_url: String,
    league_id: u32,
    season: Option<String>,
    client: Client,
}

impl BasketballApiClient {
    pub fn new(api_key: Option<String>, client: Client) -> Self {
        Self {
            api_key,
            base_url: BASKETBALL_API_BASE_URL.to_string(),
            league_id: DEFAULT_NBA_LEAGUE_ID,
            season: None,
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Restrict date queries to a league, and optionally pin the season
    pub fn with_league(mut self, league_id: u32, season: Option<String>) -> Self {
        self.league_id = league_id;
        self.season = season;
        self
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey(SportType::Nba))?;
        let url = format!("{}/{}", self.base_url, path);
        get_api_sports(&self.client, &url, BASKETBALL_API_HOST, api_key, query).await
    }

    /// Fetch the league's games on `date`
    pub async fn fetch_games(&self, date: NaiveDate) -> Result<Vec<GameData>, FetchError> {
        let season = self
            .season
            .clone()
            .unwrap_or_else(|| nba_season_for(date));
        let query = [
            ("date", date.format("%Y-%m-%d").to_string()),
            ("league", self.league_id.to_string()),
            ("season", season),
        ];
        let items = self.get("games", &query).await?;
        Ok(map_items(items, SportType::Nba, game_to_game_data))
    }

    /// Fetch a single game; `Ok(None)` when the provider knows no such id
    pub async fn fetch_game(&self, game_id: &str) -> Result<Option<GameData>, FetchError> {
        let items = self.get("games", &[("id", game_id.to_string())]).await?;
        Ok(map_items(items, SportType::Nba, game_to_game_data)
            .into_iter()
            .next())
    }

    pub async fn fetch_statistics(
        &self,
        game_id: &str,
    ) -> Result<Option<TeamStatBlocks>, FetchError> {
        let items = self
            .get("games/statistics", &[("id", game_id.to_string())])
            .await?;
        Ok(stat_blocks(&items))
    }
}
