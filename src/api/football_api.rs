use super::{get_api_sports, map_items, parse_api_date, stat_blocks, value_to_string, TeamStatBlocks};
use crate::config::FOOTBALL_API_BASE_URL;
use crate::error::FetchError;
use crate::models::{AdditionalData, GameData, SportType};
use crate::utils::status::normalize_football_status;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const FOOTBALL_API_HOST: &str = "v3.football.api-sports.io";

/// A fixture as returned by API-Football
#[derive(Debug, Deserialize)]
pub(crate) struct ApiFixture {
    fixture: FixtureInfo,
    league: League,
    teams: Teams,
    #[serde(default)]
    goals: Goals,
}

#[derive(Debug, Deserialize)]
struct FixtureInfo {
    id: u64,
    #[serde(default)]
    referee: Option<String>,
    date: String,
    #[serde(default)]
    venue: Option<Venue>,
    status: FixtureStatus,
}

#[derive(Debug, Deserialize)]
struct Venue {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureStatus {
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
    #[serde(default)]
    round: Option<String>,
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
struct Goals {
    home: Option<u32>,
    away: Option<u32>,
}

/// Convert an API-Football fixture to canonical game data.
/// Returns `None` when the kickoff date cannot be read.
pub(crate) fn fixture_to_game_data(fixture: ApiFixture) -> Option<GameData> {
    let date = parse_api_date(&fixture.fixture.date)?;

    let game = GameData {
        game_id: fixture.fixture.id.to_string(),
        home_team: fixture.teams.home.name,
        away_team: fixture.teams.away.name,
        home_score: fixture.goals.home,
        away_score: fixture.goals.away,
        competition: fixture.league.name,
        date,
        venue: fixture
            .fixture
            .venue
            .and_then(|v| v.name)
            .unwrap_or_default(),
        status: normalize_football_status(&fixture.fixture.status.short),
        sport_type: SportType::Football,
        additional_data: AdditionalData {
            home_team_logo: fixture.teams.home.logo,
            away_team_logo: fixture.teams.away.logo,
            league_logo: fixture.league.logo,
            season: value_to_string(&fixture.league.season),
            round: fixture.league.round,
            referee: fixture.fixture.referee,
            ..Default::default()
        },
    };

    Some(game.with_normalized_scores())
}

pub struct FootballApiClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl FootballApiClient {
    pub fn new(api_key: Option<String>, client: Client) -> Self {
        Self {
            api_key,
            base_url: FOOTBALL_API_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey(SportType::Football))?;
        let url = format!("{}/{}", self.base_url, path);
        get_api_sports(&self.client, &url, FOOTBALL_API_HOST, api_key, query).await
    }

    /// Fetch every fixture scheduled on `date`
    pub async fn fetch_fixtures(&self, date: NaiveDate) -> Result<Vec<GameData>, FetchError> {
        let items = self
            .get("fixtures", &[("date", date.format("%Y-%m-%d").to_string())])
            .await?;
        Ok(map_items(items, SportType::Football, fixture_to_game_data))
    }

    /// Fetch a single fixture; `Ok(None)` when the provider knows no such id
    pub async fn fetch_fixture(&self, fixture_id: &str) -> Result<Option<GameData>, FetchError> {
        let items = self.get("fixtures", &[("id", fixture_id.to_string())]).await?;
        Ok(map_items(items, SportType::Football, fixture_to_game_data)
            .into_iter()
            .next())
    }

    pub async fn fetch_statistics(
        &self,
        fixture_id: &str,
    ) -> Result<Option<TeamStatBlocks>, FetchError> {
        let items = self
            .get("fixtures/statistics", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(stat_blocks(&items))
    }
}
