pub mod basketball_api;
pub mod football_api;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{GameData, SportType};
use async_trait::async_trait;
use basketball_api::BasketballApiClient;
use chrono::{NaiveDate, Utc};
use football_api::FootballApiClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";
const QUOTA_HEADER: &str = "x-ratelimit-requests-remaining";

/// Per-team statistic blocks for a single match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatBlocks {
    pub home: Map<String, Value>,
    pub away: Map<String, Value>,
}

impl GameData {
    pub fn with_statistics(mut self, stats: TeamStatBlocks) -> Self {
        self.additional_data.home_team_stats = Some(stats.home);
        self.additional_data.away_team_stats = Some(stats.away);
        self
    }
}

/// Source of canonical match data.
///
/// Implementations never fail: problems are logged and surface as an empty
/// list or `None`.
#[async_trait]
pub trait MatchDataSource: Send + Sync {
    /// All matches for a calendar day (today when `date` is `None`)
    async fn fetch_matches_for_date(&self, sport: SportType, date: Option<NaiveDate>)
        -> Vec<GameData>;

    async fn fetch_match_by_id(&self, sport: SportType, game_id: &str) -> Option<GameData>;

    async fn fetch_match_statistics(
        &self,
        _sport: SportType,
        _game_id: &str,
    ) -> Option<TeamStatBlocks> {
        None
    }

    /// A single match with its team statistic blocks attached when available
    async fn fetch_match_details(&self, sport: SportType, game_id: &str) -> Option<GameData> {
        let game = self.fetch_match_by_id(sport, game_id).await?;
        Some(match self.fetch_match_statistics(sport, game_id).await {
            Some(stats) => game.with_statistics(stats),
            None => game,
        })
    }
}

/// Fetches match data from API-Football and API-Basketball
pub struct SportsDataFetcher {
    football: FootballApiClient,
    basketball: BasketballApiClient,
}

impl SportsDataFetcher {
    pub fn new(football: FootballApiClient, basketball: BasketballApiClient) -> Self {
        Self {
            football,
            basketball,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = create_http_client(config.http_timeout_secs)?;

        if config.football_api_key.is_none() {
            warn!("API_FOOTBALL_KEY not configured, football data disabled");
        }
        if config.basketball_api_key.is_none() {
            warn!("API_BASKETBALL_KEY not configured, NBA data disabled");
        }

        let football = FootballApiClient::new(config.football_api_key.clone(), client.clone())
            .with_base_url(&config.football_base_url);
        let basketball = BasketballApiClient::new(config.basketball_api_key.clone(), client)
            .with_base_url(&config.basketball_base_url)
            .with_league(config.nba_league_id, config.nba_season.clone());

        Ok(Self::new(football, basketball))
    }
}

#[async_trait]
impl MatchDataSource for SportsDataFetcher {
    async fn fetch_matches_for_date(
        &self,
        sport: SportType,
        date: Option<NaiveDate>,
    ) -> Vec<GameData> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let result = match sport {
            SportType::Football => self.football.fetch_fixtures(date).await,
            SportType::Nba => self.basketball.fetch_games(date).await,
        };

        match result {
            Ok(games) => {
                info!("Fetched {} {} matches for {}", games.len(), sport, date);
                games
            }
            Err(e) => {
                warn!("Failed to fetch {} matches for {}: {}", sport, date, e);
                Vec::new()
            }
        }
    }

    async fn fetch_match_by_id(&self, sport: SportType, game_id: &str) -> Option<GameData> {
        let result = match sport {
            SportType::Football => self.football.fetch_fixture(game_id).await,
            SportType::Nba => self.basketball.fetch_game(game_id).await,
        };

        match result {
            Ok(Some(game)) => Some(game),
            Ok(None) => {
                debug!("No {} match found with id {}", sport, game_id);
                None
            }
            Err(e) => {
                warn!("Failed to fetch {} match {}: {}", sport, game_id, e);
                None
            }
        }
    }

    async fn fetch_match_statistics(
        &self,
        sport: SportType,
        game_id: &str,
    ) -> Option<TeamStatBlocks> {
        let result = match sport {
            SportType::Football => self.football.fetch_statistics(game_id).await,
            SportType::Nba => self.basketball.fetch_statistics(game_id).await,
        };

        result.unwrap_or_else(|e| {
            warn!("Failed to fetch {} statistics for {}: {}", sport, game_id, e);
            None
        })
    }
}

/// Build the shared HTTP client with a request timeout
pub fn create_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Response envelope shared by the API-Sports family
#[derive(Debug, Deserialize)]
struct ApiSportsEnvelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<Value>,
}

/// GET an API-Sports endpoint and return the raw items of its `response` array
pub(crate) async fn get_api_sports(
    client: &Client,
    url: &str,
    host: &str,
    api_key: &str,
    query: &[(&str, String)],
) -> Result<Vec<Value>, FetchError> {
    let response = client
        .get(url)
        .header(KEY_HEADER, api_key)
        .header(HOST_HEADER, host)
        .query(query)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    if let Some(remaining) = response.headers().get(QUOTA_HEADER) {
        debug!("{} requests remaining: {:?}", host, remaining);
    }

    let envelope: ApiSportsEnvelope = response.json().await?;

    // Errors arrive as `[]` when fine, or as an object/array of messages
    let has_errors = match &envelope.errors {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    };
    if has_errors {
        return Err(FetchError::Provider(envelope.errors.to_string()));
    }

    Ok(envelope.response)
}

/// Decode and map each raw item, skipping the ones that do not fit
pub(crate) fn map_items<T, F>(items: Vec<Value>, sport: SportType, map: F) -> Vec<GameData>
where
    T: serde::de::DeserializeOwned,
    F: Fn(T) -> Option<GameData>,
{
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(raw) => {
                let mapped = map(raw);
                if mapped.is_none() {
                    warn!("Skipping {} match with unreadable fields", sport);
                }
                mapped
            }
            Err(e) => {
                warn!("Skipping malformed {} match: {}", sport, e);
                None
            }
        })
        .collect()
}

/// Turn the first two statistics entries into home and away maps.
///
/// Entries shaped like `{"statistics": [{"type": .., "value": ..}]}` are
/// flattened to `type -> value`; other objects are copied minus their
/// `team`/`game` references.
pub(crate) fn stat_blocks(items: &[Value]) -> Option<TeamStatBlocks> {
    fn block(entry: Option<&Value>) -> Map<String, Value> {
        let Some(entry) = entry else {
            return Map::new();
        };

        if let Some(stats) = entry.get("statistics").and_then(Value::as_array) {
            return stats
                .iter()
                .filter_map(|stat| {
                    let name = stat.get("type")?.as_str()?;
                    Some((name.to_string(), stat.get("value").cloned().unwrap_or(Value::Null)))
                })
                .collect();
        }

        entry
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(k, _)| k.as_str() != "team" && k.as_str() != "game")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    if items.is_empty() {
        return None;
    }

    Some(TeamStatBlocks {
        home: block(items.first()),
        away: block(items.get(1)),
    })
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_api_date(raw: &str) -> Option<chrono::DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}
