use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Sports covered by the tips hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SportType {
    Football,
    Nba,
}

impl SportType {
    pub const ALL: [SportType; 2] = [SportType::Football, SportType::Nba];

    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Football => "football",
            SportType::Nba => "nba",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SportType::Football => "Football",
            SportType::Nba => "NBA",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "football" | "soccer" => Ok(SportType::Football),
            "nba" | "basketball" => Ok(SportType::Nba),
            other => Err(format!("unknown sport: {}", other)),
        }
    }
}

// Same spellings as `FromStr`, so URL paths and stored rows accept what the CLI does
impl<'de> Deserialize<'de> for SportType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Canonical match status shared by every provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live => "live",
            GameStatus::Finished => "finished",
        }
    }

    /// Whether a score is meaningful for this status
    pub fn has_started(&self) -> bool {
        !matches!(self, GameStatus::Scheduled)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sport-specific extras attached to a game.
///
/// The known keys are typed; anything else a provider mapping (or an older
/// stored record) carries is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalData {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub home_team_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub away_team_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub league_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub referee: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "lenient_u8", skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(default, deserialize_with = "lenient_map", skip_serializing_if = "Option::is_none")]
    pub home_team_stats: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient_map", skip_serializing_if = "Option::is_none")]
    pub away_team_stats: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Rows written by other clients store numbers where these are text, and the
// other way round; a mismatched value reads as absent rather than failing the row
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|q| u8::try_from(q).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_map<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

/// One real-world match observation in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    pub competition: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub status: GameStatus,
    pub sport_type: SportType,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

impl GameData {
    /// Drop scores for games that have not started yet
    pub fn with_normalized_scores(mut self) -> Self {
        if !self.status.has_started() {
            self.home_score = None;
            self.away_score = None;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

/// Match snapshot captured when a tip is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub venue: String,
}

impl From<&GameData> for MatchDetails {
    fn from(game: &GameData) -> Self {
        Self {
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            competition: game.competition.clone(),
            date: Some(game.date),
            venue: game.venue.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipAnalysis {
    pub reasoning: String,
    #[serde(default)]
    pub key_stats: Vec<String>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_details: Option<MatchDetails>,
}

/// A persisted betting recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingTip {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub match_id: String,
    pub sport_type: SportType,
    pub tip_type: String,
    pub confidence_score: f64,
    pub analysis: TipAnalysis,
    #[serde(default)]
    pub odds: Option<f64>,
    #[serde(default)]
    pub game_data: Option<GameData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a tip; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBettingTip {
    pub match_id: String,
    pub sport_type: SportType,
    pub tip_type: String,
    pub confidence_score: f64,
    pub analysis: TipAnalysis,
    pub odds: Option<f64>,
    pub game_data: Option<GameData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewBettingTip {
    pub fn into_tip(self, id: String) -> BettingTip {
        BettingTip {
            id,
            match_id: self.match_id,
            sport_type: self.sport_type,
            tip_type: self.tip_type,
            confidence_score: self.confidence_score,
            analysis: self.analysis,
            odds: self.odds,
            game_data: self.game_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// Ids may come back as text (uuid) or as a bigint identity column
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Fields a tip card shows, resolved from live game data first and the
/// creation-time snapshot second
#[derive(Debug, Clone, PartialEq)]
pub struct TipDisplay {
    pub home_team: String,
    pub away_team: String,
    pub competition: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub status: GameStatus,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

fn first_filled(candidates: [Option<&str>; 2], placeholder: &str) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

impl BettingTip {
    pub fn display(&self) -> TipDisplay {
        let game = self.game_data.as_ref();
        let details = self.analysis.match_details.as_ref();

        TipDisplay {
            home_team: first_filled(
                [
                    game.map(|g| g.home_team.as_str()),
                    details.map(|d| d.home_team.as_str()),
                ],
                "Home Team",
            ),
            away_team: first_filled(
                [
                    game.map(|g| g.away_team.as_str()),
                    details.map(|d| d.away_team.as_str()),
                ],
                "Away Team",
            ),
            competition: first_filled(
                [
                    game.map(|g| g.competition.as_str()),
                    details.map(|d| d.competition.as_str()),
                ],
                "Competition",
            ),
            venue: first_filled(
                [
                    game.map(|g| g.venue.as_str()),
                    details.map(|d| d.venue.as_str()),
                ],
                "Venue",
            ),
            date: game
                .map(|g| g.date)
                .or_else(|| details.and_then(|d| d.date))
                .unwrap_or_else(Utc::now),
            status: game.map(|g| g.status).unwrap_or_default(),
            home_score: game.and_then(|g| g.home_score),
            away_score: game.and_then(|g| g.away_score),
        }
    }
}
