use crate::models::SportType;
use thiserror::Error;

/// Failures talking to a sports data provider.
///
/// These never reach the presentation layer: the fetcher logs them and hands
/// back an empty list or `None`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No API key configured for {0}")]
    MissingApiKey(SportType),

    #[error("Request to sports API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sports API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Sports API reported errors: {0}")]
    Provider(String),
}

/// Failures talking to the tip store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request to tip store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tip store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode tip store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Tip store returned no rows for {0}")]
    EmptyResponse(String),

    #[error("Tip not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Tip not found: {0}")]
    TipNotFound(String),

    #[error("No match data available for {sport} match {match_id}")]
    MatchDataUnavailable { sport: SportType, match_id: String },

    #[error("Invalid tip: {0}")]
    InvalidTip(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
