use crate::error::ConfigError;
use std::collections::HashMap;

pub const FOOTBALL_API_BASE_URL: &str = "https://v3.football.api-sports.io";
pub const BASKETBALL_API_BASE_URL: &str = "https://v1.basketball.api-sports.io";
pub const DEFAULT_TIPS_TABLE: &str = "tips";
pub const DEFAULT_NBA_LEAGUE_ID: u32 = 12;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Connection details for the hosted tip store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
}

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when either the store URL or key is missing
    pub store: Option<StoreConfig>,
    pub football_api_key: Option<String>,
    pub basketball_api_key: Option<String>,
    pub football_base_url: String,
    pub basketball_base_url: String,
    pub nba_league_id: u32,
    pub nba_season: Option<String>,
    pub http_timeout_secs: u64,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: None,
            football_api_key: None,
            basketball_api_key: None,
            football_base_url: FOOTBALL_API_BASE_URL.to_string(),
            basketball_base_url: BASKETBALL_API_BASE_URL.to_string(),
            nba_league_id: DEFAULT_NBA_LEAGUE_ID,
            nba_season: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(api_key)) => Some(StoreConfig {
                url: url.trim_end_matches('/').to_string(),
                api_key,
                table: get("SUPABASE_TIPS_TABLE").unwrap_or_else(|| DEFAULT_TIPS_TABLE.to_string()),
            }),
            _ => None,
        };

        let defaults = Config::default();

        Ok(Config {
            store,
            football_api_key: get("API_FOOTBALL_KEY"),
            basketball_api_key: get("API_BASKETBALL_KEY"),
            football_base_url: get("API_FOOTBALL_BASE_URL")
                .unwrap_or(defaults.football_base_url),
            basketball_base_url: get("API_BASKETBALL_BASE_URL")
                .unwrap_or(defaults.basketball_base_url),
            nba_league_id: parse_or("NBA_LEAGUE_ID", get("NBA_LEAGUE_ID"), defaults.nba_league_id)?,
            nba_season: get("NBA_SEASON"),
            http_timeout_secs: parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                defaults.http_timeout_secs,
            )?,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_vars(HashMap::new()).unwrap();
        assert!(config.store.is_none());
        assert!(config.football_api_key.is_none());
        assert_eq!(config.nba_league_id, 12);
        assert_eq!(config.football_base_url, FOOTBALL_API_BASE_URL);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_store_requires_url_and_key() {
        let config = Config::from_vars(vars(&[("SUPABASE_URL", "https://x.supabase.co")])).unwrap();
        assert!(config.store.is_none());

        let config = Config::from_vars(vars(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.url, "https://x.supabase.co");
        assert_eq!(store.table, "tips");
    }

    #[test]
    fn test_blank_keys_count_as_missing() {
        let config = Config::from_vars(vars(&[("API_FOOTBALL_KEY", "  ")])).unwrap();
        assert!(config.football_api_key.is_none());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = Config::from_vars(vars(&[("HTTP_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
