pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;
pub mod web;

pub use api::*;
pub use models::*;
pub use repository::*;
pub use utils::*;

use anyhow::{Context, Result};
use api::{create_http_client, SportsDataFetcher};
use config::Config;
use std::sync::Arc;
use store::{MemoryTipStore, SupabaseTipStore, TipStore};
use tracing::{info, warn};

/// Build the tip repository from configuration.
///
/// Uses the hosted store when it is configured and an in-memory one
/// otherwise; providers without an API key are disabled, not fatal.
pub fn build_repository(config: &Config) -> Result<TipRepository> {
    let store: Arc<dyn TipStore> = match &config.store {
        Some(store_config) => {
            let client = create_http_client(config.http_timeout_secs)
                .context("Failed to build HTTP client for the tip store")?;
            info!("Using Supabase tip store at {}", store_config.url);
            Arc::new(SupabaseTipStore::new(store_config, client))
        }
        None => {
            warn!("SUPABASE_URL/SUPABASE_ANON_KEY not set, tips are kept in memory only");
            Arc::new(MemoryTipStore::new())
        }
    };

    let fetcher = SportsDataFetcher::from_config(config)
        .context("Failed to build HTTP client for the sports APIs")?;

    Ok(TipRepository::new(store, Arc::new(fetcher)))
}
