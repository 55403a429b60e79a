pub mod memory;
pub mod supabase;

use crate::error::StoreError;
use crate::models::{BettingTip, GameData, NewBettingTip, SportType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::MemoryTipStore;
pub use supabase::SupabaseTipStore;

/// Filter for listing tips; results always come newest first by `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipQuery {
    pub sport: Option<SportType>,
    pub limit: usize,
}

impl TipQuery {
    pub fn for_sport(sport: SportType, limit: usize) -> Self {
        Self {
            sport: Some(sport),
            limit,
        }
    }

    pub fn all(limit: usize) -> Self {
        Self { sport: None, limit }
    }
}

/// Persistence for betting tips
#[async_trait]
pub trait TipStore: Send + Sync {
    /// Insert a tip and return the stored record with its assigned id
    async fn insert(&self, tip: NewBettingTip) -> Result<BettingTip, StoreError>;

    async fn find(&self, query: TipQuery) -> Result<Vec<BettingTip>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<BettingTip>, StoreError>;

    /// Overwrite the game data snapshot and `updated_at` of one tip
    async fn update_game_data(
        &self,
        id: &str,
        game_data: &GameData,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Delete by id. Deleting an id that does not exist is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
