use super::{TipQuery, TipStore};
use crate::error::StoreError;
use crate::models::{BettingTip, GameData, NewBettingTip};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local tip store, used when no hosted store is configured and in tests
#[derive(Default)]
pub struct MemoryTipStore {
    tips: RwLock<HashMap<String, BettingTip>>,
}

impl MemoryTipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, keeping their ids
    pub fn with_tips(tips: impl IntoIterator<Item = BettingTip>) -> Self {
        Self {
            tips: RwLock::new(tips.into_iter().map(|t| (t.id.clone(), t)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.tips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tips.read().await.is_empty()
    }
}

#[async_trait]
impl TipStore for MemoryTipStore {
    async fn insert(&self, tip: NewBettingTip) -> Result<BettingTip, StoreError> {
        let stored = tip.into_tip(Uuid::new_v4().to_string());
        self.tips
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find(&self, query: TipQuery) -> Result<Vec<BettingTip>, StoreError> {
        let tips = self.tips.read().await;
        let mut matching: Vec<BettingTip> = tips
            .values()
            .filter(|tip| query.sport.map_or(true, |sport| tip.sport_type == sport))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(query.limit);
        Ok(matching)
    }

    async fn get(&self, id: &str) -> Result<Option<BettingTip>, StoreError> {
        Ok(self.tips.read().await.get(id).cloned())
    }

    async fn update_game_data(
        &self,
        id: &str,
        game_data: &GameData,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tips = self.tips.write().await;
        let tip = tips
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        tip.game_data = Some(game_data.clone());
        tip.updated_at = updated_at;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.tips.write().await.remove(id);
        Ok(())
    }
}
