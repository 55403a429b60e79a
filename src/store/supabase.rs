use super::{TipQuery, TipStore};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::{BettingTip, GameData, NewBettingTip};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Tip store backed by a Supabase (PostgREST) table
pub struct SupabaseTipStore {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl SupabaseTipStore {
    pub fn new(config: &StoreConfig, client: Client) -> Self {
        Self {
            endpoint: format!("{}/rest/v1/{}", config.url.trim_end_matches('/'), config.table),
            api_key: config.api_key.clone(),
            client,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Decode a PostgREST row array. Rows that do not read as a tip are
    /// skipped so one bad record cannot hide the rest.
    async fn rows(response: Response) -> Result<Vec<BettingTip>, StoreError> {
        let body = Self::check(response).await?.text().await?;
        let rows: Vec<Value> = serde_json::from_str(&body)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.get("id").cloned().unwrap_or(Value::Null);
                serde_json::from_value(row)
                    .map_err(|e| warn!("Skipping unreadable tip row {}: {}", id, e))
                    .ok()
            })
            .collect())
    }
}

#[async_trait]
impl TipStore for SupabaseTipStore {
    async fn insert(&self, tip: NewBettingTip) -> Result<BettingTip, StoreError> {
        let response = self
            .authorized(self.client.post(&self.endpoint))
            .header("Prefer", "return=representation")
            .json(&tip)
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::EmptyResponse(format!("insert of match {}", tip.match_id)))
    }

    async fn find(&self, query: TipQuery) -> Result<Vec<BettingTip>, StoreError> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(sport) = query.sport {
            params.push(("sport_type", format!("eq.{}", sport)));
        }

        debug!("Querying tips: {:?}", params);
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .query(&params)
            .send()
            .await?;

        Self::rows(response).await
    }

    async fn get(&self, id: &str) -> Result<Option<BettingTip>, StoreError> {
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;

        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn update_game_data(
        &self,
        id: &str,
        game_data: &GameData,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.patch(&self.endpoint))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .json(&json!({
                "game_data": game_data,
                "updated_at": updated_at,
            }))
            .send()
            .await?;

        if Self::rows(response).await?.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.delete(&self.endpoint))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
