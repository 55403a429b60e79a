use crate::api::MatchDataSource;
use crate::error::RepositoryError;
use crate::models::{BettingTip, GameData, MatchDetails, NewBettingTip, RiskLevel, SportType, TipAnalysis};
use crate::store::{TipQuery, TipStore};
use crate::utils::demo::demo_tips;
use crate::utils::tip_classifier::{classify_match, MatchStatistics};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Upper bound on the tips touched by one batch refresh
pub const REFRESH_BATCH_LIMIT: usize = 20;
pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const DEFAULT_LIST_ALL_LIMIT: usize = 20;

const SAMPLE_CONFIDENCE: f64 = 0.75;
const SAMPLE_ODDS: f64 = 1.85;

/// Everything needed to create a tip except the match data, which is fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTipRequest {
    pub match_id: String,
    pub sport_type: SportType,
    pub tip_type: String,
    pub confidence_score: f64,
    pub analysis: TipAnalysis,
    #[serde(default)]
    pub odds: Option<f64>,
}

/// Tips for display, flagged when they are illustrative rather than stored
#[derive(Debug, Clone)]
pub struct TipFeed {
    pub tips: Vec<BettingTip>,
    pub is_demo: bool,
}

/// Reads and writes betting tips, attaching live match data on the way.
///
/// Cheap to clone; the store and the data source are shared.
#[derive(Clone)]
pub struct TipRepository {
    store: Arc<dyn TipStore>,
    matches: Arc<dyn MatchDataSource>,
}

impl TipRepository {
    pub fn new(store: Arc<dyn TipStore>, matches: Arc<dyn MatchDataSource>) -> Self {
        Self { store, matches }
    }

    pub fn match_source(&self) -> &Arc<dyn MatchDataSource> {
        &self.matches
    }

    /// Create a tip, attaching the current match data when the provider has it
    pub async fn create(&self, request: NewTipRequest) -> Result<BettingTip, RepositoryError> {
        validate(&request)?;

        let game_data = self
            .matches
            .fetch_match_by_id(request.sport_type, &request.match_id)
            .await;
        if game_data.is_none() {
            warn!(
                "Could not fetch match data for {} match {}, storing tip without it",
                request.sport_type, request.match_id
            );
        }

        self.insert(request, game_data).await
    }

    async fn insert(
        &self,
        request: NewTipRequest,
        game_data: Option<GameData>,
    ) -> Result<BettingTip, RepositoryError> {
        let now = Utc::now();
        let tip = NewBettingTip {
            match_id: request.match_id,
            sport_type: request.sport_type,
            tip_type: request.tip_type,
            confidence_score: request.confidence_score,
            analysis: request.analysis,
            odds: request.odds,
            game_data,
            created_at: now,
            updated_at: now,
        };

        match self.store.insert(tip).await {
            Ok(stored) => {
                info!("Created tip {} ({}) for match {}", stored.id, stored.tip_type, stored.match_id);
                Ok(stored)
            }
            Err(e) => {
                error!("Failed to store tip: {}", e);
                Err(e.into())
            }
        }
    }

    /// Classify a match from team statistics and persist the resulting tip
    pub async fn analyze_and_create(
        &self,
        match_id: &str,
        sport: SportType,
        statistics: &MatchStatistics,
        odds: Option<f64>,
    ) -> Result<BettingTip, RepositoryError> {
        let game_data = self.matches.fetch_match_by_id(sport, match_id).await;
        if game_data.is_none() {
            warn!("Analyzing {} match {} without match data", sport, match_id);
        }

        let recommendation = classify_match(sport, statistics);
        let request = NewTipRequest {
            match_id: match_id.to_string(),
            sport_type: sport,
            tip_type: recommendation.tip_type,
            confidence_score: recommendation.confidence_score,
            analysis: TipAnalysis {
                reasoning: recommendation.reasoning,
                key_stats: recommendation.key_stats,
                risk_level: recommendation.risk_level,
                match_details: game_data.as_ref().map(MatchDetails::from),
            },
            odds,
        };
        validate(&request)?;

        self.insert(request, game_data).await
    }

    /// Create an illustrative tip for a real match; the match must exist
    pub async fn create_sample(
        &self,
        game_id: &str,
        sport: SportType,
    ) -> Result<BettingTip, RepositoryError> {
        let game = self
            .matches
            .fetch_match_by_id(sport, game_id)
            .await
            .ok_or_else(|| RepositoryError::MatchDataUnavailable {
                sport,
                match_id: game_id.to_string(),
            })?;

        let reasoning = match sport {
            SportType::Football => format!(
                "{} in good home form, with a statistical edge over {}",
                game.home_team, game.away_team
            ),
            SportType::Nba => format!(
                "{} have home court advantage against {}",
                game.home_team, game.away_team
            ),
        };

        let request = NewTipRequest {
            match_id: game_id.to_string(),
            sport_type: sport,
            tip_type: "Home Win".to_string(),
            confidence_score: SAMPLE_CONFIDENCE,
            analysis: TipAnalysis {
                reasoning,
                key_stats: vec![
                    "Favourable record".to_string(),
                    "Good recent form".to_string(),
                    "Home advantage".to_string(),
                ],
                risk_level: RiskLevel::Medium,
                match_details: Some(MatchDetails::from(&game)),
            },
            odds: Some(SAMPLE_ODDS),
        };

        self.insert(request, Some(game)).await
    }

    /// Newest tips for a sport; empty when there are none or the store fails
    pub async fn list(&self, sport: SportType, limit: usize) -> Vec<BettingTip> {
        self.find(TipQuery::for_sport(sport, limit)).await
    }

    /// Newest tips across every sport
    pub async fn list_all(&self, limit: usize) -> Vec<BettingTip> {
        self.find(TipQuery::all(limit)).await
    }

    async fn find(&self, query: TipQuery) -> Vec<BettingTip> {
        match self.store.find(query).await {
            Ok(tips) => {
                if tips.is_empty() {
                    info!("No tips found for {:?}", query.sport);
                }
                tips
            }
            Err(e) => {
                error!("Failed to read tips: {}", e);
                Vec::new()
            }
        }
    }

    /// Stored tips, or the demo set when there are none
    pub async fn feed(&self, sport: SportType, limit: usize) -> TipFeed {
        let tips = self.list(sport, limit).await;
        if tips.is_empty() {
            TipFeed {
                tips: demo_tips(sport),
                is_demo: true,
            }
        } else {
            TipFeed {
                tips,
                is_demo: false,
            }
        }
    }

    /// Re-fetch the match behind one tip and store the fresh snapshot.
    ///
    /// When the provider has nothing the stored record is left as it is.
    pub async fn refresh_one(&self, tip_id: &str) -> Result<GameData, RepositoryError> {
        let tip = self
            .store
            .get(tip_id)
            .await
            .map_err(|e| {
                error!("Failed to read tip {}: {}", tip_id, e);
                e
            })?
            .ok_or_else(|| RepositoryError::TipNotFound(tip_id.to_string()))?;

        let game_data = self
            .matches
            .fetch_match_by_id(tip.sport_type, &tip.match_id)
            .await
            .ok_or_else(|| {
                warn!("Could not refresh match data for {} match {}", tip.sport_type, tip.match_id);
                RepositoryError::MatchDataUnavailable {
                    sport: tip.sport_type,
                    match_id: tip.match_id.clone(),
                }
            })?;

        self.store
            .update_game_data(tip_id, &game_data, Utc::now())
            .await
            .map_err(|e| {
                error!("Failed to update tip {}: {}", tip_id, e);
                e
            })?;

        Ok(game_data)
    }

    /// Refresh the most recent tips of a sport one after another and return
    /// how many were updated. A failing tip does not stop the rest.
    pub async fn refresh_batch(&self, sport: SportType) -> usize {
        let tips = match self
            .store
            .find(TipQuery::for_sport(sport, REFRESH_BATCH_LIMIT))
            .await
        {
            Ok(tips) => tips,
            Err(e) => {
                error!("Failed to read {} tips for refresh: {}", sport, e);
                return 0;
            }
        };

        let mut refreshed = 0;
        for tip in &tips {
            if self.refresh_one(&tip.id).await.is_ok() {
                refreshed += 1;
            }
        }

        info!("Refreshed {}/{} {} tips", refreshed, tips.len(), sport);
        refreshed
    }

    pub async fn remove(&self, tip_id: &str) -> Result<(), RepositoryError> {
        self.store.delete(tip_id).await.map_err(|e| {
            error!("Failed to delete tip {}: {}", tip_id, e);
            RepositoryError::from(e)
        })?;
        info!("Deleted tip {}", tip_id);
        Ok(())
    }

    /// Today's matches for a sport, straight from the provider
    pub async fn sync_today(&self, sport: SportType) -> Vec<GameData> {
        let games = self.matches.fetch_matches_for_date(sport, None).await;
        info!("{} {} matches found for today", games.len(), sport);
        games
    }
}

fn validate(request: &NewTipRequest) -> Result<(), RepositoryError> {
    if !(0.0..=1.0).contains(&request.confidence_score) {
        return Err(RepositoryError::InvalidTip(format!(
            "confidence score {} is outside [0, 1]",
            request.confidence_score
        )));
    }
    if let Some(odds) = request.odds {
        if !odds.is_finite() || odds <= 0.0 {
            return Err(RepositoryError::InvalidTip(format!(
                "odds must be positive, got {}",
                odds
            )));
        }
    }
    if request.match_id.trim().is_empty() {
        return Err(RepositoryError::InvalidTip("match id is empty".to_string()));
    }
    Ok(())
}
