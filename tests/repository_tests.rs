use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;
use smart_hub_tips::api::basketball_api::BasketballApiClient;
use smart_hub_tips::api::football_api::FootballApiClient;
use smart_hub_tips::api::{MatchDataSource, SportsDataFetcher};
use smart_hub_tips::models::*;
use smart_hub_tips::repository::{TipRepository, REFRESH_BATCH_LIMIT};
use smart_hub_tips::store::{MemoryTipStore, TipStore};
use smart_hub_tips::utils::tip_classifier::MatchStatistics;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Match source that records every lookup; ids starting with `gone-` are unknown
#[derive(Default)]
struct RecordingSource {
    lookups: Mutex<Vec<String>>,
}

impl RecordingSource {
    fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

fn live_game(sport: SportType, id: &str) -> GameData {
    GameData {
        game_id: id.to_string(),
        home_team: "Palmeiras".to_string(),
        away_team: "Santos".to_string(),
        home_score: Some(1),
        away_score: Some(0),
        competition: "Paulista".to_string(),
        date: Utc.with_ymd_and_hms(2024, 2, 3, 21, 0, 0).unwrap(),
        venue: "Allianz Parque".to_string(),
        status: GameStatus::Live,
        sport_type: sport,
        additional_data: AdditionalData::default(),
    }
}

#[async_trait]
impl MatchDataSource for RecordingSource {
    async fn fetch_matches_for_date(
        &self,
        _sport: SportType,
        _date: Option<NaiveDate>,
    ) -> Vec<GameData> {
        Vec::new()
    }

    async fn fetch_match_by_id(&self, sport: SportType, id: &str) -> Option<GameData> {
        self.lookups.lock().unwrap().push(id.to_string());
        if id.starts_with("gone-") {
            None
        } else {
            Some(live_game(sport, id))
        }
    }
}

/// A stored tip created `age_minutes` ago, with no match data yet
fn stored_tip(id: usize, match_id: &str, sport: SportType, age_minutes: i64) -> BettingTip {
    let created = Utc.with_ymd_and_hms(2024, 2, 3, 12, 0, 0).unwrap() - Duration::minutes(age_minutes);
    BettingTip {
        id: id.to_string(),
        match_id: match_id.to_string(),
        sport_type: sport,
        tip_type: "Home Win".to_string(),
        confidence_score: 0.7,
        analysis: TipAnalysis {
            reasoning: "Strong at home".to_string(),
            key_stats: vec![],
            risk_level: RiskLevel::Medium,
            match_details: None,
        },
        odds: Some(1.9),
        game_data: None,
        created_at: created,
        updated_at: created,
    }
}

fn setup(tips: Vec<BettingTip>) -> (TipRepository, Arc<MemoryTipStore>, Arc<RecordingSource>) {
    let store = Arc::new(MemoryTipStore::with_tips(tips));
    let source = Arc::new(RecordingSource::default());
    let repository = TipRepository::new(store.clone(), source.clone());
    (repository, store, source)
}

#[tokio::test]
async fn test_refresh_batch_counts_successes() {
    let tips = vec![
        stored_tip(1, "100", SportType::Football, 1),
        stored_tip(2, "gone-200", SportType::Football, 2),
        stored_tip(3, "300", SportType::Football, 3),
        stored_tip(4, "400", SportType::Nba, 4),
    ];
    let (repository, store, source) = setup(tips);

    let refreshed = repository.refresh_batch(SportType::Football).await;
    assert_eq!(refreshed, 2);

    // Each football tip is attempted once, in newest-first order
    assert_eq!(source.lookups(), vec!["100", "gone-200", "300"]);

    let updated = store.get("1").await.unwrap().unwrap();
    assert_eq!(updated.game_data.unwrap().status, GameStatus::Live);
    assert!(updated.updated_at > updated.created_at);

    // The failed refresh leaves the record as it was
    let untouched = store.get("2").await.unwrap().unwrap();
    assert!(untouched.game_data.is_none());
    assert_eq!(untouched.updated_at, untouched.created_at);

    let other_sport = store.get("4").await.unwrap().unwrap();
    assert!(other_sport.game_data.is_none());
}

#[tokio::test]
async fn test_refresh_batch_only_touches_newest_tips() {
    let tips: Vec<BettingTip> = (0..25)
        .map(|i| stored_tip(i, &format!("m{}", i), SportType::Nba, i as i64))
        .collect();
    let (repository, store, source) = setup(tips);

    let refreshed = repository.refresh_batch(SportType::Nba).await;
    assert_eq!(refreshed, REFRESH_BATCH_LIMIT);

    let expected: Vec<String> = (0..REFRESH_BATCH_LIMIT).map(|i| format!("m{}", i)).collect();
    assert_eq!(source.lookups(), expected);

    let oldest = store.get("24").await.unwrap().unwrap();
    assert!(oldest.game_data.is_none());
}

#[tokio::test]
async fn test_refresh_batch_with_no_tips() {
    let (repository, _store, source) = setup(Vec::new());
    assert_eq!(repository.refresh_batch(SportType::Football).await, 0);
    assert!(source.lookups().is_empty());
}

#[tokio::test]
async fn test_analyze_and_create_attaches_match_details() {
    let (repository, _store, _source) = setup(Vec::new());

    let tip = repository
        .analyze_and_create("555", SportType::Football, &MatchStatistics::new(80.0, 50.0), None)
        .await
        .unwrap();

    assert_eq!(tip.tip_type, "Home Win");
    assert_eq!(tip.confidence_score, 0.75);
    assert_eq!(tip.analysis.risk_level, RiskLevel::Low);
    let details = tip.analysis.match_details.clone().unwrap();
    assert_eq!(details.home_team, "Palmeiras");
    assert_eq!(details.venue, "Allianz Parque");
    assert_eq!(tip.game_data.as_ref().unwrap().game_id, "555");

    let display = tip.display();
    assert_eq!(display.home_team, "Palmeiras");
    assert_eq!(display.home_score, Some(1));
}

#[tokio::test]
async fn test_removed_tip_is_gone_from_listing() {
    let tips = vec![
        stored_tip(1, "100", SportType::Football, 1),
        stored_tip(2, "200", SportType::Football, 2),
    ];
    let (repository, _store, _source) = setup(tips);

    repository.remove("1").await.unwrap();
    let remaining = repository.list(SportType::Football, 10).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "2");

    // Removing again is not an error
    repository.remove("1").await.unwrap();
}

#[tokio::test]
async fn test_fetcher_end_to_end_with_mock_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(query_param("id", "1035"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "response": [{
                "fixture": {
                    "id": 1035,
                    "date": "2024-01-20T19:00:00+00:00",
                    "venue": {"name": "Maracana"},
                    "status": {"short": "2H"}
                },
                "league": {"name": "Serie A", "season": 2024},
                "teams": {"home": {"name": "Flamengo"}, "away": {"name": "Corinthians"}},
                "goals": {"home": 1, "away": 1}
            }]
        })))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let fetcher = SportsDataFetcher::new(
        FootballApiClient::new(Some("key".to_string()), client.clone()).with_base_url(&server.uri()),
        BasketballApiClient::new(None, client),
    );
    let store = Arc::new(MemoryTipStore::new());
    let repository = TipRepository::new(store.clone(), Arc::new(fetcher));

    let tip = repository
        .create_sample("1035", SportType::Football)
        .await
        .unwrap();
    let game = tip.game_data.unwrap();
    assert_eq!(game.status, GameStatus::Live);
    assert_eq!(game.home_score, Some(1));
    assert_eq!(game.venue, "Maracana");

    // Basketball has no key configured, so lookups come back empty
    assert!(repository
        .match_source()
        .fetch_match_by_id(SportType::Nba, "1")
        .await
        .is_none());
    assert_eq!(store.len().await, 1);
}
