//! Dashboard pages and the JSON API.

use crate::api::MatchDataSource;
use crate::error::RepositoryError;
use crate::models::{BettingTip, GameData, GameStatus, RiskLevel, SportType};
use crate::repository::{NewTipRequest, TipRepository, DEFAULT_LIST_LIMIT};
use crate::utils::tip_classifier::MatchStatistics;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub repository: TipRepository,
}

impl AppState {
    pub fn new(repository: TipRepository) -> Self {
        Self { repository }
    }

    fn matches(&self) -> &dyn MatchDataSource {
        self.repository.match_source().as_ref()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(index))
        .route("/tips/:sport", get(dashboard))
        .route("/tips/:sport/refresh", post(refresh_dashboard))
        .route("/api/tips", post(create_tip))
        .route("/api/tips/:sport", get(list_tips))
        .route("/api/tips/:sport/refresh", post(refresh_sport))
        .route("/api/analyze", post(analyze))
        .route("/api/tip/:id", delete(delete_tip))
        .route("/api/tip/:id/refresh", post(refresh_tip))
        .route("/api/matches/:sport", get(list_matches))
        .route("/api/match/:sport/:id", get(match_details))
        .with_state(state)
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

/// JSON error body for API handlers
struct ApiError(RepositoryError);

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RepositoryError::InvalidTip(_) => StatusCode::BAD_REQUEST,
            RepositoryError::TipNotFound(_) => StatusCode::NOT_FOUND,
            RepositoryError::MatchDataUnavailable { .. } => StatusCode::BAD_GATEWAY,
            RepositoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

struct TabView {
    slug: &'static str,
    label: &'static str,
    active: bool,
}

struct SummaryView {
    count: usize,
    average_confidence: String,
    low_risk: usize,
    medium_risk: usize,
    high_risk: usize,
}

impl SummaryView {
    fn from_tips(tips: &[BettingTip]) -> Self {
        let count = tips.len();
        let average_confidence = if count == 0 {
            "-".to_string()
        } else {
            let total: f64 = tips.iter().map(|t| t.confidence_score).sum();
            format_percent(total / count as f64)
        };
        let risk = |level: RiskLevel| tips.iter().filter(|t| t.analysis.risk_level == level).count();

        Self {
            count,
            average_confidence,
            low_risk: risk(RiskLevel::Low),
            medium_risk: risk(RiskLevel::Medium),
            high_risk: risk(RiskLevel::High),
        }
    }
}

struct TipCardView {
    competition: String,
    status: &'static str,
    status_label: &'static str,
    home_team: String,
    away_team: String,
    show_score: bool,
    home_score: u32,
    away_score: u32,
    kickoff: String,
    venue: String,
    tip_type: String,
    confidence: String,
    confidence_class: &'static str,
    has_odds: bool,
    odds: String,
    risk_level: &'static str,
    risk_label: &'static str,
    reasoning: String,
    key_stats: Vec<String>,
}

impl From<&BettingTip> for TipCardView {
    fn from(tip: &BettingTip) -> Self {
        let display = tip.display();

        Self {
            competition: display.competition,
            status: display.status.as_str(),
            status_label: match display.status {
                GameStatus::Live => "Live",
                GameStatus::Finished => "Finished",
                GameStatus::Scheduled => "Scheduled",
            },
            home_team: display.home_team,
            away_team: display.away_team,
            show_score: display.status.has_started(),
            home_score: display.home_score.unwrap_or(0),
            away_score: display.away_score.unwrap_or(0),
            kickoff: display.date.format("%d/%m/%Y %H:%M UTC").to_string(),
            venue: display.venue,
            tip_type: tip.tip_type.clone(),
            confidence: format_percent(tip.confidence_score),
            confidence_class: if tip.confidence_score >= 0.8 {
                "high"
            } else if tip.confidence_score >= 0.6 {
                "medium"
            } else {
                "low"
            },
            has_odds: tip.odds.is_some(),
            odds: tip.odds.map(|o| format!("{:.2}", o)).unwrap_or_default(),
            risk_level: tip.analysis.risk_level.as_str(),
            risk_label: tip.analysis.risk_level.label(),
            reasoning: tip.analysis.reasoning.clone(),
            key_stats: tip.analysis.key_stats.clone(),
        }
    }
}

fn format_percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    active_sport: &'static str,
    sport_label: &'static str,
    last_update: String,
    is_demo: bool,
    tabs: Vec<TabView>,
    summary: SummaryView,
    tips: Vec<TipCardView>,
}

async fn index() -> Redirect {
    Redirect::to("/tips/football")
}

async fn dashboard(
    State(state): State<AppState>,
    Path(sport): Path<SportType>,
) -> impl IntoResponse {
    let feed = state.repository.feed(sport, DEFAULT_LIST_LIMIT).await;

    let template = DashboardTemplate {
        active_sport: sport.as_str(),
        sport_label: sport.label(),
        last_update: Utc::now().format("%H:%M UTC").to_string(),
        is_demo: feed.is_demo,
        tabs: SportType::ALL
            .iter()
            .map(|s| TabView {
                slug: s.as_str(),
                label: s.label(),
                active: *s == sport,
            })
            .collect(),
        summary: SummaryView::from_tips(&feed.tips),
        tips: feed.tips.iter().map(TipCardView::from).collect(),
    };

    HtmlTemplate(template)
}

async fn refresh_dashboard(
    State(state): State<AppState>,
    Path(sport): Path<SportType>,
) -> Redirect {
    state.repository.refresh_batch(sport).await;
    Redirect::to(&format!("/tips/{}", sport))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

async fn list_tips(
    State(state): State<AppState>,
    Path(sport): Path<SportType>,
    Query(params): Query<ListParams>,
) -> Json<Vec<BettingTip>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Json(state.repository.list(sport, limit).await)
}

async fn create_tip(
    State(state): State<AppState>,
    Json(request): Json<NewTipRequest>,
) -> Result<(StatusCode, Json<BettingTip>), ApiError> {
    let tip = state.repository.create(request).await?;
    Ok((StatusCode::CREATED, Json(tip)))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    match_id: String,
    sport_type: SportType,
    #[serde(default)]
    statistics: Value,
    #[serde(default)]
    odds: Option<f64>,
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<BettingTip>), ApiError> {
    let statistics = MatchStatistics::from_json(request.sport_type, &request.statistics);
    let tip = state
        .repository
        .analyze_and_create(&request.match_id, request.sport_type, &statistics, request.odds)
        .await?;
    Ok((StatusCode::CREATED, Json(tip)))
}

async fn refresh_sport(
    State(state): State<AppState>,
    Path(sport): Path<SportType>,
) -> Json<Value> {
    let refreshed = state.repository.refresh_batch(sport).await;
    Json(json!({ "sport": sport, "refreshed": refreshed }))
}

async fn refresh_tip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameData>, ApiError> {
    Ok(Json(state.repository.refresh_one(&id).await?))
}

async fn delete_tip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.repository.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct MatchParams {
    date: Option<NaiveDate>,
}

async fn list_matches(
    State(state): State<AppState>,
    Path(sport): Path<SportType>,
    Query(params): Query<MatchParams>,
) -> Json<Vec<GameData>> {
    Json(state.matches().fetch_matches_for_date(sport, params.date).await)
}

async fn match_details(
    State(state): State<AppState>,
    Path((sport, id)): Path<(SportType, String)>,
) -> Response {
    match state.matches().fetch_match_details(sport, &id).await {
        Some(game) => Json(game).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("No {} match found with id {}", sport, id) })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdditionalData;
    use crate::store::MemoryTipStore;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct OneMatch;

    fn game(sport: SportType, id: &str) -> GameData {
        GameData {
            game_id: id.to_string(),
            home_team: "Boston Celtics".to_string(),
            away_team: "Miami Heat".to_string(),
            home_score: Some(61),
            away_score: Some(55),
            competition: "NBA".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 20, 19, 30, 0).unwrap(),
            venue: "TD Garden".to_string(),
            status: GameStatus::Live,
            sport_type: sport,
            additional_data: AdditionalData::default(),
        }
    }

    #[async_trait]
    impl MatchDataSource for OneMatch {
        async fn fetch_matches_for_date(
            &self,
            sport: SportType,
            _date: Option<NaiveDate>,
        ) -> Vec<GameData> {
            vec![game(sport, "100")]
        }

        async fn fetch_match_by_id(&self, sport: SportType, id: &str) -> Option<GameData> {
            (id == "100").then(|| game(sport, id))
        }
    }

    fn app() -> Router {
        let repository = TipRepository::new(Arc::new(MemoryTipStore::new()), Arc::new(OneMatch));
        router(AppState::new(repository))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_shows_demo_tips_when_empty() {
        let response = app()
            .oneshot(Request::builder().uri("/tips/nba").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Showing sample tips"));
        assert!(html.contains("Los Angeles Lakers"));
    }

    #[tokio::test]
    async fn test_unknown_sport_is_rejected() {
        let response = app()
            .oneshot(Request::builder().uri("/tips/hockey").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sport_paths_accept_cli_spellings() {
        for uri in ["/tips/NBA", "/tips/soccer", "/api/tips/basketball"] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_analyze_then_list_and_delete() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/analyze",
                json!({
                    "match_id": "100",
                    "sport_type": "nba",
                    "statistics": {"home": {"avg_points": 121.0}, "away": {"avg_points": 108.0}},
                    "odds": 1.65
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let tip = body_json(response).await;
        assert_eq!(tip["tip_type"], "Home Win");
        assert_eq!(tip["analysis"]["risk_level"], "low");
        assert_eq!(tip["analysis"]["match_details"]["home_team"], "Boston Celtics");
        assert_eq!(tip["game_data"]["status"], "live");
        let id = tip["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/tips/nba").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let tips = body_json(response).await;
        assert_eq!(tips.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/tip/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_confidence() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/tips",
                json!({
                    "match_id": "100",
                    "sport_type": "football",
                    "tip_type": "Home Win",
                    "confidence_score": 1.5,
                    "analysis": {"reasoning": "x", "key_stats": [], "risk_level": "low"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_unknown_tip_is_not_found() {
        let response = app()
            .oneshot(json_request("POST", "/api/tip/nope/refresh", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_match_endpoints() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/matches/football?date=2024-01-20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let games = body_json(response).await;
        assert_eq!(games[0]["sport_type"], "football");

        let response = app()
            .oneshot(Request::builder().uri("/api/match/nba/999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_card_view_formats() {
        let tip = crate::utils::demo::demo_tips(SportType::Football).remove(0);
        let card = TipCardView::from(&tip);
        assert_eq!(card.confidence, "85%");
        assert_eq!(card.confidence_class, "high");
        assert_eq!(card.odds, "1.75");
        assert_eq!(card.risk_label, RiskLevel::Low.label());
        assert!(!card.show_score);
    }
}
