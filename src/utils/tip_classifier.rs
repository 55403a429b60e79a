use crate::models::{RiskLevel, SportType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Football: the favourite's form must exceed the other side's by this factor
pub const FORM_RATIO_THRESHOLD: f64 = 1.3;
/// Basketball: the favourite's scoring average must exceed the other side's by this many points
pub const POINTS_MARGIN_THRESHOLD: f64 = 10.0;

/// Aggregate statistic for each side of a match.
///
/// Football uses a recent-form score, basketball the average points per game.
/// Missing values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub home: Option<f64>,
    pub away: Option<f64>,
}

impl MatchStatistics {
    pub fn new(home: f64, away: f64) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
        }
    }

    /// Read `{"home": {"form": n}, "away": {"form": n}}` (football) or the same
    /// shape keyed by `avg_points` (basketball). Numeric strings are read as
    /// numbers; anything else missing or non-numeric is left as `None`.
    pub fn from_json(sport: SportType, value: &Value) -> Self {
        let key = match sport {
            SportType::Football => "form",
            SportType::Nba => "avg_points",
        };
        let side = |name: &str| {
            value
                .get(name)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok()))
        };

        Self {
            home: side("home"),
            away: side("away"),
        }
    }
}

/// Output of the classifier, ready to be turned into a tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipRecommendation {
    pub tip_type: String,
    pub confidence_score: f64,
    pub reasoning: String,
    pub key_stats: Vec<String>,
    pub risk_level: RiskLevel,
}

impl TipRecommendation {
    fn new(
        tip_type: &str,
        confidence_score: f64,
        reasoning: &str,
        key_stats: Vec<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            tip_type: tip_type.to_string(),
            confidence_score,
            reasoning: reasoning.to_string(),
            key_stats,
            risk_level,
        }
    }
}

pub fn classify_match(sport: SportType, stats: &MatchStatistics) -> TipRecommendation {
    let home = stats.home.unwrap_or(0.0);
    let away = stats.away.unwrap_or(0.0);

    match sport {
        SportType::Football => classify_football(home, away),
        SportType::Nba => classify_basketball(home, away),
    }
}

fn classify_football(home_form: f64, away_form: f64) -> TipRecommendation {
    if home_form > away_form * FORM_RATIO_THRESHOLD {
        TipRecommendation::new(
            "Home Win",
            0.75,
            "Home side shows clearly better recent form",
            vec![
                format!("Home form: {}", home_form),
                format!("Away form: {}", away_form),
            ],
            RiskLevel::Low,
        )
    } else if away_form > home_form * FORM_RATIO_THRESHOLD {
        TipRecommendation::new(
            "Away Win",
            0.70,
            "Away side with the stronger recent results",
            vec![
                format!("Away form: {}", away_form),
                format!("Home form: {}", home_form),
            ],
            RiskLevel::Medium,
        )
    } else {
        TipRecommendation::new(
            "Over 2.5 Goals",
            0.65,
            "Evenly matched sides, expect goals",
            vec![
                "Teams in similar form".to_string(),
                "History of high-scoring matches".to_string(),
            ],
            RiskLevel::Medium,
        )
    }
}

fn classify_basketball(home_avg: f64, away_avg: f64) -> TipRecommendation {
    if home_avg > away_avg + POINTS_MARGIN_THRESHOLD {
        TipRecommendation::new(
            "Home Win",
            0.78,
            "Home team averages considerably more points",
            vec![
                format!("Home average: {}pts", home_avg),
                format!("Away average: {}pts", away_avg),
            ],
            RiskLevel::Low,
        )
    } else if away_avg > home_avg + POINTS_MARGIN_THRESHOLD {
        TipRecommendation::new(
            "Away Win",
            0.75,
            "Away team brings the stronger offense",
            vec![
                format!("Away average: {}pts", away_avg),
                format!("Home average: {}pts", home_avg),
            ],
            RiskLevel::Medium,
        )
    } else {
        TipRecommendation::new(
            "Over Total Points",
            0.68,
            "Both offenses in good shape, expect a high-paced game",
            vec![
                "Offensive teams".to_string(),
                "High scoring averages".to_string(),
            ],
            RiskLevel::Medium,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_football_home_win() {
        let tip = classify_match(SportType::Football, &MatchStatistics::new(80.0, 50.0));
        assert_eq!(tip.tip_type, "Home Win");
        assert_eq!(tip.confidence_score, 0.75);
        assert_eq!(tip.risk_level, RiskLevel::Low);
        assert_eq!(tip.key_stats, vec!["Home form: 80", "Away form: 50"]);
    }

    #[test]
    fn test_football_away_win() {
        let tip = classify_match(SportType::Football, &MatchStatistics::new(40.0, 60.0));
        assert_eq!(tip.tip_type, "Away Win");
        assert_eq!(tip.confidence_score, 0.70);
        assert_eq!(tip.risk_level, RiskLevel::Medium);
        assert_eq!(tip.key_stats[0], "Away form: 60");
    }

    #[test]
    fn test_football_threshold_is_strict() {
        // Exactly 1.3x is not enough for either side
        let tip = classify_match(SportType::Football, &MatchStatistics::new(13.0, 10.0));
        assert_eq!(tip.tip_type, "Over 2.5 Goals");
        let tip = classify_match(SportType::Football, &MatchStatistics::new(10.0, 13.0));
        assert_eq!(tip.tip_type, "Over 2.5 Goals");
    }

    #[test]
    fn test_football_home_win_is_monotonic() {
        let away = 50.0;
        let mut crossed = false;
        for home in 0..400 {
            let tip = classify_match(SportType::Football, &MatchStatistics::new(home as f64, away));
            if crossed {
                assert_eq!(tip.tip_type, "Home Win", "home form {}", home);
            }
            crossed |= tip.tip_type == "Home Win";
        }
        assert!(crossed);
    }

    #[test]
    fn test_football_away_win_is_monotonic() {
        let home = 20.0;
        let mut crossed = false;
        for away in 0..200 {
            let tip = classify_match(SportType::Football, &MatchStatistics::new(home, away as f64));
            if crossed {
                assert_eq!(tip.tip_type, "Away Win", "away form {}", away);
            }
            crossed |= tip.tip_type == "Away Win";
        }
        assert!(crossed);
    }

    #[test]
    fn test_missing_statistics_count_as_zero() {
        let tip = classify_match(SportType::Football, &MatchStatistics::default());
        assert_eq!(tip.tip_type, "Over 2.5 Goals");

        let stats = MatchStatistics {
            home: Some(5.0),
            away: None,
        };
        let tip = classify_match(SportType::Football, &stats);
        assert_eq!(tip.tip_type, "Home Win");
    }

    #[test]
    fn test_basketball_balanced() {
        let tip = classify_match(SportType::Nba, &MatchStatistics::new(110.0, 112.0));
        assert_eq!(tip.tip_type, "Over Total Points");
        assert_eq!(tip.confidence_score, 0.68);
        assert_eq!(tip.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_basketball_margins() {
        let tip = classify_match(SportType::Nba, &MatchStatistics::new(121.0, 110.0));
        assert_eq!(tip.tip_type, "Home Win");
        assert_eq!(tip.confidence_score, 0.78);
        assert_eq!(tip.key_stats[0], "Home average: 121pts");

        let tip = classify_match(SportType::Nba, &MatchStatistics::new(100.0, 110.5));
        assert_eq!(tip.tip_type, "Away Win");
        assert_eq!(tip.confidence_score, 0.75);

        // A ten point gap is not strictly greater
        let tip = classify_match(SportType::Nba, &MatchStatistics::new(120.0, 110.0));
        assert_eq!(tip.tip_type, "Over Total Points");
    }

    #[test]
    fn test_statistics_from_json() {
        let value = json!({"home": {"form": 80}, "away": {"form": 50.5}});
        let stats = MatchStatistics::from_json(SportType::Football, &value);
        assert_eq!(stats, MatchStatistics::new(80.0, 50.5));

        let value = json!({"home": {"avg_points": 112.3}});
        let stats = MatchStatistics::from_json(SportType::Nba, &value);
        assert_eq!(stats.home, Some(112.3));
        assert_eq!(stats.away, None);

        let stats = MatchStatistics::from_json(SportType::Nba, &json!(null));
        assert_eq!(stats, MatchStatistics::default());
    }

    #[test]
    fn test_statistics_from_numeric_strings() {
        let value = json!({"home": {"form": "80"}, "away": {"form": " 50 "}});
        let stats = MatchStatistics::from_json(SportType::Football, &value);
        assert_eq!(stats, MatchStatistics::new(80.0, 50.0));
        assert_eq!(classify_match(SportType::Football, &stats).tip_type, "Home Win");

        let value = json!({"home": {"avg_points": "n/a"}, "away": {"avg_points": "108.5"}});
        let stats = MatchStatistics::from_json(SportType::Nba, &value);
        assert_eq!(stats.home, None);
        assert_eq!(stats.away, Some(108.5));
    }
}
