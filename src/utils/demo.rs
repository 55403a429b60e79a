use crate::models::{
    AdditionalData, BettingTip, GameData, GameStatus, MatchDetails, RiskLevel, SportType,
    TipAnalysis,
};
use chrono::{TimeZone, Utc};

struct DemoMatch {
    home_team: &'static str,
    away_team: &'static str,
    competition: &'static str,
    kickoff: (u32, u32),
    venue: &'static str,
    home_logo: u32,
    away_logo: u32,
    tip_type: &'static str,
    confidence: f64,
    odds: f64,
    risk: RiskLevel,
    reasoning: &'static str,
    key_stats: [&'static str; 3],
}

const FOOTBALL_DEMO: [DemoMatch; 3] = [
    DemoMatch {
        home_team: "Flamengo",
        away_team: "Corinthians",
        competition: "Brasileirão Série A",
        kickoff: (19, 0),
        venue: "Maracanã",
        home_logo: 127,
        away_logo: 131,
        tip_type: "Home Win",
        confidence: 0.85,
        odds: 1.75,
        risk: RiskLevel::Low,
        reasoning: "Home side in excellent form, four straight wins in the last five",
        key_stats: [
            "80% of home points won",
            "15 goals scored in the last 5 matches",
            "Solid defence",
        ],
    },
    DemoMatch {
        home_team: "Palmeiras",
        away_team: "São Paulo",
        competition: "Brasileirão Série A",
        kickoff: (20, 0),
        venue: "Allianz Parque",
        home_logo: 126,
        away_logo: 130,
        tip_type: "Over 2.5 Goals",
        confidence: 0.72,
        odds: 2.10,
        risk: RiskLevel::Medium,
        reasoning: "Head-to-head history averages 3.5 goals per match",
        key_stats: [
            "2.8 goals per match on average",
            "Both teams scored in 70% of matches",
            "Vulnerable defences",
        ],
    },
    DemoMatch {
        home_team: "Atlético-MG",
        away_team: "Internacional",
        competition: "Brasileirão Série A",
        kickoff: (18, 0),
        venue: "Arena MRV",
        home_logo: 128,
        away_logo: 129,
        tip_type: "Both Teams To Score",
        confidence: 0.68,
        odds: 1.90,
        risk: RiskLevel::Medium,
        reasoning: "Both sides with productive attacks and unsteady defences",
        key_stats: [
            "Home: 12 goals in 5 matches",
            "Away: 10 goals in 5 matches",
            "Both scored in each of the last 4 matches",
        ],
    },
];

const NBA_DEMO: [DemoMatch; 3] = [
    DemoMatch {
        home_team: "Los Angeles Lakers",
        away_team: "Golden State Warriors",
        competition: "NBA Regular Season",
        kickoff: (22, 0),
        venue: "Crypto.com Arena",
        home_logo: 145,
        away_logo: 144,
        tip_type: "Over 220.5 Points",
        confidence: 0.85,
        odds: 1.75,
        risk: RiskLevel::Low,
        reasoning: "Both teams averaging more than 115 points in recent games",
        key_stats: [
            "118 points per game on average",
            "Efficient offense (52% FG)",
            "Fast pace",
        ],
    },
    DemoMatch {
        home_team: "Boston Celtics",
        away_team: "Miami Heat",
        competition: "NBA Regular Season",
        kickoff: (19, 30),
        venue: "TD Garden",
        home_logo: 138,
        away_logo: 149,
        tip_type: "Home Win",
        confidence: 0.72,
        odds: 2.10,
        risk: RiskLevel::Medium,
        reasoning: "Home team unbeaten at home in 8 games",
        key_stats: [
            "85% home win rate",
            "Strong defence (98 points allowed)",
            "Home court advantage",
        ],
    },
    DemoMatch {
        home_team: "Milwaukee Bucks",
        away_team: "Indiana Pacers",
        competition: "NBA Regular Season",
        kickoff: (20, 0),
        venue: "Fiserv Forum",
        home_logo: 142,
        away_logo: 141,
        tip_type: "Under 215.5 Points",
        confidence: 0.68,
        odds: 1.90,
        risk: RiskLevel::Medium,
        reasoning: "Both teams with solid defences and a controlled pace",
        key_stats: [
            "102 points allowed on average",
            "Slow pace (95 possessions)",
            "Top 5 defences in the league",
        ],
    },
];

/// Illustrative tips shown when the store has nothing for a sport
pub fn demo_tips(sport: SportType) -> Vec<BettingTip> {
    let (matches, media, league_logo) = match sport {
        SportType::Football => (&FOOTBALL_DEMO, "football", 71),
        SportType::Nba => (&NBA_DEMO, "basketball", 12),
    };
    let now = Utc::now();

    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let match_id = format!("demo-{}", i + 1);
            let date = Utc
                .with_ymd_and_hms(2024, 1, 20, m.kickoff.0, m.kickoff.1, 0)
                .single()
                .unwrap_or(now);
            let game = GameData {
                game_id: match_id.clone(),
                home_team: m.home_team.to_string(),
                away_team: m.away_team.to_string(),
                home_score: None,
                away_score: None,
                competition: m.competition.to_string(),
                date,
                venue: m.venue.to_string(),
                status: GameStatus::Scheduled,
                sport_type: sport,
                additional_data: AdditionalData {
                    home_team_logo: Some(format!(
                        "https://media.api-sports.io/{}/teams/{}.png",
                        media, m.home_logo
                    )),
                    away_team_logo: Some(format!(
                        "https://media.api-sports.io/{}/teams/{}.png",
                        media, m.away_logo
                    )),
                    league_logo: Some(format!(
                        "https://media.api-sports.io/{}/leagues/{}.png",
                        media, league_logo
                    )),
                    ..Default::default()
                },
            };

            BettingTip {
                id: (i + 1).to_string(),
                match_id,
                sport_type: sport,
                tip_type: m.tip_type.to_string(),
                confidence_score: m.confidence,
                analysis: TipAnalysis {
                    reasoning: m.reasoning.to_string(),
                    key_stats: m.key_stats.iter().map(|s| s.to_string()).collect(),
                    risk_level: m.risk,
                    match_details: Some(MatchDetails::from(&game)),
                },
                odds: Some(m.odds),
                game_data: Some(game),
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_tips_match_sport() {
        for sport in SportType::ALL {
            let tips = demo_tips(sport);
            assert_eq!(tips.len(), 3);
            assert!(tips.iter().all(|t| t.sport_type == sport));
            assert!(tips.iter().all(|t| t.game_data.is_some()));
            assert!(tips
                .iter()
                .all(|t| (0.0..=1.0).contains(&t.confidence_score)));
        }
    }
}
