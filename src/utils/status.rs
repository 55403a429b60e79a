use crate::models::{GameStatus, SportType};

const FOOTBALL_LIVE: [&str; 6] = ["1H", "2H", "HT", "ET", "P", "LIVE"];
const FOOTBALL_FINISHED: [&str; 8] = ["FT", "AET", "PEN", "PST", "CANC", "ABD", "AWD", "WO"];

const BASKETBALL_LIVE: [&str; 8] = ["Q1", "Q2", "Q3", "Q4", "OT", "BT", "HT", "LIVE"];
const BASKETBALL_FINISHED: [&str; 4] = ["FT", "AOT", "CANC", "POST"];

/// Map an API-Football short status code to the canonical status.
/// Unknown codes are treated as scheduled.
pub fn normalize_football_status(code: &str) -> GameStatus {
    classify(code, &FOOTBALL_LIVE, &FOOTBALL_FINISHED)
}

/// Map an API-Basketball short status code to the canonical status.
/// Unknown codes are treated as scheduled.
pub fn normalize_basketball_status(code: &str) -> GameStatus {
    classify(code, &BASKETBALL_LIVE, &BASKETBALL_FINISHED)
}

pub fn normalize_status(sport: SportType, code: &str) -> GameStatus {
    match sport {
        SportType::Football => normalize_football_status(code),
        SportType::Nba => normalize_basketball_status(code),
    }
}

fn classify(code: &str, live: &[&str], finished: &[&str]) -> GameStatus {
    if live.contains(&code) {
        GameStatus::Live
    } else if finished.contains(&code) {
        GameStatus::Finished
    } else {
        GameStatus::Scheduled
    }
}
