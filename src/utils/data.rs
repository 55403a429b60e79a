use crate::models::BettingTip;
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Save any serializable data to a pretty JSON file
pub fn save_to_json<T: Serialize + ?Sized>(data: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load data previously written by [`save_to_json`]
pub fn load_from_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to deserialize data")
}

/// One CSV line per tip, with display fields already resolved
#[derive(Debug, Serialize)]
struct TipCsvRow<'a> {
    id: &'a str,
    sport: &'a str,
    home_team: String,
    away_team: String,
    competition: String,
    date: String,
    status: &'static str,
    tip_type: &'a str,
    confidence: String,
    risk_level: &'static str,
    odds: Option<f64>,
    created_at: String,
}

/// Save tips to CSV
pub fn save_tips_to_csv(tips: &[BettingTip], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    for tip in tips {
        let display = tip.display();
        writer.serialize(TipCsvRow {
            id: &tip.id,
            sport: tip.sport_type.as_str(),
            home_team: display.home_team,
            away_team: display.away_team,
            competition: display.competition,
            date: display.date.to_rfc3339(),
            status: display.status.as_str(),
            tip_type: &tip.tip_type,
            confidence: format!("{:.0}%", tip.confidence_score * 100.0),
            risk_level: tip.analysis.risk_level.as_str(),
            odds: tip.odds,
            created_at: tip.created_at.to_rfc3339(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
