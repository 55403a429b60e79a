use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use smart_hub_tips::build_repository;
use smart_hub_tips::config::Config;
use smart_hub_tips::utils::data::{save_tips_to_csv, save_to_json};
use smart_hub_tips::models::{BettingTip, GameData, RiskLevel, SportType, TipAnalysis};
use smart_hub_tips::repository::{NewTipRequest, DEFAULT_LIST_ALL_LIMIT, DEFAULT_LIST_LIMIT};
use smart_hub_tips::utils::tip_classifier::MatchStatistics;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smart-hub-tips", about = "Football and NBA betting tips")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List matches for a day straight from the provider
    Matches {
        sport: SportType,
        /// Day to list, today when omitted (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Also write the matches to a JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Show one match with team statistics
    Match { sport: SportType, id: String },
    /// List stored tips, newest first
    Tips {
        /// Every sport when omitted
        sport: Option<SportType>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Store a tip written by hand
    Create {
        sport: SportType,
        match_id: String,
        #[arg(long)]
        tip_type: String,
        #[arg(long)]
        confidence: f64,
        #[arg(long)]
        reasoning: String,
        #[arg(long, default_value = "medium")]
        risk: RiskLevel,
        /// Repeat for several lines
        #[arg(long = "stat")]
        key_stats: Vec<String>,
        #[arg(long)]
        odds: Option<f64>,
    },
    /// Classify a match from team form (football) or average points (NBA)
    Analyze {
        sport: SportType,
        match_id: String,
        #[arg(long)]
        home: f64,
        #[arg(long)]
        away: f64,
        #[arg(long)]
        odds: Option<f64>,
    },
    /// Store an illustrative tip for an existing match
    Sample { sport: SportType, match_id: String },
    /// Refresh the match data of one tip
    Refresh { tip_id: String },
    /// Refresh the most recent tips of a sport
    RefreshAll { sport: SportType },
    Delete { tip_id: String },
    /// Write stored tips to a file
    Export {
        output: PathBuf,
        #[arg(long)]
        sport: Option<SportType>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;

    tracing_subscriber::fmt::init();

    let repository = build_repository(&config)?;

    match cli.command {
        Command::Matches { sport, date, save } => {
            let games = match date {
                Some(date) => {
                    repository
                        .match_source()
                        .fetch_matches_for_date(sport, Some(date))
                        .await
                }
                None => repository.sync_today(sport).await,
            };
            if games.is_empty() {
                println!("No {} matches found.", sport.label());
            } else {
                println!("{} {} matches:\n", games.len(), sport.label());
                for game in &games {
                    println!("{}", format_game(game));
                }
            }
            if let Some(path) = save {
                save_to_json(&games, &path)?;
                println!("\nSaved matches to {}", path.display());
            }
        }
        Command::Match { sport, id } => {
            let game = repository
                .match_source()
                .fetch_match_details(sport, &id)
                .await
                .with_context(|| format!("No {} match found with id {}", sport, id))?;
            println!("{}", serde_json::to_string_pretty(&game)?);
        }
        Command::Tips { sport, limit } => {
            let tips = match sport {
                Some(sport) => {
                    repository
                        .list(sport, limit.unwrap_or(DEFAULT_LIST_LIMIT))
                        .await
                }
                None => repository.list_all(limit.unwrap_or(DEFAULT_LIST_ALL_LIMIT)).await,
            };
            if tips.is_empty() {
                println!("No tips stored.");
            }
            for (i, tip) in tips.iter().enumerate() {
                println!("{}. {}", i + 1, format_tip(tip));
            }
        }
        Command::Create {
            sport,
            match_id,
            tip_type,
            confidence,
            reasoning,
            risk,
            key_stats,
            odds,
        } => {
            let tip = repository
                .create(NewTipRequest {
                    match_id,
                    sport_type: sport,
                    tip_type,
                    confidence_score: confidence,
                    analysis: TipAnalysis {
                        reasoning,
                        key_stats,
                        risk_level: risk,
                        match_details: None,
                    },
                    odds,
                })
                .await?;
            println!("Created {}", format_tip(&tip));
        }
        Command::Analyze {
            sport,
            match_id,
            home,
            away,
            odds,
        } => {
            let stats = MatchStatistics::new(home, away);
            let tip = repository
                .analyze_and_create(&match_id, sport, &stats, odds)
                .await?;
            println!("Created {}", format_tip(&tip));
            println!("  {}", tip.analysis.reasoning);
            for stat in &tip.analysis.key_stats {
                println!("  - {}", stat);
            }
        }
        Command::Sample { sport, match_id } => {
            let tip = repository.create_sample(&match_id, sport).await?;
            println!("Created {}", format_tip(&tip));
        }
        Command::Refresh { tip_id } => {
            let game = repository.refresh_one(&tip_id).await?;
            println!("Refreshed tip {}: {}", tip_id, format_game(&game));
        }
        Command::RefreshAll { sport } => {
            let refreshed = repository.refresh_batch(sport).await;
            println!("Refreshed {} {} tips", refreshed, sport.label());
        }
        Command::Delete { tip_id } => {
            repository.remove(&tip_id).await?;
            println!("Deleted tip {}", tip_id);
        }
        Command::Export {
            output,
            sport,
            format,
        } => {
            let tips = match sport {
                Some(sport) => repository.list(sport, DEFAULT_LIST_ALL_LIMIT).await,
                None => repository.list_all(DEFAULT_LIST_ALL_LIMIT).await,
            };
            match format {
                ExportFormat::Csv => save_tips_to_csv(&tips, &output)?,
                ExportFormat::Json => save_to_json(&tips, &output)?,
            }
            println!("Saved {} tips to {}", tips.len(), output.display());
        }
    }

    Ok(())
}

fn format_game(game: &GameData) -> String {
    let score = match (game.home_score, game.away_score) {
        (Some(home), Some(away)) => format!("{} - {}", home, away),
        _ => "vs".to_string(),
    };
    format!(
        "[{}] {} {} {} ({}, {}) {} @ {}",
        game.game_id,
        game.home_team,
        score,
        game.away_team,
        game.competition,
        game.status,
        game.date.format("%Y-%m-%d %H:%M UTC"),
        game.venue
    )
}

fn format_tip(tip: &BettingTip) -> String {
    let display = tip.display();
    let odds = tip
        .odds
        .map(|o| format!(" @ {:.2}", o))
        .unwrap_or_default();
    format!(
        "[{}] {} vs {}: {} ({:.0}%{}, {})",
        tip.id,
        display.home_team,
        display.away_team,
        tip.tip_type,
        tip.confidence_score * 100.0,
        odds,
        tip.analysis.risk_level.label()
    )
}
