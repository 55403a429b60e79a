use anyhow::{Context, Result};
use smart_hub_tips::build_repository;
use smart_hub_tips::config::Config;
use smart_hub_tips::web::{router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    tracing_subscriber::fmt::init();

    let repository = build_repository(&config)?;
    let app = router(AppState::new(repository));

    println!("\nStarting web server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
