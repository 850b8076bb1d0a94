//! Waits for players, plays one game, exits.
//!
//! Usage: `parchis-server [config.toml]`. Without an argument the path is
//! read from `PARCHIS_CONFIG`; without either the defaults are used.

use parchis_server::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ParchisError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match config_path() {
        Some(path) => {
            tracing::info!(%path, "loading config");
            ServerConfig::load(&path)?
        }
        None => ServerConfig::default(),
    };

    let summary = ParchisServer::builder()
        .config(config)
        .build()
        .await?
        .run()
        .await?;

    match summary.outcome {
        GameOutcome::Won(winner) => {
            tracing::info!(%winner, turns = summary.turns, "game won");
        }
        GameOutcome::Abandoned => {
            tracing::info!(turns = summary.turns, "game abandoned");
        }
    }
    Ok(())
}

fn config_path() -> Option<String> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PARCHIS_CONFIG").ok())
}
