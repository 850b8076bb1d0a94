//! Plays one game as an automated agent.
//!
//! Usage: `parchis-client [config.toml]`, with `PARCHIS_CONFIG` as the
//! fallback path.

use parchis_agent::{AgentClient, ClientConfig, ClientError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PARCHIS_CONFIG").ok())
    {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    let outcome = AgentClient::connect(&config).await?.run().await?;
    match (outcome.me, outcome.winner) {
        (Some(me), Some(winner)) if me == winner => tracing::info!(%me, "we won"),
        (me, Some(winner)) => tracing::info!(me = ?me, %winner, "we lost"),
        (me, None) => tracing::info!(me = ?me, "game ended without a winner"),
    }
    Ok(())
}
