//! Server configuration.

use std::path::Path;
use std::time::Duration;

use parchis_rules::GameConfig;
use parchis_transport::DEFAULT_MAX_LINE_LENGTH;
use serde::{Deserialize, Serialize};

use crate::ParchisError;

// ---------------------------------------------------------------------------
// TimeoutPolicy
// ---------------------------------------------------------------------------

/// What happens to a player who does not answer `Your turn` in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// The turn is lost; the player stays in the game.
    Skip,
    /// The player is removed from the game.
    #[default]
    Forfeit,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Everything the server reads at startup.
///
/// Loaded from TOML; missing keys keep their defaults:
///
/// ```toml
/// bind_addr = "0.0.0.0:9000"
/// turn_timeout_ms = 5000
/// timeout_policy = "skip"
///
/// [game]
/// players = 2
/// obstacle_probability = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// How long a player may think. `0` waits forever.
    pub turn_timeout_ms: u64,

    pub timeout_policy: TimeoutPolicy,

    /// Longest line accepted from a player, in bytes.
    pub max_line_length: usize,

    /// Seeds board generation. `None` draws from the OS.
    pub seed: Option<u64>,

    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            turn_timeout_ms: 30_000,
            timeout_policy: TimeoutPolicy::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            seed: None,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ParchisError> {
        let config: Self = toml::from_str(s)?;
        config.game.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParchisError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The turn timeout, or `None` for no limit.
    pub fn turn_timeout(&self) -> Option<Duration> {
        match self.turn_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}
