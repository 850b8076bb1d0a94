//! Client configuration.

use std::path::Path;

use parchis_transport::DEFAULT_MAX_LINE_LENGTH;
use serde::{Deserialize, Serialize};

use crate::ClientError;

/// Settings for one agent process.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `host:port` of the game server.
    pub server_addr: String,

    /// Seeds the dice. `None` draws from the OS.
    pub seed: Option<u64>,

    /// Longest line accepted from the server, in bytes.
    pub max_line_length: usize,

    /// Faces on each die. Must match the server's game config.
    pub dice_faces: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            seed: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            dice_faces: 6,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
