//! Game configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::RulesError;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// The constants a game is played with.
///
/// `#[serde(default)]` lets a config file override only the fields it
/// cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells on the track. Index `track_len` is the finish.
    pub track_len: usize,

    /// Players that must connect before the game starts.
    pub players: usize,

    /// Pawns owned by each player.
    pub pawns_per_player: usize,

    /// Chance that any one cell is generated as an obstacle.
    pub obstacle_probability: f64,

    /// Faces on each of the two dice (values `1..=dice_faces`).
    pub dice_faces: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            track_len: 40,
            players: 4,
            pawns_per_player: 4,
            obstacle_probability: 0.10,
            dice_faces: 6,
        }
    }
}

impl GameConfig {
    /// Checks that the config describes a game that can be finished.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.track_len == 0 {
            return Err(invalid("track_len must be at least 1"));
        }
        if self.players == 0 {
            return Err(invalid("players must be at least 1"));
        }
        if self.pawns_per_player == 0 {
            return Err(invalid("pawns_per_player must be at least 1"));
        }
        if self.dice_faces == 0 {
            return Err(invalid("dice_faces must be at least 1"));
        }
        // At 1.0 every cell is blocked and no pawn can ever enter.
        if !(0.0..1.0).contains(&self.obstacle_probability) {
            return Err(invalid("obstacle_probability must be in [0, 1)"));
        }
        Ok(())
    }

    /// Every delta two dice can produce: `a - b` at the low end, `a + b`
    /// at the high end.
    pub fn delta_range(&self) -> RangeInclusive<i32> {
        let faces = i32::from(self.dice_faces);
        (1 - faces)..=(2 * faces)
    }
}

fn invalid(reason: &str) -> RulesError {
    RulesError::InvalidConfig(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config.track_len, 40);
        assert_eq!(config.players, 4);
        assert_eq!(config.pawns_per_player, 4);
        assert_eq!(config.dice_faces, 6);
        assert!((config.obstacle_probability - 0.10).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delta_range_for_six_sided_dice() {
        let range = GameConfig::default().delta_range();
        assert_eq!(*range.start(), -5);
        assert_eq!(*range.end(), 12);
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let zero_track = GameConfig {
            track_len: 0,
            ..GameConfig::default()
        };
        assert!(zero_track.validate().is_err());

        let zero_players = GameConfig {
            players: 0,
            ..GameConfig::default()
        };
        assert!(zero_players.validate().is_err());

        let zero_pawns = GameConfig {
            pawns_per_player: 0,
            ..GameConfig::default()
        };
        assert!(zero_pawns.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_full_obstacle_board() {
        for p in [1.0, -0.1, f64::NAN] {
            let config = GameConfig {
                obstacle_probability: p,
                ..GameConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(RulesError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "players": 2 }"#).unwrap();
        assert_eq!(config.players, 2);
        assert_eq!(config.track_len, 40);
    }
}
