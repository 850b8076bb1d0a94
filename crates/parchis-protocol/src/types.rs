//! Core protocol types for the Parchis wire format.
//!
//! Every type here can be written as one line of text (via `Display`) and
//! read back (via `FromStr`), and also derives serde for the JSON codec.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A player's stable identity for the whole game.
///
/// Players are numbered in the order the server accepted them, starting
/// at 0. The newtype keeps ids from being mixed up with pawn indices,
/// which are also small integers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// `tracing::info!(%player_id, ...)` prints "P-2".
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(PlayerId).map_err(|_| {
            ProtocolError::InvalidMessage(format!("bad player id {s:?}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Board vocabulary
// ---------------------------------------------------------------------------

/// One cell of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Normal,
    /// A pawn may pass over an obstacle but never land on it.
    Obstacle,
}

impl Cell {
    /// The character used for this cell in the text protocol.
    pub fn symbol(self) -> char {
        match self {
            Self::Normal => '.',
            Self::Obstacle => '#',
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = ProtocolError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(Self::Normal),
            '#' => Ok(Self::Obstacle),
            other => Err(ProtocolError::InvalidMessage(format!(
                "bad board cell {other:?}"
            ))),
        }
    }
}

/// Where a pawn currently is.
///
/// Text form: `S` (at start), `F` (finished) or the decimal cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Position {
    /// Not on the track yet.
    #[default]
    AtStart,
    /// On the track at the given cell index.
    Cell(usize),
    /// Past the last cell. Terminal.
    Finished,
}

impl Position {
    /// Returns `true` once the pawn has reached the finish.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtStart => f.write_str("S"),
            Self::Cell(i) => write!(f, "{i}"),
            Self::Finished => f.write_str("F"),
        }
    }
}

impl FromStr for Position {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::AtStart),
            "F" => Ok(Self::Finished),
            n => n.parse().map(Self::Cell).map_err(|_| {
                ProtocolError::InvalidMessage(format!("bad position {n:?}"))
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// Everything the server can say to a player.
///
/// `#[serde(tag = "type")]` gives the JSON codec internally tagged objects
/// such as `{ "type": "Skipped", "player": 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent once after the connection is accepted.
    Welcome { player: PlayerId },

    /// Board layout and the prompted player's own pawns. Always sent right
    /// before [`ServerMessage::YourTurn`] so the agent decides on real data.
    State {
        board: Vec<Cell>,
        pawns: Vec<Position>,
    },

    /// The receiving player holds the turn and must answer with exactly one
    /// [`ClientMessage`].
    YourTurn,

    /// Broadcast after a move was accepted.
    Moved {
        player: PlayerId,
        pawn: usize,
        delta: i32,
        position: Position,
    },

    /// The mover's last answer was not applied; the turn is lost.
    Rejected { reason: String },

    /// Broadcast when a player had no legal move.
    Skipped { player: PlayerId },

    /// Broadcast when a player was removed from the game.
    Forfeit { player: PlayerId, reason: String },

    /// Terminal. `winner` is `None` when nobody finished.
    GameOver { winner: Option<PlayerId> },
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome { player } => write!(f, "Welcome {}", player.0),
            Self::State { board, pawns } => {
                f.write_str("State ")?;
                for cell in board {
                    write!(f, "{}", cell.symbol())?;
                }
                for pawn in pawns {
                    write!(f, " {pawn}")?;
                }
                Ok(())
            }
            Self::YourTurn => f.write_str("Your turn"),
            Self::Moved {
                player,
                pawn,
                delta,
                position,
            } => write!(f, "Moved {} {pawn} {delta} {position}", player.0),
            Self::Rejected { reason } => {
                write!(f, "Rejected {}", single_line(reason))
            }
            Self::Skipped { player } => write!(f, "Skipped {}", player.0),
            Self::Forfeit { player, reason } => {
                write!(f, "Forfeit {} {}", player.0, single_line(reason))
            }
            Self::GameOver { winner: Some(w) } => {
                write!(f, "Game Over. Winner: {}", w.0)
            }
            Self::GameOver { winner: None } => f.write_str("Game Over"),
        }
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        // Multi-word keywords first.
        if line == "Your turn" {
            return Ok(Self::YourTurn);
        }
        if line == "Game Over" {
            return Ok(Self::GameOver { winner: None });
        }
        if let Some(rest) = line.strip_prefix("Game Over. Winner:") {
            return Ok(Self::GameOver {
                winner: Some(rest.trim().parse()?),
            });
        }

        let (keyword, rest) = split_keyword(line);
        match keyword {
            "Welcome" => {
                let mut args = Args::new("Welcome", rest);
                let player = args.next("player")?;
                args.finish()?;
                Ok(Self::Welcome { player })
            }
            "State" => {
                let mut tokens = rest.split_whitespace();
                let board = tokens
                    .next()
                    .ok_or_else(|| {
                        ProtocolError::InvalidMessage("State: missing board".into())
                    })?
                    .chars()
                    .map(Cell::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                let pawns = tokens
                    .map(str::parse)
                    .collect::<Result<Vec<Position>, _>>()?;
                Ok(Self::State { board, pawns })
            }
            "Moved" => {
                let mut args = Args::new("Moved", rest);
                let msg = Self::Moved {
                    player: args.next("player")?,
                    pawn: args.next("pawn")?,
                    delta: args.next("delta")?,
                    position: args.next("position")?,
                };
                args.finish()?;
                Ok(msg)
            }
            "Rejected" => Ok(Self::Rejected {
                reason: rest.to_string(),
            }),
            "Skipped" => {
                let mut args = Args::new("Skipped", rest);
                let player = args.next("player")?;
                args.finish()?;
                Ok(Self::Skipped { player })
            }
            "Forfeit" => {
                let (player, reason) = split_keyword(rest);
                Ok(Self::Forfeit {
                    player: player.parse()?,
                    reason: reason.to_string(),
                })
            }
            _ => Err(ProtocolError::UnknownMessage(line.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// A player's answer to [`ServerMessage::YourTurn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Advance `selected_pawn` by `delta`. Only that pawn moves.
    Move {
        #[serde(rename = "selectedPawn")]
        selected_pawn: usize,
        delta: i32,
    },

    /// No pawn can legally move this turn.
    Pass,
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move {
                selected_pawn,
                delta,
            } => write!(f, "Move {selected_pawn} {delta}"),
            Self::Pass => f.write_str("Pass"),
        }
    }
}

impl FromStr for ClientMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, rest) = split_keyword(line);
        match keyword {
            "Move" => {
                let mut args = Args::new("Move", rest);
                let msg = Self::Move {
                    selected_pawn: args.next("selected pawn")?,
                    delta: args.next("delta")?,
                };
                args.finish()?;
                Ok(msg)
            }
            "Pass" if rest.is_empty() => Ok(Self::Pass),
            _ => Err(ProtocolError::UnknownMessage(line.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Splits `"Keyword rest of line"` into `("Keyword", "rest of line")`.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim_start()),
        None => (line, ""),
    }
}

/// Free-form text must not break the one-message-per-line framing.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Positional, whitespace-separated arguments of a single message.
struct Args<'a> {
    keyword: &'static str,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(keyword: &'static str, rest: &'a str) -> Self {
        Self {
            keyword,
            tokens: rest.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, field: &str) -> Result<T, ProtocolError> {
        let token = self.tokens.next().ok_or_else(|| {
            ProtocolError::InvalidMessage(format!(
                "{}: missing {field}",
                self.keyword
            ))
        })?;
        token.parse().map_err(|_| {
            ProtocolError::InvalidMessage(format!(
                "{}: bad {field} {token:?}",
                self.keyword
            ))
        })
    }

    fn finish(mut self) -> Result<(), ProtocolError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(extra) => Err(ProtocolError::InvalidMessage(format!(
                "{}: unexpected {extra:?}",
                self.keyword
            ))),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON tests pin the serde attributes; the text tests pin the line
    //! format that agents written in any language have to speak.

    use super::*;

    // =====================================================================
    // Identity and board vocabulary
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_position_text_forms() {
        assert_eq!(Position::AtStart.to_string(), "S");
        assert_eq!(Position::Finished.to_string(), "F");
        assert_eq!(Position::Cell(12).to_string(), "12");

        assert_eq!("S".parse::<Position>().unwrap(), Position::AtStart);
        assert_eq!("F".parse::<Position>().unwrap(), Position::Finished);
        assert_eq!("0".parse::<Position>().unwrap(), Position::Cell(0));
    }

    #[test]
    fn test_position_rejects_negative_and_garbage() {
        assert!("-1".parse::<Position>().is_err());
        assert!("X".parse::<Position>().is_err());
    }

    #[test]
    fn test_cell_symbols() {
        assert_eq!(Cell::Normal.symbol(), '.');
        assert_eq!(Cell::Obstacle.symbol(), '#');
        assert_eq!(Cell::try_from('#').unwrap(), Cell::Obstacle);
        assert!(Cell::try_from('x').is_err());
    }

    // =====================================================================
    // ServerMessage: text
    // =====================================================================

    #[test]
    fn test_your_turn_is_the_literal_prompt() {
        assert_eq!(ServerMessage::YourTurn.to_string(), "Your turn");
        assert_eq!(
            "Your turn".parse::<ServerMessage>().unwrap(),
            ServerMessage::YourTurn
        );
    }

    #[test]
    fn test_game_over_without_winner_is_literal() {
        let msg = ServerMessage::GameOver { winner: None };
        assert_eq!(msg.to_string(), "Game Over");
        assert_eq!("Game Over".parse::<ServerMessage>().unwrap(), msg);
    }

    #[test]
    fn test_game_over_names_the_winner() {
        let msg = ServerMessage::GameOver {
            winner: Some(PlayerId(2)),
        };
        assert_eq!(msg.to_string(), "Game Over. Winner: 2");
        assert_eq!(
            "Game Over. Winner: 2".parse::<ServerMessage>().unwrap(),
            msg
        );
    }

    #[test]
    fn test_state_line_format() {
        let msg = ServerMessage::State {
            board: vec![Cell::Normal, Cell::Obstacle, Cell::Normal],
            pawns: vec![
                Position::AtStart,
                Position::Cell(2),
                Position::Finished,
            ],
        };
        assert_eq!(msg.to_string(), "State .#. S 2 F");
        assert_eq!("State .#. S 2 F".parse::<ServerMessage>().unwrap(), msg);
    }

    #[test]
    fn test_state_without_board_is_invalid() {
        let err = "State".parse::<ServerMessage>().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessage(_)));
    }

    #[test]
    fn test_moved_line_format() {
        let msg = ServerMessage::Moved {
            player: PlayerId(1),
            pawn: 3,
            delta: -4,
            position: Position::Cell(0),
        };
        assert_eq!(msg.to_string(), "Moved 1 3 -4 0");
        assert_eq!("Moved 1 3 -4 0".parse::<ServerMessage>().unwrap(), msg);
    }

    #[test]
    fn test_forfeit_keeps_free_text_reason() {
        let msg = ServerMessage::Forfeit {
            player: PlayerId(0),
            reason: "connection closed".into(),
        };
        assert_eq!(msg.to_string(), "Forfeit 0 connection closed");
        assert_eq!(
            "Forfeit 0 connection closed".parse::<ServerMessage>().unwrap(),
            msg
        );
    }

    #[test]
    fn test_reason_newlines_are_flattened() {
        let msg = ServerMessage::Rejected {
            reason: "first\nsecond".into(),
        };
        assert_eq!(msg.to_string(), "Rejected first second");
    }

    #[test]
    fn test_welcome_rejects_extra_arguments() {
        assert!("Welcome 1 2".parse::<ServerMessage>().is_err());
        assert_eq!(
            "Welcome 1".parse::<ServerMessage>().unwrap(),
            ServerMessage::Welcome {
                player: PlayerId(1)
            }
        );
    }

    #[test]
    fn test_unknown_server_line() {
        let err = "Hello there".parse::<ServerMessage>().unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessage(_)));
    }

    // =====================================================================
    // ClientMessage: text
    // =====================================================================

    #[test]
    fn test_move_carries_pawn_and_delta() {
        let msg = ClientMessage::Move {
            selected_pawn: 2,
            delta: -3,
        };
        assert_eq!(msg.to_string(), "Move 2 -3");
        assert_eq!("Move 2 -3".parse::<ClientMessage>().unwrap(), msg);
    }

    #[test]
    fn test_bare_number_is_not_a_move() {
        // The pawn index and the delta are never conflated into one value.
        let err = "5".parse::<ClientMessage>().unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessage(_)));
    }

    #[test]
    fn test_move_with_missing_delta() {
        let err = "Move 2".parse::<ClientMessage>().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessage(_)));
    }

    #[test]
    fn test_move_with_non_numeric_fields() {
        assert!("Move two 3".parse::<ClientMessage>().is_err());
        assert!("Move -1 3".parse::<ClientMessage>().is_err());
    }

    #[test]
    fn test_pass_is_case_sensitive_and_bare() {
        assert_eq!("Pass".parse::<ClientMessage>().unwrap(), ClientMessage::Pass);
        assert_eq!(
            "  Pass  ".parse::<ClientMessage>().unwrap(),
            ClientMessage::Pass
        );
        assert!("pass".parse::<ClientMessage>().is_err());
        assert!("Pass now".parse::<ClientMessage>().is_err());
    }

    // =====================================================================
    // JSON shapes
    // =====================================================================

    #[test]
    fn test_move_json_uses_selected_pawn_field() {
        let msg = ClientMessage::Move {
            selected_pawn: 1,
            delta: 7,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "Move");
        assert_eq!(json["selectedPawn"], 1);
        assert_eq!(json["delta"], 7);
    }

    #[test]
    fn test_game_over_json_null_winner() {
        let msg = ServerMessage::GameOver { winner: None };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "GameOver");
        assert!(json["winner"].is_null());
    }

    #[test]
    fn test_state_json_shape() {
        let msg = ServerMessage::State {
            board: vec![Cell::Obstacle],
            pawns: vec![Position::Cell(4), Position::Finished],
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "State");
        assert_eq!(json["board"], serde_json::json!(["Obstacle"]));
        assert_eq!(json["pawns"], serde_json::json!([{ "Cell": 4 }, "Finished"]));
    }

    #[test]
    fn test_unknown_json_type_returns_error() {
        let unknown = r#"{"type": "Teleport", "to": 39}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
