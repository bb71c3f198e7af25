//! Rejections produced by the rules engine.

use super::{PlayerId, Role};

/// Error that can occur when validating or applying a move.
///
/// Every variant is an expected outcome of bad input; none of them
/// indicate a fault in the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell is outside the board or is not a dark square.
    #[display("Invalid cell {}: must be a dark square in 0..=63", _0)]
    InvalidCell(i32),

    /// The move breaks adjacency, direction or occupancy rules.
    #[display("Move not allowed: {} -> {}", origin, target)]
    InvalidMove {
        /// Requested origin cell.
        origin: i32,
        /// Requested target cell.
        target: i32,
    },

    /// The game cannot be joined (already started, finished, or own game).
    #[display("Game is not available to join")]
    GameNotAvailable,

    /// The game does not accept moves (waiting for a player, or finished).
    #[display("Game is not active")]
    GameNotActive,

    /// The player is not seated in this game.
    #[display("Player {} is not a participant in this game", _0)]
    NotAParticipant(PlayerId),

    /// The player is seated but it is the other side's turn.
    #[display("Not the {}'s turn", _0)]
    NotYourTurn(Role),

    /// The player has no piece on the origin cell.
    #[display("No piece of yours on cell {}", _0)]
    NotYourPiece(i32),

    /// A postcondition failed after a move was applied.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// Short machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::InvalidCell(_) => "invalid_cell",
            MoveError::InvalidMove { .. } => "invalid_move",
            MoveError::GameNotAvailable => "game_not_available",
            MoveError::GameNotActive => "game_not_active",
            MoveError::NotAParticipant(_) => "not_a_participant",
            MoveError::NotYourTurn(_) => "not_your_turn",
            MoveError::NotYourPiece(_) => "not_your_piece",
            MoveError::InvariantViolation(_) => "invariant_violation",
        }
    }
}
