//! Status invariant: the lifecycle status agrees with the board.

use super::super::{Game, GameStatus, Pieces, check_winner};
use super::Invariant;

/// Invariant: status reflects the winner state of the layout.
///
/// - `Created` games hold the canonical layout with cats to move.
/// - `Active` games have no winner.
/// - `Finished` games carry exactly the winner the layout implies.
pub struct StatusMatchesWinnerInvariant;

impl Invariant<Game> for StatusMatchesWinnerInvariant {
    fn holds(game: &Game) -> bool {
        let derived = check_winner(game.pieces(), game.cats_turn());
        match game.status() {
            GameStatus::Created => *game.pieces() == Pieces::INITIAL && game.cats_turn(),
            GameStatus::Active { .. } => derived.is_none(),
            GameStatus::Finished { winner, .. } => derived == Some(*winner),
        }
    }

    fn description() -> &'static str {
        "Game status matches the winner derived from the board"
    }
}
