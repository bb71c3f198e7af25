//! Win detection.

use super::super::{CAT_START, MAX_CELL, MIN_CELL, Pieces, Role, Winner};
use super::validate_move;
use tracing::instrument;

/// True if the mouse has at least one legal move on this layout.
///
/// Probes every cell on the board as a target. The board is small enough
/// that no cached reachability is kept.
pub fn has_escape_route(pieces: &Pieces) -> bool {
    let occupied = pieces.occupied();
    (MIN_CELL..=MAX_CELL)
        .any(|candidate| validate_move(&occupied, Role::Mouse, pieces.mouse(), candidate).is_ok())
}

/// Decides whether the layout has a winner.
///
/// - The mouse wins once it stands on a cat starting cell.
/// - The cats win when it is the mouse's turn and the mouse cannot move.
///
/// Cats are never checked for being stuck: with four pieces they always
/// have a forward step until the mouse is trapped or escapes.
#[instrument]
pub fn check_winner(pieces: &Pieces, cats_turn: bool) -> Option<Winner> {
    if CAT_START.contains(&pieces.mouse()) {
        return Some(Winner::Mouse);
    }

    if !cats_turn && !has_escape_route(pieces) {
        return Some(Winner::Cat);
    }

    None
}
