//! No-overlap invariant: pieces never share a cell.

use super::super::Game;
use super::Invariant;

/// Invariant: the five piece positions are pairwise distinct.
pub struct NoOverlapInvariant;

impl Invariant<Game> for NoOverlapInvariant {
    fn holds(game: &Game) -> bool {
        let occupied = game.pieces().occupied();
        occupied
            .iter()
            .enumerate()
            .all(|(i, a)| occupied[i + 1..].iter().all(|b| a != b))
    }

    fn description() -> &'static str {
        "No two pieces share a cell"
    }
}
