//! Dark cells invariant: every piece stands on a dark square.

use super::super::{Game, is_dark_cell};
use super::Invariant;

/// Invariant: all five pieces occupy dark cells in 0..=63.
pub struct DarkCellsInvariant;

impl Invariant<Game> for DarkCellsInvariant {
    fn holds(game: &Game) -> bool {
        game.pieces()
            .occupied()
            .iter()
            .all(|cell| is_dark_cell(cell.index()))
    }

    fn description() -> &'static str {
        "Every piece stands on a dark cell"
    }
}
