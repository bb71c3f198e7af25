//! Step-through replay of a recorded game.

use super::{Board, Move, Pieces, render_board};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One position in a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Number of moves applied to reach this position.
    pub step: usize,
    /// Board after `step` moves.
    pub board: Board,
    /// Move that produced this position, `None` at the start.
    pub last_move: Option<Move>,
    /// True if an earlier position exists.
    pub has_previous: bool,
    /// True if a later position exists.
    pub has_next: bool,
}

/// Replays recorded moves from the starting layout.
///
/// Recorded moves were validated when they were played, so they are
/// applied here as-is: each move carries its piece from origin to target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    moves: Vec<Move>,
}

impl Replay {
    /// Creates a replay over `moves`, oldest first.
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Number of moves; valid steps are `0..=len()`.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True if no moves were recorded.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Position after `step` moves. Steps past the end clamp to the last one.
    #[instrument(skip(self), fields(moves = self.moves.len()))]
    pub fn frame(&self, step: usize) -> ReplayFrame {
        let step = step.min(self.moves.len());
        let mut pieces = Pieces::INITIAL;

        for mv in &self.moves[..step] {
            let origin = mv.origin().index();
            if let Some(index) = pieces.cat_at(origin) {
                pieces.set_cat(index, mv.target());
            } else if pieces.mouse_at(origin) {
                pieces.set_mouse(mv.target());
            } else {
                debug!(%mv, "Recorded move has no piece on its origin, skipped");
            }
        }

        ReplayFrame {
            step,
            board: render_board(&pieces),
            last_move: step.checked_sub(1).map(|i| self.moves[i]),
            has_previous: step > 0,
            has_next: step < self.moves.len(),
        }
    }

    /// Every position from the start to the end, `len() + 1` frames.
    pub fn frames(&self) -> impl Iterator<Item = ReplayFrame> + '_ {
        (0..=self.moves.len()).map(|step| self.frame(step))
    }
}
