//! Append-only move log.

use super::{Move, MoveError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Ordered record of the moves applied to one game, oldest first.
///
/// Sequence order and timestamp order always agree: a move stamped
/// earlier than the last recorded one is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from stored moves.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] if timestamps go backwards.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn from_moves(moves: Vec<Move>) -> Result<Self, MoveError> {
        let mut log = Self::new();
        for mv in moves {
            log.append(mv)?;
        }
        Ok(log)
    }

    /// Appends a move and returns its sequence number (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] if `mv` is older than the
    /// last recorded move.
    #[instrument(skip(self))]
    pub fn append(&mut self, mv: Move) -> Result<usize, MoveError> {
        if let Some(last) = self.moves.last()
            && mv.played_at() < last.played_at()
        {
            return Err(MoveError::InvariantViolation(format!(
                "move at {} recorded after move at {}",
                mv.played_at(),
                last.played_at()
            )));
        }
        self.moves.push(mv);
        debug!(sequence = self.moves.len() - 1, "Move appended");
        Ok(self.moves.len() - 1)
    }

    /// All moves, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Most recent move.
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True if nothing has been played.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
