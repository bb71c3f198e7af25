//! First-class move records.
//!
//! A [`Move`] is only produced by a successful
//! [`Game::apply_move`](crate::Game::apply_move). It is an immutable fact
//! that callers persist next to the updated game and replay later.

use super::{Cell, PlayerId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A piece moved from `origin` to `target` by `player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    player: PlayerId,
    role: Role,
    origin: Cell,
    target: Cell,
    played_at: DateTime<Utc>,
}

impl Move {
    /// Rebuilds a move record, e.g. when loading a stored log.
    pub fn new(
        player: PlayerId,
        role: Role,
        origin: Cell,
        target: Cell,
        played_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player,
            role,
            origin,
            target,
            played_at,
        }
    }

    /// Player who made the move.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Side the player was playing.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Cell the piece left.
    pub fn origin(&self) -> Cell {
        self.origin
    }

    /// Cell the piece landed on.
    pub fn target(&self) -> Cell {
        self.target
    }

    /// When the move was applied.
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (player {}): {} -> {}",
            self.role, self.player, self.origin, self.target
        )
    }
}
