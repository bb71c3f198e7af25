//! Core domain types for the cat-and-mouse game.

use serde::{Deserialize, Serialize};

/// Identity of a participant, as assigned by whoever stores users.
pub type PlayerId = i32;

/// Identity of a stored game.
pub type GameId = i32;

/// Which side a participant plays.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Controls the four cats. Moves first.
    #[display("cat")]
    Cat,
    /// Controls the mouse.
    #[display("mouse")]
    Mouse,
}

impl Role {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Role::Cat => Role::Mouse,
            Role::Mouse => Role::Cat,
        }
    }

    /// The role that moves next for the given turn flag.
    pub fn from_cats_turn(cats_turn: bool) -> Self {
        if cats_turn { Role::Cat } else { Role::Mouse }
    }
}

/// The side that won a finished game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    /// The mouse was left without a legal move.
    #[display("cats win")]
    Cat,
    /// The mouse reached the cats' starting row.
    #[display("mouse wins")]
    Mouse,
}

impl Winner {
    /// The role that scored this win.
    pub fn role(self) -> Role {
        match self {
            Winner::Cat => Role::Cat,
            Winner::Mouse => Role::Mouse,
        }
    }
}

/// Lifecycle of a game.
///
/// The mouse owner lives inside the variants that require one, so an
/// active game without a second player, or a finished game without a
/// winner, cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for a mouse player.
    Created,
    /// Both seats filled; moves are accepted.
    Active {
        /// Player controlling the mouse.
        mouse_owner: PlayerId,
    },
    /// Terminal. No further moves are accepted.
    Finished {
        /// Player that controlled the mouse.
        mouse_owner: PlayerId,
        /// Side that won.
        winner: Winner,
    },
}

impl GameStatus {
    /// Returns the mouse owner if the seat has been filled.
    pub fn mouse_owner(&self) -> Option<PlayerId> {
        match self {
            GameStatus::Created => None,
            GameStatus::Active { mouse_owner } | GameStatus::Finished { mouse_owner, .. } => {
                Some(*mouse_owner)
            }
        }
    }

    /// Returns the winner of a finished game.
    pub fn winner(&self) -> Option<Winner> {
        match self {
            GameStatus::Finished { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// True while moves are accepted.
    pub fn is_active(&self) -> bool {
        matches!(self, GameStatus::Active { .. })
    }

    /// True once a winner has been recorded.
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Finished { .. })
    }
}
