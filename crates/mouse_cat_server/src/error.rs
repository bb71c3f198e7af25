//! Errors raised by game operations.

use crate::db::DbError;
use mouse_cat_rules::{GameId, MoveError, PlayerId};

/// Failure of a game operation: a rule rejection, a missing record, or storage.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum GameServiceError {
    /// The rules engine refused the operation.
    #[display("{}", _0)]
    Rules(MoveError),

    /// Storage failed.
    #[display("{}", _0)]
    Db(DbError),

    /// No game with this id.
    #[from(ignore)]
    #[display("Game {} not found", _0)]
    GameNotFound(GameId),

    /// No user with this id.
    #[from(ignore)]
    #[display("Player {} not found", _0)]
    PlayerNotFound(PlayerId),

    /// No user with this name.
    #[from(ignore)]
    #[display("User '{}' not found", _0)]
    UserNotFound(String),

    /// The username is already registered.
    #[from(ignore)]
    #[display("Username '{}' is already taken", _0)]
    UsernameTaken(String),

    /// Only finished games can be replayed.
    #[from(ignore)]
    #[display("Game {} is not finished and cannot be replayed", _0)]
    ReplayUnavailable(GameId),

    /// A worker task died before producing a result.
    #[from(ignore)]
    #[display("Internal error: {}", _0)]
    Internal(String),
}

impl std::error::Error for GameServiceError {}

impl From<diesel::result::Error> for GameServiceError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(DbError::from(err))
    }
}

impl GameServiceError {
    /// Short machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rules(e) => e.kind(),
            Self::Db(_) => "database",
            Self::GameNotFound(_) => "game_not_found",
            Self::PlayerNotFound(_) => "player_not_found",
            Self::UserNotFound(_) => "user_not_found",
            Self::UsernameTaken(_) => "username_taken",
            Self::ReplayUnavailable(_) => "replay_unavailable",
            Self::Internal(_) => "internal",
        }
    }

    /// True if the request was refused, as opposed to the server failing.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::Db(_) | Self::Internal(_) | Self::Rules(MoveError::InvariantViolation(_))
        )
    }
}
