//! SQLite persistence for users, games, their move logs and the
//! rejected-request counter.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{
    ActiveFilter, FinishedFilter, GameRow, MoveRow, NewGame, NewMove, NewUser, Page, StoredGame,
    User,
};
pub use repository::{DEFAULT_PAGE_SIZE, GameRepository};
