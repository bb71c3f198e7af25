//! Mouse & Cat game server.
//!
//! Persists games played with [`mouse_cat_rules`] in SQLite and serves
//! them over a JSON HTTP API.
//!
//! # Architecture
//!
//! - **db**: diesel models and the [`GameRepository`]; every move is read,
//!   checked and written in one immediate transaction
//! - **server**: axum router and handlers
//! - **config**: layered [`ServerConfig`]

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod error;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use db::{
    ActiveFilter, DEFAULT_PAGE_SIZE, DbError, FinishedFilter, GameRepository, GameRow, MoveRow,
    NewGame, NewMove, NewUser, Page, StoredGame, User,
};
pub use error::GameServiceError;
pub use server::{
    ActiveQuery, AppState, CounterResponse, CreateUserRequest, ErrorBody, FinishedQuery, GameView,
    JoinableQuery, MoveRequestBody, MoveResponse, MoveStatus, PlayerRequest, ReplayQuery,
    TurnQuery, TurnResponse, WinnerResponse, router,
};
