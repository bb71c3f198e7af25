//! Mouse & Cat rules engine.
//!
//! Four cats and one mouse move diagonally over the dark squares of an
//! 8×8 board. Cats only move forward (down the board); the mouse moves in
//! any diagonal direction. The mouse wins by reaching the cats' starting
//! row, the cats win by leaving the mouse with no legal move.
//!
//! # Architecture
//!
//! - **Board**: cell geometry and piece layout
//! - **Rules**: move validation and win detection (pure functions)
//! - **Game**: the aggregate root and its single mutation entry point
//! - **History**: append-only move log and replay
//! - **Invariants / Contracts**: properties checked after every applied move
//!
//! The engine performs no I/O and never reads the clock; callers pass the
//! timestamp of a move and persist the results themselves.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use mouse_cat_rules::{Game, GameStatus};
//!
//! let mut game = Game::new(1);
//! game.join(2).expect("seat is free");
//! assert!(matches!(game.status(), GameStatus::Active { .. }));
//!
//! let mv = game.apply_move(1, 0, 9, Utc::now()).expect("legal cat move");
//! assert_eq!(mv.target().index(), 9);
//! assert!(!game.cats_turn());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod contracts;
mod error;
mod game;
mod history;
mod invariants;
mod replay;
mod rules;
mod types;

pub use action::Move;
pub use board::{
    BOARD_SIZE, Board, CAT_START, Cell, MAX_CELL, MIN_CELL, MOUSE_START, Pieces, col_of,
    is_dark_cell, render_board, row_of, validate_position,
};
pub use contracts::{Contract, MoveContract, MoveRequest, Piece};
pub use error::MoveError;
pub use game::{Game, GameRecord, StatusKind};
pub use history::MoveLog;
pub use invariants::{
    AlternatingTurnInvariant, DarkCellsInvariant, GameInvariants, Invariant, InvariantSet,
    InvariantViolation, NoOverlapInvariant, StatusMatchesWinnerInvariant,
};
pub use replay::{Replay, ReplayFrame};
pub use rules::{check_winner, has_escape_route, validate_move};
pub use types::{GameId, GameStatus, PlayerId, Role, Winner};
