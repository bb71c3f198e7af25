//! Game rules for cat and mouse.
//!
//! Pure functions over piece positions. Nothing here mutates a game; the
//! win detector probes the move validator speculatively.

pub mod movement;
pub mod win;

pub use movement::validate_move;
pub use win::{check_winner, has_escape_route};
