//! Contract-based validation for moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! `{P(game, request)} apply_move {Q(before, after)}`.

use super::invariants::{GameInvariants, InvariantSet, describe};
use super::{Cell, Game, MoveError, PlayerId, Role, validate_move};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// What the preconditions established, handed to the transition.
    type Checked;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<Self::Checked, MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// A player's request to move the piece on `origin` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Player asking to move.
    pub player: PlayerId,
    /// Cell of the piece to move.
    pub origin: i32,
    /// Destination cell.
    pub target: i32,
}

impl MoveRequest {
    /// Creates a new request.
    pub fn new(player: PlayerId, origin: i32, target: i32) -> Self {
        Self {
            player,
            origin,
            target,
        }
    }
}

/// Which of the five pieces a move refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    /// Cat by index into [`Pieces::cats`](crate::Pieces::cats).
    Cat(usize),
    /// The mouse.
    Mouse,
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game accepts moves.
pub struct GameIsActive;

impl GameIsActive {
    #[instrument(skip(game))]
    pub fn check(game: &Game) -> Result<(), MoveError> {
        if game.status().is_active() {
            Ok(())
        } else {
            Err(MoveError::GameNotActive)
        }
    }
}

/// Precondition: the player is seated, and it is their side's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    #[instrument(skip(game))]
    pub fn check(req: &MoveRequest, game: &Game) -> Result<Role, MoveError> {
        let role = game
            .role_of(req.player)
            .ok_or(MoveError::NotAParticipant(req.player))?;
        if role != game.to_move() {
            return Err(MoveError::NotYourTurn(role));
        }
        Ok(role)
    }
}

/// Precondition: the player has a piece on the origin cell.
pub struct OwnsPiece;

impl OwnsPiece {
    #[instrument(skip(game))]
    pub fn check(req: &MoveRequest, role: Role, game: &Game) -> Result<(Piece, Cell), MoveError> {
        let pieces = game.pieces();
        let piece = match role {
            Role::Cat => pieces.cat_at(req.origin).map(Piece::Cat),
            Role::Mouse => pieces.mouse_at(req.origin).then_some(Piece::Mouse),
        };
        let piece = piece.ok_or(MoveError::NotYourPiece(req.origin))?;
        let origin = match piece {
            Piece::Cat(index) => pieces.cats()[index],
            Piece::Mouse => pieces.mouse(),
        };
        Ok((piece, origin))
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move application.
///
/// Preconditions:
/// - Game is active
/// - Player is seated and it is their turn
/// - Player owns the piece on the origin cell
/// - The move passes [`validate_move`]
///
/// Postconditions:
/// - The turn flipped exactly once
/// - Exactly one piece changed cell
/// - [`GameInvariants`] hold
pub struct MoveContract;

impl Contract<Game, MoveRequest> for MoveContract {
    type Checked = (Role, Piece, Cell);

    fn pre(game: &Game, req: &MoveRequest) -> Result<Self::Checked, MoveError> {
        GameIsActive::check(game)?;
        let role = PlayersTurn::check(req, game)?;
        let (piece, origin) = OwnsPiece::check(req, role, game)?;
        let target = validate_move(&game.pieces().occupied(), role, origin, req.target)?;
        Ok((role, piece, target))
    }

    fn post(before: &Game, after: &Game) -> Result<(), MoveError> {
        if before.cats_turn() == after.cats_turn() {
            warn!("Turn did not flip");
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: turn did not flip".to_string(),
            ));
        }

        let moved = before
            .pieces()
            .occupied()
            .iter()
            .zip(after.pieces().occupied().iter())
            .filter(|(a, b)| a != b)
            .count();
        if moved != 1 {
            warn!(moved, "Expected exactly one piece to move");
            return Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {} pieces moved",
                moved
            )));
        }

        GameInvariants::check_all(after).map_err(|violations| {
            MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                describe(&violations)
            ))
        })
    }
}
