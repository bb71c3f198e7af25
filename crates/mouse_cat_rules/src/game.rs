//! The game aggregate and its single mutation entry point.

use super::contracts::{Contract, MoveContract, MoveRequest, Piece};
use super::invariants::{GameInvariants, InvariantSet, describe};
use super::{
    Board, Cell, GameStatus, Move, MoveError, Pieces, PlayerId, Role, Winner, check_winner,
    render_board,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Stored shape of a game's lifecycle, without the data its variants carry.
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
pub enum StatusKind {
    /// Waiting for a mouse player.
    #[display("created")]
    Created,
    /// In play.
    #[display("active")]
    Active,
    /// Over.
    #[display("finished")]
    Finished,
}

impl From<&GameStatus> for StatusKind {
    fn from(status: &GameStatus) -> Self {
        match status {
            GameStatus::Created => StatusKind::Created,
            GameStatus::Active { .. } => StatusKind::Active,
            GameStatus::Finished { .. } => StatusKind::Finished,
        }
    }
}

/// Flat, storage-friendly view of a game.
///
/// This is what a persistence layer reads and writes. Turning a record
/// back into a [`Game`] goes through [`Game::restore`], which normalizes
/// it the same way every save does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Player controlling the cats.
    pub cat_owner: PlayerId,
    /// Player controlling the mouse, once joined.
    pub mouse_owner: Option<PlayerId>,
    /// Cat cells in cat-number order.
    pub cats: [i32; 4],
    /// Mouse cell.
    pub mouse: i32,
    /// True when cats move next.
    pub cats_turn: bool,
    /// Stored lifecycle stage.
    pub status: StatusKind,
}

/// A cat-and-mouse game: two seats, five pieces, a turn flag and a status.
///
/// Piece positions only change through [`Game::apply_move`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(crate) cat_owner: PlayerId,
    pub(crate) pieces: Pieces,
    pub(crate) cats_turn: bool,
    pub(crate) status: GameStatus,
}

impl Game {
    /// Creates a game waiting for a mouse player, in the starting layout.
    #[instrument]
    pub fn new(cat_owner: PlayerId) -> Self {
        info!(cat_owner, "Creating new game");
        Self {
            cat_owner,
            pieces: Pieces::INITIAL,
            cats_turn: true,
            status: GameStatus::Created,
        }
    }

    /// Rebuilds a game from a stored record.
    ///
    /// The record is normalized the way every save normalizes it:
    /// - a `Created` game is reset to the starting layout with cats to move;
    /// - a `Created` game that already has a mouse player becomes `Active`;
    /// - a winner derivable from the layout makes the game `Finished`.
    ///
    /// # Errors
    ///
    /// - [`MoveError::InvalidCell`] if a stored position is not a dark cell.
    /// - [`MoveError::InvariantViolation`] for records no sequence of
    ///   moves can produce (an active game without a mouse player, a
    ///   finished game without a winner, overlapping pieces).
    #[instrument]
    pub fn restore(record: GameRecord) -> Result<Self, MoveError> {
        let pieces = Pieces::new(record.cats, record.mouse)?;
        let mut game = Self {
            cat_owner: record.cat_owner,
            pieces,
            cats_turn: record.cats_turn,
            status: GameStatus::Created,
        };

        match (record.status, record.mouse_owner) {
            (StatusKind::Created, mouse_owner) => {
                game.pieces = Pieces::INITIAL;
                game.cats_turn = true;
                if let Some(mouse_owner) = mouse_owner {
                    game.status = GameStatus::Active { mouse_owner };
                }
            }
            (StatusKind::Active | StatusKind::Finished, Some(mouse_owner)) => {
                game.status = GameStatus::Active { mouse_owner };
                game.settle();
            }
            (kind, None) => {
                warn!(%kind, "Stored game has no mouse player");
                return Err(MoveError::InvariantViolation(format!(
                    "{} game without a mouse player",
                    kind
                )));
            }
        }

        if record.status == StatusKind::Finished && !game.status.is_finished() {
            warn!("Stored game is finished but the board has no winner");
            return Err(MoveError::InvariantViolation(
                "finished game without a winner".to_string(),
            ));
        }

        GameInvariants::check_all(&game)
            .map_err(|violations| MoveError::InvariantViolation(describe(&violations)))?;

        debug!(status = ?game.status, "Game restored");
        Ok(game)
    }

    /// Flattens the game for storage.
    pub fn to_record(&self) -> GameRecord {
        let cats = self.pieces.cats();
        GameRecord {
            cat_owner: self.cat_owner,
            mouse_owner: self.mouse_owner(),
            cats: [
                cats[0].index(),
                cats[1].index(),
                cats[2].index(),
                cats[3].index(),
            ],
            mouse: self.pieces.mouse().index(),
            cats_turn: self.cats_turn,
            status: StatusKind::from(&self.status),
        }
    }

    /// Seats the mouse player and starts the game.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameNotAvailable`] unless the game is `Created`
    /// and `mouse_owner` is not the cat player.
    #[instrument(skip(self), fields(cat_owner = self.cat_owner))]
    pub fn join(&mut self, mouse_owner: PlayerId) -> Result<(), MoveError> {
        if self.status != GameStatus::Created {
            warn!(status = ?self.status, "Game already has a mouse player");
            return Err(MoveError::GameNotAvailable);
        }
        if mouse_owner == self.cat_owner {
            warn!("Player tried to join their own game");
            return Err(MoveError::GameNotAvailable);
        }

        self.status = GameStatus::Active { mouse_owner };
        info!(mouse_owner, "Mouse player joined, game active");
        Ok(())
    }

    /// Applies a move for `player`.
    ///
    /// On success the piece moves, the turn flips, the status is settled
    /// (a winner finishes the game) and the immutable [`Move`] record is
    /// returned for the caller to persist together with the game.
    ///
    /// On failure the game is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameNotActive`] unless the game is `Active`
    /// - [`MoveError::NotAParticipant`] if `player` holds neither seat
    /// - [`MoveError::NotYourTurn`] if the other side moves next
    /// - [`MoveError::NotYourPiece`] if none of the player's pieces is on `origin`
    /// - [`MoveError::InvalidMove`] / [`MoveError::InvalidCell`] from
    ///   [`validate_move`](crate::validate_move)
    #[instrument(skip(self, played_at), fields(cats_turn = self.cats_turn))]
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        origin: i32,
        target: i32,
        played_at: DateTime<Utc>,
    ) -> Result<Move, MoveError> {
        let request = MoveRequest::new(player, origin, target);
        let (role, piece, target_cell) = MoveContract::pre(self, &request).inspect_err(|e| {
            warn!(player, origin, target, error = %e, "Move rejected");
        })?;

        let origin_cell = self.cell_of(piece);
        let mut next = self.clone();
        match piece {
            Piece::Cat(index) => next.pieces.set_cat(index, target_cell),
            Piece::Mouse => next.pieces.set_mouse(target_cell),
        }
        next.cats_turn = !next.cats_turn;
        next.settle();

        #[cfg(debug_assertions)]
        MoveContract::post(self, &next)?;

        *self = next;

        info!(
            player,
            %role,
            origin,
            target,
            status = ?self.status,
            "Move applied"
        );

        Ok(Move::new(player, role, origin_cell, target_cell, played_at))
    }

    /// Finishes the game if the layout has a winner.
    fn settle(&mut self) {
        if let GameStatus::Active { mouse_owner } = self.status
            && let Some(winner) = check_winner(&self.pieces, self.cats_turn)
        {
            info!(%winner, "Game finished");
            self.status = GameStatus::Finished {
                mouse_owner,
                winner,
            };
        }
    }

    fn cell_of(&self, piece: Piece) -> Cell {
        match piece {
            Piece::Cat(index) => self.pieces.cats()[index],
            Piece::Mouse => self.pieces.mouse(),
        }
    }

    /// Winner implied by the current layout and turn.
    pub fn winner(&self) -> Option<Winner> {
        check_winner(&self.pieces, self.cats_turn)
    }

    /// Player controlling the cats.
    pub fn cat_owner(&self) -> PlayerId {
        self.cat_owner
    }

    /// Player controlling the mouse, once joined.
    pub fn mouse_owner(&self) -> Option<PlayerId> {
        self.status.mouse_owner()
    }

    /// Current piece positions.
    pub fn pieces(&self) -> &Pieces {
        &self.pieces
    }

    /// True when cats move next.
    pub fn cats_turn(&self) -> bool {
        self.cats_turn
    }

    /// Side that moves next.
    pub fn to_move(&self) -> Role {
        Role::from_cats_turn(self.cats_turn)
    }

    /// Lifecycle status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Seat held by `player`, if any.
    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        if player == self.cat_owner {
            Some(Role::Cat)
        } else if self.mouse_owner() == Some(player) {
            Some(Role::Mouse)
        } else {
            None
        }
    }

    /// True if `player` is seated and their side moves next.
    pub fn is_players_turn(&self, player: PlayerId) -> bool {
        self.status.is_active() && self.role_of(player) == Some(self.to_move())
    }

    /// Renders the board as 8 rows of 8 cells.
    pub fn board(&self) -> Board {
        render_board(&self.pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT: PlayerId = 1;
    const MOUSE: PlayerId = 2;

    fn active_game() -> Game {
        let mut game = Game::new(CAT);
        game.join(MOUSE).unwrap();
        game
    }

    #[test]
    fn test_new_game_layout() {
        let game = Game::new(CAT);
        assert_eq!(*game.status(), GameStatus::Created);
        assert_eq!(*game.pieces(), Pieces::INITIAL);
        assert!(game.cats_turn());
        assert_eq!(game.mouse_owner(), None);
    }

    #[test]
    fn test_join_promotes_to_active() {
        let game = active_game();
        assert_eq!(*game.status(), GameStatus::Active { mouse_owner: MOUSE });
        assert_eq!(game.role_of(MOUSE), Some(Role::Mouse));
        assert_eq!(game.role_of(CAT), Some(Role::Cat));
        assert_eq!(game.role_of(3), None);
    }

    #[test]
    fn test_join_twice_fails() {
        let mut game = active_game();
        assert_eq!(game.join(3), Err(MoveError::GameNotAvailable));
        assert_eq!(game.mouse_owner(), Some(MOUSE));
    }

    #[test]
    fn test_join_own_game_fails() {
        let mut game = Game::new(CAT);
        assert_eq!(game.join(CAT), Err(MoveError::GameNotAvailable));
        assert_eq!(*game.status(), GameStatus::Created);
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = active_game();
        let now = Utc::now();
        game.apply_move(CAT, 0, 9, now).unwrap();
        assert!(!game.cats_turn());
        assert!(game.is_players_turn(MOUSE));
        game.apply_move(MOUSE, 59, 50, now).unwrap();
        assert!(game.cats_turn());
        assert!(game.is_players_turn(CAT));
    }

    #[test]
    fn test_move_record_contents() {
        let mut game = active_game();
        let now = Utc::now();
        let mv = game.apply_move(CAT, 4, 13, now).unwrap();
        assert_eq!(mv.player(), CAT);
        assert_eq!(mv.role(), Role::Cat);
        assert_eq!(mv.origin().index(), 4);
        assert_eq!(mv.target().index(), 13);
        assert_eq!(mv.played_at(), now);
    }

    #[test]
    fn test_rejected_move_leaves_game_untouched() {
        let mut game = active_game();
        let before = game.clone();
        let now = Utc::now();

        assert!(matches!(
            game.apply_move(CAT, 0, 18, now),
            Err(MoveError::InvalidMove { .. })
        ));
        assert_eq!(
            game.apply_move(MOUSE, 59, 50, now),
            Err(MoveError::NotYourTurn(Role::Mouse))
        );
        assert_eq!(
            game.apply_move(CAT, 1, 10, now),
            Err(MoveError::NotYourPiece(1))
        );
        assert_eq!(
            game.apply_move(9, 0, 9, now),
            Err(MoveError::NotAParticipant(9))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_created_game_rejects_moves() {
        let mut game = Game::new(CAT);
        assert_eq!(
            game.apply_move(CAT, 0, 9, Utc::now()),
            Err(MoveError::GameNotActive)
        );
    }

    #[test]
    fn test_mouse_escape_finishes_game() {
        let mut game = Game::restore(GameRecord {
            cat_owner: CAT,
            mouse_owner: Some(MOUSE),
            cats: [16, 20, 22, 31],
            mouse: 9,
            cats_turn: false,
            status: StatusKind::Active,
        })
        .unwrap();

        game.apply_move(MOUSE, 9, 2, Utc::now()).unwrap();
        assert_eq!(game.winner(), Some(Winner::Mouse));
        assert_eq!(
            *game.status(),
            GameStatus::Finished {
                mouse_owner: MOUSE,
                winner: Winner::Mouse
            }
        );
        assert_eq!(
            game.apply_move(CAT, 16, 25, Utc::now()),
            Err(MoveError::GameNotActive)
        );
    }

    #[test]
    fn test_restore_resets_created_layout() {
        let game = Game::restore(GameRecord {
            cat_owner: CAT,
            mouse_owner: None,
            cats: [9, 11, 13, 15],
            mouse: 50,
            cats_turn: false,
            status: StatusKind::Created,
        })
        .unwrap();
        assert_eq!(*game.pieces(), Pieces::INITIAL);
        assert!(game.cats_turn());
        assert_eq!(*game.status(), GameStatus::Created);
    }

    #[test]
    fn test_restore_created_with_mouse_player_is_active() {
        let game = Game::restore(GameRecord {
            cat_owner: CAT,
            mouse_owner: Some(MOUSE),
            cats: [0, 2, 4, 6],
            mouse: 59,
            cats_turn: true,
            status: StatusKind::Created,
        })
        .unwrap();
        assert_eq!(*game.status(), GameStatus::Active { mouse_owner: MOUSE });
    }

    #[test]
    fn test_restore_derives_finished_status() {
        let game = Game::restore(GameRecord {
            cat_owner: CAT,
            mouse_owner: Some(MOUSE),
            cats: [41, 48, 50, 6],
            mouse: 57,
            cats_turn: false,
            status: StatusKind::Active,
        })
        .unwrap();
        assert_eq!(game.status().winner(), Some(Winner::Cat));
    }

    #[test]
    fn test_restore_rejects_inconsistent_records() {
        let light = GameRecord {
            cat_owner: CAT,
            mouse_owner: Some(MOUSE),
            cats: [1, 2, 4, 6],
            mouse: 59,
            cats_turn: true,
            status: StatusKind::Active,
        };
        assert_eq!(Game::restore(light), Err(MoveError::InvalidCell(1)));

        let no_mouse_player = GameRecord {
            mouse_owner: None,
            cats: [0, 2, 4, 6],
            ..light
        };
        assert!(matches!(
            Game::restore(no_mouse_player),
            Err(MoveError::InvariantViolation(_))
        ));

        let finished_without_winner = GameRecord {
            cats: [0, 2, 4, 6],
            status: StatusKind::Finished,
            ..light
        };
        assert!(matches!(
            Game::restore(finished_without_winner),
            Err(MoveError::InvariantViolation(_))
        ));

        let overlapping = GameRecord {
            cats: [0, 0, 4, 6],
            ..light
        };
        assert!(matches!(
            Game::restore(overlapping),
            Err(MoveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_record_round_trip_preserves_game() {
        let mut game = active_game();
        game.apply_move(CAT, 6, 15, Utc::now()).unwrap();
        assert_eq!(Game::restore(game.to_record()), Ok(game));
    }

    #[test]
    fn test_board_tracks_cat_identity() {
        let mut game = active_game();
        game.apply_move(CAT, 2, 11, Utc::now()).unwrap();
        let board = game.board();
        assert_eq!(board[0], [1, 0, 0, 0, 3, 0, 4, 0]);
        assert_eq!(board[1], [0, 0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(board[7][3], -1);
    }
}
