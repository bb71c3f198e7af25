//! JSON bodies for the HTTP API.

use mouse_cat_rules::{Board, GameId, Move, PlayerId, StatusKind, Winner};
use serde::{Deserialize, Serialize};

use crate::db::{ActiveFilter, FinishedFilter, StoredGame};

/// A game as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game id.
    pub id: GameId,
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
    /// Lifecycle stage.
    pub status: StatusKind,
    /// Winner, once finished.
    pub winner: Option<Winner>,
    /// 8x8 rendering: 0 empty, 1..=4 cats, -1 mouse.
    pub board: Board,
}

impl From<&StoredGame> for GameView {
    fn from(stored: &StoredGame) -> Self {
        let game = stored.game();
        let record = game.to_record();
        Self {
            id: *stored.id(),
            cat_owner: record.cat_owner,
            mouse_owner: record.mouse_owner,
            cats: record.cats,
            mouse: record.mouse,
            cats_turn: record.cats_turn,
            status: record.status,
            winner: game.status().winner(),
            board: game.board(),
        }
    }
}

/// `POST /users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Name to register.
    pub username: String,
}

/// `POST /games` and `POST /games/{id}/join`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRequest {
    /// Acting player.
    pub player: PlayerId,
}

/// `POST /games/{id}/moves`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequestBody {
    /// Acting player.
    pub player: PlayerId,
    /// Cell of the piece to move.
    pub origin: i32,
    /// Destination cell.
    pub target: i32,
}

/// Outcome of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStatus {
    /// The game goes on.
    Ok,
    /// The move ended the game.
    Finished,
}

/// Response to an accepted move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Whether the game goes on.
    pub status: MoveStatus,
    /// The recorded move.
    #[serde(rename = "move")]
    pub mv: Move,
    /// Game after the move.
    pub game: GameView,
}

/// `GET /games/{id}/winner`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerResponse {
    /// Winner, if any.
    pub winner: Option<Winner>,
}

/// `GET /games/{id}/turn`: what a waiting player polls for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    /// True when cats move next.
    pub cats_turn: bool,
    /// True when `player` was given and may move now.
    pub your_turn: bool,
    /// Most recent move.
    pub last_move: Option<Move>,
    /// True once the game is over.
    pub finished: bool,
    /// Winner, once finished.
    pub winner: Option<Winner>,
}

/// `GET /counter`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterResponse {
    /// Requests rejected so far.
    pub value: i64,
}

/// Query string of `GET /games/joinable`.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinableQuery {
    /// Player looking for a game.
    pub player: PlayerId,
    /// Page number, from 1.
    #[serde(default = "first_page")]
    pub page: i64,
}

/// Query string of `GET /games/active`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveQuery {
    /// Player whose games to list.
    pub player: PlayerId,
    /// Subset to list.
    #[serde(default)]
    pub filter: ActiveFilter,
    /// Page number, from 1.
    #[serde(default = "first_page")]
    pub page: i64,
}

/// Query string of `GET /games/finished`.
#[derive(Debug, Clone, Deserialize)]
pub struct FinishedQuery {
    /// Player whose games to list.
    pub player: PlayerId,
    /// Subset to list.
    #[serde(default)]
    pub filter: FinishedFilter,
    /// Page number, from 1.
    #[serde(default = "first_page")]
    pub page: i64,
}

/// Query string of `GET /games/{id}/turn`.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnQuery {
    /// Player asking, if any.
    pub player: Option<PlayerId>,
}

/// Query string of `GET /games/{id}/replay`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayQuery {
    /// Player asking; must have played in the game.
    pub player: PlayerId,
    /// Number of moves to apply.
    #[serde(default)]
    pub step: usize,
}

fn first_page() -> i64 {
    1
}
