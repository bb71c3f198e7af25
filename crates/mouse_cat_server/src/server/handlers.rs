//! Route handlers.
//!
//! Repository calls block on SQLite, so each one runs on the blocking pool.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use mouse_cat_rules::{Board, GameId, Move, ReplayFrame};
use tracing::{debug, instrument, warn};

use super::AppState;
use super::views::{
    ActiveQuery, CounterResponse, CreateUserRequest, FinishedQuery, GameView, JoinableQuery,
    MoveRequestBody, MoveResponse, MoveStatus, PlayerRequest, ReplayQuery, TurnQuery,
    TurnResponse, WinnerResponse,
};
use crate::GameServiceError;
use crate::db::{GameRepository, Page, User};

type ApiResult<T> = Result<Json<T>, GameServiceError>;

/// Runs `op` against the repository off the async runtime.
///
/// A rejected request bumps the rejected-request counter before the
/// error is returned.
async fn run<T, F>(state: &AppState, op: F) -> Result<T, GameServiceError>
where
    T: Send + 'static,
    F: FnOnce(&GameRepository) -> Result<T, GameServiceError> + Send + 'static,
{
    let repo = state.repo.clone();
    tokio::task::spawn_blocking(move || {
        let result = op(&repo);
        if let Err(e) = &result
            && e.is_rejection()
        {
            match repo.increment_counter() {
                Ok(value) => debug!(value, kind = e.kind(), "Rejected request counted"),
                Err(db) => warn!(error = %db, "Failed to count rejected request"),
            }
        }
        result
    })
    .await
    .map_err(|e| GameServiceError::Internal(format!("worker task failed: {}", e)))?
}

#[instrument(skip(state))]
pub(super) async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), GameServiceError> {
    let user = run(&state, move |repo| repo.create_user(body.username)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub(super) async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<User> {
    let user = run(&state, move |repo| {
        repo.get_user_by_name(&name)?
            .ok_or(GameServiceError::UserNotFound(name))
    })
    .await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub(super) async fn create_game(
    State(state): State<AppState>,
    Json(body): Json<PlayerRequest>,
) -> Result<(StatusCode, Json<GameView>), GameServiceError> {
    let stored = run(&state, move |repo| repo.create_game(body.player)).await?;
    Ok((StatusCode::CREATED, Json(GameView::from(&stored))))
}

#[instrument(skip(state))]
pub(super) async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> ApiResult<GameView> {
    let stored = run(&state, move |repo| repo.get_game(id)).await?;
    Ok(Json(GameView::from(&stored)))
}

#[instrument(skip(state))]
pub(super) async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<PlayerRequest>,
) -> ApiResult<GameView> {
    let stored = run(&state, move |repo| repo.join_game(id, body.player)).await?;
    Ok(Json(GameView::from(&stored)))
}

#[instrument(skip(state))]
pub(super) async fn list_joinable(
    State(state): State<AppState>,
    Query(query): Query<JoinableQuery>,
) -> ApiResult<Page<GameView>> {
    let page = run(&state, move |repo| {
        repo.list_joinable_games(query.player, query.page)
    })
    .await?;
    Ok(Json(page.map(|stored| GameView::from(&stored))))
}

#[instrument(skip(state))]
pub(super) async fn list_active(
    State(state): State<AppState>,
    Query(query): Query<ActiveQuery>,
) -> ApiResult<Page<GameView>> {
    let page = run(&state, move |repo| {
        repo.list_active_games(query.player, query.filter, query.page)
    })
    .await?;
    Ok(Json(page.map(|stored| GameView::from(&stored))))
}

#[instrument(skip(state))]
pub(super) async fn list_finished(
    State(state): State<AppState>,
    Query(query): Query<FinishedQuery>,
) -> ApiResult<Page<GameView>> {
    let page = run(&state, move |repo| {
        repo.list_finished_games(query.player, query.filter, query.page)
    })
    .await?;
    Ok(Json(page.map(|stored| GameView::from(&stored))))
}

#[instrument(skip(state))]
pub(super) async fn apply_move(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<MoveRequestBody>,
) -> ApiResult<MoveResponse> {
    let (stored, mv) = run(&state, move |repo| {
        repo.apply_move(id, body.player, body.origin, body.target)
    })
    .await?;

    let status = if stored.game().status().is_finished() {
        MoveStatus::Finished
    } else {
        MoveStatus::Ok
    };
    Ok(Json(MoveResponse {
        status,
        mv,
        game: GameView::from(&stored),
    }))
}

#[instrument(skip(state))]
pub(super) async fn list_moves(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> ApiResult<Vec<Move>> {
    let log = run(&state, move |repo| repo.list_moves(id)).await?;
    Ok(Json(log.moves().to_vec()))
}

#[instrument(skip(state))]
pub(super) async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> ApiResult<Board> {
    let stored = run(&state, move |repo| repo.get_game(id)).await?;
    Ok(Json(stored.game().board()))
}

#[instrument(skip(state))]
pub(super) async fn get_winner(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> ApiResult<WinnerResponse> {
    let winner = run(&state, move |repo| repo.get_winner(id)).await?;
    Ok(Json(WinnerResponse { winner }))
}

#[instrument(skip(state))]
pub(super) async fn get_turn(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Query(query): Query<TurnQuery>,
) -> ApiResult<TurnResponse> {
    let (stored, log) = run(&state, move |repo| repo.game_with_moves(id)).await?;

    let game = stored.game();
    Ok(Json(TurnResponse {
        cats_turn: game.cats_turn(),
        your_turn: query.player.is_some_and(|p| game.is_players_turn(p)),
        last_move: log.last().copied(),
        finished: game.status().is_finished(),
        winner: game.status().winner(),
    }))
}

#[instrument(skip(state))]
pub(super) async fn replay(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Query(query): Query<ReplayQuery>,
) -> ApiResult<ReplayFrame> {
    let frame = run(&state, move |repo| repo.replay(id, query.player, query.step)).await?;
    Ok(Json(frame))
}

#[instrument(skip(state))]
pub(super) async fn get_counter(State(state): State<AppState>) -> ApiResult<CounterResponse> {
    let value = run(&state, |repo| Ok(repo.counter_value()?)).await?;
    Ok(Json(CounterResponse { value }))
}
