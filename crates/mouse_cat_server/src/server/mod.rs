//! HTTP API over the game repository.
//!
//! Players identify themselves by id in the request body or query string.

mod error;
mod handlers;
mod views;

pub use error::ErrorBody;
pub use views::{
    ActiveQuery, CounterResponse, CreateUserRequest, FinishedQuery, GameView, JoinableQuery,
    MoveRequestBody, MoveResponse, MoveStatus, PlayerRequest, ReplayQuery, TurnQuery,
    TurnResponse, WinnerResponse,
};

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tracing::{info, instrument};

use crate::db::GameRepository;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    repo: GameRepository,
}

/// Builds the API router over `repo`.
#[instrument(skip(repo))]
pub fn router(repo: GameRepository) -> Router {
    info!(page_size = repo.page_size(), "Building router");

    Router::new()
        .route("/users", post(handlers::create_user))
        .route("/users/{name}", get(handlers::get_user))
        .route("/games", post(handlers::create_game))
        .route("/games/joinable", get(handlers::list_joinable))
        .route("/games/active", get(handlers::list_active))
        .route("/games/finished", get(handlers::list_finished))
        .route("/games/{id}", get(handlers::get_game))
        .route("/games/{id}/join", post(handlers::join_game))
        .route(
            "/games/{id}/moves",
            get(handlers::list_moves).post(handlers::apply_move),
        )
        .route("/games/{id}/board", get(handlers::get_board))
        .route("/games/{id}/winner", get(handlers::get_winner))
        .route("/games/{id}/turn", get(handlers::get_turn))
        .route("/games/{id}/replay", get(handlers::replay))
        .route("/counter", get(handlers::get_counter))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(AppState { repo })
}
