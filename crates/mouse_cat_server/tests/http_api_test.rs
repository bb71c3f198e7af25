//! Tests for the HTTP API, driving the router in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mouse_cat_server::{GameRepository, router};
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

fn setup_app() -> (NamedTempFile, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, router(repo))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };
    (status, value)
}

async fn create_user(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/users", Some(json!({ "username": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("user id")
}

async fn start_game(app: &Router, cat: i64, mouse: i64) -> i64 {
    let (status, game) = send(app, "POST", "/games", Some(json!({ "player": cat }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = game["id"].as_i64().expect("game id");

    let (status, game) = send(
        app,
        "POST",
        &format!("/games/{id}/join"),
        Some(json!({ "player": mouse })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "active");
    id
}

async fn play(
    app: &Router,
    game: i64,
    player: i64,
    origin: i32,
    target: i32,
) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/games/{game}/moves"),
        Some(json!({ "player": player, "origin": origin, "target": target })),
    )
    .await
}

#[tokio::test]
async fn test_user_registration_and_lookup() {
    let (_db, app) = setup_app();
    create_user(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/users/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, body) = send(&app, "POST", "/users", Some(json!({ "username": "alice" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "username_taken");

    let (status, body) = send(&app, "GET", "/users/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user_not_found");
}

#[tokio::test]
async fn test_new_game_board() {
    let (_db, app) = setup_app();
    let cat = create_user(&app, "cat").await;

    let (status, game) = send(&app, "POST", "/games", Some(json!({ "player": cat }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game["status"], "created");
    assert_eq!(game["cats"], json!([0, 2, 4, 6]));
    assert_eq!(game["mouse"], 59);
    assert_eq!(game["cats_turn"], true);

    let id = game["id"].as_i64().unwrap();
    let (status, board) = send(&app, "GET", &format!("/games/{id}/board"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board[0], json!([1, 0, 2, 0, 3, 0, 4, 0]));
    assert_eq!(board[7], json!([0, 0, 0, -1, 0, 0, 0, 0]));
}

#[tokio::test]
async fn test_move_flow_and_turn_polling() {
    let (_db, app) = setup_app();
    let cat = create_user(&app, "cat").await;
    let mouse = create_user(&app, "mouse").await;
    let game = start_game(&app, cat, mouse).await;

    let (status, body) = play(&app, game, cat, 0, 9).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["move"]["target"], 9);
    assert_eq!(body["game"]["cats_turn"], false);

    let (status, turn) = send(
        &app,
        "GET",
        &format!("/games/{game}/turn?player={mouse}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(turn["your_turn"], true);
    assert_eq!(turn["cats_turn"], false);
    assert_eq!(turn["last_move"]["origin"], 0);
    assert_eq!(turn["finished"], false);

    let (status, moves) = send(&app, "GET", &format!("/games/{game}/moves"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moves.as_array().map(Vec::len), Some(1));
    assert_eq!(moves[0]["role"], "cat");
}

#[tokio::test]
async fn test_rejections_are_counted() {
    let (_db, app) = setup_app();
    let cat = create_user(&app, "cat").await;
    let mouse = create_user(&app, "mouse").await;
    let game = start_game(&app, cat, mouse).await;

    let (status, body) = play(&app, game, mouse, 59, 50).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_your_turn");

    let (status, body) = play(&app, game, cat, 0, 18).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_move");

    let (status, body) = play(&app, game, cat, 1, 10).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_your_piece");

    let (status, _) = send(&app, "GET", "/games/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, counter) = send(&app, "GET", "/counter", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counter["value"], 4);
}

#[tokio::test]
async fn test_game_to_cat_win_and_replay() {
    let (_db, app) = setup_app();
    let cat = create_user(&app, "cat").await;
    let mouse = create_user(&app, "mouse").await;
    let game = start_game(&app, cat, mouse).await;

    let moves = [
        (cat, 0, 9),
        (mouse, 59, 50),
        (cat, 9, 16),
        (mouse, 50, 57),
        (cat, 16, 25),
        (mouse, 57, 48),
        (cat, 25, 32),
        (mouse, 48, 57),
        (cat, 32, 41),
        (mouse, 57, 48),
        (cat, 2, 11),
        (mouse, 48, 57),
        (cat, 11, 18),
        (mouse, 57, 48),
        (cat, 18, 27),
        (mouse, 48, 57),
        (cat, 27, 34),
        (mouse, 57, 48),
        (cat, 34, 43),
        (mouse, 48, 57),
        (cat, 43, 50),
        (mouse, 57, 48),
    ];
    for (player, origin, target) in moves {
        let (status, body) = play(&app, game, player, origin, target).await;
        assert_eq!(status, StatusCode::OK, "{origin} -> {target}: {body}");
        assert_eq!(body["status"], "ok");
    }

    // Replay is refused while the game is running.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/games/{game}/replay?player={cat}&step=1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "replay_unavailable");

    let (status, body) = play(&app, game, cat, 50, 57).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "finished");
    assert_eq!(body["game"]["winner"], "cat");

    let (_, winner) = send(&app, "GET", &format!("/games/{game}/winner"), None).await;
    assert_eq!(winner["winner"], "cat");

    for player in [cat, mouse] {
        let (status, page) = send(
            &app,
            "GET",
            &format!("/games/active?player={player}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 0);
    }

    let (status, frame) = send(
        &app,
        "GET",
        &format!("/games/{game}/replay?player={mouse}&step=2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame["step"], 2);
    assert_eq!(frame["has_previous"], true);
    assert_eq!(frame["has_next"], true);
    assert_eq!(frame["last_move"]["target"], 50);

    let (status, page) = send(
        &app,
        "GET",
        &format!("/games/finished?player={mouse}&filter=as_mouse"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], game);

    let (_, page) = send(
        &app,
        "GET",
        &format!("/games/finished?player={mouse}&filter=won"),
        None,
    )
    .await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_listings() {
    let (_db, app) = setup_app();
    let alice = create_user(&app, "alice").await;
    let bob = create_user(&app, "bob").await;

    let (_, waiting) = send(&app, "POST", "/games", Some(json!({ "player": alice }))).await;
    let running = start_game(&app, bob, alice).await;

    let (status, page) = send(&app, "GET", &format!("/games/joinable?player={bob}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], waiting["id"]);
    assert_eq!(page["page"], 1);
    assert_eq!(page["page_size"], 5);

    let (_, page) = send(&app, "GET", &format!("/games/joinable?player={alice}"), None).await;
    assert_eq!(page["total"], 0);

    let (_, page) = send(
        &app,
        "GET",
        &format!("/games/active?player={alice}&filter=as_mouse"),
        None,
    )
    .await;
    assert_eq!(page["items"][0]["id"], running);

    let (_, page) = send(
        &app,
        "GET",
        &format!("/games/active?player={alice}&filter=my_turn"),
        None,
    )
    .await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_winner_of_unknown_game() {
    let (_db, app) = setup_app();

    let (status, body) = send(&app, "GET", "/games/999/winner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], Value::Null);

    let (_, counter) = send(&app, "GET", "/counter", None).await;
    assert_eq!(counter["value"], 0);
}
