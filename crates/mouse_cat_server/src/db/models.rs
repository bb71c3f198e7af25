//! Database models and their conversions to engine types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use mouse_cat_rules::{Cell, Game, GameId, GameRecord, Move, MoveError, StatusKind};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Registered player.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    created_at: NaiveDateTime,
}

/// Insertable user.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
}

/// Stored game row, flat.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: i32,
    cat_user_id: i32,
    mouse_user_id: Option<i32>,
    cat1: i32,
    cat2: i32,
    cat3: i32,
    cat4: i32,
    mouse: i32,
    cat_turn: bool,
    status: String,
    winner: Option<String>,
    created_at: NaiveDateTime,
}

impl GameRow {
    /// Rebuilds the engine's game from this row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] for an unknown status string, or
    /// [`MoveError`] if the stored layout is inconsistent.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn to_game(&self) -> Result<Game, crate::GameServiceError> {
        let status = StatusKind::from_str(&self.status)
            .map_err(|_| DbError::new(format!("Invalid status: '{}'", self.status)))?;

        let record = GameRecord {
            cat_owner: self.cat_user_id,
            mouse_owner: self.mouse_user_id,
            cats: [self.cat1, self.cat2, self.cat3, self.cat4],
            mouse: self.mouse,
            cats_turn: self.cat_turn,
            status,
        };
        Ok(Game::restore(record)?)
    }
}

/// Column values written for a game on insert and on every update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct NewGame {
    cat_user_id: i32,
    mouse_user_id: Option<i32>,
    cat1: i32,
    cat2: i32,
    cat3: i32,
    cat4: i32,
    mouse: i32,
    cat_turn: bool,
    status: String,
    winner: Option<String>,
}

impl From<&Game> for NewGame {
    fn from(game: &Game) -> Self {
        let record = game.to_record();
        Self {
            cat_user_id: record.cat_owner,
            mouse_user_id: record.mouse_owner,
            cat1: record.cats[0],
            cat2: record.cats[1],
            cat3: record.cats[2],
            cat4: record.cats[3],
            mouse: record.mouse,
            cat_turn: record.cats_turn,
            status: record.status.as_ref().to_string(),
            winner: game.status().winner().map(|w| w.as_ref().to_string()),
        }
    }
}

/// Stored move row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::moves)]
pub struct MoveRow {
    id: i32,
    game_id: i32,
    player_id: i32,
    origin: i32,
    target: i32,
    played_at: NaiveDateTime,
}

impl MoveRow {
    /// Rebuilds the engine's move record. The side is looked up from the
    /// game's seats.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if a cell is invalid or the player holds no seat.
    pub fn to_move(&self, game: &Game) -> Result<Move, MoveError> {
        let role = game
            .role_of(self.player_id)
            .ok_or(MoveError::NotAParticipant(self.player_id))?;
        Ok(Move::new(
            self.player_id,
            role,
            Cell::new(self.origin)?,
            Cell::new(self.target)?,
            self.played_at.and_utc(),
        ))
    }
}

/// Insertable move.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::moves)]
pub struct NewMove {
    game_id: i32,
    player_id: i32,
    origin: i32,
    target: i32,
    played_at: NaiveDateTime,
}

impl NewMove {
    /// Row for `mv`, played in game `game_id`.
    pub fn new(game_id: GameId, mv: &Move) -> Self {
        Self {
            game_id,
            player_id: mv.player(),
            origin: mv.origin().index(),
            target: mv.target().index(),
            played_at: mv.played_at().naive_utc(),
        }
    }
}

/// A game together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct StoredGame {
    id: GameId,
    game: Game,
}

impl StoredGame {
    pub(crate) fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }
}

/// Which of a player's active games to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveFilter {
    /// Every active game the player sits in.
    #[default]
    All,
    /// Games where the player controls the cats.
    AsCat,
    /// Games where the player controls the mouse.
    AsMouse,
    /// Games waiting for the player's move.
    MyTurn,
}

/// Which of a player's finished games to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishedFilter {
    /// Every finished game the player sat in.
    #[default]
    All,
    /// Games where the player controlled the cats.
    AsCat,
    /// Games where the player controlled the mouse.
    AsMouse,
    /// Games the player won.
    Won,
}

/// One page of a listing. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Page<T> {
    items: Vec<T>,
    page: i64,
    page_size: i64,
    total: i64,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        Self {
            items,
            page,
            page_size,
            total,
        }
    }

    /// Number of pages; an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        num_pages(self.total, self.page_size)
    }

    /// True if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.num_pages()
    }

    /// True if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Converts every item, keeping the page position.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
        }
    }
}

/// Pages needed for `total` items.
pub(crate) fn num_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        1
    } else {
        (total - 1) / page_size + 1
    }
}
