//! Repository for users, games, move logs and the rejected-request counter.

use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mouse_cat_rules::{
    Game, GameId, Move, MoveError, MoveLog, PlayerId, Replay, ReplayFrame, StatusKind, Winner,
};
use tracing::{debug, info, instrument, warn};

use super::models::num_pages;
use crate::GameServiceError;
use crate::db::{
    ActiveFilter, DbError, FinishedFilter, GameRow, MoveRow, NewGame, NewMove, NewUser, Page,
    StoredGame, User, schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Games listed per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

type GamesQuery<'a> = schema::games::BoxedQuery<'a, Sqlite>;

/// Repository over one SQLite database file.
///
/// Every call opens its own connection, so the repository is cheap to
/// clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
    page_size: i64,
}

impl GameRepository {
    /// Creates a repository for the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self {
            db_path,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Sets how many games a listing page holds (at least one).
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Games per listing page.
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        Ok(conn)
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Users
    // ─────────────────────────────────────────────────────────────

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError::UsernameTaken`] if the name is registered.
    #[instrument(skip(self))]
    pub fn create_user(&self, username: String) -> Result<User, GameServiceError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let existing = schema::users::table
                .filter(schema::users::username.eq(&username))
                .count()
                .get_result::<i64>(conn)?;
            if existing > 0 {
                warn!(username = %username, "Username already taken");
                return Err(GameServiceError::UsernameTaken(username.clone()));
            }

            let user = diesel::insert_into(schema::users::table)
                .values(&NewUser::new(username.clone()))
                .returning(User::as_returning())
                .get_result(conn)?;

            info!(user_id = user.id(), username = %user.username(), "User created");
            Ok(user)
        })
    }

    /// Gets a user by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .first::<User>(&mut conn)
            .optional()?;

        debug!(found = user.is_some(), "User lookup by name");
        Ok(user)
    }

    /// Gets a user by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user(&self, user_id: PlayerId) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .find(user_id)
            .first::<User>(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup by id");
        Ok(user)
    }

    // ─────────────────────────────────────────────────────────────
    //  Games
    // ─────────────────────────────────────────────────────────────

    /// Creates a game owned by `cat_owner`, waiting for a mouse player.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError::PlayerNotFound`] for an unknown user.
    #[instrument(skip(self))]
    pub fn create_game(&self, cat_owner: PlayerId) -> Result<StoredGame, GameServiceError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            require_user(conn, cat_owner)?;

            let game = Game::new(cat_owner);
            let row = diesel::insert_into(schema::games::table)
                .values(&NewGame::from(&game))
                .returning(GameRow::as_returning())
                .get_result(conn)?;

            info!(game_id = row.id(), cat_owner, "Game created");
            Ok(StoredGame::new(*row.id(), game))
        })
    }

    /// Loads a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError::GameNotFound`] if no such game exists.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: GameId) -> Result<StoredGame, GameServiceError> {
        let mut conn = self.connection()?;
        load_game(&mut conn, game_id)
    }

    /// Seats `mouse_owner` in a waiting game and starts it.
    ///
    /// # Errors
    ///
    /// - [`GameServiceError::GameNotFound`] / [`GameServiceError::PlayerNotFound`]
    /// - [`MoveError::GameNotAvailable`] if the game already started or
    ///   `mouse_owner` created it
    #[instrument(skip(self))]
    pub fn join_game(
        &self,
        game_id: GameId,
        mouse_owner: PlayerId,
    ) -> Result<StoredGame, GameServiceError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            require_user(conn, mouse_owner)?;
            let mut stored = load_game(conn, game_id)?;
            stored.game_mut().join(mouse_owner)?;
            save_game(conn, &stored)?;
            info!(game_id, mouse_owner, "Game joined");
            Ok(stored)
        })
    }

    /// Applies a move and appends it to the game's log, atomically.
    ///
    /// The game row is read, checked and written inside one immediate
    /// transaction, so of two concurrent moves on one game exactly one
    /// commits and the other is rejected by the rules it then sees.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`] from the rules engine, or
    /// [`GameServiceError::GameNotFound`].
    #[instrument(skip(self))]
    pub fn apply_move(
        &self,
        game_id: GameId,
        player: PlayerId,
        origin: i32,
        target: i32,
    ) -> Result<(StoredGame, Move), GameServiceError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let mut stored = load_game(conn, game_id)?;

            let last_played = schema::moves::table
                .filter(schema::moves::game_id.eq(game_id))
                .order(schema::moves::id.desc())
                .select(schema::moves::played_at)
                .first::<chrono::NaiveDateTime>(conn)
                .optional()?;
            // Log order and timestamp order must agree.
            let now = Utc::now();
            let played_at = match last_played {
                Some(last) if last.and_utc() > now => last.and_utc(),
                _ => now,
            };

            let mv = stored
                .game_mut()
                .apply_move(player, origin, target, played_at)?;

            save_game(conn, &stored)?;
            diesel::insert_into(schema::moves::table)
                .values(&NewMove::new(game_id, &mv))
                .execute(conn)?;

            info!(game_id, %mv, status = ?stored.game().status(), "Move stored");
            Ok((stored, mv))
        })
    }

    /// Winner of a game, if the layout has one. An unknown game has no winner.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError`] if the row cannot be read.
    #[instrument(skip(self))]
    pub fn get_winner(&self, game_id: GameId) -> Result<Option<Winner>, GameServiceError> {
        match self.get_game(game_id) {
            Ok(stored) => Ok(stored.game().winner()),
            Err(GameServiceError::GameNotFound(_)) => {
                debug!(game_id, "Winner requested for unknown game");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// A game together with its move log, read in one transaction so the
    /// two agree.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError::GameNotFound`] if no such game exists.
    #[instrument(skip(self))]
    pub fn game_with_moves(
        &self,
        game_id: GameId,
    ) -> Result<(StoredGame, MoveLog), GameServiceError> {
        let mut conn = self.connection()?;

        conn.transaction(|conn| {
            let stored = load_game(conn, game_id)?;
            let log = load_moves(conn, &stored)?;
            Ok((stored, log))
        })
    }

    /// Moves of a game, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError::GameNotFound`] if no such game exists.
    #[instrument(skip(self))]
    pub fn list_moves(&self, game_id: GameId) -> Result<MoveLog, GameServiceError> {
        let mut conn = self.connection()?;
        let stored = load_game(&mut conn, game_id)?;
        load_moves(&mut conn, &stored)
    }

    /// Board position after `step` moves of a finished game.
    ///
    /// # Errors
    ///
    /// - [`GameServiceError::ReplayUnavailable`] unless the game is finished
    /// - [`MoveError::NotAParticipant`] if `player` did not play in it
    #[instrument(skip(self))]
    pub fn replay(
        &self,
        game_id: GameId,
        player: PlayerId,
        step: usize,
    ) -> Result<ReplayFrame, GameServiceError> {
        let mut conn = self.connection()?;
        let stored = load_game(&mut conn, game_id)?;

        if !stored.game().status().is_finished() {
            warn!(game_id, "Replay requested for unfinished game");
            return Err(GameServiceError::ReplayUnavailable(game_id));
        }
        if stored.game().role_of(player).is_none() {
            return Err(MoveError::NotAParticipant(player).into());
        }

        let log = load_moves(&mut conn, &stored)?;
        let frame = Replay::new(log.moves().to_vec()).frame(step);
        debug!(step = frame.step, "Replay frame built");
        Ok(frame)
    }

    // ─────────────────────────────────────────────────────────────
    //  Listings
    // ─────────────────────────────────────────────────────────────

    /// Active games `player` sits in.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError`] if a row cannot be loaded.
    #[instrument(skip(self))]
    pub fn list_active_games(
        &self,
        player: PlayerId,
        filter: ActiveFilter,
        page: i64,
    ) -> Result<Page<StoredGame>, GameServiceError> {
        use schema::games::dsl::*;

        let query = move || -> GamesQuery<'static> {
            let base = games
                .filter(status.eq(StatusKind::Active.to_string()))
                .into_boxed();
            match filter {
                ActiveFilter::All => base.filter(
                    cat_user_id
                        .eq(player)
                        .or(mouse_user_id.assume_not_null().eq(player)),
                ),
                ActiveFilter::AsCat => base.filter(cat_user_id.eq(player)),
                ActiveFilter::AsMouse => base.filter(mouse_user_id.assume_not_null().eq(player)),
                ActiveFilter::MyTurn => base.filter(
                    cat_user_id
                        .eq(player)
                        .and(cat_turn.eq(true))
                        .or(mouse_user_id
                            .assume_not_null()
                            .eq(player)
                            .and(cat_turn.eq(false))),
                ),
            }
        };

        self.paginate(query, page)
    }

    /// Games waiting for a mouse player that `player` did not create,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError`] if a row cannot be loaded.
    #[instrument(skip(self))]
    pub fn list_joinable_games(
        &self,
        player: PlayerId,
        page: i64,
    ) -> Result<Page<StoredGame>, GameServiceError> {
        use schema::games::dsl::*;

        let query = move || -> GamesQuery<'static> {
            games
                .filter(status.eq(StatusKind::Created.to_string()))
                .filter(mouse_user_id.is_null())
                .filter(cat_user_id.ne(player))
                .into_boxed()
        };

        self.paginate(query, page)
    }

    /// Finished games `player` sat in.
    ///
    /// # Errors
    ///
    /// Returns [`GameServiceError`] if a row cannot be loaded.
    #[instrument(skip(self))]
    pub fn list_finished_games(
        &self,
        player: PlayerId,
        filter: FinishedFilter,
        page: i64,
    ) -> Result<Page<StoredGame>, GameServiceError> {
        use schema::games::dsl::*;

        let query = move || -> GamesQuery<'static> {
            let base = games
                .filter(status.eq(StatusKind::Finished.to_string()))
                .into_boxed();
            match filter {
                FinishedFilter::All => base.filter(
                    cat_user_id
                        .eq(player)
                        .or(mouse_user_id.assume_not_null().eq(player)),
                ),
                FinishedFilter::AsCat => base.filter(cat_user_id.eq(player)),
                FinishedFilter::AsMouse => base.filter(mouse_user_id.assume_not_null().eq(player)),
                FinishedFilter::Won => base.filter(
                    cat_user_id
                        .eq(player)
                        .and(winner.assume_not_null().eq(Winner::Cat.as_ref().to_string()))
                        .or(mouse_user_id
                            .assume_not_null()
                            .eq(player)
                            .and(winner.assume_not_null().eq(Winner::Mouse.as_ref().to_string()))),
                ),
            }
        };

        self.paginate(query, page)
    }

    /// Runs a listing query twice: once to count, once for the page.
    ///
    /// Out-of-range page numbers are clamped to the first or last page.
    fn paginate(
        &self,
        query: impl Fn() -> GamesQuery<'static>,
        page: i64,
    ) -> Result<Page<StoredGame>, GameServiceError> {
        let mut conn = self.connection()?;

        let total = query().count().get_result::<i64>(&mut conn)?;
        let page = page.clamp(1, num_pages(total, self.page_size));

        let rows = query()
            .order(schema::games::id.asc())
            .limit(self.page_size)
            .offset((page - 1) * self.page_size)
            .load::<GameRow>(&mut conn)?;

        let items = rows
            .iter()
            .map(|row| Ok(StoredGame::new(*row.id(), row.to_game()?)))
            .collect::<Result<Vec<_>, GameServiceError>>()?;

        debug!(total, page, count = items.len(), "Listing loaded");
        Ok(Page::new(items, page, self.page_size, total))
    }

    // ─────────────────────────────────────────────────────────────
    //  Rejected-request counter
    // ─────────────────────────────────────────────────────────────

    /// Adds one to the counter and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn increment_counter(&self) -> Result<i64, DbError> {
        use schema::counters::dsl::*;
        let mut conn = self.connection()?;

        let new_value = diesel::update(counters.find(1))
            .set(value.eq(value + 1))
            .returning(value)
            .get_result::<i64>(&mut conn)?;

        debug!(value = new_value, "Counter incremented");
        Ok(new_value)
    }

    /// Current counter value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn counter_value(&self) -> Result<i64, DbError> {
        use schema::counters::dsl::*;
        let mut conn = self.connection()?;
        Ok(counters.find(1).select(value).first::<i64>(&mut conn)?)
    }

    /// Sets the counter back to zero.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn reset_counter(&self) -> Result<(), DbError> {
        use schema::counters::dsl::*;
        let mut conn = self.connection()?;
        diesel::update(counters.find(1))
            .set(value.eq(0))
            .execute(&mut conn)?;
        info!("Counter reset");
        Ok(())
    }
}

fn require_user(conn: &mut SqliteConnection, user_id: PlayerId) -> Result<(), GameServiceError> {
    let found = schema::users::table
        .find(user_id)
        .count()
        .get_result::<i64>(conn)?;
    if found == 0 {
        warn!(user_id, "Unknown player");
        return Err(GameServiceError::PlayerNotFound(user_id));
    }
    Ok(())
}

fn load_game(conn: &mut SqliteConnection, game_id: GameId) -> Result<StoredGame, GameServiceError> {
    let row = schema::games::table
        .find(game_id)
        .first::<GameRow>(conn)
        .optional()?
        .ok_or(GameServiceError::GameNotFound(game_id))?;
    Ok(StoredGame::new(game_id, row.to_game()?))
}

fn save_game(conn: &mut SqliteConnection, stored: &StoredGame) -> Result<(), GameServiceError> {
    diesel::update(schema::games::table.find(*stored.id()))
        .set(&NewGame::from(stored.game()))
        .execute(conn)?;
    Ok(())
}

fn load_moves(
    conn: &mut SqliteConnection,
    stored: &StoredGame,
) -> Result<MoveLog, GameServiceError> {
    let rows = schema::moves::table
        .filter(schema::moves::game_id.eq(*stored.id()))
        .order(schema::moves::id.asc())
        .load::<MoveRow>(conn)?;

    let moves = rows
        .iter()
        .map(|row| row.to_move(stored.game()))
        .collect::<Result<Vec<_>, MoveError>>()?;
    Ok(MoveLog::from_moves(moves)?)
}
