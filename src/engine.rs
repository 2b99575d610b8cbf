use std::collections::HashSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::POINTS_PER_FOOD;
use crate::difficulty::{DifficultyController, SpeedLevel};
use crate::error::{GameError, Result};
use crate::food;
use crate::grid::{Cell, GridModel};
use crate::input::{direction_change_is_valid, Direction};
use crate::snake::Snake;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    /// No session has been started yet.
    Menu,
    Running,
    /// The last session ended; see [`SimulationEngine::end_reason`].
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, leaving nowhere to put food.
    BoardFull,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    /// The engine was not running.
    Skipped,
    Moved,
    Ate,
    Ended(EndReason),
}

/// Result of [`SimulationEngine::tick`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickOutcome {
    pub event: TickEvent,
    /// New tick interval when a speed-up happened; the caller reschedules.
    pub interval_changed: Option<Duration>,
}

impl TickOutcome {
    fn plain(event: TickEvent) -> Self {
        Self {
            event,
            interval_changed: None,
        }
    }
}

/// Storage owned for the duration of one running session.
#[derive(Debug, Clone)]
struct Session {
    snake: Snake,
    food: Cell,
}

/// Read-only view of the engine handed to render sinks.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: GridModel,
    pub snake: Option<&'a Snake>,
    pub food: Option<Cell>,
    pub direction: Direction,
    pub score: u32,
    /// Snake length, or the final length once the session ended.
    pub length: usize,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    pub speed_level: SpeedLevel,
    pub tick_interval: Duration,
}

/// Discrete-time snake simulation.
///
/// Owns every piece of mutable session state; independent engines never share
/// anything.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    grid: GridModel,
    pending_grid: Option<GridModel>,
    session: Option<Session>,
    direction: Direction,
    pending_direction: Direction,
    score: u32,
    final_length: usize,
    tick_count: u64,
    status: GameStatus,
    end_reason: Option<EndReason>,
    difficulty: DifficultyController,
    rng: StdRng,
}

impl SimulationEngine {
    /// Creates an idle engine seeded from the operating system.
    #[must_use]
    pub fn new(grid: GridModel, level: SpeedLevel) -> Self {
        Self::with_rng(grid, level, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible sessions.
    #[must_use]
    pub fn new_with_seed(grid: GridModel, level: SpeedLevel, seed: u64) -> Self {
        Self::with_rng(grid, level, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: GridModel, level: SpeedLevel, rng: StdRng) -> Self {
        Self {
            grid,
            pending_grid: None,
            session: None,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 0,
            final_length: 0,
            tick_count: 0,
            status: GameStatus::Menu,
            end_reason: None,
            difficulty: DifficultyController::new(level),
            rng,
        }
    }

    /// Begins a new session with a one-cell snake at the grid center.
    ///
    /// A grid too small to hold any food ends the session at once with
    /// [`EndReason::BoardFull`].
    pub fn start(&mut self) {
        self.apply_pending_grid();
        let snake = Snake::new(self.grid.center());

        match food::spawn(&mut self.rng, self.grid, &snake) {
            Ok(food) => self.begin(Some(Session { snake, food }), Direction::Right),
            Err(error) => {
                tracing::warn!(%error, "no room for food on a fresh board");
                self.begin(None, Direction::Right);
                self.final_length = snake.len();
                let _ = self.terminate(EndReason::BoardFull);
            }
        }
    }

    /// Begins a session from an explicit layout, for scripted scenarios.
    ///
    /// Fails with [`GameError::EmptyState`] when `snake` has no segments and
    /// with [`GameError::InvalidLayout`] when the body leaves the grid, is
    /// broken or overlaps itself, or when `food` is off the grid or on the
    /// body. A rejected layout leaves the engine untouched.
    pub fn start_with_layout(
        &mut self,
        snake: Snake,
        direction: Direction,
        food: Cell,
    ) -> Result<()> {
        let grid = self.pending_grid.unwrap_or(self.grid);
        check_layout(grid, &snake, food)?;

        self.apply_pending_grid();
        self.begin(Some(Session { snake, food }), direction);
        Ok(())
    }

    fn begin(&mut self, session: Option<Session>, direction: Direction) {
        let head = session.as_ref().and_then(|s| s.snake.head().ok());
        self.session = session;
        self.direction = direction;
        self.pending_direction = direction;
        self.score = 0;
        self.final_length = 0;
        self.tick_count = 0;
        self.end_reason = None;
        self.difficulty.reset();
        self.status = GameStatus::Running;

        tracing::info!(
            cols = self.grid.cols(),
            rows = self.grid.rows(),
            ?head,
            level = %self.difficulty.level(),
            "session started"
        );
    }

    fn apply_pending_grid(&mut self) {
        if let Some(grid) = self.pending_grid.take() {
            tracing::debug!(cols = grid.cols(), rows = grid.rows(), "applying resized grid");
            self.grid = grid;
        }
    }

    /// Records a new grid size.
    ///
    /// A running session keeps its grid; the new size applies at the next
    /// [`start`](Self::start).
    pub fn request_resize(&mut self, grid: GridModel) {
        if self.status == GameStatus::Running {
            self.pending_grid = Some(grid);
        } else {
            self.pending_grid = None;
            self.grid = grid;
        }
    }

    /// Buffers the direction for the next tick.
    ///
    /// Reversals of the committed direction are discarded; the last accepted
    /// intent before a tick wins. Returns whether the intent was accepted.
    pub fn set_intended_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        if !direction_change_is_valid(self.direction, direction) {
            tracing::trace!(?direction, current = ?self.direction, "discarding reversal");
            return false;
        }

        self.pending_direction = direction;
        true
    }

    /// Changes the speed level immediately and returns the new tick interval.
    pub fn set_speed_level(&mut self, level: u8) -> Result<Duration> {
        let level = SpeedLevel::try_from(level)?;
        let multiplier = self.difficulty.set_level(level);
        let interval = self.difficulty.current_interval();

        tracing::debug!(%level, multiplier, ?interval, "speed level changed");
        Ok(interval)
    }

    /// Advances the simulation by one step.
    ///
    /// Collisions end the session and are reported through the outcome. An
    /// `Err` means an internal invariant was broken.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.status != GameStatus::Running {
            return Ok(TickOutcome::plain(TickEvent::Skipped));
        }

        let Some(session) = self.session.as_mut() else {
            return Err(GameError::EmptyState);
        };

        self.direction = self.pending_direction;
        self.tick_count += 1;
        let new_head = session.snake.head()?.step(self.direction);

        if !self.grid.contains(new_head) {
            return Ok(self.terminate(EndReason::WallCollision));
        }

        // Checked against the whole pre-move body, tail included.
        if session.snake.occupies(new_head) {
            return Ok(self.terminate(EndReason::SelfCollision));
        }

        let grow = new_head == session.food;
        session.snake.advance(new_head, grow);
        if !grow {
            return Ok(TickOutcome::plain(TickEvent::Moved));
        }

        self.score += POINTS_PER_FOOD;
        tracing::debug!(score = self.score, length = session.snake.len(), "food eaten");

        match food::spawn(&mut self.rng, self.grid, &session.snake) {
            Ok(cell) => session.food = cell,
            Err(GameError::BoardFull) => return Ok(self.terminate(EndReason::BoardFull)),
            Err(error) => return Err(error),
        }

        let interval_changed = self.difficulty.on_score(self.score);
        if let Some(interval) = interval_changed {
            tracing::debug!(score = self.score, ?interval, "speed up");
        }

        Ok(TickOutcome {
            event: TickEvent::Ate,
            interval_changed,
        })
    }

    fn terminate(&mut self, reason: EndReason) -> TickOutcome {
        self.status = GameStatus::GameOver;
        self.end_reason = Some(reason);
        if let Some(session) = self.session.take() {
            self.final_length = session.snake.len();
        }

        tracing::info!(?reason, score = self.score, ticks = self.tick_count, "session ended");
        TickOutcome::plain(TickEvent::Ended(reason))
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Score of the running session, or the final score after it ended.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Length of the running snake, or of the snake when the session ended.
    #[must_use]
    pub fn length(&self) -> usize {
        self.snake().map_or(self.final_length, Snake::len)
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn grid(&self) -> GridModel {
        self.grid
    }

    /// The committed direction of the last tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    #[must_use]
    pub fn snake(&self) -> Option<&Snake> {
        self.session.as_ref().map(|session| &session.snake)
    }

    #[must_use]
    pub fn food(&self) -> Option<Cell> {
        self.session.as_ref().map(|session| session.food)
    }

    #[must_use]
    pub fn speed_level(&self) -> SpeedLevel {
        self.difficulty.level()
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.difficulty.current_interval()
    }

    /// Captures everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: self.grid,
            snake: self.snake(),
            food: self.food(),
            direction: self.direction,
            score: self.score,
            length: self.length(),
            status: self.status,
            end_reason: self.end_reason,
            speed_level: self.difficulty.level(),
            tick_interval: self.difficulty.current_interval(),
        }
    }
}

fn check_layout(grid: GridModel, snake: &Snake, food: Cell) -> Result<()> {
    let _ = snake.head()?;

    if !snake.segments().all(|segment| grid.contains(*segment)) {
        return Err(GameError::InvalidLayout("snake leaves the grid"));
    }
    if !snake.is_contiguous() {
        return Err(GameError::InvalidLayout("snake body is not contiguous"));
    }
    let mut seen = HashSet::with_capacity(snake.len());
    if !snake.segments().all(|segment| seen.insert(*segment)) {
        return Err(GameError::InvalidLayout("snake overlaps itself"));
    }
    if !grid.contains(food) {
        return Err(GameError::InvalidLayout("food is outside the grid"));
    }
    if snake.occupies(food) {
        return Err(GameError::InvalidLayout("food is on the snake"));
    }
    Ok(())
}
