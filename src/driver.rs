use std::io;
use std::time::{Duration, Instant};

use crate::engine::{GameStatus, SimulationEngine, Snapshot, TickEvent};
use crate::error::Result;
use crate::grid::GridModel;
use crate::input::GameInput;
use crate::scheduler::TickTimer;

/// High-score figures shown next to the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Scoreboard {
    pub high_score: u32,
    /// Set when the last finished session beat the previous high score.
    pub new_record: bool,
}

/// Destination for rendered frames.
pub trait RenderSink {
    /// Draws one frame from immutable engine state.
    fn render(&mut self, snapshot: &Snapshot<'_>, scoreboard: Scoreboard) -> io::Result<()>;
}

/// Persistent high-score storage.
pub trait HighScoreStore {
    fn load_high_score(&self) -> io::Result<u32>;

    fn save_high_score(&mut self, score: u32) -> io::Result<()>;
}

/// Whether the runtime loop should keep going.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Continue,
    Quit,
}

/// Wires the engine to its timer, render sink and score store.
///
/// Single-threaded: the caller polls it from one loop, so ticks never overlap.
pub struct GameDriver<S, P> {
    engine: SimulationEngine,
    sink: S,
    store: P,
    timer: TickTimer,
    scoreboard: Scoreboard,
}

impl<S, P> GameDriver<S, P>
where
    S: RenderSink,
    P: HighScoreStore,
{
    /// Creates a driver around an already loaded `high_score`.
    ///
    /// The store is only written to; callers load the high score before the
    /// terminal enters raw mode.
    pub fn new(engine: SimulationEngine, sink: S, store: P, high_score: u32) -> Self {
        let timer = TickTimer::new(engine.tick_interval());

        Self {
            engine,
            sink,
            store,
            timer,
            scoreboard: Scoreboard {
                high_score,
                new_record: false,
            },
        }
    }

    /// Starts (or restarts) a session and arms the tick timer.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        self.scoreboard.new_record = false;
        self.engine.start();

        if self.engine.status() == GameStatus::Running {
            self.timer.start(now, self.engine.tick_interval());
        } else {
            self.finish_session();
        }

        self.redraw()
    }

    /// Applies one player input.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Result<Control> {
        match input {
            GameInput::Quit => return Ok(Control::Quit),
            GameInput::Direction(direction) => {
                let _ = self.engine.set_intended_direction(direction);
            }
            GameInput::Confirm => {
                if self.engine.status() != GameStatus::Running {
                    self.start(now)?;
                }
            }
            GameInput::SpeedLevel(level) => match self.engine.set_speed_level(level) {
                Ok(interval) => {
                    self.timer.reschedule(now, interval);
                    self.redraw()?;
                }
                Err(error) => tracing::debug!(%error, "ignoring speed level"),
            },
        }

        Ok(Control::Continue)
    }

    /// Runs a tick when the timer is due.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        if !self.timer.poll(now) {
            return Ok(());
        }

        let outcome = self.engine.tick()?;
        if let Some(interval) = outcome.interval_changed {
            self.timer.reschedule(now, interval);
        }
        if let TickEvent::Ended(_) = outcome.event {
            self.finish_session();
        }

        self.redraw()
    }

    /// Forwards a new display size to the engine and redraws.
    pub fn resize(&mut self, grid: GridModel) -> Result<()> {
        self.engine.request_resize(grid);
        self.redraw()
    }

    /// Renders the current state without advancing it.
    pub fn redraw(&mut self) -> Result<()> {
        self.sink.render(&self.engine.snapshot(), self.scoreboard)?;
        Ok(())
    }

    /// Time until the next scheduled tick, if a session is running.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    #[must_use]
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    fn finish_session(&mut self) {
        self.timer.stop();

        let score = self.engine.score();
        if score <= self.scoreboard.high_score {
            return;
        }

        self.scoreboard = Scoreboard {
            high_score: score,
            new_record: true,
        };
        if let Err(error) = self.store.save_high_score(score) {
            tracing::warn!(%error, score, "could not save high score");
        }
    }

    #[cfg(test)]
    fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::{Duration, Instant};

    use crate::difficulty::SpeedLevel;
    use crate::engine::{EndReason, GameStatus, SimulationEngine, Snapshot};
    use crate::grid::{Cell, GridModel};
    use crate::input::{Direction, GameInput};
    use crate::snake::Snake;

    use super::{Control, GameDriver, HighScoreStore, RenderSink, Scoreboard};

    const MS: Duration = Duration::from_millis(1);

    #[derive(Debug, Default)]
    struct RecordingSink {
        frames: Vec<(GameStatus, u32, Scoreboard)>,
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, snapshot: &Snapshot<'_>, scoreboard: Scoreboard) -> io::Result<()> {
            self.frames.push((snapshot.status, snapshot.score, scoreboard));
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct MemoryStore {
        stored: u32,
        saves: usize,
        broken: bool,
    }

    impl HighScoreStore for MemoryStore {
        fn load_high_score(&self) -> io::Result<u32> {
            if self.broken {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt"));
            }
            Ok(self.stored)
        }

        fn save_high_score(&mut self, score: u32) -> io::Result<()> {
            self.stored = score;
            self.saves += 1;
            Ok(())
        }
    }

    fn driver(stored: u32) -> GameDriver<RecordingSink, MemoryStore> {
        let engine =
            SimulationEngine::new_with_seed(GridModel::new(10, 10), SpeedLevel::Normal, 42);
        GameDriver::new(
            engine,
            RecordingSink::default(),
            MemoryStore {
                stored,
                ..MemoryStore::default()
            },
            stored,
        )
    }

    /// Puts the snake one step left of the right wall with food right in front.
    fn one_bite_from_the_wall(driver: &mut GameDriver<RecordingSink, MemoryStore>) {
        driver
            .engine_mut()
            .start_with_layout(
                Snake::new(Cell::new(8, 5)),
                Direction::Right,
                Cell::new(9, 5),
            )
            .expect("layout has a head");
    }

    #[test]
    fn start_renders_and_arms_timer() {
        let now = Instant::now();
        let mut driver = driver(0);

        driver.start(now).expect("start succeeds");

        assert_eq!(driver.engine().status(), GameStatus::Running);
        assert_eq!(driver.sink().frames.len(), 1);
        assert_eq!(driver.time_until_tick(now), Some(MS * 150));
    }

    #[test]
    fn poll_ticks_only_when_due() {
        let now = Instant::now();
        let mut driver = driver(0);
        driver.start(now).expect("start succeeds");

        driver.poll(now + MS * 149).expect("poll succeeds");
        assert_eq!(driver.engine().tick_count(), 0);

        driver.poll(now + MS * 150).expect("poll succeeds");
        assert_eq!(driver.engine().tick_count(), 1);
        assert_eq!(driver.sink().frames.len(), 2);
    }

    #[test]
    fn game_over_saves_new_high_score_and_stops_timer() {
        let now = Instant::now();
        let mut driver = driver(5);
        driver.start(now).expect("start succeeds");
        one_bite_from_the_wall(&mut driver);

        driver.poll(now + MS * 150).expect("eats");
        driver.poll(now + MS * 300).expect("hits wall");

        assert_eq!(driver.engine().status(), GameStatus::GameOver);
        assert_eq!(driver.engine().end_reason(), Some(EndReason::WallCollision));
        assert_eq!(driver.store().stored, 10);
        assert_eq!(driver.store().saves, 1);
        assert_eq!(
            driver.scoreboard(),
            Scoreboard {
                high_score: 10,
                new_record: true
            }
        );
        assert_eq!(driver.time_until_tick(now), None);
    }

    #[test]
    fn lower_score_is_not_saved() {
        let now = Instant::now();
        let mut driver = driver(500);
        driver.start(now).expect("start succeeds");
        one_bite_from_the_wall(&mut driver);

        driver.poll(now + MS * 150).expect("eats");
        driver.poll(now + MS * 300).expect("hits wall");

        assert_eq!(driver.engine().status(), GameStatus::GameOver);
        assert_eq!(driver.store().saves, 0);
        assert!(!driver.scoreboard().new_record);
    }

    #[test]
    fn speed_change_reschedules_running_timer() {
        let now = Instant::now();
        let mut driver = driver(0);
        driver.start(now).expect("start succeeds");

        let control = driver
            .handle_input(GameInput::SpeedLevel(3), now + MS * 100)
            .expect("input handled");

        assert_eq!(control, Control::Continue);
        assert_eq!(driver.time_until_tick(now + MS * 100), Some(MS * 90));
        assert_eq!(driver.engine().status(), GameStatus::Running);
    }

    #[test]
    fn invalid_speed_level_is_ignored() {
        let now = Instant::now();
        let mut driver = driver(0);

        driver
            .handle_input(GameInput::SpeedLevel(9), now)
            .expect("input handled");

        assert_eq!(driver.engine().speed_level(), SpeedLevel::Normal);
        assert!(driver.sink().frames.is_empty());
    }

    #[test]
    fn confirm_restarts_after_game_over() {
        let now = Instant::now();
        let mut driver = driver(0);
        driver.start(now).expect("start succeeds");
        one_bite_from_the_wall(&mut driver);
        driver.poll(now + MS * 150).expect("eats");
        driver.poll(now + MS * 300).expect("hits wall");

        driver
            .handle_input(GameInput::Confirm, now + MS * 400)
            .expect("input handled");

        assert_eq!(driver.engine().status(), GameStatus::Running);
        assert_eq!(driver.engine().score(), 0);
        assert!(!driver.scoreboard().new_record);
    }

    #[test]
    fn direction_input_is_buffered_until_tick() {
        let now = Instant::now();
        let mut driver = driver(0);
        driver.start(now).expect("start succeeds");

        driver
            .handle_input(GameInput::Direction(Direction::Up), now)
            .expect("input handled");

        assert_eq!(driver.engine().direction(), Direction::Right);
        assert_eq!(driver.engine().pending_direction(), Direction::Up);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut driver = driver(0);

        assert_eq!(
            driver
                .handle_input(GameInput::Quit, Instant::now())
                .expect("input handled"),
            Control::Quit
        );
    }

    #[test]
    fn high_score_comes_from_caller_not_store() {
        let now = Instant::now();
        let engine =
            SimulationEngine::new_with_seed(GridModel::new(10, 10), SpeedLevel::Normal, 1);
        let mut driver = GameDriver::new(
            engine,
            RecordingSink::default(),
            MemoryStore {
                broken: true,
                ..MemoryStore::default()
            },
            40,
        );

        driver.start(now).expect("start succeeds");

        assert_eq!(driver.scoreboard().high_score, 40);
        assert_eq!(driver.sink().frames[0].2.high_score, 40);
    }
}
