use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use snake_arcade::config::{CELL_WIDTH, FRAME_POLL_INTERVAL};
use snake_arcade::difficulty::SpeedLevel;
use snake_arcade::driver::{Control, GameDriver};
use snake_arcade::engine::SimulationEngine;
use snake_arcade::error::GameError;
use snake_arcade::grid::GridModel;
use snake_arcade::input::{InputEvent, InputHandler};
use snake_arcade::renderer::{fit_grid, TerminalRenderer};
use snake_arcade::score::{load_high_score_or_report, ScoreFile};
use snake_arcade::terminal_runtime::{cleanup_terminal_best_effort, TerminalSession};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Starting speed: 1 slow, 2 normal, 3 fast.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=3))]
    speed: u8,

    /// Fixed number of columns instead of fitting the terminal.
    #[arg(long)]
    cols: Option<u16>,

    /// Fixed number of rows instead of fitting the terminal.
    #[arg(long)]
    rows: Option<u16>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file; defaults to the per-user data directory.
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn grid_for(&self, width: u16, height: u16) -> GridModel {
        let fitted = fit_grid(width, height);
        GridModel::new(
            self.cols.unwrap_or(fitted.cols()),
            self.rows.unwrap_or(fitted.rows()),
        )
    }
}

fn main() -> Result<(), GameError> {
    let cli = Cli::parse();
    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    install_panic_hook();

    let result = run(&cli);
    if let Err(error) = &result {
        tracing::error!(%error, "game aborted");
    }
    result
}

fn run(cli: &Cli) -> Result<(), GameError> {
    let level = SpeedLevel::try_from(cli.speed)?;
    let store = cli
        .scores_file
        .clone()
        .map_or_else(ScoreFile::at_default_location, ScoreFile::new);
    let high_score = load_high_score_or_report(&store, &mut io::stderr());

    let mut renderer = TerminalRenderer::new(TerminalSession::enter()?);
    let (width, height) = renderer.size()?;
    let grid = cli.grid_for(width, height);
    let engine = match cli.seed {
        Some(seed) => SimulationEngine::new_with_seed(grid, level, seed),
        None => SimulationEngine::new(grid, level),
    };

    tracing::info!(
        cols = grid.cols(),
        rows = grid.rows(),
        %level,
        scores = %store.path().display(),
        high_score,
        "snake-arcade starting"
    );

    let mut driver = GameDriver::new(engine, renderer, store, high_score);
    let mut input = InputHandler::new(CELL_WIDTH);
    driver.redraw()?;

    loop {
        let timeout = driver
            .time_until_tick(Instant::now())
            .map_or(FRAME_POLL_INTERVAL, |due| due.min(FRAME_POLL_INTERVAL));

        match input.poll_input(timeout)? {
            Some(InputEvent::Game(game_input)) => {
                if driver.handle_input(game_input, Instant::now())? == Control::Quit {
                    break;
                }
            }
            Some(InputEvent::Resize { width, height }) => {
                driver.resize(cli.grid_for(width, height))?;
            }
            None => {}
        }

        driver.poll(Instant::now())?;
    }

    tracing::info!(high_score = driver.scoreboard().high_score, "snake-arcade exiting");
    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snake_arcade=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort();
        default_hook(panic_info);
    }));
}
