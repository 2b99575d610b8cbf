//! Grid snake arcade game.
//!
//! The simulation core ([`engine`], [`snake`], [`food`], [`grid`],
//! [`difficulty`]) is pure and deterministic given a seed. [`driver`] wires it
//! to a tick timer, a render sink and a high-score store; the remaining
//! modules implement those for a terminal.

pub mod config;
pub mod difficulty;
pub mod driver;
pub mod engine;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
