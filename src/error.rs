use std::io;

use thiserror::Error;

/// Errors raised by the simulation core and the terminal front-end.
///
/// Collisions are not errors; they end a session through
/// [`EndReason`](crate::engine::EndReason).
#[derive(Error, Debug)]
pub enum GameError {
    #[error("input {0:?} does not name a direction")]
    InvalidDirection(char),

    #[error("speed level {0} is not one of 1, 2 or 3")]
    InvalidSpeedLevel(u8),

    #[error("no free cell left for food")]
    BoardFull,

    #[error("snake body is empty")]
    EmptyState,

    #[error("invalid starting layout: {0}")]
    InvalidLayout(&'static str),

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
