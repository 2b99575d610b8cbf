use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::config::SWIPE_SENSITIVITY_CELLS;
use crate::error::GameError;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = GameError;

    /// Maps WASD keys, case-insensitively.
    fn try_from(key: char) -> Result<Self, Self::Error> {
        match key.to_ascii_lowercase() {
            'w' => Ok(Self::Up),
            's' => Ok(Self::Down),
            'a' => Ok(Self::Left),
            'd' => Ok(Self::Right),
            _ => Err(GameError::InvalidDirection(key)),
        }
    }
}

/// High-level input events consumed by the game driver.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Raw speed level as typed by the player; validated by the engine.
    SpeedLevel(u8),
    Confirm,
    Quit,
}

/// Everything the terminal can tell the runtime loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputEvent {
    Game(GameInput),
    Resize { width: u16, height: u16 },
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Maps a drag gesture to a direction along its dominant axis.
///
/// Gestures shorter than the sensitivity threshold are ignored. Deltas are in
/// logical cells, positive `dy` pointing down.
#[must_use]
pub fn direction_from_swipe(dx: i32, dy: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > SWIPE_SENSITIVITY_CELLS {
            Some(Direction::Right)
        } else if dx < -SWIPE_SENSITIVITY_CELLS {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > SWIPE_SENSITIVITY_CELLS {
        Some(Direction::Down)
    } else if dy < -SWIPE_SENSITIVITY_CELLS {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Translates one key press into a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Up => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Down => Some(GameInput::Direction(Direction::Down)),
        KeyCode::Left => Some(GameInput::Direction(Direction::Left)),
        KeyCode::Right => Some(GameInput::Direction(Direction::Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameInput::Confirm),
        KeyCode::Esc => Some(GameInput::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(GameInput::Quit)
        }
        KeyCode::Char('q' | 'Q') => Some(GameInput::Quit),
        KeyCode::Char(digit @ '1'..='9') => {
            let level = digit.to_digit(10).and_then(|d| u8::try_from(d).ok())?;
            Some(GameInput::SpeedLevel(level))
        }
        KeyCode::Char(other) => match Direction::try_from(other) {
            Ok(direction) => Some(GameInput::Direction(direction)),
            Err(error) => {
                tracing::trace!(%error, "ignoring key");
                None
            }
        },
        _ => None,
    }
}

/// Polls crossterm for keyboard, mouse and resize events.
#[derive(Debug)]
pub struct InputHandler {
    drag_origin: Option<(u16, u16)>,
    cell_width: u16,
}

impl InputHandler {
    /// Creates a handler; `cell_width` converts mouse columns into cells.
    #[must_use]
    pub fn new(cell_width: u16) -> Self {
        Self {
            drag_origin: None,
            cell_width: cell_width.max(1),
        }
    }

    /// Waits up to `timeout` for the next relevant event.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let input = match event::read()? {
            Event::Key(key) => map_key(key).map(InputEvent::Game),
            Event::Mouse(mouse) => self
                .track_drag(mouse)
                .map(|direction| InputEvent::Game(GameInput::Direction(direction))),
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        };

        Ok(input)
    }

    fn track_drag(&mut self, mouse: MouseEvent) -> Option<Direction> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_origin = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (start_col, start_row) = self.drag_origin.take()?;
                let dx = (i32::from(mouse.column) - i32::from(start_col))
                    / i32::from(self.cell_width);
                let dy = i32::from(mouse.row) - i32::from(start_row);
                direction_from_swipe(dx, dy)
            }
            _ => None,
        }
    }
}
