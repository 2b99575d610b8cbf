use std::collections::VecDeque;

use crate::error::{GameError, Result};
use crate::grid::Cell;

/// Ordered snake body, head first.
///
/// The only mutation path is [`Snake::advance`]; direction handling lives in
/// the engine.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Cell) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);
        Self { body }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Self {
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Returns the current head position.
    pub fn head(&self) -> Result<Cell> {
        self.body.front().copied().ok_or(GameError::EmptyState)
    }

    /// Returns the last segment, if any.
    #[must_use]
    pub fn tail(&self) -> Option<Cell> {
        self.body.back().copied()
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Prepends `new_head`; the tail is kept only when growing.
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    /// Returns true when each segment touches the next one.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.body
            .iter()
            .zip(self.body.iter().skip(1))
            .all(|(a, b)| a.is_adjacent(*b))
    }
}
