use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Returns the neighbouring cell one step towards `direction`.
    ///
    /// The result may lie outside any grid; callers check it with
    /// [`GridModel::contains`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.col, self.row - 1),
            Direction::Down => Self::new(self.col, self.row + 1),
            Direction::Left => Self::new(self.col - 1, self.row),
            Direction::Right => Self::new(self.col + 1, self.row),
        }
    }

    /// Returns true when `other` is exactly one orthogonal step away.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        (self.col - other.col).abs() + (self.row - other.row).abs() == 1
    }
}

/// Playable bounds of one session.
///
/// Dimensions are fixed for the lifetime of a session. A grid always has at
/// least one column and one row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridModel {
    cols: u16,
    rows: u16,
}

impl GridModel {
    /// Creates a grid, clamping each dimension to at least one cell.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Fits as many whole cells as possible into a display area.
    ///
    /// `cell_width` and `cell_height` are the size of one logical cell in
    /// display units and must be non-zero.
    #[must_use]
    pub fn fit(area_width: u16, area_height: u16, cell_width: u16, cell_height: u16) -> Self {
        Self::new(
            area_width / cell_width.max(1),
            area_height / cell_height.max(1),
        )
    }

    #[must_use]
    pub fn cols(self) -> u16 {
        self.cols
    }

    #[must_use]
    pub fn rows(self) -> u16 {
        self.rows
    }

    /// Returns true when `cell` lies inside the grid.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && cell.col < i32::from(self.cols)
            && cell.row < i32::from(self.rows)
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }

    /// Spawn cell for a new snake.
    #[must_use]
    pub fn center(self) -> Cell {
        Cell::new(i32::from(self.cols / 2), i32::from(self.rows / 2))
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let cols = i32::from(self.cols);
        (0..i32::from(self.rows)).flat_map(move |row| (0..cols).map(move |col| Cell::new(col, row)))
    }
}
