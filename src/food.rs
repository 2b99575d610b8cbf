use rand::Rng;

use crate::config::FOOD_SPAWN_ATTEMPTS;
use crate::error::{GameError, Result};
use crate::grid::{Cell, GridModel};
use crate::snake::Snake;

/// Picks a uniformly random cell not occupied by `snake`.
///
/// Rejection sampling is tried first. Once the probe budget is spent the free
/// cells are collected explicitly, so placement terminates however crowded the
/// board is. Returns [`GameError::BoardFull`] when no cell is free.
pub fn spawn<R: Rng + ?Sized>(rng: &mut R, grid: GridModel, snake: &Snake) -> Result<Cell> {
    if snake.len() >= grid.total_cells() {
        return Err(GameError::BoardFull);
    }

    let cols = i32::from(grid.cols());
    let rows = i32::from(grid.rows());
    for _ in 0..FOOD_SPAWN_ATTEMPTS {
        let candidate = Cell::new(rng.gen_range(0..cols), rng.gen_range(0..rows));
        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }

    let free: Vec<Cell> = grid.cells().filter(|cell| !snake.occupies(*cell)).collect();
    if free.is_empty() {
        return Err(GameError::BoardFull);
    }

    tracing::trace!(free = free.len(), "food placement fell back to free-cell scan");
    Ok(free[rng.gen_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::GameError;
    use crate::grid::{Cell, GridModel};
    use crate::snake::Snake;

    use super::spawn;

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridModel::new(8, 6);
        let snake = Snake::from_segments(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
        ]);

        for _ in 0..100 {
            let food = spawn(&mut rng, grid, &snake).expect("board has free cells");
            assert!(grid.contains(food));
            assert!(!snake.occupies(food));
        }
    }

    #[test]
    fn last_free_cell_is_found() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = GridModel::new(3, 3);
        let body: Vec<Cell> = grid
            .cells()
            .filter(|cell| *cell != Cell::new(2, 2))
            .collect();
        let snake = Snake::from_segments(body);

        let food = spawn(&mut rng, grid, &snake).expect("one cell is still free");

        assert_eq!(food, Cell::new(2, 2));
    }

    #[test]
    fn full_board_reports_board_full() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = GridModel::new(2, 2);
        let snake = Snake::from_segments(grid.cells().collect());

        assert!(matches!(
            spawn(&mut rng, grid, &snake),
            Err(GameError::BoardFull)
        ));
    }

    #[test]
    fn single_cell_grid_with_snake_is_full() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = GridModel::new(1, 1);
        let snake = Snake::new(grid.center());

        assert!(matches!(
            spawn(&mut rng, grid, &snake),
            Err(GameError::BoardFull)
        ));
    }
}
