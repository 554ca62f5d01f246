use log::debug;
use rand::Rng;

use super::error::EngineError;
use super::state::{GRID_SIZE, Grid, SEED_VALUE};

/// A tile written by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Drops seed tiles onto a grid using the wrapped random source.
///
/// Placement draws a cell uniformly from the whole grid and, if it is taken,
/// walks forward with wraparound until a free cell turns up. Free cells that
/// follow long occupied runs are therefore favored; this is the intended rule.
#[derive(Debug, Clone)]
pub struct Spawner<R> {
    rng: R,
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Place a seed tile, or fail with `BoardFull` when no cell is empty.
    ///
    /// ```
    /// use tg2048_engine::engine::{Grid, Spawner};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut spawner = Spawner::new(StdRng::seed_from_u64(7));
    /// let mut grid = Grid::new();
    /// let spawn = spawner.place_random_tile(&mut grid).unwrap();
    /// assert_eq!(grid.get(spawn.row, spawn.col), Ok(2));
    /// ```
    pub fn place_random_tile(&mut self, grid: &mut Grid) -> Result<Spawn, EngineError> {
        if grid.is_full() {
            return Err(EngineError::BoardFull);
        }
        let x = self.rng.gen_range(0..GRID_SIZE);
        let y = self.rng.gen_range(0..GRID_SIZE);
        let (row, col) = resolve_collision(grid, x, y)?;
        grid.0[row][col] = SEED_VALUE;
        debug!("square at {row} {col} was generated");
        Ok(Spawn {
            row,
            col,
            value: SEED_VALUE,
        })
    }
}

/// Walk forward from `(x, y)` to the first empty cell.
///
/// `x` advances every step and `y` advances whenever `x` wraps, so the whole
/// grid is visited within `GRID_SIZE²` steps. Fails with `BoardFull` on a full
/// grid and `IndexOutOfRange` for a start outside the grid.
pub fn resolve_collision(grid: &Grid, mut x: usize, mut y: usize) -> Result<(usize, usize), EngineError> {
    grid.get(x, y)?;
    for _ in 0..GRID_SIZE * GRID_SIZE {
        if grid.0[x][y] == 0 {
            return Ok((x, y));
        }
        if x == GRID_SIZE - 1 {
            y = (y + 1) % GRID_SIZE;
        }
        x = (x + 1) % GRID_SIZE;
    }
    Err(EngineError::BoardFull)
}
