use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Side length of the square grid.
pub const GRID_SIZE: usize = 4;

/// Value written into every freshly spawned tile.
pub const SEED_VALUE: u32 = 2;

pub(crate) type Cells = [[u32; GRID_SIZE]; GRID_SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Unit step `(d_row, d_col)` toward the target edge.
    #[inline]
    pub(crate) fn step(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// Neighbor of `(row, col)` one step toward the target edge, or `None`
    /// when the cell already sits on that edge.
    #[inline]
    pub(crate) fn neighbor(self, row: usize, col: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.step();
        let row = row.checked_add_signed(dr).filter(|&r| r < GRID_SIZE)?;
        let col = col.checked_add_signed(dc).filter(|&c| c < GRID_SIZE)?;
        Some((row, col))
    }
}

/// Plain 4x4 grid of tile values, 0 meaning empty.
///
/// Values are the tiles themselves (2, 4, 8, ...), not exponents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(pub(crate) Cells);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; GRID_SIZE]; GRID_SIZE]);

    /// An empty grid.
    #[inline]
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Build a grid from row-major cell values.
    ///
    /// ```
    /// use tg2048_engine::engine::Grid;
    /// let g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(g.get(0, 1), Ok(2));
    /// ```
    #[inline]
    pub fn from_rows(rows: Cells) -> Self {
        Grid(rows)
    }

    /// Borrow the cells, row-major.
    #[inline]
    pub fn rows(&self) -> &Cells {
        &self.0
    }

    /// Read a cell. Coordinates outside the grid are an error.
    pub fn get(&self, row: usize, col: usize) -> Result<u32, EngineError> {
        check_bounds(row, col)?;
        Ok(self.0[row][col])
    }

    /// Write a cell. Coordinates outside the grid are an error.
    pub fn set(&mut self, row: usize, col: usize, value: u32) -> Result<(), EngineError> {
        check_bounds(row, col)?;
        self.0[row][col] = value;
        Ok(())
    }

    /// True iff no cell is empty.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.0.iter().flatten().all(|&v| v != 0)
    }

    /// Number of occupied cells.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v != 0).count()
    }

    /// Highest tile value on the grid (0 for an empty grid).
    #[inline]
    pub fn highest_tile(&self) -> u32 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Fixed-width text table, one line per row.
    ///
    /// ```
    /// use tg2048_engine::engine::Grid;
    /// let g = Grid::from_rows([[2, 0, 0, 1024], [0; 4], [0; 4], [0; 4]]);
    /// assert!(g.render().starts_with("[   2]\t[    ]\t[    ]\t[1024]\t\n"));
    /// ```
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn check_bounds(row: usize, col: usize) -> Result<(), EngineError> {
    if row < GRID_SIZE && col < GRID_SIZE {
        Ok(())
    } else {
        Err(EngineError::IndexOutOfRange {
            row,
            col,
            size: GRID_SIZE,
        })
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            for &val in row {
                match val {
                    0 => write!(f, "[    ]\t")?,
                    v => write!(f, "[{v:4}]\t")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<Cells> for Grid {
    fn from(rows: Cells) -> Self {
        Grid::from_rows(rows)
    }
}
