use log::trace;

use super::state::{GRID_SIZE, Grid, Move};

/// Slide/merge every tile in `direction` and return the score gained.
///
/// Tiles nearest the target edge are handled first. Each tile keeps stepping
/// toward the edge while the next cell is empty or holds an equal value, so a
/// tile that just merged may merge again in the same pass
/// (`[2, 2, 4, 0]` moved right becomes `[0, 0, 0, 8]` and scores 4 + 8).
/// A move that changes nothing is not an error; it scores 0.
pub fn apply_direction(grid: &mut Grid, direction: Move) -> u32 {
    let mut delta = 0;
    for (row, col) in scan_order(direction) {
        if grid.0[row][col] != 0 {
            delta += slide_tile(grid, row, col, direction);
        }
    }
    delta
}

/// Row-major cell order with each axis reversed when the step runs along it
/// in the positive direction.
fn scan_order(direction: Move) -> impl Iterator<Item = (usize, usize)> {
    let (dr, dc) = direction.step();
    (0..GRID_SIZE).flat_map(move |r| {
        let row = if dr > 0 { GRID_SIZE - 1 - r } else { r };
        (0..GRID_SIZE).map(move |c| {
            let col = if dc > 0 { GRID_SIZE - 1 - c } else { c };
            (row, col)
        })
    })
}

fn slide_tile(grid: &mut Grid, mut row: usize, mut col: usize, direction: Move) -> u32 {
    let cells = &mut grid.0;
    let mut gained = 0;
    while let Some((next_row, next_col)) = direction.neighbor(row, col) {
        let cur = cells[row][col];
        let next = cells[next_row][next_col];
        if next == 0 {
            cells[next_row][next_col] = cur;
            trace!("({next_row}, {next_col}) is moved from ({row}, {col})");
        } else if next == cur {
            cells[next_row][next_col] += cur;
            gained += cells[next_row][next_col];
            trace!("({next_row}, {next_col}) combines with ({row}, {col})");
        } else {
            break;
        }
        cells[row][col] = 0;
        row = next_row;
        col = next_col;
    }
    gained
}
