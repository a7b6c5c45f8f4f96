//! Moore-neighborhood alive counts
//!
//! Computed eagerly for a whole snapshot. Not incremental: every stage builds
//! its own cache from the grid it reads.

use super::grid::{Grid, Position};

/// 8-neighbor offsets, row-major around the center
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 4-neighbor offsets (up, down, left, right)
pub const VON_NEUMANN_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Alive-neighbor counts for one grid snapshot
#[derive(Debug, Clone)]
pub struct NeighborCache {
    rows: usize,
    cols: usize,
    counts: Vec<u8>,
}

impl NeighborCache {
    pub fn new(grid: &Grid) -> Self {
        let counts = grid
            .positions()
            .map(|pos| {
                MOORE_OFFSETS
                    .iter()
                    .filter(|(dr, dc)| {
                        grid.get(pos.row as isize + dr, pos.col as isize + dc)
                            .is_some_and(|cell| cell.is_alive())
                    })
                    .count() as u8
            })
            .collect();

        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            counts,
        }
    }

    /// Alive neighbors around `(row, col)`; zero outside the board
    pub fn get(&self, row: isize, col: isize) -> usize {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return 0;
        }
        self.counts[row as usize * self.cols + col as usize] as usize
    }

    #[inline]
    pub fn at(&self, pos: Position) -> usize {
        self.get(pos.row as isize, pos.col as isize)
    }
}
