//! Idle tracking for low-energy cells
//!
//! Only E=1 cells accumulate idle ticks. A merge or a fresh birth resets the
//! counter; reaching the threshold turns the cell dormant.

use std::collections::BTreeSet;

use super::cell::Cell;
use super::grid::{Grid, Position};

/// Result of a dormancy pass
#[derive(Debug, Clone, PartialEq)]
pub struct DormancyResult {
    pub grid: Grid,
    pub converted: u32,
}

/// Advance idle counters and convert cells that stayed idle too long
///
/// Merge marks are read here and then cleared on every alive and dormant
/// cell, closing out the turn's scratch state.
pub fn update_dormancy(grid: &Grid, threshold: u32, born: &BTreeSet<Position>) -> DormancyResult {
    let mut next = grid.clone();
    let mut converted = 0;

    for (pos, cell) in grid.iter() {
        match *cell {
            Cell::Alive { energy, idle_ticks } => {
                let merged = grid.marks(pos).merged_this_swipe;
                let cell = if energy > 1 || merged || born.contains(&pos) {
                    Cell::Alive {
                        energy,
                        idle_ticks: 0,
                    }
                } else {
                    let idle_ticks = idle_ticks + 1;
                    if idle_ticks >= threshold {
                        converted += 1;
                        Cell::dormant(energy)
                    } else {
                        Cell::Alive { energy, idle_ticks }
                    }
                };
                next.put(pos, cell, Default::default());
            }
            Cell::Dormant { .. } => {
                next.set_marks(pos, Default::default());
            }
            _ => {}
        }
    }

    if converted > 0 {
        log::trace!("dormancy: {converted} cells went dormant");
    }

    DormancyResult {
        grid: next,
        converted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::CellMarks;

    fn idle(energy: u32, idle_ticks: u32) -> Cell {
        Cell::Alive { energy, idle_ticks }
    }

    #[test]
    fn test_idle_cell_goes_dormant_at_threshold() {
        let grid = Grid::from_rows(vec![vec![idle(1, 2), idle(1, 0)]]);
        let result = update_dormancy(&grid, 3, &BTreeSet::new());

        assert_eq!(result.converted, 1);
        assert_eq!(result.grid.cell(Position::new(0, 0)), &Cell::dormant(1));
        assert_eq!(result.grid.cell(Position::new(0, 1)), &idle(1, 1));
    }

    #[test]
    fn test_high_energy_never_idles() {
        let grid = Grid::from_rows(vec![vec![idle(3, 7)]]);
        let result = update_dormancy(&grid, 1, &BTreeSet::new());
        assert_eq!(result.converted, 0);
        assert_eq!(result.grid.cell(Position::new(0, 0)), &idle(3, 0));
    }

    #[test]
    fn test_merged_and_newborn_reset_counter() {
        let mut grid = Grid::from_rows(vec![vec![idle(1, 2), idle(1, 2)]]);
        grid.set_marks(
            Position::new(0, 0),
            CellMarks {
                merged_this_swipe: true,
                colony_eligible: false,
            },
        );
        let born = BTreeSet::from([Position::new(0, 1)]);

        let result = update_dormancy(&grid, 3, &born);

        assert_eq!(result.converted, 0);
        assert_eq!(result.grid.cell(Position::new(0, 0)), &idle(1, 0));
        assert_eq!(result.grid.cell(Position::new(0, 1)), &idle(1, 0));
        assert!(!result.grid.marks(Position::new(0, 0)).merged_this_swipe);
    }

    #[test]
    fn test_dormant_cells_pass_through() {
        let grid = Grid::from_rows(vec![vec![Cell::dormant(1), Cell::Catalyst]]);
        let result = update_dormancy(&grid, 1, &BTreeSet::new());
        assert_eq!(result.grid, grid);
        assert_eq!(result.converted, 0);
    }
}
