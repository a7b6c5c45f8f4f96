//! Cellular automaton tick over the discrete board

use std::collections::BTreeSet;

use super::cell::Cell;
use super::grid::{CellMarks, Grid, Position};
use super::neighbors::NeighborCache;
use crate::config::LifeRules;

/// Result of one Life generation
#[derive(Debug, Clone, PartialEq)]
pub struct LifeTickResult {
    pub grid: Grid,
    pub births: u32,
    pub deaths: u32,
    /// Cells born this tick; exempt from the dormancy idle counter
    pub born: BTreeSet<Position>,
}

/// Apply birth/survival rules to every cell of `grid`
///
/// Alive cells survive untouched (energy, idle counter, marks) or die to
/// empty. Empty cells may be born at E=1. Dormant cells and hazard tokens
/// pass through.
pub fn life_tick(grid: &Grid, rules: &LifeRules) -> LifeTickResult {
    let cache = NeighborCache::new(grid);
    let mut next = grid.clone();
    let mut births = 0;
    let mut deaths = 0;
    let mut born = BTreeSet::new();

    for (pos, cell) in grid.iter() {
        let neighbors = cache.at(pos);
        match cell {
            Cell::Alive { .. } if !rules.survival.contains(neighbors) => {
                next.clear(pos);
                deaths += 1;
            }
            Cell::Empty if rules.birth.contains(neighbors) => {
                next.put(pos, Cell::alive(1), CellMarks::default());
                born.insert(pos);
                births += 1;
            }
            _ => {}
        }
    }

    log::trace!("life tick: births={births} deaths={deaths}");

    LifeTickResult {
        grid: next,
        births,
        deaths,
        born,
    }
}
