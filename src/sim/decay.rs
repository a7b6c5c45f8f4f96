//! Isolation decay

use super::cell::Cell;
use super::grid::Grid;
use super::neighbors::NeighborCache;
use crate::config::DecayConfig;

/// Result of a decay pass
#[derive(Debug, Clone, PartialEq)]
pub struct DecayResult {
    pub grid: Grid,
    /// Cells whose energy actually dropped
    pub decays: u32,
}

/// Drain energy from alive cells with at most one alive neighbor
///
/// Energy never drops below `minimum_energy`, so decay alone never kills.
pub fn apply_isolation_decay(grid: &Grid, config: &DecayConfig) -> DecayResult {
    let cache = NeighborCache::new(grid);
    let mut next = grid.clone();
    let mut decays = 0;

    for (pos, cell) in grid.iter() {
        let Cell::Alive { energy, idle_ticks } = *cell else {
            continue;
        };
        if cache.at(pos) > 1 {
            continue;
        }

        let decayed = energy.saturating_sub(config.amount).max(config.minimum_energy);
        if decayed != energy {
            next.set(
                pos,
                Cell::Alive {
                    energy: decayed,
                    idle_ticks,
                },
            );
            decays += 1;
        }
    }

    DecayResult { grid: next, decays }
}
