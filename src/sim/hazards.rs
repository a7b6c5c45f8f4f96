//! Blight and catalyst tokens
//!
//! Spawning is stochastic and capped. The blight step runs every turn and
//! converts adjacent alive cells to dormant unless a short local Life run
//! shows them to be part of a still life or a period-2 oscillator.

use super::cell::Cell;
use super::grid::{CellMarks, Grid, Position};
use super::neighbors::{MOORE_OFFSETS, VON_NEUMANN_OFFSETS};
use super::rng::{RandomSource, unit_to_index};
use crate::config::{BlightConfig, CatalystConfig, LifeRules};
use crate::consts::SHIELD_WINDOW;

/// Result of a spawn attempt
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnResult {
    pub grid: Grid,
    pub spawned: bool,
}

/// Result of the blight step
#[derive(Debug, Clone, PartialEq)]
pub struct BlightResult {
    pub grid: Grid,
    pub conversions: u32,
}

/// Maybe place a blight token on a random empty cell
pub fn spawn_blight(grid: &Grid, config: &BlightConfig, rng: &mut dyn RandomSource) -> SpawnResult {
    spawn_token(
        grid,
        config.spawn_chance,
        config.max_tokens,
        Cell::blight(config.linger),
        Cell::is_blight,
        rng,
    )
}

/// Maybe place a catalyst token on a random empty cell
pub fn spawn_catalyst(
    grid: &Grid,
    config: &CatalystConfig,
    rng: &mut dyn RandomSource,
) -> SpawnResult {
    spawn_token(
        grid,
        config.spawn_chance,
        Some(config.max_count),
        Cell::Catalyst,
        Cell::is_catalyst,
        rng,
    )
}

fn spawn_token(
    grid: &Grid,
    chance: f64,
    cap: Option<usize>,
    token: Cell,
    is_token: fn(&Cell) -> bool,
    rng: &mut dyn RandomSource,
) -> SpawnResult {
    let unchanged = || SpawnResult {
        grid: grid.clone(),
        spawned: false,
    };

    if rng.next_unit() >= chance {
        return unchanged();
    }
    if cap.is_some_and(|cap| grid.count_where(is_token) >= cap) {
        return unchanged();
    }

    let empties = grid.positions_where(Cell::is_empty);
    if empties.is_empty() {
        return unchanged();
    }

    let pos = empties[unit_to_index(rng.next_unit(), empties.len())];
    let mut next = grid.clone();
    next.put(pos, token, CellMarks::default());
    log::trace!("spawned {} at ({}, {})", token.kind(), pos.row, pos.col);

    SpawnResult {
        grid: next,
        spawned: true,
    }
}

/// Convert unshielded alive neighbors of every blight token, then spend a charge
///
/// Tokens are processed row-major. Shielding is judged against the board as
/// it stood when the step began, so one conversion never unshields another
/// cell within the same step.
pub fn apply_blight(grid: &Grid, rules: &LifeRules) -> BlightResult {
    let mut next = grid.clone();
    let mut conversions = 0;

    for (pos, cell) in grid.iter() {
        let Cell::Blight { charges } = *cell else {
            continue;
        };

        for (dr, dc) in VON_NEUMANN_OFFSETS {
            let row = pos.row as isize + dr;
            let col = pos.col as isize + dc;
            if !grid.in_bounds(row, col) {
                continue;
            }
            let target = Position::new(row as usize, col as usize);
            let Cell::Alive { energy, .. } = *next.cell(target) else {
                continue;
            };
            if is_shielded(grid, target, rules) {
                continue;
            }
            next.put(target, Cell::dormant(energy), CellMarks::default());
            conversions += 1;
        }

        let remaining = charges.saturating_sub(1);
        if remaining == 0 {
            next.clear(pos);
        } else {
            next.set(pos, Cell::blight(remaining));
        }
    }

    if conversions > 0 {
        log::debug!("blight converted {conversions} cells");
    }

    BlightResult {
        grid: next,
        conversions,
    }
}

/// Whether the cell at `pos` is locally stable under `rules`
///
/// Samples a 5x5 alive/dead window centered on `pos` (outside the window and
/// outside the board count as dead) and runs two generations. The cell is
/// shielded when its center state after one or two generations equals its
/// current state.
pub fn is_shielded(grid: &Grid, pos: Position, rules: &LifeRules) -> bool {
    let half = (SHIELD_WINDOW / 2) as isize;
    let mut window = [[false; SHIELD_WINDOW]; SHIELD_WINDOW];
    for (wr, row) in window.iter_mut().enumerate() {
        for (wc, alive) in row.iter_mut().enumerate() {
            let r = pos.row as isize + wr as isize - half;
            let c = pos.col as isize + wc as isize - half;
            *alive = grid.get(r, c).is_some_and(Cell::is_alive);
        }
    }

    let center = half as usize;
    let gen0 = window[center][center];
    let gen1 = step_window(&window, rules);
    if gen1[center][center] == gen0 {
        return true;
    }
    let gen2 = step_window(&gen1, rules);
    gen2[center][center] == gen0
}

type Window = [[bool; SHIELD_WINDOW]; SHIELD_WINDOW];

fn step_window(window: &Window, rules: &LifeRules) -> Window {
    let mut next = [[false; SHIELD_WINDOW]; SHIELD_WINDOW];
    for r in 0..SHIELD_WINDOW {
        for c in 0..SHIELD_WINDOW {
            let neighbors = MOORE_OFFSETS
                .iter()
                .filter(|(dr, dc)| {
                    let nr = r as isize + dr;
                    let nc = c as isize + dc;
                    nr >= 0
                        && nc >= 0
                        && (nr as usize) < SHIELD_WINDOW
                        && (nc as usize) < SHIELD_WINDOW
                        && window[nr as usize][nc as usize]
                })
                .count();
            next[r][c] = rules.next_state(window[r][c], neighbors);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::GridDims;
    use crate::sim::rng::testing::ScriptedRng;

    fn blight_config(spawn_chance: f64, max_tokens: Option<usize>) -> BlightConfig {
        BlightConfig {
            spawn_chance,
            linger: 2,
            max_tokens,
        }
    }

    #[test]
    fn test_blight_converts_unshielded_neighbor() {
        let mut grid = Grid::new(GridDims::square(4));
        grid.set(Position::new(0, 0), Cell::blight(1));
        grid.set(Position::new(0, 1), Cell::alive(2));

        let result = apply_blight(&grid, &LifeRules::default());

        assert_eq!(result.conversions, 1);
        assert_eq!(result.grid.cell(Position::new(0, 1)), &Cell::dormant(2));
        assert!(result.grid.cell(Position::new(0, 0)).is_empty());
        assert!(grid.cell(Position::new(0, 0)).is_blight(), "input untouched");
    }

    #[test]
    fn test_still_life_block_is_shielded() {
        let mut grid = Grid::new(GridDims::square(5));
        for pos in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            grid.set(Position::new(pos.0, pos.1), Cell::alive(1));
        }
        grid.set(Position::new(1, 3), Cell::blight(2));

        let result = apply_blight(&grid, &LifeRules::default());

        assert_eq!(result.conversions, 0);
        assert!(result.grid.cell(Position::new(1, 2)).is_alive());
        assert_eq!(result.grid.cell(Position::new(1, 3)), &Cell::blight(1));
    }

    #[test]
    fn test_blinker_center_is_shielded() {
        let mut grid = Grid::new(GridDims::square(5));
        for col in 1..=3 {
            grid.set(Position::new(2, col), Cell::alive(1));
        }
        assert!(is_shielded(&grid, Position::new(2, 2), &LifeRules::default()));
        // Blinker ends flip every generation: dead at gen1, alive again at gen2
        assert!(is_shielded(&grid, Position::new(2, 1), &LifeRules::default()));
    }

    #[test]
    fn test_lonely_cell_is_not_shielded() {
        let mut grid = Grid::new(GridDims::square(3));
        grid.set(Position::new(1, 1), Cell::alive(1));
        assert!(!is_shielded(&grid, Position::new(1, 1), &LifeRules::default()));
    }

    #[test]
    fn test_dormant_neighbors_are_ignored() {
        let grid = Grid::from_rows(vec![vec![Cell::dormant(1), Cell::blight(3), Cell::Catalyst]]);
        let result = apply_blight(&grid, &LifeRules::default());
        assert_eq!(result.conversions, 0);
        assert_eq!(result.grid.cell(Position::new(0, 1)), &Cell::blight(2));
    }

    #[test]
    fn test_spawn_respects_chance() {
        let grid = Grid::new(GridDims::square(3));
        let mut rng = ScriptedRng::new(&[0.5]);
        let result = spawn_blight(&grid, &blight_config(0.5, None), &mut rng);
        assert!(!result.spawned);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_spawn_places_on_empty_cell() {
        let mut grid = Grid::new(GridDims::new(1, 3));
        grid.set(Position::new(0, 0), Cell::alive(1));
        // Second draw picks index 1 of the two empties: (0, 2)
        let mut rng = ScriptedRng::new(&[0.1, 0.75]);

        let result = spawn_blight(&grid, &blight_config(0.5, None), &mut rng);

        assert!(result.spawned);
        assert_eq!(result.grid.cell(Position::new(0, 2)), &Cell::blight(2));
        assert!(result.grid.cell(Position::new(0, 1)).is_empty());
    }

    #[test]
    fn test_spawn_respects_caps() {
        let mut grid = Grid::new(GridDims::new(1, 3));
        grid.set(Position::new(0, 0), Cell::Catalyst);
        let mut rng = ScriptedRng::new(&[0.0, 0.0]);
        let config = CatalystConfig {
            spawn_chance: 1.0,
            max_count: 1,
        };
        assert!(!spawn_catalyst(&grid, &config, &mut rng).spawned);

        grid.set(Position::new(0, 0), Cell::blight(1));
        let mut rng = ScriptedRng::new(&[0.0, 0.0]);
        assert!(!spawn_blight(&grid, &blight_config(1.0, Some(1)), &mut rng).spawned);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let grid = Grid::from_rows(vec![vec![Cell::alive(1), Cell::alive(2)]]);
        let mut rng = ScriptedRng::new(&[0.0]);
        let config = CatalystConfig {
            spawn_chance: 1.0,
            max_count: 4,
        };
        let result = spawn_catalyst(&grid, &config, &mut rng);
        assert!(!result.spawned);
        assert_eq!(result.grid, grid);
    }
}
