//! Flattened board views for renderers and session files

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellKind};
use super::grid::Grid;

/// One cell in a [`BoardSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCell {
    pub x: usize,
    pub y: usize,
    pub kind: CellKind,
    /// Cell energy; blight tokens report their remaining charges here
    pub energy: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_this_swipe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_merge_ticks: Option<u32>,
}

/// Row-major flattened board plus per-kind counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<SerializedCell>,
    pub alive_cells: usize,
    pub dormant_cells: usize,
    pub blight_tokens: usize,
    pub catalyst_tokens: usize,
}

impl BoardSnapshot {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut snapshot = Self {
            width: grid.cols(),
            height: grid.rows(),
            cells: Vec::with_capacity(grid.len()),
            alive_cells: 0,
            dormant_cells: 0,
            blight_tokens: 0,
            catalyst_tokens: 0,
        };

        for (pos, cell) in grid.iter() {
            let mut serialized = SerializedCell {
                x: pos.col,
                y: pos.row,
                kind: cell.kind(),
                energy: 0,
                merged_this_swipe: None,
                no_merge_ticks: None,
            };

            match *cell {
                Cell::Empty => {}
                Cell::Alive { energy, idle_ticks } => {
                    serialized.energy = energy;
                    serialized.merged_this_swipe = Some(grid.marks(pos).merged_this_swipe);
                    serialized.no_merge_ticks = Some(idle_ticks);
                    snapshot.alive_cells += 1;
                }
                Cell::Dormant { energy } => {
                    serialized.energy = energy;
                    serialized.no_merge_ticks = Some(0);
                    snapshot.dormant_cells += 1;
                }
                Cell::Catalyst => snapshot.catalyst_tokens += 1,
                Cell::Blight { charges } => {
                    serialized.energy = charges;
                    snapshot.blight_tokens += 1;
                }
            }

            snapshot.cells.push(serialized);
        }

        snapshot
    }
}

/// Energy held by alive cells (dormant cells excluded)
pub fn total_energy(grid: &Grid) -> u64 {
    grid.cells()
        .iter()
        .filter(|cell| cell.is_alive())
        .map(|cell| u64::from(cell.energy()))
        .sum()
}

/// No empty cell remains anywhere on the board
pub fn is_game_over(grid: &Grid) -> bool {
    !grid.cells().iter().any(Cell::is_empty)
}

/// A stable turn that reached the difficulty's energy target
pub fn check_win_condition(total_energy: u64, stability_incremented: bool, threshold: u64) -> bool {
    stability_incremented && total_energy >= threshold
}
