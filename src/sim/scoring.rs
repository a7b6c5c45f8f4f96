//! Board energy tally and stability streak

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::consts::{STREAK_MULTIPLIER_CAP, STREAK_MULTIPLIER_STEP};

/// Energy on the board after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub total_energy: u64,
    /// No births or deaths happened this turn
    pub stability_incremented: bool,
}

/// Consecutive stable turns and the derived score multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakState {
    pub streak: u32,
    pub multiplier: f64,
}

impl Default for StreakState {
    fn default() -> Self {
        Self {
            streak: 0,
            multiplier: 1.0,
        }
    }
}

/// Sum the energy of every cell
pub fn tally_score(grid: &Grid, had_birth_or_death: bool) -> ScoreResult {
    let total_energy = grid.cells().iter().map(|cell| u64::from(cell.energy())).sum();
    ScoreResult {
        total_energy,
        stability_incremented: !had_birth_or_death,
    }
}

/// Multiplier for a streak length: 1x, then +0.25 per stable turn, capped at 3x
pub fn streak_multiplier(streak: u32) -> f64 {
    if streak == 0 {
        return 1.0;
    }
    (1.0 + STREAK_MULTIPLIER_STEP * f64::from(streak - 1)).min(STREAK_MULTIPLIER_CAP)
}

/// Extend the streak on a stable turn, reset it otherwise
pub fn update_streak(state: &StreakState, stability_incremented: bool) -> StreakState {
    if !stability_incremented {
        return StreakState::default();
    }
    let streak = state.streak.saturating_add(1);
    StreakState {
        streak,
        multiplier: streak_multiplier(streak),
    }
}
