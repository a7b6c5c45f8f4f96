//! Merge and catalyst energy arithmetic

use super::cell::Cell;
use crate::error::EngineError;

/// Inputs to a single merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeContext {
    pub e_cap: u32,
    /// Both participants belong to a qualifying colony
    pub colony_bonus_eligible: bool,
}

/// Merged energy before bonus and cap
///
/// - alive + alive, equal: `E + 1`
/// - alive + alive, unequal: `max(higher - 1, 1)`
/// - alive + dormant: `max(max(alive, dormant) - 1, 1)`
pub fn merged_energy(lhs: &Cell, rhs: &Cell) -> Result<u32, EngineError> {
    let invalid = EngineError::InvalidMerge {
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    };

    let (alive, other) = match (lhs, rhs) {
        (Cell::Alive { energy, .. }, other) => (*energy, other),
        (other, Cell::Alive { energy, .. }) => (*energy, other),
        _ => return Err(invalid),
    };

    match *other {
        Cell::Alive { energy, .. } if energy == alive => Ok(alive + 1),
        Cell::Alive { energy, .. } => Ok(alive.max(energy).saturating_sub(1).max(1)),
        Cell::Dormant { energy } => Ok(alive.max(energy).saturating_sub(1).max(1)),
        _ => Err(invalid),
    }
}

/// Combine two cells into one fresh alive cell
///
/// The colony bonus (+1) is applied before clamping to `e_cap`. The result
/// starts with a zeroed idle counter; callers mark it merged-this-swipe.
pub fn merge_cells(lhs: &Cell, rhs: &Cell, context: MergeContext) -> Result<Cell, EngineError> {
    let mut energy = merged_energy(lhs, rhs)?;
    if context.colony_bonus_eligible {
        energy += 1;
    }
    Ok(Cell::alive(energy.min(context.e_cap)))
}

/// Double a cell's energy, capped at `cap`
pub fn apply_catalyst(cell: &Cell, cap: u32) -> Cell {
    match *cell {
        Cell::Alive { energy, idle_ticks } => Cell::Alive {
            energy: energy.saturating_mul(2).min(cap),
            idle_ticks,
        },
        Cell::Dormant { energy } => Cell::Dormant {
            energy: energy.saturating_mul(2).min(cap),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cell::CellKind;
    use proptest::prelude::*;

    fn ctx(e_cap: u32) -> MergeContext {
        MergeContext {
            e_cap,
            colony_bonus_eligible: false,
        }
    }

    #[test]
    fn test_equal_energy_increments() {
        let merged = merge_cells(&Cell::alive(3), &Cell::alive(3), ctx(8)).unwrap();
        assert_eq!(merged, Cell::alive(4));
    }

    #[test]
    fn test_unequal_energy_reduces_higher() {
        let merged = merge_cells(&Cell::alive(5), &Cell::alive(2), ctx(8)).unwrap();
        assert_eq!(merged.energy(), 4);

        let merged = merge_cells(&Cell::alive(1), &Cell::alive(2), ctx(8)).unwrap();
        assert_eq!(merged.energy(), 1);
    }

    #[test]
    fn test_alive_with_dormant() {
        let merged = merge_cells(&Cell::dormant(1), &Cell::alive(3), ctx(8)).unwrap();
        assert_eq!(merged, Cell::alive(2));

        let merged = merge_cells(&Cell::alive(1), &Cell::dormant(1), ctx(8)).unwrap();
        assert_eq!(merged, Cell::alive(1));
    }

    #[test]
    fn test_colony_bonus_before_cap() {
        let bonus = MergeContext {
            e_cap: 10,
            colony_bonus_eligible: true,
        };
        assert_eq!(merge_cells(&Cell::alive(1), &Cell::alive(1), bonus).unwrap().energy(), 3);

        let capped = MergeContext {
            e_cap: 4,
            colony_bonus_eligible: true,
        };
        assert_eq!(merge_cells(&Cell::alive(4), &Cell::alive(4), capped).unwrap().energy(), 4);
    }

    #[test]
    fn test_invalid_pairings() {
        let err = merge_cells(&Cell::dormant(2), &Cell::dormant(2), ctx(8)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidMerge {
                lhs: CellKind::Dormant,
                rhs: CellKind::Dormant
            }
        );
        assert!(merge_cells(&Cell::alive(2), &Cell::Catalyst, ctx(8)).is_err());
        assert!(merge_cells(&Cell::blight(1), &Cell::alive(2), ctx(8)).is_err());
        assert!(merge_cells(&Cell::Empty, &Cell::Empty, ctx(8)).is_err());
    }

    #[test]
    fn test_catalyst_doubles_and_caps() {
        assert_eq!(apply_catalyst(&Cell::alive(2), 10), Cell::alive(4));
        assert_eq!(apply_catalyst(&Cell::alive(6), 10), Cell::alive(10));
        assert_eq!(apply_catalyst(&Cell::Empty, 10), Cell::Empty);
    }

    proptest! {
        #[test]
        fn prop_merge_energy_within_bounds(
            a in 1u32..=20,
            b in 1u32..=20,
            cap in 1u32..=20,
            dormant in any::<bool>(),
            bonus in any::<bool>(),
        ) {
            let a = a.min(cap);
            let b = b.min(cap);
            let rhs = if dormant { Cell::dormant(b) } else { Cell::alive(b) };
            let context = MergeContext { e_cap: cap, colony_bonus_eligible: bonus };
            let merged = merge_cells(&Cell::alive(a), &rhs, context).unwrap();
            prop_assert!(merged.is_alive());
            prop_assert!(merged.energy() >= 1);
            prop_assert!(merged.energy() <= cap);
        }
    }
}
