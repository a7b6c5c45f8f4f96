//! Board cell variants
//!
//! Persistent per-cell state only. Per-swipe scratch flags (merged this
//! swipe, colony eligibility) live in the grid's mark layer, see
//! [`CellMarks`](super::grid::CellMarks).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant of a [`Cell`], used in errors and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Empty,
    Alive,
    Dormant,
    Catalyst,
    Blight,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::Empty => "empty",
            CellKind::Alive => "alive",
            CellKind::Dormant => "dormant",
            CellKind::Catalyst => "catalyst",
            CellKind::Blight => "blight",
        };
        f.write_str(name)
    }
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    /// Living cell; `idle_ticks` counts turns without a merge while at E=1
    Alive { energy: u32, idle_ticks: u32 },
    /// Inert low-energy cell, reactivated only by merging
    Dormant { energy: u32 },
    /// Doubles the energy of a cell sliding through it
    Catalyst,
    /// Hazard token with remaining activations
    Blight { charges: u32 },
}

impl Cell {
    #[inline]
    pub const fn alive(energy: u32) -> Self {
        Cell::Alive {
            energy,
            idle_ticks: 0,
        }
    }

    #[inline]
    pub const fn dormant(energy: u32) -> Self {
        Cell::Dormant { energy }
    }

    #[inline]
    pub const fn blight(charges: u32) -> Self {
        Cell::Blight { charges }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Empty => CellKind::Empty,
            Cell::Alive { .. } => CellKind::Alive,
            Cell::Dormant { .. } => CellKind::Dormant,
            Cell::Catalyst => CellKind::Catalyst,
            Cell::Blight { .. } => CellKind::Blight,
        }
    }

    /// Energy of alive/dormant cells, zero for everything else
    #[inline]
    pub fn energy(&self) -> u32 {
        match *self {
            Cell::Alive { energy, .. } | Cell::Dormant { energy } => energy,
            _ => 0,
        }
    }

    #[inline]
    pub fn idle_ticks(&self) -> u32 {
        match *self {
            Cell::Alive { idle_ticks, .. } => idle_ticks,
            _ => 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, Cell::Alive { .. })
    }

    #[inline]
    pub fn is_dormant(&self) -> bool {
        matches!(self, Cell::Dormant { .. })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[inline]
    pub fn is_catalyst(&self) -> bool {
        matches!(self, Cell::Catalyst)
    }

    #[inline]
    pub fn is_blight(&self) -> bool {
        matches!(self, Cell::Blight { .. })
    }

    /// Alive or dormant: the states a sliding cell can merge into
    #[inline]
    pub fn is_mergeable(&self) -> bool {
        matches!(self, Cell::Alive { .. } | Cell::Dormant { .. })
    }
}
