//! Particle entity

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::cell::{Cell, CellKind};

const CATALYST_MASS: f32 = 0.5;
const CATALYST_RADIUS: f32 = 0.025;
const BLIGHT_MASS: f32 = 0.8;
const BLIGHT_RADIUS: f32 = 0.03;

/// Field-unique particle identifier, never reused within a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p-{}", self.0)
    }
}

/// Particle state tag, mirroring the board cell variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ParticleKind {
    Alive,
    Dormant,
    Catalyst,
    Blight { charges: u32 },
}

/// A particle in the unit square
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: ParticleKind,
    /// Meaningful for alive and dormant particles only
    pub energy: u32,
    /// Normalized position, both axes in [0, 1]
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub idle_ticks: u32,
    /// Produced by a merge this turn; excluded from further merges
    #[serde(default)]
    pub merged_this_swipe: bool,
    /// Time since creation in physics steps
    pub age: f32,
    /// Merge animation progress, 1.0 when freshly merged
    #[serde(default)]
    pub merge_animation: Option<f32>,
}

impl Particle {
    fn base(id: ParticleId, kind: ParticleKind, pos: Vec2, energy: u32, mass: f32, radius: f32) -> Self {
        Self {
            id,
            kind,
            energy,
            pos,
            vel: Vec2::ZERO,
            mass,
            radius,
            idle_ticks: 0,
            merged_this_swipe: false,
            age: 0.0,
            merge_animation: None,
        }
    }

    /// Heavier and larger with more energy
    pub fn alive(id: ParticleId, pos: Vec2, energy: u32) -> Self {
        Self::base(id, ParticleKind::Alive, pos, energy, mass_for(energy), radius_for(energy))
    }

    pub fn dormant(id: ParticleId, pos: Vec2, energy: u32) -> Self {
        Self::base(id, ParticleKind::Dormant, pos, energy, mass_for(energy), radius_for(energy))
    }

    pub fn catalyst(id: ParticleId, pos: Vec2) -> Self {
        Self::base(id, ParticleKind::Catalyst, pos, 0, CATALYST_MASS, CATALYST_RADIUS)
    }

    pub fn blight(id: ParticleId, pos: Vec2, charges: u32) -> Self {
        Self::base(
            id,
            ParticleKind::Blight { charges },
            pos,
            0,
            BLIGHT_MASS,
            BLIGHT_RADIUS,
        )
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.kind == ParticleKind::Alive
    }

    #[inline]
    pub fn is_dormant(&self) -> bool {
        self.kind == ParticleKind::Dormant
    }

    #[inline]
    pub fn is_catalyst(&self) -> bool {
        self.kind == ParticleKind::Catalyst
    }

    #[inline]
    pub fn is_blight(&self) -> bool {
        matches!(self.kind, ParticleKind::Blight { .. })
    }

    /// Alive or dormant: affected by forces and able to merge
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.is_alive() || self.is_dormant()
    }

    pub fn cell_kind(&self) -> CellKind {
        match self.kind {
            ParticleKind::Alive => CellKind::Alive,
            ParticleKind::Dormant => CellKind::Dormant,
            ParticleKind::Catalyst => CellKind::Catalyst,
            ParticleKind::Blight { .. } => CellKind::Blight,
        }
    }

    /// Equivalent board cell, used to share merge arithmetic with the grid
    pub fn as_cell(&self) -> Cell {
        match self.kind {
            ParticleKind::Alive => Cell::Alive {
                energy: self.energy,
                idle_ticks: self.idle_ticks,
            },
            ParticleKind::Dormant => Cell::dormant(self.energy),
            ParticleKind::Catalyst => Cell::Catalyst,
            ParticleKind::Blight { charges } => Cell::blight(charges),
        }
    }

    #[inline]
    pub fn distance(&self, other: &Particle) -> f32 {
        self.pos.distance(other.pos)
    }

    /// Circles overlap
    #[inline]
    pub fn is_colliding(&self, other: &Particle) -> bool {
        self.distance(other) < self.radius + other.radius
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

#[inline]
pub fn mass_for(energy: u32) -> f32 {
    PARTICLE_BASE_MASS + energy as f32 * PARTICLE_MASS_PER_ENERGY
}

#[inline]
pub fn radius_for(energy: u32) -> f32 {
    PARTICLE_BASE_RADIUS + energy as f32 * PARTICLE_RADIUS_PER_ENERGY
}
