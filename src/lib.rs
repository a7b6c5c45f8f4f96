//! Lifemerge - swipe-merge puzzle core driven by Game-of-Life rules
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid pipeline, hazards, scoring, particle variant)
//! - `config`: Engine configuration, difficulty presets and feature flags
//! - `error`: Engine error taxonomy

pub mod config;
pub mod error;
pub mod sim;

pub use config::{
    BirthRule, BlightConfig, CatalystConfig, DecayConfig, DifficultyConfig, EngineConfig,
    FeatureFlags, HazardLevel, LifeRules, NeighborSet, ParticleConfig,
};
pub use error::EngineError;

/// Game configuration constants
pub mod consts {
    /// Default maximum energy a cell may hold
    pub const DEFAULT_E_CAP: u32 = 8;
    /// Default component size for the colony merge bonus
    pub const DEFAULT_COLONY_SIZE_THRESHOLD: usize = 4;
    /// Idle ticks before an E=1 cell goes dormant
    pub const DEFAULT_DORMANCY_THRESHOLD: u32 = 3;

    /// Seeding: cells placed on a fresh board are drawn from [MIN, MIN + SPREAD)
    pub const SEED_CELLS_MIN: usize = 2;
    pub const SEED_CELLS_SPREAD: usize = 3;
    /// Maximum placement retries before a seed entity is skipped
    pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

    /// Streak multiplier curve: +0.25 per stable turn after the first, capped at 3x
    pub const STREAK_MULTIPLIER_STEP: f64 = 0.25;
    pub const STREAK_MULTIPLIER_CAP: f64 = 3.0;

    /// Side length of the local window used by the blight shielding check
    pub const SHIELD_WINDOW: usize = 5;

    /// Particle defaults (coordinates are normalized to the unit square)
    pub const PARTICLE_BASE_RADIUS: f32 = 0.02;
    pub const PARTICLE_RADIUS_PER_ENERGY: f32 = 0.005;
    pub const PARTICLE_BASE_MASS: f32 = 1.0;
    pub const PARTICLE_MASS_PER_ENERGY: f32 = 0.1;
    /// Minimum spacing between particles on a freshly seeded field
    pub const PARTICLE_MIN_SPACING: f32 = 0.1;
    /// Ring samples per alive particle when looking for birth sites
    pub const BIRTH_SAMPLES_PER_PARTICLE: usize = 8;
    /// Collision/merge pass runs every N physics steps while settling
    pub const COLLISION_PASS_INTERVAL: u32 = 3;
}
