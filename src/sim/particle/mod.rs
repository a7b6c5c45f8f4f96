//! Continuous-space variant of the board rules
//!
//! Particles live in the unit square and are pushed by swipes instead of
//! sliding cell by cell. Merges, Life and scoring follow the grid semantics.

pub mod collision;
pub mod field;
pub mod life;
pub mod particle;
pub mod physics;
pub mod turn;

pub use collision::{CollisionResult, detect_and_merge_collisions, merge_particles};
pub use field::{ParticleField, StateCounts, create_particle_field};
pub use life::{ParticleLifeResult, particle_life_tick};
pub use particle::{Particle, ParticleId, ParticleKind};
pub use physics::{PhysicsConfig, apply_force, has_movement, is_moving, update_physics};
pub use turn::{ParticleTurnContext, ParticleTurnOutcome, execute_particle_turn, force_vector};
