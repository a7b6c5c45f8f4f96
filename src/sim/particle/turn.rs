//! Particle turn orchestrator
//!
//! Force, bounded settling loop with periodic merge passes, a final merge
//! pass, then the continuous Life tick and scoring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::detect_and_merge_collisions;
use super::field::ParticleField;
use super::life::particle_life_tick;
use super::physics::{apply_force, has_movement, update_physics};
use crate::config::ParticleConfig;
use crate::consts::COLLISION_PASS_INTERVAL;
use crate::sim::scoring::{StreakState, update_streak};
use crate::sim::swipe::Direction;

/// Inputs for one particle turn
#[derive(Debug, Clone, Copy)]
pub struct ParticleTurnContext<'a> {
    pub field: &'a ParticleField,
    pub direction: Direction,
    pub config: &'a ParticleConfig,
    pub streak: StreakState,
    pub score: f64,
}

/// Everything a particle turn changed; same contract as the grid outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleTurnOutcome {
    pub field: ParticleField,
    pub score: f64,
    pub streak: StreakState,
    pub turn_score: f64,
    pub total_energy: u64,
    pub moved: bool,
    pub merges: u32,
    pub births: u32,
    pub deaths: u32,
    pub stability_incremented: bool,
    pub physics_steps: u32,
}

/// Unit force for a swipe; y grows downward like board rows
pub fn force_vector(direction: Direction) -> Vec2 {
    let (dr, dc) = direction.delta();
    Vec2::new(dc as f32, dr as f32)
}

/// Run one complete particle turn
pub fn execute_particle_turn(ctx: &ParticleTurnContext<'_>) -> ParticleTurnOutcome {
    let config = ctx.config;
    let mut field = apply_force(ctx.field, force_vector(ctx.direction), config.force_strength);
    let mut merges = 0;
    let mut steps = 0;

    while steps < config.max_physics_steps && has_movement(&field, config.movement_threshold) {
        field = update_physics(&field, &config.physics);
        steps += 1;

        if steps % COLLISION_PASS_INTERVAL == 0 {
            let pass = detect_and_merge_collisions(&field, config.e_cap);
            field = pass.field;
            merges += pass.merges;
        }
    }

    let settle = detect_and_merge_collisions(&field, config.e_cap);
    field = settle.field;
    merges += settle.merges;

    if steps == 0 && merges == 0 {
        return ParticleTurnOutcome {
            field: ctx.field.clone(),
            score: ctx.score,
            streak: ctx.streak,
            turn_score: 0.0,
            total_energy: ctx.field.total_energy(),
            moved: false,
            merges: 0,
            births: 0,
            deaths: 0,
            stability_incremented: false,
            physics_steps: 0,
        };
    }

    let life = particle_life_tick(&field, &config.life);
    let mut field = life.field;

    let total_energy = field.total_energy();
    let stability_incremented = life.births == 0 && life.deaths == 0;
    let streak = update_streak(&ctx.streak, stability_incremented);
    let turn_score = total_energy as f64 * streak.multiplier;

    for particle in field.particles_mut().iter_mut() {
        particle.merged_this_swipe = false;
    }

    log::debug!(
        "particle turn {:?}: steps={} merges={} births={} deaths={} energy={}",
        ctx.direction,
        steps,
        merges,
        life.births,
        life.deaths,
        total_energy
    );

    ParticleTurnOutcome {
        field,
        score: ctx.score + turn_score,
        streak,
        turn_score,
        total_energy,
        moved: true,
        merges,
        births: life.births,
        deaths: life.deaths,
        stability_incremented,
        physics_steps: steps,
    }
}
