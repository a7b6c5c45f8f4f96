//! Life rules in continuous space
//!
//! Neighbors are alive particles within a radius. Birth sites are sampled on
//! a ring around every alive particle.

use std::f32::consts::TAU;

use glam::Vec2;

use super::field::ParticleField;
use super::particle::Particle;
use crate::config::ParticleLifeOptions;
use crate::consts::BIRTH_SAMPLES_PER_PARTICLE;

/// Result of one continuous Life tick
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleLifeResult {
    pub field: ParticleField,
    pub births: u32,
    pub deaths: u32,
    pub born: Vec<Vec2>,
}

/// Apply survival and birth rules to `field`
///
/// Counts are taken on the input field. Births stop at `max_births` and a
/// candidate is rejected when it sits inside twice the radius of any particle
/// already in the next field, including ones born earlier this tick.
pub fn particle_life_tick(field: &ParticleField, options: &ParticleLifeOptions) -> ParticleLifeResult {
    let mut next = field.clone();
    let mut deaths = 0;

    next.particles_mut().retain(|particle| {
        if !particle.is_alive() {
            return true;
        }
        let neighbors = field.count_alive_neighbors(particle, options.neighbor_radius);
        let survives = options.rules.survival.contains(neighbors);
        if !survives {
            deaths += 1;
        }
        survives
    });

    let mut births = 0;
    let mut born = Vec::new();
    for candidate in birth_candidates(field, options.birth_radius) {
        if births as usize >= options.max_births {
            break;
        }

        let neighbors = field.count_alive_near(candidate, options.neighbor_radius);
        if !options.rules.birth.contains(neighbors) {
            continue;
        }

        let crowded = next
            .iter()
            .any(|p| p.pos.distance(candidate) < p.radius * 2.0);
        if crowded {
            continue;
        }

        let id = next.next_particle_id();
        next.particles_mut().push(Particle::alive(id, candidate, 1));
        born.push(candidate);
        births += 1;
    }

    log::trace!("particle life: births={births} deaths={deaths}");

    ParticleLifeResult {
        field: next,
        births,
        deaths,
        born,
    }
}

/// Ring samples around each alive particle that fall inside the unit square
fn birth_candidates(field: &ParticleField, radius: f32) -> Vec<Vec2> {
    let mut candidates = Vec::new();
    for particle in field.alive() {
        for i in 0..BIRTH_SAMPLES_PER_PARTICLE {
            let angle = i as f32 / BIRTH_SAMPLES_PER_PARTICLE as f32 * TAU;
            let point = particle.pos + Vec2::from_angle(angle) * radius;
            if (0.0..=1.0).contains(&point.x) && (0.0..=1.0).contains(&point.y) {
                candidates.push(point);
            }
        }
    }
    candidates
}
