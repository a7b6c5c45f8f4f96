//! Particle collections
//!
//! The field owns the id counter so every new particle (seeded, merged or
//! born) gets a fresh deterministic identifier.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particle::{Particle, ParticleId, ParticleKind};
use crate::consts::{MAX_PLACEMENT_ATTEMPTS, PARTICLE_MIN_SPACING};
use crate::sim::rng::RandomSource;

/// Seeded particles keep this far from the walls
const SPAWN_MARGIN: f32 = 0.1;

/// Particle counts by state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateCounts {
    pub alive: usize,
    pub dormant: usize,
    pub catalyst: usize,
    pub blight: usize,
}

/// Unordered set of particles plus the next free id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleField {
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing particles; new ids continue past the highest one
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let next_id = particles.iter().map(|p| p.id.0 + 1).max().unwrap_or(0);
        Self { particles, next_id }
    }

    /// Allocate a fresh particle id
    pub fn next_particle_id(&mut self) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles.iter()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.particles.iter().filter(|p| p.is_alive())
    }

    pub fn count_by_state(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for particle in &self.particles {
            match particle.kind {
                ParticleKind::Alive => counts.alive += 1,
                ParticleKind::Dormant => counts.dormant += 1,
                ParticleKind::Catalyst => counts.catalyst += 1,
                ParticleKind::Blight { .. } => counts.blight += 1,
            }
        }
        counts
    }

    /// Energy of alive and dormant particles
    pub fn total_energy(&self) -> u64 {
        self.particles
            .iter()
            .filter(|p| p.is_movable())
            .map(|p| u64::from(p.energy))
            .sum()
    }

    /// Copy of this field with `particle` appended
    pub fn with_added(&self, particle: Particle) -> Self {
        let mut next = self.clone();
        next.next_id = next.next_id.max(particle.id.0 + 1);
        next.particles.push(particle);
        next
    }

    /// Copy of this field without `id`
    pub fn with_removed(&self, id: ParticleId) -> Self {
        let mut next = self.clone();
        next.particles.retain(|p| p.id != id);
        next
    }

    /// Copy of this field with the particle `id` swapped for `particle`
    pub fn with_replaced(&self, id: ParticleId, particle: Particle) -> Self {
        let mut next = self.clone();
        next.next_id = next.next_id.max(particle.id.0 + 1);
        if let Some(slot) = next.particles.iter_mut().find(|p| p.id == id) {
            *slot = particle;
        }
        next
    }

    /// Other particles within `radius` of `particle`
    pub fn neighbors_of<'a>(&'a self, particle: &'a Particle, radius: f32) -> impl Iterator<Item = &'a Particle> + 'a {
        self.particles
            .iter()
            .filter(move |p| p.id != particle.id && particle.distance(p) <= radius)
    }

    /// Alive particles other than `particle` within `radius`
    pub fn count_alive_neighbors(&self, particle: &Particle, radius: f32) -> usize {
        self.neighbors_of(particle, radius).filter(|p| p.is_alive()).count()
    }

    /// Alive particles within `radius` of an arbitrary point
    pub fn count_alive_near(&self, point: Vec2, radius: f32) -> usize {
        self.alive().filter(|p| p.pos.distance(point) <= radius).count()
    }
}

/// Scatter `count` alive E=1 particles, keeping them apart and off the walls
///
/// Each placement retries up to [`MAX_PLACEMENT_ATTEMPTS`] times; a particle
/// that never finds room is skipped.
pub fn create_particle_field(count: usize, rng: &mut dyn RandomSource) -> ParticleField {
    let mut field = ParticleField::new();
    let span = 1.0 - 2.0 * SPAWN_MARGIN;

    for _ in 0..count {
        let mut placed = None;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = SPAWN_MARGIN + rng.next_unit() as f32 * span;
            let y = SPAWN_MARGIN + rng.next_unit() as f32 * span;
            let candidate = Vec2::new(x, y);
            if field
                .iter()
                .all(|p| p.pos.distance(candidate) >= PARTICLE_MIN_SPACING)
            {
                placed = Some(candidate);
                break;
            }
        }

        match placed {
            Some(pos) => {
                let id = field.next_particle_id();
                field.particles.push(Particle::alive(id, pos, 1));
            }
            None => log::debug!("Particle placement exhausted, skipping"),
        }
    }

    field
}
