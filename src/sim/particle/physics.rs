//! Explicit particle integration
//!
//! Position advances by velocity, velocity is damped, walls of the unit
//! square reflect with a bounce coefficient, tiny velocities snap to zero and
//! speed is capped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::ParticleField;
use super::particle::Particle;

/// Integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Multiplicative velocity damping per step (0-1)
    pub damping: f32,
    /// Fraction of normal speed kept after hitting a wall (0-1)
    pub wall_bounce: f32,
    /// Velocity components below this snap to zero
    pub min_velocity: f32,
    /// Speed cap
    pub max_velocity: f32,
    /// Time step
    pub dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.95,
            wall_bounce: 0.6,
            min_velocity: 0.001,
            max_velocity: 2.0,
            dt: 1.0,
        }
    }
}

/// Push every alive and dormant particle along `direction`
///
/// Acceleration is `strength / mass`, so heavy particles respond less.
pub fn apply_force(field: &ParticleField, direction: Vec2, strength: f32) -> ParticleField {
    let mut next = field.clone();
    for particle in next.particles_mut().iter_mut().filter(|p| p.is_movable()) {
        particle.vel += direction * (strength / particle.mass);
    }
    next
}

/// Advance every particle by one step
pub fn update_physics(field: &ParticleField, config: &PhysicsConfig) -> ParticleField {
    let mut next = field.clone();
    for particle in next.particles_mut().iter_mut() {
        step_particle(particle, config);
    }
    next
}

fn step_particle(particle: &mut Particle, config: &PhysicsConfig) {
    particle.pos += particle.vel * config.dt;
    particle.vel *= config.damping;

    bounce_axis(
        &mut particle.pos.x,
        &mut particle.vel.x,
        particle.radius,
        config.wall_bounce,
    );
    bounce_axis(
        &mut particle.pos.y,
        &mut particle.vel.y,
        particle.radius,
        config.wall_bounce,
    );

    if particle.vel.x.abs() < config.min_velocity {
        particle.vel.x = 0.0;
    }
    if particle.vel.y.abs() < config.min_velocity {
        particle.vel.y = 0.0;
    }

    particle.vel = particle.vel.clamp_length_max(config.max_velocity);
    particle.age += config.dt;
}

/// Keep one coordinate inside `[radius, 1 - radius]`, sending velocity back inward
fn bounce_axis(pos: &mut f32, vel: &mut f32, radius: f32, bounce: f32) {
    if *pos < radius {
        *pos = radius;
        *vel = vel.abs() * bounce;
    } else if *pos > 1.0 - radius {
        *pos = 1.0 - radius;
        *vel = -vel.abs() * bounce;
    }
}

#[inline]
pub fn is_moving(particle: &Particle, threshold: f32) -> bool {
    particle.vel.x.abs() > threshold || particle.vel.y.abs() > threshold
}

/// Any particle still above `threshold` on either axis
pub fn has_movement(field: &ParticleField, threshold: f32) -> bool {
    field.iter().any(|p| is_moving(p, threshold))
}
