//! Pairwise collision detection and particle merging
//!
//! O(n²) over the field. Energy arithmetic is shared with the board merge;
//! position and momentum are blended here.

use super::field::ParticleField;
use super::particle::{Particle, ParticleId};
use crate::sim::merge::merged_energy;

/// Surviving side's share of the blended position in an unequal merge
const HIGHER_POSITION_WEIGHT: f32 = 0.7;
/// Momentum weight of the absorbed side in an unequal merge
const LOWER_MASS_FACTOR: f32 = 0.5;

/// Field after a merge pass
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    pub field: ParticleField,
    pub merges: u32,
}

/// Merge every overlapping pair of alive/dormant particles once
///
/// Scans pairs in field order. A particle merges at most once per pass and
/// never when it already merged this swipe. Merged pairs are removed and the
/// product is appended with a fresh id.
pub fn detect_and_merge_collisions(field: &ParticleField, e_cap: u32) -> CollisionResult {
    let mut next = field.clone();
    let source = field.particles();
    let mut consumed = vec![false; source.len()];
    let mut products = Vec::new();

    for i in 0..source.len() {
        if consumed[i] || !can_merge(&source[i]) {
            continue;
        }
        for j in (i + 1)..source.len() {
            if consumed[j] || !can_merge(&source[j]) {
                continue;
            }
            // Dormant pairs have no merge rule
            if !(source[i].is_alive() || source[j].is_alive()) {
                continue;
            }
            if !source[i].is_colliding(&source[j]) {
                continue;
            }
            let id = next.next_particle_id();
            if let Some(product) = merge_particles(&source[i], &source[j], e_cap, id) {
                consumed[i] = true;
                consumed[j] = true;
                products.push(product);
                break;
            }
        }
    }

    let merges = products.len() as u32;
    if merges > 0 {
        let particles = next.particles_mut();
        let mut index = 0;
        particles.retain(|_| {
            let keep = !consumed[index];
            index += 1;
            keep
        });
        particles.extend(products);
    }

    CollisionResult {
        field: next,
        merges,
    }
}

fn can_merge(particle: &Particle) -> bool {
    particle.is_movable() && !particle.merged_this_swipe
}

/// Combine two colliding particles into a new alive particle
///
/// Returns `None` for pairings with no merge rule (dormant + dormant).
pub fn merge_particles(a: &Particle, b: &Particle, e_cap: u32, id: ParticleId) -> Option<Particle> {
    let energy = merged_energy(&a.as_cell(), &b.as_cell()).ok()?.min(e_cap);

    let (pos, vel) = if a.is_alive() && b.is_alive() && a.energy != b.energy {
        let (higher, lower) = if a.energy > b.energy { (a, b) } else { (b, a) };
        let pos = higher.pos.lerp(lower.pos, 1.0 - HIGHER_POSITION_WEIGHT);
        let lower_mass = lower.mass * LOWER_MASS_FACTOR;
        let vel = (higher.vel * higher.mass + lower.vel * lower_mass) / (higher.mass + lower_mass);
        (pos, vel)
    } else {
        let pos = (a.pos + b.pos) * 0.5;
        let vel = (a.vel * a.mass + b.vel * b.mass) / (a.mass + b.mass);
        (pos, vel)
    };

    let mut merged = Particle::alive(id, pos, energy);
    merged.vel = vel;
    merged.merged_this_swipe = true;
    merged.merge_animation = Some(1.0);
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn at(id: u64, x: f32, energy: u32) -> Particle {
        Particle::alive(ParticleId(id), Vec2::new(x, 0.5), energy)
    }

    #[test]
    fn test_equal_merge_averages() {
        let mut a = at(0, 0.50, 2);
        let mut b = at(1, 0.52, 2);
        a.vel = Vec2::new(0.1, 0.0);
        b.vel = Vec2::new(-0.1, 0.0);
        let field = ParticleField::from_particles(vec![a, b]);

        let result = detect_and_merge_collisions(&field, 8);

        assert_eq!(result.merges, 1);
        assert_eq!(result.field.len(), 1);
        let merged = &result.field.particles()[0];
        assert_eq!(merged.energy, 3);
        assert!((merged.pos.x - 0.51).abs() < 1e-6);
        assert!(merged.vel.x.abs() < 1e-6);
        assert!(merged.merged_this_swipe);
        assert_eq!(merged.merge_animation, Some(1.0));
        assert_eq!(merged.id, ParticleId(2));
    }

    #[test]
    fn test_unequal_merge_favors_higher() {
        let higher = at(0, 0.50, 5);
        let lower = at(1, 0.54, 1);
        let merged = merge_particles(&higher, &lower, 8, ParticleId(9)).unwrap();

        assert_eq!(merged.energy, 4);
        assert!((merged.pos.x - (0.50 * 0.7 + 0.54 * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_alive_reactivates_dormant() {
        let alive = at(0, 0.5, 1);
        let dormant = Particle::dormant(ParticleId(1), Vec2::new(0.51, 0.5), 3);
        let merged = merge_particles(&alive, &dormant, 8, ParticleId(2)).unwrap();
        assert!(merged.is_alive());
        assert_eq!(merged.energy, 2);
    }

    #[test]
    fn test_dormant_pair_and_tokens_do_not_merge() {
        let field = ParticleField::from_particles(vec![
            Particle::dormant(ParticleId(0), Vec2::new(0.5, 0.5), 1),
            Particle::dormant(ParticleId(1), Vec2::new(0.5, 0.5), 1),
            Particle::catalyst(ParticleId(2), Vec2::new(0.5, 0.5)),
        ]);
        let result = detect_and_merge_collisions(&field, 8);
        assert_eq!(result.merges, 0);
        assert_eq!(result.field.len(), 3);
    }

    #[test]
    fn test_each_particle_merges_once_per_pass() {
        let field = ParticleField::from_particles(vec![
            at(0, 0.50, 1),
            at(1, 0.51, 1),
            at(2, 0.52, 1),
        ]);
        let result = detect_and_merge_collisions(&field, 8);

        assert_eq!(result.merges, 1);
        assert_eq!(result.field.len(), 2);
        assert_eq!(result.field.particles()[0].id, ParticleId(2));

        // The fresh product is excluded from the next pass
        let again = detect_and_merge_collisions(&result.field, 8);
        assert_eq!(again.merges, 0);
    }

    #[test]
    fn test_merge_respects_cap() {
        let merged = merge_particles(&at(0, 0.5, 4), &at(1, 0.5, 4), 4, ParticleId(2)).unwrap();
        assert_eq!(merged.energy, 4);
    }
}
