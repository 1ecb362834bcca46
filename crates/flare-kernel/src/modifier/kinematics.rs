//! Modifiers that advance age, position and rotation.
//!
//! The emitter already integrates age and position every frame. These
//! exist for pipelines that want additional or lower-rate integration, and
//! for driving particle slices outside an emitter.

use serde::{Deserialize, Serialize};

use crate::modifier::{Modifier, ModifierContext};
use crate::particle::Particle;

/// Recomputes `age` from the emitter clock: `(now - inception) / term`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeModifier;

impl Modifier for AgeModifier {
    fn name(&self) -> &'static str {
        "age"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let inverse_term = 1.0 / ctx.term;
        for p in particles {
            p.age = (ctx.total_time - p.inception) * inverse_term;
        }
    }
}

/// Integrates `position += velocity * dt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveModifier;

impl Modifier for MoveModifier {
    fn name(&self) -> &'static str {
        "move"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        for p in particles {
            p.position[0] += p.velocity[0] * ctx.elapsed;
            p.position[1] += p.velocity[1] * ctx.elapsed;
        }
    }
}

/// Spins particles at a constant rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationModifier {
    /// Radians per second
    pub rate: f32,
}

impl RotationModifier {
    /// Creates a rotation modifier.
    #[must_use]
    pub const fn new(rate: f32) -> Self {
        Self { rate }
    }
}

impl Modifier for RotationModifier {
    fn name(&self) -> &'static str {
        "rotation"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.rate * ctx.elapsed;
        for p in particles {
            p.rotation += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::test_support::particle_with_velocity;

    #[test]
    fn test_age_from_clock() {
        let mut particles = [
            Particle {
                inception: 1.0,
                ..Default::default()
            },
            Particle {
                inception: 2.0,
                ..Default::default()
            },
        ];
        AgeModifier.update(&ModifierContext::new(0.1, 3.0, 4.0), &mut particles);
        assert_eq!(particles[0].age, 0.5);
        assert_eq!(particles[1].age, 0.25);
    }

    #[test]
    fn test_move_integrates_velocity() {
        let mut particles = [particle_with_velocity(2.0, -4.0)];
        MoveModifier.update(&ModifierContext::new(0.5, 0.0, 1.0), &mut particles);
        assert_eq!(particles[0].position, [1.0, -2.0]);
    }

    #[test]
    fn test_rotation_accumulates() {
        let modifier = RotationModifier::new(2.0);
        let mut particles = [Particle::default()];
        let ctx = ModifierContext::new(0.25, 0.0, 1.0);
        modifier.update(&ctx, &mut particles);
        modifier.update(&ctx, &mut particles);
        assert_eq!(particles[0].rotation, 1.0);
    }
}
