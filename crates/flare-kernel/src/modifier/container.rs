//! Rectangular container that keeps particles inside its bounds.

use flare_common::Coordinate;
use serde::{Deserialize, Serialize};

use crate::modifier::{Modifier, ModifierContext};
use crate::particle::Particle;

/// Clamps particles to a rectangle and bounces them off its walls.
///
/// A particle found outside is moved back onto the wall it crossed and the
/// velocity component normal to that wall is reflected and scaled by
/// `restitution` (1.0 is a perfectly elastic bounce).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerModifier {
    /// Centre of the rectangle
    pub position: Coordinate,
    /// Rectangle width
    pub width: f32,
    /// Rectangle height
    pub height: f32,
    /// Fraction of normal speed kept after a bounce
    #[serde(default = "default_restitution")]
    pub restitution: f32,
}

fn default_restitution() -> f32 {
    1.0
}

impl ContainerModifier {
    /// Creates an elastic container.
    #[must_use]
    pub const fn new(position: Coordinate, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
            restitution: 1.0,
        }
    }

    /// Sets the restitution coefficient.
    #[must_use]
    pub const fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

impl Modifier for ContainerModifier {
    fn name(&self) -> &'static str {
        "container"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let bounds = [
            (
                self.position.x - self.width * 0.5,
                self.position.x + self.width * 0.5,
            ),
            (
                self.position.y - self.height * 0.5,
                self.position.y + self.height * 0.5,
            ),
        ];

        for p in particles {
            for (axis, &(low, high)) in bounds.iter().enumerate() {
                if p.position[axis] < low {
                    p.position[axis] = low;
                    p.velocity[axis] = -p.velocity[axis] * self.restitution;
                } else if p.position[axis] > high {
                    p.position[axis] = high;
                    p.velocity[axis] = -p.velocity[axis] * self.restitution;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::test_support::ctx;

    fn moving(position: [f32; 2], velocity: [f32; 2]) -> Particle {
        Particle {
            position,
            velocity,
            ..Default::default()
        }
    }

    #[test]
    fn test_inside_untouched() {
        let container = ContainerModifier::new(Coordinate::new(10.0, 10.0), 4.0, 4.0);
        let mut particles = [moving([11.0, 9.0], [1.0, 1.0])];
        container.update(&ctx(0.1), &mut particles);
        assert_eq!(particles[0], moving([11.0, 9.0], [1.0, 1.0]));
    }

    #[test]
    fn test_bounces_off_each_wall() {
        let container = ContainerModifier::new(Coordinate::ORIGIN, 10.0, 6.0);
        let mut particles = [
            moving([-7.0, 0.0], [-2.0, 1.0]),
            moving([7.0, 0.0], [2.0, 1.0]),
            moving([0.0, -4.0], [1.0, -3.0]),
            moving([0.0, 4.0], [1.0, 3.0]),
        ];
        container.update(&ctx(0.1), &mut particles);

        assert_eq!(particles[0], moving([-5.0, 0.0], [2.0, 1.0]));
        assert_eq!(particles[1], moving([5.0, 0.0], [-2.0, 1.0]));
        assert_eq!(particles[2], moving([0.0, -3.0], [1.0, 3.0]));
        assert_eq!(particles[3], moving([0.0, 3.0], [1.0, -3.0]));
    }

    #[test]
    fn test_restitution_scales_bounce() {
        let container = ContainerModifier::new(Coordinate::ORIGIN, 2.0, 2.0).with_restitution(0.5);
        let mut particles = [moving([3.0, 3.0], [4.0, 2.0])];
        container.update(&ctx(0.1), &mut particles);
        assert_eq!(particles[0], moving([1.0, 1.0], [-2.0, -1.0]));
    }
}
