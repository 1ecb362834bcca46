//! Force modifiers acting on particle velocity.
//!
//! Every force here only writes `velocity`, and all of them accumulate into
//! it, so their relative order only matters through the clamps.

use flare_common::{Axis, Coordinate, Vector};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::modifier::{Modifier, ModifierContext};
use crate::particle::Particle;

/// Constant pull in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearGravityModifier {
    /// Direction of the pull
    pub direction: Axis,
    /// Acceleration per unit of particle mass
    pub strength: f32,
}

impl LinearGravityModifier {
    /// Creates a gravity modifier.
    #[must_use]
    pub const fn new(direction: Axis, strength: f32) -> Self {
        Self {
            direction,
            strength,
        }
    }

    /// Creates a gravity modifier from a vector's direction and magnitude.
    #[must_use]
    pub fn from_vector(vector: Vector) -> Self {
        Self::new(vector.axis(), vector.magnitude())
    }
}

impl Modifier for LinearGravityModifier {
    fn name(&self) -> &'static str {
        "linear_gravity"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.strength * ctx.elapsed;
        for p in particles {
            let pull = delta * p.mass;
            p.velocity[0] += self.direction.x() * pull;
            p.velocity[1] += self.direction.y() * pull;
        }
    }
}

/// Pull towards a point, stronger closer in, limited to a radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialGravityModifier {
    /// Centre of attraction
    pub position: Coordinate,
    /// Particles further than this are unaffected
    pub radius: f32,
    /// Pull strength; negative pushes away
    pub strength: f32,
    /// Speed cap applied to affected particles
    #[serde(default)]
    pub max_speed: Option<f32>,
}

impl RadialGravityModifier {
    /// Creates a radial gravity modifier without a speed cap.
    #[must_use]
    pub const fn new(position: Coordinate, radius: f32, strength: f32) -> Self {
        Self {
            position,
            radius,
            strength,
            max_speed: None,
        }
    }

    /// Caps the speed of affected particles.
    #[must_use]
    pub const fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = Some(max_speed);
        self
    }
}

impl Modifier for RadialGravityModifier {
    fn name(&self) -> &'static str {
        "radial_gravity"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.strength * ctx.elapsed;
        let radius_squared = self.radius * self.radius;
        let centre = Vec2::from(self.position);

        for p in particles {
            let offset = centre - Vec2::from(p.position);
            let distance_squared = offset.length_squared();
            if distance_squared >= radius_squared || distance_squared <= f32::EPSILON {
                continue;
            }

            let distance = distance_squared.sqrt();
            let pull = offset / distance * (self.radius / distance) * delta;
            let velocity = Vec2::from(p.velocity) + pull;
            p.velocity = clamp_speed(velocity, self.max_speed).to_array();
        }
    }
}

/// Inverse-square swirl towards a point, with a fixed acceleration ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VortexModifier {
    /// Centre of the vortex
    pub position: Coordinate,
    /// Mass of the vortex
    pub mass: f32,
    /// Speed cap applied after the pull
    #[serde(default)]
    pub max_speed: Option<f32>,
}

impl VortexModifier {
    /// Scale applied to `mass * particle.mass / distance²`.
    pub const GRAVITATIONAL_SCALE: f32 = 10_000.0;
    /// Upper bound on the per-second acceleration.
    pub const MAX_ACCELERATION: f32 = 1_500.0;

    /// Creates a vortex without a speed cap.
    #[must_use]
    pub const fn new(position: Coordinate, mass: f32) -> Self {
        Self {
            position,
            mass,
            max_speed: None,
        }
    }

    /// Caps the speed of affected particles.
    #[must_use]
    pub const fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = Some(max_speed);
        self
    }
}

impl Modifier for VortexModifier {
    fn name(&self) -> &'static str {
        "vortex"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let centre = Vec2::from(self.position);

        for p in particles {
            let offset = centre - Vec2::from(p.position);
            let distance_squared = offset.length_squared();
            if distance_squared <= f32::EPSILON {
                continue;
            }

            let acceleration = (Self::GRAVITATIONAL_SCALE * self.mass * p.mass / distance_squared)
                .min(Self::MAX_ACCELERATION);
            let pull = offset / distance_squared.sqrt() * acceleration * ctx.elapsed;
            let velocity = Vec2::from(p.velocity) + pull;
            p.velocity = clamp_speed(velocity, self.max_speed).to_array();
        }
    }
}

/// Aerodynamic drag proportional to velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragModifier {
    /// Drag coefficient of the particle shape
    pub drag_coefficient: f32,
    /// Density of the medium
    pub density: f32,
}

impl DragModifier {
    /// Creates a drag modifier.
    #[must_use]
    pub const fn new(drag_coefficient: f32, density: f32) -> Self {
        Self {
            drag_coefficient,
            density,
        }
    }
}

impl Default for DragModifier {
    fn default() -> Self {
        Self::new(0.47, 0.5)
    }
}

impl Modifier for DragModifier {
    fn name(&self) -> &'static str {
        "drag"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let base = -self.drag_coefficient * self.density * ctx.elapsed;
        for p in particles {
            let factor = base * p.mass;
            p.velocity[0] += p.velocity[0] * factor;
            p.velocity[1] += p.velocity[1] * factor;
        }
    }
}

/// Multiplicative velocity decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampingModifier {
    /// Fraction of velocity lost per second
    pub coefficient: f32,
}

impl DampingModifier {
    /// Creates a damping modifier.
    #[must_use]
    pub const fn new(coefficient: f32) -> Self {
        Self { coefficient }
    }
}

impl Modifier for DampingModifier {
    fn name(&self) -> &'static str {
        "damping"
    }

    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]) {
        let factor = 1.0 - self.coefficient * ctx.elapsed;
        for p in particles {
            p.velocity[0] *= factor;
            p.velocity[1] *= factor;
        }
    }
}

fn clamp_speed(velocity: Vec2, max_speed: Option<f32>) -> Vec2 {
    match max_speed {
        Some(max) => velocity.clamp_length_max(max.max(0.0)),
        None => velocity,
    }
}
