//! Per-particle transformations applied after motion integration.
//!
//! A modifier is a pure function of its configuration over a contiguous
//! run of particles. Modifiers are grouped in a [`ModifierCollection`],
//! where each one is driven by its own frequency scheduler (see
//! [`slot`]) and an [`ExecutionStrategy`] decides whether its work is
//! split across worker threads.
//!
//! Built-in modifiers:
//! - [`forces`]: linear gravity, radial gravity, vortex, drag, damping
//! - [`interpolators`]: colour, hue, opacity and scale over age, fast fade
//! - [`velocity`]: speed-driven colour and hue blends
//! - [`kinematics`]: age, movement and rotation
//! - [`container`]: rectangular bounce container

use std::fmt;

use crate::particle::Particle;

pub mod container;
pub mod execution;
pub mod forces;
pub mod interpolators;
pub mod kinematics;
pub mod slot;
pub mod velocity;

pub use container::ContainerModifier;
pub use execution::ExecutionStrategy;
pub use forces::{
    DampingModifier, DragModifier, LinearGravityModifier, RadialGravityModifier, VortexModifier,
};
pub use interpolators::{
    ColourInterpolator, HueInterpolator, OpacityFastFadeModifier, OpacityInterpolator,
    ScaleInterpolator,
};
pub use kinematics::{AgeModifier, MoveModifier, RotationModifier};
pub use slot::{ModifierCollection, ModifierSlot, DEFAULT_FREQUENCY};
pub use velocity::{VelocityColourModifier, VelocityHueModifier};

/// Timing handed to a modifier for one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierContext {
    /// Nominal timestep in seconds (`1 / frequency`)
    pub elapsed: f32,
    /// Emitter simulation clock in seconds
    pub total_time: f32,
    /// Particle lifetime in seconds
    pub term: f32,
}

impl ModifierContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(elapsed: f32, total_time: f32, term: f32) -> Self {
        Self {
            elapsed,
            total_time,
            term,
        }
    }
}

/// A transformation over a contiguous run of live particles.
///
/// The scheduler may hand a modifier its range in two pieces when the live
/// range wraps around the ring buffer, or in several chunks under
/// [`ExecutionStrategy::Parallel`]. Implementations must therefore treat
/// every particle independently and keep no state between calls.
pub trait Modifier: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies the transformation to `particles`.
    fn update(&self, ctx: &ModifierContext, particles: &mut [Particle]);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Counts how many times each particle was touched, using `mass`.
    #[derive(Debug)]
    pub struct CountingModifier;

    impl Modifier for CountingModifier {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
            for p in particles {
                p.mass += 1.0;
            }
        }
    }

    pub fn ctx(elapsed: f32) -> ModifierContext {
        ModifierContext::new(elapsed, 0.0, 1.0)
    }

    pub fn particle_with_velocity(x: f32, y: f32) -> Particle {
        Particle {
            velocity: [x, y],
            mass: 1.0,
            ..Default::default()
        }
    }
}
