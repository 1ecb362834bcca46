//! Random number sources.
//!
//! The simulation never touches global random state. Every emitter owns a
//! [`RandomSource`] that is injected at construction, so two emitters built
//! with the same seed release identical particles and can be updated on
//! different threads.

use std::f32::consts::PI;

use crate::colour::{Colour, ColourRange, Range};
use crate::coords::Axis;
use crate::error::ConfigError;

/// Seed used by [`SeededRandom::default`].
pub const DEFAULT_SEED: i64 = 1;

/// Contract for the uniform random generator consumed by emitters and
/// emission profiles.
///
/// Implementors only have to supply [`next_float`](Self::next_float); the
/// derived ranges, angles and colours are provided on top of it.
pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f32;

    /// Uniform float in `[0, max)`.
    fn next_float_to(&mut self, max: f32) -> f32 {
        max * self.next_float()
    }

    /// Uniform float in `[min, max)`.
    fn next_float_between(&mut self, min: f32, max: f32) -> f32 {
        (max - min) * self.next_float() + min
    }

    /// Uniform integer in `[0, max)`. Returns `0` when `max == 0`.
    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((max as f32 * self.next_float()) as u32).min(max - 1)
    }

    /// Uniform integer in `[min, max]`, both ends inclusive.
    fn next_int_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.next_int((max - min).saturating_add(1))
    }

    /// Uniform angle in `[-π, π)`.
    fn next_angle(&mut self) -> f32 {
        self.next_float_to(PI * 2.0) - PI
    }

    /// Uniformly distributed unit direction.
    fn next_unit_vector(&mut self) -> Axis {
        Axis::from_angle(self.next_angle())
    }

    /// Samples a float range.
    fn sample(&mut self, range: Range<f32>) -> f32 {
        self.next_float_between(range.min, range.max)
    }

    /// Samples each channel of a colour range independently.
    fn sample_colour(&mut self, range: &ColourRange) -> Colour {
        Colour::new(
            self.sample(range.h),
            self.sample(range.s),
            self.sample(range.l),
        )
    }
}

/// Deterministic, seedable generator backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: fastrand::Rng,
    seed: i64,
}

impl SeededRandom {
    /// Creates a generator from a strictly positive seed.
    pub fn new(seed: i64) -> Result<Self, ConfigError> {
        if seed <= 0 {
            return Err(ConfigError::InvalidSeed(seed));
        }
        Ok(Self {
            rng: fastrand::Rng::with_seed(seed as u64),
            seed,
        })
    }

    /// Restarts the sequence from a new seed.
    pub fn reseed(&mut self, seed: i64) -> Result<(), ConfigError> {
        *self = Self::new(seed)?;
        Ok(())
    }

    /// The seed this generator was created with.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self {
            rng: fastrand::Rng::with_seed(DEFAULT_SEED as u64),
            seed: DEFAULT_SEED,
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_float(&mut self) -> f32 {
        self.rng.f32()
    }

    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.rng.u32(0..max)
    }
}
