//! Release parameters sampled for every new particle.

use std::f32::consts::PI;

use flare_common::{ColourRange, ConfigError, Range};
use serde::{Deserialize, Serialize};

/// Ranges the emitter samples from when it releases particles.
///
/// Every range is inclusive and sampled independently per particle, except
/// `quantity` which is sampled once per trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseParameters {
    /// Particles released per trigger
    pub quantity: Range<u32>,
    /// Initial speed along the profile heading
    pub speed: Range<f32>,
    /// Initial HSL colour
    pub colour: ColourRange,
    /// Initial opacity
    pub opacity: Range<f32>,
    /// Initial scale
    pub scale: Range<f32>,
    /// Initial rotation in radians
    pub rotation: Range<f32>,
    /// Particle mass
    pub mass: Range<f32>,
}

impl Default for ReleaseParameters {
    fn default() -> Self {
        Self {
            quantity: Range::constant(1),
            speed: Range::new(-1.0, 1.0),
            colour: ColourRange::default(),
            opacity: Range::new(0.0, 1.0),
            scale: Range::constant(1.0),
            rotation: Range::new(-PI, PI),
            mass: Range::constant(1.0),
        }
    }
}

impl ReleaseParameters {
    /// Sets a fixed quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Range::constant(quantity);
        self
    }

    /// Sets the speed range.
    #[must_use]
    pub const fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed = Range::new(min, max);
        self
    }

    /// Sets the colour range.
    #[must_use]
    pub const fn with_colour(mut self, colour: ColourRange) -> Self {
        self.colour = colour;
        self
    }

    /// Sets the opacity range.
    #[must_use]
    pub const fn with_opacity(mut self, min: f32, max: f32) -> Self {
        self.opacity = Range::new(min, max);
        self
    }

    /// Sets the scale range.
    #[must_use]
    pub const fn with_scale(mut self, min: f32, max: f32) -> Self {
        self.scale = Range::new(min, max);
        self
    }

    /// Checks that no range is inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.quantity.is_ordered() {
            return Err(ConfigError::InvertedRange {
                field: "quantity",
                min: f64::from(self.quantity.min),
                max: f64::from(self.quantity.max),
            });
        }

        let floats = [
            ("speed", self.speed),
            ("colour.h", self.colour.h),
            ("colour.s", self.colour.s),
            ("colour.l", self.colour.l),
            ("opacity", self.opacity),
            ("scale", self.scale),
            ("rotation", self.rotation),
            ("mass", self.mass),
        ];
        for (field, range) in floats {
            if !range.is_ordered() {
                return Err(ConfigError::InvertedRange {
                    field,
                    min: f64::from(range.min),
                    max: f64::from(range.max),
                });
            }
        }
        Ok(())
    }
}
