//! Colour blends driven by particle speed.
//!
//! Below the threshold the colour is interpolated from the stationary
//! value by `speed / threshold`; at or above it the moving value is used.

use flare_common::Colour;
use serde::{Deserialize, Serialize};

use crate::modifier::{Modifier, ModifierContext};
use crate::particle::Particle;

/// Blends the full HSL colour by speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityColourModifier {
    /// Colour of a particle at rest
    pub stationary: Colour,
    /// Colour at or above the threshold speed
    pub moving: Colour,
    /// Speed at which the moving colour is reached
    pub threshold: f32,
}

impl VelocityColourModifier {
    /// Creates a velocity colour modifier.
    #[must_use]
    pub const fn new(stationary: Colour, moving: Colour, threshold: f32) -> Self {
        Self {
            stationary,
            moving,
            threshold,
        }
    }
}

impl Modifier for VelocityColourModifier {
    fn name(&self) -> &'static str {
        "velocity_colour"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.moving - self.stationary;
        for p in particles {
            let t = blend_factor(p, self.threshold);
            p.colour = [
                self.stationary.h + delta.h * t,
                self.stationary.s + delta.s * t,
                self.stationary.l + delta.l * t,
            ];
        }
    }
}

/// Blends only the hue channel by speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityHueModifier {
    /// Hue of a particle at rest
    pub stationary: f32,
    /// Hue at or above the threshold speed
    pub moving: f32,
    /// Speed at which the moving hue is reached
    pub threshold: f32,
}

impl VelocityHueModifier {
    /// Creates a velocity hue modifier.
    #[must_use]
    pub const fn new(stationary: f32, moving: f32, threshold: f32) -> Self {
        Self {
            stationary,
            moving,
            threshold,
        }
    }
}

impl Modifier for VelocityHueModifier {
    fn name(&self) -> &'static str {
        "velocity_hue"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.moving - self.stationary;
        for p in particles {
            p.colour[0] = self.stationary + delta * blend_factor(p, self.threshold);
        }
    }
}

/// `speed / threshold`, saturating at 1.
fn blend_factor(p: &Particle, threshold: f32) -> f32 {
    let speed_squared = p.speed_squared();
    if speed_squared >= threshold * threshold {
        1.0
    } else {
        speed_squared.sqrt() / threshold
    }
}
