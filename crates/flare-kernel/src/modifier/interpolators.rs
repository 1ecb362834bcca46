//! Modifiers that blend a particle attribute over its normalized age.

use flare_common::Colour;
use serde::{Deserialize, Serialize};

use crate::modifier::{Modifier, ModifierContext};
use crate::particle::Particle;

/// Blends the HSL colour from `initial` to `final_colour` over the lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourInterpolator {
    /// Colour at release
    pub initial: Colour,
    /// Colour at expiry
    #[serde(rename = "final")]
    pub final_colour: Colour,
}

impl ColourInterpolator {
    /// Creates a colour interpolator.
    #[must_use]
    pub const fn new(initial: Colour, final_colour: Colour) -> Self {
        Self {
            initial,
            final_colour,
        }
    }
}

impl Modifier for ColourInterpolator {
    fn name(&self) -> &'static str {
        "colour_interpolator"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.final_colour - self.initial;
        for p in particles {
            p.colour = [
                self.initial.h + delta.h * p.age,
                self.initial.s + delta.s * p.age,
                self.initial.l + delta.l * p.age,
            ];
        }
    }
}

/// Blends only the hue channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueInterpolator {
    /// Hue at release, in degrees
    pub initial: f32,
    /// Hue at expiry, in degrees
    #[serde(rename = "final")]
    pub final_hue: f32,
}

impl HueInterpolator {
    /// Creates a hue interpolator.
    #[must_use]
    pub const fn new(initial: f32, final_hue: f32) -> Self {
        Self { initial, final_hue }
    }
}

impl Modifier for HueInterpolator {
    fn name(&self) -> &'static str {
        "hue_interpolator"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.final_hue - self.initial;
        for p in particles {
            p.colour[0] = self.initial + delta * p.age;
        }
    }
}

/// Blends opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityInterpolator {
    /// Opacity at release
    pub initial: f32,
    /// Opacity at expiry
    #[serde(rename = "final")]
    pub final_opacity: f32,
}

impl OpacityInterpolator {
    /// Creates an opacity interpolator.
    #[must_use]
    pub const fn new(initial: f32, final_opacity: f32) -> Self {
        Self {
            initial,
            final_opacity,
        }
    }
}

impl Modifier for OpacityInterpolator {
    fn name(&self) -> &'static str {
        "opacity_interpolator"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.final_opacity - self.initial;
        for p in particles {
            p.opacity = self.initial + delta * p.age;
        }
    }
}

/// Blends scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleInterpolator {
    /// Scale at release
    pub initial: f32,
    /// Scale at expiry
    #[serde(rename = "final")]
    pub final_scale: f32,
}

impl ScaleInterpolator {
    /// Creates a scale interpolator.
    #[must_use]
    pub const fn new(initial: f32, final_scale: f32) -> Self {
        Self {
            initial,
            final_scale,
        }
    }
}

impl Modifier for ScaleInterpolator {
    fn name(&self) -> &'static str {
        "scale_interpolator"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        let delta = self.final_scale - self.initial;
        for p in particles {
            p.scale = self.initial + delta * p.age;
        }
    }
}

/// Fades from fully opaque to transparent: `opacity = 1 - age`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpacityFastFadeModifier;

impl Modifier for OpacityFastFadeModifier {
    fn name(&self) -> &'static str {
        "opacity_fast_fade"
    }

    fn update(&self, _ctx: &ModifierContext, particles: &mut [Particle]) {
        for p in particles {
            p.opacity = 1.0 - p.age;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::test_support::ctx;

    fn aged(age: f32) -> Particle {
        Particle {
            age,
            ..Default::default()
        }
    }

    #[test]
    fn test_colour_interpolates_over_age() {
        let modifier =
            ColourInterpolator::new(Colour::new(0.0, 1.0, 0.0), Colour::new(120.0, 0.0, 1.0));
        let mut particles = [aged(0.0), aged(0.5), aged(1.0)];
        modifier.update(&ctx(0.1), &mut particles);
        assert_eq!(particles[0].colour, [0.0, 1.0, 0.0]);
        assert_eq!(particles[1].colour, [60.0, 0.5, 0.5]);
        assert_eq!(particles[2].colour, [120.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hue_leaves_other_channels() {
        let modifier = HueInterpolator::new(200.0, 100.0);
        let mut p = aged(0.25);
        p.colour = [0.0, 0.3, 0.7];
        let mut particles = [p];
        modifier.update(&ctx(0.1), &mut particles);
        assert_eq!(particles[0].colour, [175.0, 0.3, 0.7]);
    }

    #[test]
    fn test_opacity_and_scale() {
        let mut particles = [aged(0.5)];
        OpacityInterpolator::new(1.0, 0.0).update(&ctx(0.1), &mut particles);
        ScaleInterpolator::new(1.0, 3.0).update(&ctx(0.1), &mut particles);
        assert_eq!(particles[0].opacity, 0.5);
        assert_eq!(particles[0].scale, 2.0);
    }

    #[test]
    fn test_fast_fade() {
        let mut particles = [aged(0.0), aged(0.75)];
        OpacityFastFadeModifier.update(&ctx(0.1), &mut particles);
        assert_eq!(particles[0].opacity, 1.0);
        assert_eq!(particles[1].opacity, 0.25);
    }
}
