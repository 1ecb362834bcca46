//! Colour and value-range types.
//!
//! Particle colours are stored as HSL triples: hue in degrees `[0, 360)`,
//! saturation and lightness in `[0, 1]`. Renderers convert to RGB with
//! [`Colour::to_rgb`].

use std::ops::Sub;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// An HSL colour triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Colour {
    /// Hue in degrees
    pub h: f32,
    /// Saturation
    pub s: f32,
    /// Lightness
    pub l: f32,
}

impl Colour {
    /// Pure white.
    pub const WHITE: Self = Self::new(0.0, 0.0, 1.0);
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a colour from hue, saturation and lightness.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Returns the colour as an `[h, s, l]` array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.h, self.s, self.l]
    }

    /// Converts to linear RGB, each channel clamped to `[0, 1]`.
    #[must_use]
    pub fn to_rgb(self) -> [f32; 3] {
        hsl_to_rgb([self.h, self.s, self.l])
    }
}

impl From<[f32; 3]> for Colour {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl Sub for Colour {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.h - rhs.h, self.s - rhs.s, self.l - rhs.l)
    }
}

/// Converts a raw HSL triple (hue in degrees) to RGB.
#[must_use]
pub fn hsl_to_rgb(hsl: [f32; 3]) -> [f32; 3] {
    let hue = hsl[0].rem_euclid(360.0) / 360.0;
    let [r, g, b] = hue_to_rgb(hue);
    let chroma = (1.0 - (2.0 * hsl[2] - 1.0).abs()) * hsl[1];
    [
        ((r - 0.5) * chroma + hsl[2]).clamp(0.0, 1.0),
        ((g - 0.5) * chroma + hsl[2]).clamp(0.0, 1.0),
        ((b - 0.5) * chroma + hsl[2]).clamp(0.0, 1.0),
    ]
}

fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let r = (hue * 6.0 - 3.0).abs() - 1.0;
    let g = 2.0 - (hue * 6.0 - 2.0).abs();
    let b = 2.0 - (hue * 6.0 - 4.0).abs();
    [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
}

/// An inclusive `{min, max}` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range<T> {
    /// Lower bound
    pub min: T,
    /// Upper bound
    pub max: T,
}

impl<T: Copy> Range<T> {
    /// Creates a range between two bounds.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    #[must_use]
    pub const fn constant(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

impl<T: PartialOrd> Range<T> {
    /// Whether `min <= max`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Per-channel colour range used when sampling new particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourRange {
    /// Hue range
    pub h: Range<f32>,
    /// Saturation range
    pub s: Range<f32>,
    /// Lightness range
    pub l: Range<f32>,
}

impl ColourRange {
    /// Creates a range spanning two colours channel by channel.
    #[must_use]
    pub const fn new(min: Colour, max: Colour) -> Self {
        Self {
            h: Range::new(min.h, max.h),
            s: Range::new(min.s, max.s),
            l: Range::new(min.l, max.l),
        }
    }

    /// A range that always yields `colour`.
    #[must_use]
    pub const fn constant(colour: Colour) -> Self {
        Self::new(colour, colour)
    }

    /// Whether every channel has `min <= max`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.h.is_ordered() && self.s.is_ordered() && self.l.is_ordered()
    }
}

impl Default for ColourRange {
    fn default() -> Self {
        Self {
            h: Range::new(0.0, 1.0),
            s: Range::new(0.0, 1.0),
            l: Range::new(0.0, 1.0),
        }
    }
}

impl From<Colour> for ColourRange {
    fn from(colour: Colour) -> Self {
        Self::constant(colour)
    }
}
