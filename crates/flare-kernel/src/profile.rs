//! Emission profiles.
//!
//! A profile decides where a newly released particle starts relative to the
//! trigger point and which way it is heading. Profiles hold configuration
//! only; all randomness comes from the emitter's [`RandomSource`].

use std::fmt;

use flare_common::{Axis, Coordinate, RandomSource};
use serde::{Deserialize, Serialize};

/// Strategy computing the initial offset and heading of a particle.
///
/// Implementations must return a heading of unit length.
pub trait EmissionProfile: fmt::Debug + Send + Sync {
    /// Offset from the trigger point and unit heading for one particle.
    fn offset_and_heading(&self, rng: &mut dyn RandomSource) -> (Coordinate, Axis);
}

/// Built-in emission shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Profile {
    /// Every particle starts at the trigger point, heading anywhere.
    #[default]
    Point,
    /// Particles start on a circle of `radius` around the trigger point.
    Ring {
        /// Ring radius
        radius: f32,
        /// Head straight out from the centre instead of in a random direction
        #[serde(default)]
        radiate: bool,
    },
    /// Particles start inside a disc of `radius`.
    Circle {
        /// Disc radius
        radius: f32,
        /// Head straight out from the centre instead of in a random direction
        #[serde(default)]
        radiate: bool,
    },
    /// Particles start on the outline of a rectangle centred on the trigger
    /// point.
    Box {
        /// Rectangle width
        width: f32,
        /// Rectangle height
        height: f32,
    },
    /// Particles start anywhere inside a rectangle centred on the trigger
    /// point.
    BoxFill {
        /// Rectangle width
        width: f32,
        /// Rectangle height
        height: f32,
    },
    /// Particles start at the trigger point and head within `spread`
    /// radians of `direction`.
    Spray {
        /// Centre of the cone
        direction: Axis,
        /// Full cone angle in radians
        spread: f32,
    },
}

impl Profile {
    /// Point profile.
    #[must_use]
    pub const fn point() -> Self {
        Self::Point
    }

    /// Ring profile.
    #[must_use]
    pub const fn ring(radius: f32, radiate: bool) -> Self {
        Self::Ring { radius, radiate }
    }

    /// Filled circle profile.
    #[must_use]
    pub const fn circle(radius: f32, radiate: bool) -> Self {
        Self::Circle { radius, radiate }
    }

    /// Rectangle outline profile.
    #[must_use]
    pub const fn box_outline(width: f32, height: f32) -> Self {
        Self::Box { width, height }
    }

    /// Filled rectangle profile.
    #[must_use]
    pub const fn box_fill(width: f32, height: f32) -> Self {
        Self::BoxFill { width, height }
    }

    /// Spray cone profile.
    #[must_use]
    pub const fn spray(direction: Axis, spread: f32) -> Self {
        Self::Spray { direction, spread }
    }

    /// Short name of the shape, for logs.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Ring { .. } => "ring",
            Self::Circle { .. } => "circle",
            Self::Box { .. } => "box",
            Self::BoxFill { .. } => "box_fill",
            Self::Spray { .. } => "spray",
        }
    }
}

impl EmissionProfile for Profile {
    fn offset_and_heading(&self, rng: &mut dyn RandomSource) -> (Coordinate, Axis) {
        match *self {
            Self::Point => (Coordinate::ORIGIN, rng.next_unit_vector()),
            Self::Ring { radius, radiate } => {
                let outward = rng.next_unit_vector();
                let offset = Coordinate::ORIGIN.translate(outward.scale(radius));
                (offset, radial_heading(rng, outward, radiate))
            }
            Self::Circle { radius, radiate } => {
                let distance = rng.next_float_to(radius);
                let outward = rng.next_unit_vector();
                let offset = Coordinate::ORIGIN.translate(outward.scale(distance));
                (offset, radial_heading(rng, outward, radiate))
            }
            Self::Box { width, height } => {
                let (half_w, half_h) = (width * 0.5, height * 0.5);
                let offset = match rng.next_int(4) {
                    0 => Coordinate::new(-half_w, rng.next_float_between(-half_h, half_h)),
                    1 => Coordinate::new(rng.next_float_between(-half_w, half_w), -half_h),
                    2 => Coordinate::new(half_w, rng.next_float_between(-half_h, half_h)),
                    _ => Coordinate::new(rng.next_float_between(-half_w, half_w), half_h),
                };
                (offset, rng.next_unit_vector())
            }
            Self::BoxFill { width, height } => {
                let (half_w, half_h) = (width * 0.5, height * 0.5);
                let offset = Coordinate::new(
                    rng.next_float_between(-half_w, half_w),
                    rng.next_float_between(-half_h, half_h),
                );
                (offset, rng.next_unit_vector())
            }
            Self::Spray { direction, spread } => {
                let centre = direction.angle();
                let angle = rng.next_float_between(centre - spread * 0.5, centre + spread * 0.5);
                (Coordinate::ORIGIN, Axis::from_angle(angle))
            }
        }
    }
}

fn radial_heading(rng: &mut dyn RandomSource, outward: Axis, radiate: bool) -> Axis {
    if radiate {
        outward
    } else {
        rng.next_unit_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_common::SeededRandom;

    const SAMPLES: usize = 1000;

    fn unit_length(axis: Axis) -> f32 {
        (axis.x() * axis.x() + axis.y() * axis.y()).sqrt()
    }

    fn magnitude(c: Coordinate) -> f32 {
        (c.x * c.x + c.y * c.y).sqrt()
    }

    #[test]
    fn test_point_profile_offset_is_origin() {
        let mut rng = SeededRandom::default();
        for _ in 0..SAMPLES {
            let (offset, heading) = Profile::point().offset_and_heading(&mut rng);
            assert_eq!(offset, Coordinate::ORIGIN);
            assert!((unit_length(heading) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ring_profile_offset_on_radius() {
        let mut rng = SeededRandom::new(11).expect("valid seed");
        let profile = Profile::ring(10.0, false);
        for _ in 0..SAMPLES {
            let (offset, heading) = profile.offset_and_heading(&mut rng);
            assert!((magnitude(offset) - 10.0).abs() < 1e-3);
            assert!((unit_length(heading) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ring_heading_independent_of_offset() {
        let mut rng = SeededRandom::new(5).expect("valid seed");
        let profile = Profile::ring(10.0, false);
        let mut aligned = 0;
        let mut dot_sum = 0.0;
        for _ in 0..SAMPLES {
            let (offset, heading) = profile.offset_and_heading(&mut rng);
            let dot = (offset.x * heading.x() + offset.y * heading.y()) / 10.0;
            dot_sum += dot;
            if dot > 0.999 {
                aligned += 1;
            }
        }
        assert!(aligned < SAMPLES / 10);
        assert!((dot_sum / SAMPLES as f32).abs() < 0.1);
    }

    #[test]
    fn test_ring_radiate_heads_outward() {
        let mut rng = SeededRandom::default();
        let profile = Profile::ring(4.0, true);
        for _ in 0..SAMPLES {
            let (offset, heading) = profile.offset_and_heading(&mut rng);
            assert!((offset.x / 4.0 - heading.x()).abs() < 1e-4);
            assert!((offset.y / 4.0 - heading.y()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_circle_profile_within_radius() {
        let mut rng = SeededRandom::default();
        let profile = Profile::circle(3.0, false);
        for _ in 0..SAMPLES {
            let (offset, _) = profile.offset_and_heading(&mut rng);
            assert!(magnitude(offset) <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_box_profile_on_outline() {
        let mut rng = SeededRandom::default();
        let profile = Profile::box_outline(8.0, 4.0);
        let mut edges = [false; 4];
        for _ in 0..SAMPLES {
            let (offset, _) = profile.offset_and_heading(&mut rng);
            let on_vertical = (offset.x.abs() - 4.0).abs() < 1e-5 && offset.y.abs() <= 2.0;
            let on_horizontal = (offset.y.abs() - 2.0).abs() < 1e-5 && offset.x.abs() <= 4.0;
            assert!(on_vertical || on_horizontal);
            if (offset.x + 4.0).abs() < 1e-5 {
                edges[0] = true;
            }
            if (offset.y + 2.0).abs() < 1e-5 {
                edges[1] = true;
            }
            if (offset.x - 4.0).abs() < 1e-5 {
                edges[2] = true;
            }
            if (offset.y - 2.0).abs() < 1e-5 {
                edges[3] = true;
            }
        }
        assert!(edges.iter().all(|&hit| hit));
    }

    #[test]
    fn test_box_fill_profile_inside() {
        let mut rng = SeededRandom::default();
        let profile = Profile::box_fill(8.0, 4.0);
        for _ in 0..SAMPLES {
            let (offset, _) = profile.offset_and_heading(&mut rng);
            assert!(offset.x.abs() <= 4.0 && offset.y.abs() <= 2.0);
        }
    }

    #[test]
    fn test_spray_profile_within_cone() {
        let mut rng = SeededRandom::default();
        let profile = Profile::spray(Axis::UP, 0.5);
        for _ in 0..SAMPLES {
            let (offset, heading) = profile.offset_and_heading(&mut rng);
            assert_eq!(offset, Coordinate::ORIGIN);
            let deviation = (heading.angle() - Axis::UP.angle()).abs();
            assert!(deviation <= 0.25 + 1e-4);
            assert!((unit_length(heading) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_profile_toml_shape_tag() {
        let profile: Profile =
            toml::from_str("shape = \"ring\"\nradius = 10.0\n").expect("parse profile");
        assert_eq!(profile, Profile::ring(10.0, false));
        assert_eq!(profile.shape_name(), "ring");

        let spray: Profile =
            toml::from_str("shape = \"spray\"\ndirection = [0.0, 2.0]\nspread = 1.0\n")
                .expect("parse profile");
        assert_eq!(spray, Profile::spray(Axis::UP, 1.0));
    }
}
