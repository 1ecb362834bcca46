//! 2D geometry types: points, displacements, directions and segments.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point in simulation space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Coordinate {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Coordinate {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Moves this point by a displacement.
    #[must_use]
    pub fn translate(self, vector: Vector) -> Self {
        Self::from(Vec2::from(self) + Vec2::from(vector))
    }

    /// Displacement from `other` to `self`.
    #[must_use]
    pub fn subtract(self, other: Self) -> Vector {
        Vector::from(Vec2::from(self) - Vec2::from(other))
    }

    /// Returns the coordinate as a `[x, y]` array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<Vec2> for Coordinate {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Coordinate> for Vec2 {
    fn from(c: Coordinate) -> Self {
        Vec2::new(c.x, c.y)
    }
}

/// A displacement with direction and magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Vector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector {
    /// Creates a new vector from components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a vector pointing along `axis` with the given length.
    #[must_use]
    pub fn from_axis(axis: Axis, magnitude: f32) -> Self {
        Self::new(axis.x() * magnitude, axis.y() * magnitude)
    }

    /// Length of the vector.
    #[must_use]
    pub fn magnitude(self) -> f32 {
        Vec2::from(self).length()
    }

    /// Direction of the vector. Zero vectors map to [`Axis::RIGHT`].
    #[must_use]
    pub fn axis(self) -> Axis {
        Axis::new(self.x, self.y)
    }
}

impl From<Vec2> for Vector {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector> for Vec2 {
    fn from(v: Vector) -> Self {
        Vec2::new(v.x, v.y)
    }
}

/// A directed unit axis.
///
/// The constructor normalizes its input, so every `Axis` has length 1
/// (within float tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
#[repr(C)]
pub struct Axis {
    x: f32,
    y: f32,
}

impl Axis {
    /// Points towards negative X.
    pub const LEFT: Self = Self { x: -1.0, y: 0.0 };
    /// Points towards positive X.
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };
    /// Points towards positive Y.
    pub const UP: Self = Self { x: 0.0, y: 1.0 };
    /// Points towards negative Y.
    pub const DOWN: Self = Self { x: 0.0, y: -1.0 };

    /// Creates an axis from a direction, normalizing it.
    ///
    /// A zero or non-finite direction yields [`Axis::RIGHT`].
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        let v = Vec2::new(x, y).try_normalize().unwrap_or(Vec2::X);
        Self { x: v.x, y: v.y }
    }

    /// Creates an axis at `angle` radians counter-clockwise from +X.
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: cos, y: sin }
    }

    /// X component.
    #[must_use]
    pub const fn x(self) -> f32 {
        self.x
    }

    /// Y component.
    #[must_use]
    pub const fn y(self) -> f32 {
        self.y
    }

    /// Angle in radians counter-clockwise from +X, in `(-π, π]`.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Scales the axis into a vector.
    #[must_use]
    pub fn scale(self, magnitude: f32) -> Vector {
        Vector::from_axis(self, magnitude)
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::RIGHT
    }
}

impl From<[f32; 2]> for Axis {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Axis> for [f32; 2] {
    fn from(a: Axis) -> Self {
        [a.x, a.y]
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct LineSegment {
    /// First end point
    pub start: Coordinate,
    /// Second end point
    pub end: Coordinate,
}

impl LineSegment {
    /// Creates a segment between two points.
    #[must_use]
    pub const fn new(start: Coordinate, end: Coordinate) -> Self {
        Self { start, end }
    }

    /// Creates a segment starting at `origin` and spanning `vector`.
    #[must_use]
    pub fn from_origin(origin: Coordinate, vector: Vector) -> Self {
        Self::new(origin, origin.translate(vector))
    }

    /// The starting point.
    #[must_use]
    pub const fn origin(self) -> Coordinate {
        self.start
    }

    /// Direction from start to end.
    #[must_use]
    pub fn direction(self) -> Axis {
        self.to_vector().axis()
    }

    /// Displacement from start to end.
    #[must_use]
    pub fn to_vector(self) -> Vector {
        self.end.subtract(self.start)
    }

    /// Point at parameter `t` along the segment (`0` = start, `1` = end).
    #[must_use]
    pub fn point_at(self, t: f32) -> Coordinate {
        Coordinate::from(Vec2::from(self.start).lerp(Vec2::from(self.end), t))
    }
}
