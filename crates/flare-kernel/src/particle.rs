//! The particle record.

use bytemuck::{Pod, Zeroable};

/// Simulation state of a single particle.
///
/// The layout is fixed (`#[repr(C)]`, no padding, no pointers) so the live
/// range can be copied byte-for-byte into a GPU-visible buffer. The field
/// offsets are published as constants for renderers that describe vertex
/// attributes by hand.
///
/// # Layout (52 bytes)
/// ```text
/// ┌───────────┬─────┬──────────┬──────────┬─────────────┬─────────┬───────┬──────────┬──────┐
/// │ inception │ age │ position │ velocity │ colour(HSL) │ opacity │ scale │ rotation │ mass │
/// │ 0         │ 4   │ 8        │ 16       │ 24          │ 36      │ 40    │ 44       │ 48   │
/// └───────────┴─────┴──────────┴──────────┴─────────────┴─────────┴───────┴──────────┴──────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Particle {
    /// Simulation time at release, in seconds
    pub inception: f32,
    /// Normalized lifetime fraction; above 1.0 the particle is expired
    pub age: f32,
    /// Position (x, y)
    pub position: [f32; 2],
    /// Velocity in units per second (x, y)
    pub velocity: [f32; 2],
    /// Hue, saturation, lightness
    pub colour: [f32; 3],
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Render scale
    pub scale: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// Mass used by force modifiers
    pub mass: f32,
}

impl Particle {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Byte offset of `inception`.
    pub const OFFSET_INCEPTION: usize = 0;
    /// Byte offset of `age`.
    pub const OFFSET_AGE: usize = 4;
    /// Byte offset of `position`.
    pub const OFFSET_POSITION: usize = 8;
    /// Byte offset of `velocity`.
    pub const OFFSET_VELOCITY: usize = 16;
    /// Byte offset of `colour`.
    pub const OFFSET_COLOUR: usize = 24;
    /// Byte offset of `opacity`.
    pub const OFFSET_OPACITY: usize = 36;
    /// Byte offset of `scale`.
    pub const OFFSET_SCALE: usize = 40;
    /// Byte offset of `rotation`.
    pub const OFFSET_ROTATION: usize = 44;
    /// Byte offset of `mass`.
    pub const OFFSET_MASS: usize = 48;

    /// Whether the particle has outlived its term.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.age > 1.0
    }

    /// Squared speed, for threshold comparisons without a square root.
    #[must_use]
    pub fn speed_squared(&self) -> f32 {
        self.velocity[0] * self.velocity[0] + self.velocity[1] * self.velocity[1]
    }

    /// Speed in units per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed_squared().sqrt()
    }
}
