//! # Flare Common
//!
//! Common types shared by every Flare crate.
//!
//! This crate provides the leaf types the particle kernel is built on:
//! - 2D geometry (`Coordinate`, `Vector`, `Axis`, `LineSegment`)
//! - HSL colours and `{min, max}` ranges
//! - The `RandomSource` contract and a seedable default generator
//! - Emitter identifiers
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod colour;
pub mod coords;
pub mod error;
pub mod ids;
pub mod random;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::colour::*;
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::random::*;
}

pub use prelude::*;
