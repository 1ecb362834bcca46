//! # Flare Kernel
//!
//! Real-time 2D particle simulation core.
//!
//! This crate provides the particle storage engine and its update pipeline:
//! - Fixed-layout particle records
//! - Ring-buffer particle pool with release/reclaim at opposite ends
//! - Emission profiles seeding new particles (point, ring, circle, box, spray)
//! - Modifiers with per-modifier frequency scheduling
//! - Emitters driving one buffer each, and effects grouping emitters
//! - TOML effect configuration
//! - Render boundary: ordered copies and packed GPU instances
//!
//! ## Frame Loop
//!
//! ```text
//! effect.trigger(position)   ─► emitter.trigger ─► buffer.release ─► profile + parameters
//! effect.update(dt)          ─► emitter.update  ─► reclaim expired ─► integrate ─► modifiers
//! renderer                   ─► emitter.copy_to / pack_instances
//! ```
//!
//! ## Threading
//!
//! An emitter is driven by one thread at a time. Different emitters own
//! disjoint storage and may be updated concurrently; `ParticleEffect`
//! does this on the rayon pool when parallel updates are enabled. Within
//! an emitter, `ExecutionStrategy::Parallel` splits each modifier's work
//! into chunks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod buffer;
pub mod config;
pub mod effect;
pub mod emitter;
pub mod modifier;
pub mod particle;
pub mod profile;
pub mod release;
pub mod render;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::buffer::*;
    pub use crate::config::*;
    pub use crate::effect::*;
    pub use crate::emitter::*;
    pub use crate::modifier::*;
    pub use crate::particle::*;
    pub use crate::profile::*;
    pub use crate::release::*;
    pub use crate::render::*;
    pub use flare_common::prelude::*;
}

pub use prelude::*;
