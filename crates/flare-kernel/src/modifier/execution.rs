//! Modifier execution strategies.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::modifier::{Modifier, ModifierContext};
use crate::particle::Particle;

/// Particles per work item in parallel execution.
pub const PARALLEL_CHUNK_SIZE: usize = 1024;

/// How a modifier's scheduled range is processed.
///
/// Modifiers always run one after another in list order. `Parallel` splits
/// each modifier's range into chunks processed on the rayon thread pool;
/// every particle is still touched by exactly one thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Single-threaded, always correct
    #[default]
    Serial,
    /// Data-parallel over chunks of the range
    Parallel,
}

impl ExecutionStrategy {
    /// Applies `modifier` to `particles` according to the strategy.
    pub fn execute(
        self,
        modifier: &dyn Modifier,
        ctx: &ModifierContext,
        particles: &mut [Particle],
    ) {
        match self {
            Self::Parallel if particles.len() > PARALLEL_CHUNK_SIZE => {
                particles
                    .par_chunks_mut(PARALLEL_CHUNK_SIZE)
                    .for_each(|chunk| modifier.update(ctx, chunk));
            }
            _ => modifier.update(ctx, particles),
        }
    }
}
